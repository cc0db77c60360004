//! Credentials and server-side sessions.
//!
//! `login` hands out an opaque bearer token. The token maps to a username in
//! [`SessionStore`]; role and specialization are read from the account table
//! on every request.

use std::time::Duration;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Utc};
use model::entities::account::{self, Role};
use moka::future::Cache;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::schemas::AppState;
use crate::services::accounts;

/// Hashes a plaintext secret into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// Checks a plaintext secret against a stored PHC string.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

/// Live sessions keyed by token. Idle sessions expire after the TTL.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Cache<String, Session>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(ttl)
            .build();
        Self { sessions }
    }

    /// Opens a session for `username` and returns its token.
    pub async fn issue(&self, username: &str, now: DateTime<Utc>) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions
            .insert(
                token.clone(),
                Session {
                    username: username.to_string(),
                    issued_at: now,
                },
            )
            .await;
        debug!("Issued session for {}", username);
        token
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).await
    }

    pub async fn revoke(&self, token: &str) {
        self.sessions.invalidate(token).await;
    }
}

/// The account behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthorizedUser {
    token: String,
    account: account::Model,
}

impl AuthorizedUser {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn username(&self) -> &str {
        &self.account.username
    }

    pub fn account(&self) -> &account::Model {
        &self.account
    }

    pub fn is_admin(&self) -> bool {
        self.account.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            warn!("{} attempted an admin-only operation", self.username());
            Err(AppError::Forbidden("admin role required".to_string()))
        }
    }

    /// Allows the account owner or any admin.
    pub fn require_self_or_admin(&self, username: &str) -> Result<(), AppError> {
        if self.username() == username || self.is_admin() {
            Ok(())
        } else {
            warn!("{} attempted to access data of {}", self.username(), username);
            Err(AppError::Forbidden(format!(
                "not allowed to access data of {}",
                username
            )))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        trace!("Resolving bearer token");
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let session = state
            .sessions
            .get(token)
            .await
            .ok_or_else(|| AppError::Unauthorized("invalid or expired session".to_string()))?;
        trace!("Session for {} issued at {}", session.username, session.issued_at);

        let account = accounts::find_by_username(&state.db, &session.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("session account no longer exists".to_string()))?;

        Ok(AuthorizedUser {
            token: token.to_string(),
            account,
        })
    }
}
