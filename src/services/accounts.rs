//! Authentication Service: login with first-login provisioning, and account
//! administration.

use model::entities::account::{self, Role, Specialization};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::auth::{hash_password, verify_password};
use crate::error::{is_unique_violation, AppError};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: account::Model,
    /// The account was provisioned by this login.
    pub is_new_account: bool,
}

impl LoginOutcome {
    pub fn requires_specialization_selection(&self) -> bool {
        self.account.requires_specialization_selection()
    }
}

pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<account::Model>, AppError> {
    Ok(account::Entity::find()
        .filter(account::Column::Username.eq(username))
        .one(db)
        .await?)
}

async fn get_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<account::Model, AppError> {
    find_by_username(db, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
}

fn check_secret(account: &account::Model, secret: &str) -> Result<(), AppError> {
    if verify_password(secret, &account.password_hash)? {
        Ok(())
    } else {
        warn!("Invalid credentials for {}", account.username);
        Err(AppError::InvalidCredentials)
    }
}

/// Verifies credentials, creating an employee account for unknown usernames.
///
/// The username is trimmed first; a blank one is a validation error.
///
/// New accounts get a display name derived from the username and no
/// specialization, so they must pick one before anything else.
#[instrument(skip(db, secret))]
pub async fn login(
    db: &DatabaseConnection,
    username: &str,
    secret: &str,
) -> Result<LoginOutcome, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("username must not be blank".to_string()));
    }

    if let Some(existing) = find_by_username(db, username).await? {
        check_secret(&existing, secret)?;
        info!("{} logged in", username);
        return Ok(LoginOutcome {
            account: existing,
            is_new_account: false,
        });
    }

    debug!("Unknown username {}, provisioning an employee account", username);
    let new_account = account::ActiveModel {
        username: Set(username.to_string()),
        display_name: Set(account::display_name_from_username(username)),
        password_hash: Set(hash_password(secret)?),
        role: Set(Role::Employee),
        specialization: Set(None),
        ..Default::default()
    };

    match new_account.insert(db).await {
        Ok(created) => {
            info!("Provisioned account {} (id {})", created.username, created.id);
            Ok(LoginOutcome {
                account: created,
                is_new_account: true,
            })
        }
        Err(db_error) if is_unique_violation(&db_error) => {
            // Another request provisioned the same username first.
            warn!("Concurrent first login for {}", username);
            let existing = get_by_username(db, username).await?;
            check_secret(&existing, secret)?;
            Ok(LoginOutcome {
                account: existing,
                is_new_account: false,
            })
        }
        Err(db_error) => Err(db_error.into()),
    }
}

/// Records the specialization of `username`.
///
/// Employees may set their own while it is unset. Changing an existing value
/// is reserved for admins.
#[instrument(skip(db, actor), fields(actor = %actor.username))]
pub async fn set_specialization(
    db: &DatabaseConnection,
    actor: &account::Model,
    username: &str,
    value: &str,
) -> Result<account::Model, AppError> {
    let specialization: Specialization = value.parse().map_err(AppError::InvalidValue)?;

    let is_admin = actor.role == Role::Admin;
    if actor.username != username && !is_admin {
        return Err(AppError::Forbidden(format!(
            "not allowed to change the specialization of {}",
            username
        )));
    }

    let target = get_by_username(db, username).await?;
    match target.specialization {
        Some(current) if current == specialization => {
            debug!("{} already has specialization {}", username, current);
            return Ok(target);
        }
        Some(current) if !is_admin => {
            return Err(AppError::Forbidden(format!(
                "specialization of {} is already set to {}",
                username, current
            )));
        }
        _ => {}
    }

    let mut active: account::ActiveModel = target.into();
    active.specialization = Set(Some(specialization));
    let updated = active.update(db).await?;
    info!("Specialization of {} set to {}", username, specialization);
    Ok(updated)
}

/// Changes the role of `username`. Callers must check the actor is an admin.
#[instrument(skip(db))]
pub async fn set_role(
    db: &DatabaseConnection,
    username: &str,
    value: &str,
) -> Result<account::Model, AppError> {
    let role: Role = value.parse().map_err(AppError::InvalidValue)?;
    let target = get_by_username(db, username).await?;

    let mut active: account::ActiveModel = target.into();
    active.role = Set(role);
    let updated = active.update(db).await?;
    info!("Role of {} set to {}", username, role);
    Ok(updated)
}

/// All accounts, sorted by display name.
pub async fn list_accounts(db: &DatabaseConnection) -> Result<Vec<account::Model>, AppError> {
    Ok(account::Entity::find()
        .order_by_asc(account::Column::DisplayName)
        .order_by_asc(account::Column::Username)
        .all(db)
        .await?)
}

/// Fields of a pre-seeded account.
#[derive(Debug, Clone)]
pub struct SeedAccount {
    pub username: String,
    pub secret: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub specialization: Option<Specialization>,
}

/// Creates an account, or overwrites every field of an existing one.
#[instrument(skip(db, seed), fields(username = %seed.username))]
pub async fn upsert_account(
    db: &DatabaseConnection,
    seed: SeedAccount,
) -> Result<account::Model, AppError> {
    let display_name = seed
        .display_name
        .unwrap_or_else(|| account::display_name_from_username(&seed.username));
    let password_hash = hash_password(&seed.secret)?;

    match find_by_username(db, &seed.username).await? {
        Some(existing) => {
            let mut active: account::ActiveModel = existing.into();
            active.display_name = Set(display_name);
            active.password_hash = Set(password_hash);
            active.role = Set(seed.role);
            active.specialization = Set(seed.specialization);
            let updated = active.update(db).await?;
            info!("Account {} overwritten", updated.username);
            Ok(updated)
        }
        None => {
            let created = account::ActiveModel {
                username: Set(seed.username),
                display_name: Set(display_name),
                password_hash: Set(password_hash),
                role: Set(seed.role),
                specialization: Set(seed.specialization),
                ..Default::default()
            }
            .insert(db)
            .await?;
            info!("Account {} created", created.username);
            Ok(created)
        }
    }
}
