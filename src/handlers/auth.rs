use crate::auth::AuthorizedUser;
use crate::error::AppError;
use crate::handlers::accounts::AccountResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::accounts;
use axum::{extract::State, response::Json};
use axum_valid::Valid;
use model::entities::account::{Role, Specialization};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[serde(alias = "secret")]
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub role: Role,
    pub specialization: Option<Specialization>,
    /// The client must ask the employee to pick a specialization
    pub requires_specialization_selection: bool,
    /// The account was created by this login
    pub is_new_account: bool,
    pub account: AccountResponse,
}

/// Log in, creating an employee account for unknown usernames
#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    trace!("Entering login function");
    let username = request.username.trim();

    let outcome = accounts::login(&state.db, username, &request.password).await?;
    let token = state
        .sessions
        .issue(&outcome.account.username, state.clock.now())
        .await;

    let requires_specialization_selection = outcome.requires_specialization_selection();
    let message = if requires_specialization_selection {
        "Please select your specialization to continue"
    } else {
        "Logged in successfully"
    };
    info!(
        "Session opened for {} (new account: {})",
        outcome.account.username, outcome.is_new_account
    );

    let response = LoginResponse {
        token,
        role: outcome.account.role,
        specialization: outcome.account.specialization,
        requires_specialization_selection,
        is_new_account: outcome.is_new_account,
        account: AccountResponse::from(outcome.account),
    };
    Ok(Json(ApiResponse::ok(response, message)))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<String>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthorizedUser,
) -> Result<Json<ApiResponse<String>>, AppError> {
    state.sessions.revoke(user.token()).await;
    info!("Session closed for {}", user.username());
    Ok(Json(ApiResponse::ok(
        user.username().to_string(),
        "Logged out successfully",
    )))
}
