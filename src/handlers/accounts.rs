use crate::auth::AuthorizedUser;
use crate::error::AppError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::accounts;
use axum::{
    extract::{Path, State},
    response::Json,
};
use model::entities::account::{self, Role, Specialization};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

/// Account as shown to clients. The credential is never included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub specialization: Option<Specialization>,
}

impl From<account::Model> for AccountResponse {
    fn from(model: account::Model) -> Self {
        Self {
            username: model.username,
            display_name: model.display_name,
            role: model.role,
            specialization: model.specialization,
        }
    }
}

/// Request body for choosing a specialization
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetSpecializationRequest {
    /// `software` or `hardware`
    pub specialization: String,
}

/// Request body for changing a role
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetRoleRequest {
    /// `admin` or `employee`
    pub role: String,
}

/// List all accounts sorted by display name
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountResponse>>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn get_accounts(
    State(state): State<AppState>,
    user: AuthorizedUser,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, AppError> {
    trace!("Entering get_accounts function");
    user.require_admin()?;

    let accounts = accounts::list_accounts(&state.db).await?;
    info!("Successfully retrieved {} accounts", accounts.len());

    let data = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Accounts retrieved successfully")))
}

/// Choose the specialization of an account
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{username}/specialization",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username"),
    ),
    request_body = SetSpecializationRequest,
    responses(
        (status = 200, description = "Specialization saved", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Unrecognized specialization", body = ErrorResponse),
        (status = 403, description = "Not allowed to change it", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn set_specialization(
    Path(username): Path<String>,
    State(state): State<AppState>,
    user: AuthorizedUser,
    Json(request): Json<SetSpecializationRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    debug!("Setting specialization of {} to {}", username, request.specialization);

    let updated =
        accounts::set_specialization(&state.db, user.account(), &username, &request.specialization)
            .await?;

    Ok(Json(ApiResponse::ok(
        AccountResponse::from(updated),
        "Specialization saved successfully",
    )))
}

/// Change the role of an account
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{username}/role",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username"),
    ),
    request_body = SetRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Unrecognized role", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn set_role(
    Path(username): Path<String>,
    State(state): State<AppState>,
    user: AuthorizedUser,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    user.require_admin()?;
    debug!("Setting role of {} to {}", username, request.role);

    let updated = accounts::set_role(&state.db, &username, &request.role).await?;

    Ok(Json(ApiResponse::ok(
        AccountResponse::from(updated),
        "Role updated successfully",
    )))
}
