use std::sync::Arc;

use compute::{AutoLeavePolicy, EditWindow};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::auth::SessionStore;
use crate::clock::Clock;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Live login sessions
    pub sessions: SessionStore,
    /// Source of "now" for timestamps, the edit window and auto-leave
    pub clock: Arc<dyn Clock>,
    pub edit_window: EditWindow,
    pub auto_leave: AutoLeavePolicy,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::accounts::get_accounts,
        crate::handlers::accounts::set_specialization,
        crate::handlers::accounts::set_role,
        crate::handlers::work_updates::create_work_update,
        crate::handlers::work_updates::get_all_work_updates,
        crate::handlers::work_updates::get_user_work_updates,
        crate::handlers::work_updates::get_user_summary,
        crate::handlers::work_updates::update_work_update,
        crate::handlers::work_updates::delete_work_update,
        crate::handlers::work_updates::auto_leave_check,
        crate::handlers::admin::get_overview,
        crate::handlers::admin::get_day_detail,
        crate::handlers::admin::get_recent_updates,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::accounts::AccountResponse,
            crate::handlers::accounts::SetSpecializationRequest,
            crate::handlers::accounts::SetRoleRequest,
            crate::handlers::work_updates::CreateWorkUpdateRequest,
            crate::handlers::work_updates::UpdateWorkUpdateRequest,
            crate::handlers::work_updates::WorkUpdateResponse,
            crate::handlers::work_updates::AutoLeaveResponse,
            crate::handlers::admin::OverviewResponse,
            crate::handlers::admin::DayDetailResponse,
            model::entities::account::Role,
            model::entities::account::Specialization,
            model::entities::work_update::UpdateStatus,
            compute::AdminStats,
            compute::TeamMember,
            compute::MonthlySummary,
            compute::CalendarDay,
            compute::DayKind,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login and sessions"),
        (name = "accounts", description = "Account administration"),
        (name = "work-updates", description = "Daily work and leave updates"),
        (name = "admin", description = "Team aggregation for admins"),
    ),
    info(
        title = "Worklog API",
        description = "Daily work-update tracking for small teams",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
