use crate::handlers::{
    accounts::{get_accounts, set_role, set_specialization},
    admin::{get_day_detail, get_overview, get_recent_updates},
    auth::{login, logout},
    health::health_check,
    work_updates::{
        auto_leave_check, create_work_update, delete_work_update, get_all_work_updates,
        get_user_summary, get_user_work_updates, update_work_update,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Sessions
        .route("/api/v1/login", post(login))
        .route("/api/v1/logout", post(logout))
        // Accounts
        .route("/api/v1/accounts", get(get_accounts))
        .route("/api/v1/accounts/:username/specialization", put(set_specialization))
        .route("/api/v1/accounts/:username/role", put(set_role))
        .route("/api/v1/accounts/:username/work-updates", get(get_user_work_updates))
        .route(
            "/api/v1/accounts/:username/work-updates/summary",
            get(get_user_summary),
        )
        // Work updates
        .route(
            "/api/v1/work-updates",
            get(get_all_work_updates).post(create_work_update),
        )
        .route("/api/v1/work-updates/auto-leave", post(auto_leave_check))
        .route(
            "/api/v1/work-updates/:id",
            put(update_work_update).delete(delete_work_update),
        )
        // Admin aggregation
        .route("/api/v1/admin/overview", get(get_overview))
        .route("/api/v1/admin/days/:date", get(get_day_detail))
        .route("/api/v1/admin/recent", get(get_recent_updates))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
