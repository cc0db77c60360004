use crate::auth::AuthorizedUser;
use crate::error::AppError;
use crate::handlers::accounts::AccountResponse;
use crate::handlers::work_updates::WorkUpdateResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::{accounts, work_updates};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use axum_valid::Valid;
use chrono::{Datelike, NaiveDate};
use compute::calendar::calendar_month;
use compute::{AdminStats, AdminView, CalendarDay, DayDetail, TeamMember};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Filters shared by the admin endpoints
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams, Validate)]
pub struct AdminQuery {
    /// `software`, `hardware` or "All Project Types"
    pub project_type: Option<String>,
    /// Display name of an employee or "All Employees"
    pub employee: Option<String>,
    /// Calendar year (default: current year)
    #[validate(range(min = 1970, max = 9999))]
    pub year: Option<i32>,
    /// Calendar month 1-12 (default: current month)
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
}

/// Everything the admin dashboard shows for one month
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OverviewResponse {
    pub year: i32,
    pub month: u32,
    /// Totals over all accounts and updates, ignoring filters
    pub stats: AdminStats,
    pub employees: Vec<AccountResponse>,
    pub updates: Vec<WorkUpdateResponse>,
    /// One entry per day of the month, built from the filtered updates
    pub calendar: Vec<CalendarDay>,
    pub team: Vec<TeamMember>,
}

/// Updates on one date split by specialization
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DayDetailResponse {
    pub date: NaiveDate,
    pub software: Vec<WorkUpdateResponse>,
    pub hardware: Vec<WorkUpdateResponse>,
    pub total: usize,
}

impl From<DayDetail> for DayDetailResponse {
    fn from(detail: DayDetail) -> Self {
        let total = detail.len();
        Self {
            date: detail.date,
            software: detail.software.into_iter().map(WorkUpdateResponse::from).collect(),
            hardware: detail.hardware.into_iter().map(WorkUpdateResponse::from).collect(),
            total,
        }
    }
}

/// Filtered employees, updates and calendar for a month
#[utoipa::path(
    get,
    path = "/api/v1/admin/overview",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AdminQuery),
    responses(
        (status = 200, description = "Overview computed", body = ApiResponse<OverviewResponse>),
        (status = 400, description = "Invalid month", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn get_overview(
    State(state): State<AppState>,
    user: AuthorizedUser,
    Valid(Query(query)): Valid<Query<AdminQuery>>,
) -> Result<Json<ApiResponse<OverviewResponse>>, AppError> {
    user.require_admin()?;

    let today = state.clock.local_now().date();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    let project_type = query.project_type.as_deref();
    let employee = query.employee.as_deref();

    let all_accounts = accounts::list_accounts(&state.db).await?;
    let all_updates = work_updates::list_all(&state.db).await?;
    let view = AdminView::new(&all_accounts, &all_updates);

    let updates = view.filter_updates(project_type, employee);
    let calendar = calendar_month(updates.iter().copied(), year, month)?;
    debug!(
        "Overview of {}-{:02}: {} of {} updates after filters",
        year,
        month,
        updates.len(),
        all_updates.len()
    );

    let response = OverviewResponse {
        year,
        month,
        stats: view.stats(today),
        employees: view
            .filter_employees(project_type)
            .into_iter()
            .cloned()
            .map(AccountResponse::from)
            .collect(),
        updates: updates
            .into_iter()
            .cloned()
            .map(WorkUpdateResponse::from)
            .collect(),
        calendar,
        team: view.team_overview(project_type, today),
    };
    Ok(Json(ApiResponse::ok(response, "Overview computed successfully")))
}

/// Filtered updates on one date
#[utoipa::path(
    get,
    path = "/api/v1/admin/days/{date}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("date" = NaiveDate, Path, description = "Date (YYYY-MM-DD)"),
        AdminQuery,
    ),
    responses(
        (status = 200, description = "Day detail computed", body = ApiResponse<DayDetailResponse>),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn get_day_detail(
    Path(date): Path<NaiveDate>,
    State(state): State<AppState>,
    user: AuthorizedUser,
    Valid(Query(query)): Valid<Query<AdminQuery>>,
) -> Result<Json<ApiResponse<DayDetailResponse>>, AppError> {
    user.require_admin()?;

    let all_accounts = accounts::list_accounts(&state.db).await?;
    let all_updates = work_updates::list_all(&state.db).await?;
    let detail = AdminView::new(&all_accounts, &all_updates).day_detail(
        date,
        query.project_type.as_deref(),
        query.employee.as_deref(),
    );

    let message = if detail.is_empty() {
        format!("No updates for {}", date)
    } else {
        format!("{} updates for {}", detail.len(), date)
    };
    Ok(Json(ApiResponse::ok(DayDetailResponse::from(detail), message)))
}

/// Filtered updates grouped by date, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/admin/recent",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AdminQuery),
    responses(
        (status = 200, description = "Recent updates grouped by date", body = ApiResponse<Vec<DayDetailResponse>>),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn get_recent_updates(
    State(state): State<AppState>,
    user: AuthorizedUser,
    Valid(Query(query)): Valid<Query<AdminQuery>>,
) -> Result<Json<ApiResponse<Vec<DayDetailResponse>>>, AppError> {
    user.require_admin()?;

    let all_accounts = accounts::list_accounts(&state.db).await?;
    let all_updates = work_updates::list_all(&state.db).await?;
    let days: Vec<DayDetailResponse> = AdminView::new(&all_accounts, &all_updates)
        .recent_by_date(query.project_type.as_deref(), query.employee.as_deref())
        .into_iter()
        .map(DayDetailResponse::from)
        .collect();

    info!("Grouped recent updates into {} dates", days.len());
    Ok(Json(ApiResponse::ok(days, "Recent updates retrieved successfully")))
}
