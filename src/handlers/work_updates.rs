use crate::auth::AuthorizedUser;
use crate::error::AppError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::{auto_leave, work_updates};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use compute::aggregation::monthly_summary;
use compute::MonthlySummary;
use model::entities::account::Specialization;
use model::entities::work_update::{self, UpdateStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for submitting a daily update
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateWorkUpdateRequest {
    /// Owner of the update; defaults to the logged-in user. Only admins may
    /// submit for someone else.
    pub username: Option<String>,
    pub date: NaiveDate,
    /// `work` or `leave`
    pub status: String,
    /// Defaults to the owner's specialization
    pub project_type: Option<String>,
    /// Required for `work`
    pub project_name: Option<String>,
    /// Required for `work`
    pub work_done: Option<String>,
    pub task: Option<String>,
    pub help_taken: Option<String>,
}

/// Request body for editing an update; omitted fields keep their value
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateWorkUpdateRequest {
    pub project_type: Option<String>,
    pub project_name: Option<String>,
    pub work_done: Option<String>,
    pub task: Option<String>,
    pub help_taken: Option<String>,
}

/// Work update response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkUpdateResponse {
    pub id: i32,
    pub username: String,
    /// Owner's display name when the update was submitted
    pub display_name: String,
    /// Owner's specialization when the update was submitted
    pub specialization: Specialization,
    pub date: NaiveDate,
    pub project_type: String,
    pub project_name: String,
    pub work_done: String,
    pub task: Option<String>,
    pub help_taken: Option<String>,
    pub status: UpdateStatus,
    pub created_at: DateTime<Utc>,
}

impl From<work_update::Model> for WorkUpdateResponse {
    fn from(model: work_update::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            specialization: model.specialization,
            date: model.date,
            project_type: model.project_type,
            project_name: model.project_name,
            work_done: model.work_done,
            task: model.task,
            help_taken: model.help_taken,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// Outcome of an auto-leave check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AutoLeaveResponse {
    /// A leave was recorded by this check
    pub recorded: bool,
    pub update: Option<WorkUpdateResponse>,
}

/// Query parameters for the monthly summary
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct SummaryQuery {
    /// Year (default: current year)
    #[validate(range(min = 1970, max = 9999))]
    pub year: Option<i32>,
    /// Month 1-12 (default: current month)
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
}

fn into_responses(models: Vec<work_update::Model>) -> Vec<WorkUpdateResponse> {
    models.into_iter().map(WorkUpdateResponse::from).collect()
}

/// Submit the update for a day
#[utoipa::path(
    post,
    path = "/api/v1/work-updates",
    tag = "work-updates",
    security(("bearer_auth" = [])),
    request_body = CreateWorkUpdateRequest,
    responses(
        (status = 201, description = "Work update created", body = ApiResponse<WorkUpdateResponse>),
        (status = 400, description = "Missing field or unrecognized status", body = ErrorResponse),
        (status = 403, description = "Submitting for another user", body = ErrorResponse),
        (status = 409, description = "An update already exists for that date", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user, request), fields(user = %user.username()))]
pub async fn create_work_update(
    State(state): State<AppState>,
    user: AuthorizedUser,
    Json(request): Json<CreateWorkUpdateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WorkUpdateResponse>>), AppError> {
    trace!("Entering create_work_update function");
    let owner = request
        .username
        .clone()
        .unwrap_or_else(|| user.username().to_string());
    if owner != user.username() {
        user.require_admin()?;
    }

    let status: UpdateStatus = request.status.parse().map_err(AppError::InvalidValue)?;
    debug!("Submitting {} update for {} on {}", status, owner, request.date);

    let new = work_updates::NewWorkUpdate {
        date: request.date,
        status,
        project_type: request.project_type,
        project_name: request.project_name.unwrap_or_default(),
        work_done: request.work_done.unwrap_or_default(),
        task: request.task,
        help_taken: request.help_taken,
    };
    let created = work_updates::submit(&state.db, &owner, new, state.clock.now()).await?;

    let message = match created.status {
        UpdateStatus::Leave => "Leave recorded successfully",
        UpdateStatus::Work => "Work update created successfully",
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(WorkUpdateResponse::from(created), message)),
    ))
}

/// All updates of every user, newest-created first
#[utoipa::path(
    get,
    path = "/api/v1/work-updates",
    tag = "work-updates",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Work updates retrieved successfully", body = ApiResponse<Vec<WorkUpdateResponse>>),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn get_all_work_updates(
    State(state): State<AppState>,
    user: AuthorizedUser,
) -> Result<Json<ApiResponse<Vec<WorkUpdateResponse>>>, AppError> {
    user.require_admin()?;

    let updates = work_updates::list_all(&state.db).await?;
    info!("Successfully retrieved {} work updates", updates.len());
    Ok(Json(ApiResponse::ok(
        into_responses(updates),
        "Work updates retrieved successfully",
    )))
}

/// Updates of one user, newest-created first
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{username}/work-updates",
    tag = "work-updates",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username"),
    ),
    responses(
        (status = 200, description = "Work updates retrieved successfully", body = ApiResponse<Vec<WorkUpdateResponse>>),
        (status = 403, description = "Not the owner and not an admin", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn get_user_work_updates(
    Path(username): Path<String>,
    State(state): State<AppState>,
    user: AuthorizedUser,
) -> Result<Json<ApiResponse<Vec<WorkUpdateResponse>>>, AppError> {
    user.require_self_or_admin(&username)?;

    let updates = work_updates::list(&state.db, &username).await?;
    debug!("Retrieved {} work updates of {}", updates.len(), username);
    Ok(Json(ApiResponse::ok(
        into_responses(updates),
        "Work updates retrieved successfully",
    )))
}

/// Counts of one user's updates in a month
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{username}/work-updates/summary",
    tag = "work-updates",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username"),
        SummaryQuery,
    ),
    responses(
        (status = 200, description = "Summary computed", body = ApiResponse<MonthlySummary>),
        (status = 400, description = "Invalid month", body = ErrorResponse),
        (status = 403, description = "Not the owner and not an admin", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn get_user_summary(
    Path(username): Path<String>,
    State(state): State<AppState>,
    user: AuthorizedUser,
    Valid(Query(query)): Valid<Query<SummaryQuery>>,
) -> Result<Json<ApiResponse<MonthlySummary>>, AppError> {
    user.require_self_or_admin(&username)?;

    let today = state.clock.local_now().date();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    let reference = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidValue(format!("invalid month {}-{}", year, month)))?;

    let updates = work_updates::list(&state.db, &username).await?;
    let summary = monthly_summary(&updates, reference);
    Ok(Json(ApiResponse::ok(summary, "Summary computed successfully")))
}

/// Edit an update within five minutes of its creation
#[utoipa::path(
    put,
    path = "/api/v1/work-updates/{id}",
    tag = "work-updates",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Work update ID"),
    ),
    request_body = UpdateWorkUpdateRequest,
    responses(
        (status = 200, description = "Work update edited", body = ApiResponse<WorkUpdateResponse>),
        (status = 400, description = "Edit would clear a required field", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Work update not found", body = ErrorResponse),
        (status = 409, description = "Edit window expired or not a work update", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user, request), fields(user = %user.username()))]
pub async fn update_work_update(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    user: AuthorizedUser,
    Json(request): Json<UpdateWorkUpdateRequest>,
) -> Result<Json<ApiResponse<WorkUpdateResponse>>, AppError> {
    let changes = work_updates::WorkUpdateChanges {
        project_type: request.project_type,
        project_name: request.project_name,
        work_done: request.work_done,
        task: request.task,
        help_taken: request.help_taken,
    };

    let updated = work_updates::edit(
        &state.db,
        id,
        user.username(),
        changes,
        &state.edit_window,
        state.clock.now(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(
        WorkUpdateResponse::from(updated),
        "Work update edited successfully",
    )))
}

/// Delete an update
#[utoipa::path(
    delete,
    path = "/api/v1/work-updates/{id}",
    tag = "work-updates",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Work update ID"),
    ),
    responses(
        (status = 200, description = "Work update deleted", body = ApiResponse<String>),
        (status = 404, description = "Work update not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn delete_work_update(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    user: AuthorizedUser,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let deleted = work_updates::delete(&state.db, id, user.account()).await?;
    Ok(Json(ApiResponse::ok(
        format!("Work update {} deleted", deleted.id),
        "Work update deleted successfully",
    )))
}

/// Record today's leave if nothing was submitted by the cutoff hour
#[utoipa::path(
    post,
    path = "/api/v1/work-updates/auto-leave",
    tag = "work-updates",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Check completed", body = ApiResponse<AutoLeaveResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user = %user.username()))]
pub async fn auto_leave_check(
    State(state): State<AppState>,
    user: AuthorizedUser,
) -> Result<Json<ApiResponse<AutoLeaveResponse>>, AppError> {
    let recorded = auto_leave::check_and_record(
        &state.db,
        user.username(),
        &state.auto_leave,
        state.clock.as_ref(),
    )
    .await?;

    let message = match &recorded {
        Some(leave) => format!(
            "No update was submitted by {}:00, leave has been recorded for {}",
            state.auto_leave.cutoff_hour(),
            leave.date
        ),
        None => "Nothing to record".to_string(),
    };
    let response = AutoLeaveResponse {
        recorded: recorded.is_some(),
        update: recorded.map(WorkUpdateResponse::from),
    };
    Ok(Json(ApiResponse::ok(response, message)))
}
