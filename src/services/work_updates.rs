//! Update Service: submission, listing, the edit window and deletion.

use chrono::{DateTime, NaiveDate, Utc};
use compute::rules::validate_content;
use compute::EditWindow;
use model::entities::account::{self, Role, Specialization};
use model::entities::work_update::{self, UpdateStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{is_unique_violation, AppError};
use crate::services::accounts;

/// Fields supplied when submitting an update.
#[derive(Debug, Clone)]
pub struct NewWorkUpdate {
    pub date: NaiveDate,
    pub status: UpdateStatus,
    /// Defaults to the owner's specialization.
    pub project_type: Option<String>,
    pub project_name: String,
    pub work_done: String,
    pub task: Option<String>,
    pub help_taken: Option<String>,
}

/// Fields that may change while the edit window is open. `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default)]
pub struct WorkUpdateChanges {
    pub project_type: Option<String>,
    pub project_name: Option<String>,
    pub work_done: Option<String>,
    pub task: Option<String>,
    pub help_taken: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn duplicate(username: &str, date: NaiveDate) -> AppError {
    AppError::DuplicateUpdate(format!(
        "{} already has an update for {}",
        username, date
    ))
}

/// Stores a new update for `username`, stamped with `now`.
///
/// The owner's display name and specialization are copied from the account
/// row as it is right now. An unset specialization is stamped as software.
#[instrument(skip(db, new), fields(date = %new.date, status = %new.status))]
pub async fn submit(
    db: &DatabaseConnection,
    username: &str,
    new: NewWorkUpdate,
    now: DateTime<Utc>,
) -> Result<work_update::Model, AppError> {
    validate_content(new.status, &new.project_name, &new.work_done)?;

    let owner = accounts::find_by_username(db, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))?;
    let specialization = owner.specialization.unwrap_or(Specialization::Software);

    let existing = work_update::Entity::find()
        .filter(work_update::Column::Username.eq(username))
        .filter(work_update::Column::Date.eq(new.date))
        .one(db)
        .await?;
    if let Some(existing) = existing {
        warn!("Update {} already covers {} for {}", existing.id, new.date, username);
        return Err(duplicate(username, new.date));
    }

    let project_type = new
        .project_type
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| specialization.as_str().to_string());

    let record = work_update::ActiveModel {
        username: Set(owner.username.clone()),
        display_name: Set(owner.display_name.clone()),
        specialization: Set(specialization),
        date: Set(new.date),
        project_type: Set(project_type),
        project_name: Set(new.project_name.trim().to_string()),
        work_done: Set(new.work_done.trim().to_string()),
        task: Set(non_empty(new.task)),
        help_taken: Set(non_empty(new.help_taken)),
        status: Set(new.status),
        created_at: Set(now),
        ..Default::default()
    };

    store(db, record, username, new.date).await
}

/// Inserts a prepared update. The unique index on (username, date) catches
/// a concurrent submission that passed the existence check.
async fn store(
    db: &DatabaseConnection,
    record: work_update::ActiveModel,
    username: &str,
    date: NaiveDate,
) -> Result<work_update::Model, AppError> {
    match record.insert(db).await {
        Ok(created) => {
            info!(
                "Work update {} ({}) stored for {} on {}",
                created.id, created.status, created.username, created.date
            );
            Ok(created)
        }
        Err(db_error) if is_unique_violation(&db_error) => Err(duplicate(username, date)),
        Err(db_error) => Err(db_error.into()),
    }
}

/// Updates of one user, newest-created first.
pub async fn list(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Vec<work_update::Model>, AppError> {
    Ok(work_update::Entity::find()
        .filter(work_update::Column::Username.eq(username))
        .order_by_desc(work_update::Column::CreatedAt)
        .order_by_desc(work_update::Column::Id)
        .all(db)
        .await?)
}

/// Updates of every user, newest-created first.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<work_update::Model>, AppError> {
    Ok(work_update::Entity::find()
        .order_by_desc(work_update::Column::CreatedAt)
        .order_by_desc(work_update::Column::Id)
        .all(db)
        .await?)
}

async fn get(db: &DatabaseConnection, id: i32) -> Result<work_update::Model, AppError> {
    work_update::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Work update {} not found", id)))
}

/// Changes the content of an update while its edit window is open.
///
/// Only the owner may edit. Date, status, owner fields and the creation
/// timestamp never change.
#[instrument(skip(db, changes, window))]
pub async fn edit(
    db: &DatabaseConnection,
    id: i32,
    editor: &str,
    changes: WorkUpdateChanges,
    window: &EditWindow,
    now: DateTime<Utc>,
) -> Result<work_update::Model, AppError> {
    let existing = get(db, id).await?;

    if existing.username != editor {
        warn!("{} tried to edit update {} owned by {}", editor, id, existing.username);
        return Err(AppError::Forbidden(format!(
            "work update {} belongs to another user",
            id
        )));
    }

    window.check(&existing, now)?;

    let project_name = changes
        .project_name
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| existing.project_name.clone());
    let work_done = changes
        .work_done
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| existing.work_done.clone());
    validate_content(existing.status, &project_name, &work_done)?;

    let mut active: work_update::ActiveModel = existing.into();
    let mut updated_fields = vec!["project_name", "work_done"];
    active.project_name = Set(project_name);
    active.work_done = Set(work_done);
    if let Some(project_type) = non_empty(changes.project_type) {
        active.project_type = Set(project_type);
        updated_fields.push("project_type");
    }
    if let Some(task) = changes.task {
        active.task = Set(non_empty(Some(task)));
        updated_fields.push("task");
    }
    if let Some(help_taken) = changes.help_taken {
        active.help_taken = Set(non_empty(Some(help_taken)));
        updated_fields.push("help_taken");
    }

    debug!("Updating fields: {}", updated_fields.join(", "));
    let updated = active.update(db).await?;
    info!("Work update {} edited by {}", id, editor);
    Ok(updated)
}

/// Removes an update.
///
/// Any authenticated caller may delete any update; deletions of someone
/// else's update by a non-admin are logged.
#[instrument(skip(db, actor), fields(actor = %actor.username))]
pub async fn delete(
    db: &DatabaseConnection,
    id: i32,
    actor: &account::Model,
) -> Result<work_update::Model, AppError> {
    let existing = get(db, id).await?;

    if existing.username != actor.username && actor.role != Role::Admin {
        warn!(
            "{} deleted update {} owned by {}",
            actor.username, id, existing.username
        );
    }

    let result = work_update::Entity::delete_by_id(id).exec(db).await?;
    debug!("Delete operation completed. Rows affected: {}", result.rows_affected);
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Work update {} not found", id)));
    }

    info!("Work update {} deleted", id);
    Ok(existing)
}
