//! Runs the auto-leave policy against stored updates.

use std::sync::Arc;
use std::time::Duration;

use compute::AutoLeavePolicy;
use model::entities::account::{Role, Specialization};
use model::entities::work_update::{self, UpdateStatus};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, error, info, instrument};

use crate::clock::Clock;
use crate::error::AppError;
use crate::services::{accounts, work_updates};

/// Records today's leave for `username` if the policy calls for it.
///
/// Returns the stored leave, or `None` when nothing was recorded. Admin
/// accounts are skipped. Losing a race against another submission for the
/// same day is not an error.
#[instrument(skip(db, policy, clock))]
pub async fn check_and_record(
    db: &DatabaseConnection,
    username: &str,
    policy: &AutoLeavePolicy,
    clock: &dyn Clock,
) -> Result<Option<work_update::Model>, AppError> {
    let account = accounts::find_by_username(db, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))?;

    if account.role == Role::Admin {
        debug!("{} is an admin, no auto-leave", username);
        return Ok(None);
    }

    let existing = work_updates::list(db, username).await?;
    let specialization = account.specialization.unwrap_or(Specialization::Software);
    let Some(draft) = policy.decide(&existing, specialization, clock.local_now()) else {
        return Ok(None);
    };

    let new = work_updates::NewWorkUpdate {
        date: draft.date,
        status: UpdateStatus::Leave,
        project_type: Some(draft.project_type),
        project_name: String::new(),
        work_done: draft.work_done,
        task: None,
        help_taken: None,
    };

    match work_updates::submit(db, username, new, clock.now()).await {
        Ok(leave) => {
            info!("Auto-leave recorded for {} on {}", username, leave.date);
            Ok(Some(leave))
        }
        Err(AppError::DuplicateUpdate(msg)) => {
            debug!("Auto-leave skipped: {}", msg);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Runs one policy check for every employee. Returns how many leaves were
/// recorded.
pub async fn check_all_employees(
    db: &DatabaseConnection,
    policy: &AutoLeavePolicy,
    clock: &dyn Clock,
) -> Result<usize, AppError> {
    let employees = model::entities::account::Entity::find()
        .filter(model::entities::account::Column::Role.eq(Role::Employee))
        .all(db)
        .await?;

    let mut recorded = 0;
    for employee in employees {
        match check_and_record(db, &employee.username, policy, clock).await {
            Ok(Some(_)) => recorded += 1,
            Ok(None) => {}
            Err(e) => error!("Auto-leave check failed for {}: {}", employee.username, e),
        }
    }
    Ok(recorded)
}

/// Repeats [`check_all_employees`] every `poll` until the task is dropped.
///
/// A failed round is logged and the next tick tries again.
pub async fn watch(
    db: DatabaseConnection,
    policy: AutoLeavePolicy,
    clock: Arc<dyn Clock>,
    poll: Duration,
) {
    info!(
        "Auto-leave watcher started: cutoff {}:00, polling every {}s",
        policy.cutoff_hour(),
        poll.as_secs()
    );
    let mut interval = tokio::time::interval(poll);
    loop {
        interval.tick().await;
        match check_all_employees(&db, &policy, clock.as_ref()).await {
            Ok(0) => debug!("Auto-leave round finished, nothing recorded"),
            Ok(n) => info!("Auto-leave round recorded {} leave(s)", n),
            Err(e) => error!("Auto-leave round failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_app_state;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[tokio::test]
    async fn test_round_records_one_leave_per_missing_employee() {
        let (state, clock) = setup_test_app_state().await;
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();

        let bob_update = work_updates::NewWorkUpdate {
            date: today,
            status: UpdateStatus::Work,
            project_type: None,
            project_name: "Board".to_string(),
            work_done: "Routed the power plane".to_string(),
            task: None,
            help_taken: None,
        };
        work_updates::submit(&state.db, "bob", bob_update, clock.now())
            .await
            .unwrap();

        // Before the cutoff nothing is recorded
        let recorded = check_all_employees(&state.db, &state.auto_leave, clock.as_ref())
            .await
            .unwrap();
        assert_eq!(recorded, 0);

        clock.set(Utc.with_ymd_and_hms(2024, 6, 10, 20, 30, 0).unwrap());
        let recorded = check_all_employees(&state.db, &state.auto_leave, clock.as_ref())
            .await
            .unwrap();
        assert_eq!(recorded, 1);

        let alice = work_updates::list(&state.db, "alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].status, UpdateStatus::Leave);
        assert_eq!(alice[0].date, today);
        assert_eq!(alice[0].work_done, compute::AUTO_LEAVE_WORK_DONE);

        let bob = work_updates::list(&state.db, "bob").await.unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].status, UpdateStatus::Work);
        assert!(work_updates::list(&state.db, "admin").await.unwrap().is_empty());

        // A second round the same evening finds nothing to do
        let recorded = check_all_employees(&state.db, &state.auto_leave, clock.as_ref())
            .await
            .unwrap();
        assert_eq!(recorded, 0);
        assert_eq!(work_updates::list(&state.db, "alice").await.unwrap().len(), 1);
    }
}
