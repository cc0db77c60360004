//! Rules a single work update must satisfy on submission and on edit.

use chrono::{DateTime, Duration, Utc};
use model::entities::work_update::{self, UpdateStatus};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// Default time after creation during which a work update can be changed.
pub const DEFAULT_EDIT_WINDOW_SECS: i64 = 5 * 60;

/// Checks the fields a status requires.
///
/// `work` needs a project name and a description of the work done, `leave`
/// needs nothing.
pub fn validate_content(status: UpdateStatus, project_name: &str, work_done: &str) -> Result<()> {
    if status == UpdateStatus::Leave {
        return Ok(());
    }

    let mut missing = Vec::new();
    if project_name.trim().is_empty() {
        missing.push("project_name");
    }
    if work_done.trim().is_empty() {
        missing.push("work_done");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ComputeError::Validation(format!(
            "a work update requires {}",
            missing.join(" and ")
        )))
    }
}

/// The period after creation during which a work update stays editable.
///
/// Measured from the stored creation timestamp. Editing never moves that
/// timestamp, so the window does not extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditWindow {
    length: Duration,
}

impl Default for EditWindow {
    fn default() -> Self {
        Self::from_secs(DEFAULT_EDIT_WINDOW_SECS)
    }
}

impl EditWindow {
    pub fn new(length: Duration) -> Self {
        Self { length }
    }

    pub fn from_secs(secs: i64) -> Self {
        Self::new(Duration::seconds(secs))
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    /// Whether `update` may still be edited at `now`.
    pub fn is_open(&self, update: &work_update::Model, now: DateTime<Utc>) -> bool {
        self.check(update, now).is_ok()
    }

    /// Fails with [`ComputeError::EditWindowExpired`] unless the update is a
    /// `work` entry created no more than the window length before `now`.
    #[instrument(skip(self, update), fields(update_id = update.id))]
    pub fn check(&self, update: &work_update::Model, now: DateTime<Utc>) -> Result<()> {
        if update.status != UpdateStatus::Work {
            return Err(ComputeError::EditWindowExpired(format!(
                "update {} is a {} entry and cannot be edited",
                update.id, update.status
            )));
        }

        let elapsed = now - update.created_at;
        debug!(
            "Update {} created {}s ago, window is {}s",
            update.id,
            elapsed.num_seconds(),
            self.length.num_seconds()
        );

        if elapsed > self.length {
            return Err(ComputeError::EditWindowExpired(format!(
                "update {} can only be edited within {} minutes of creation",
                update.id,
                self.length.num_minutes()
            )));
        }

        Ok(())
    }
}
