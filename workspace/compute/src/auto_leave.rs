//! Decides when a missing daily update should be recorded as leave.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use model::entities::account::Specialization;
use model::entities::work_update;
use tracing::{debug, instrument};

/// Work-done text stored on a synthetic leave update.
pub const AUTO_LEAVE_WORK_DONE: &str = "No work update submitted";

/// Local hour from which a missing update counts as leave.
pub const DEFAULT_CUTOFF_HOUR: u32 = 20;

/// The leave update the policy wants submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveDraft {
    pub date: NaiveDate,
    pub project_type: String,
    pub work_done: String,
}

/// Marks today as leave when nothing was submitted by the cutoff hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoLeavePolicy {
    cutoff_hour: u32,
}

impl Default for AutoLeavePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF_HOUR)
    }
}

impl AutoLeavePolicy {
    /// `cutoff_hour` is clamped to a valid hour of the day.
    pub fn new(cutoff_hour: u32) -> Self {
        Self {
            cutoff_hour: cutoff_hour.min(23),
        }
    }

    pub fn cutoff_hour(&self) -> u32 {
        self.cutoff_hour
    }

    /// Returns the leave to record, if any.
    ///
    /// `existing` is the caller's own updates and `local_now` the caller's
    /// local wall clock. Nothing is returned once any update exists for
    /// today's date or while the clock is before the cutoff hour.
    #[instrument(skip(self, existing), fields(existing = existing.len()))]
    pub fn decide(
        &self,
        existing: &[work_update::Model],
        specialization: Specialization,
        local_now: NaiveDateTime,
    ) -> Option<LeaveDraft> {
        let today = local_now.date();

        if existing.iter().any(|update| update.date == today) {
            debug!("An update already exists for {}", today);
            return None;
        }

        if local_now.hour() < self.cutoff_hour {
            debug!(
                "No update for {} yet, but it is before {}:00",
                today, self.cutoff_hour
            );
            return None;
        }

        Some(LeaveDraft {
            date: today,
            project_type: specialization.as_str().to_string(),
            work_done: AUTO_LEAVE_WORK_DONE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, employee, update};
    use model::entities::work_update::UpdateStatus;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_records_leave_after_cutoff() {
        let policy = AutoLeavePolicy::default();

        let draft = policy
            .decide(&[], Specialization::Hardware, local(2024, 6, 10, 20, 0))
            .expect("leave should be recorded at 20:00");

        assert_eq!(draft.date, date(2024, 6, 10));
        assert_eq!(draft.project_type, "hardware");
        assert_eq!(draft.work_done, AUTO_LEAVE_WORK_DONE);
    }

    #[test]
    fn test_nothing_before_cutoff() {
        let policy = AutoLeavePolicy::default();
        assert_eq!(
            policy.decide(&[], Specialization::Software, local(2024, 6, 10, 19, 59)),
            None
        );
    }

    #[test]
    fn test_nothing_when_today_already_has_an_update() {
        let bob = employee("bob", "Bob", Some(Specialization::Software));
        let existing = vec![update(1, &bob, date(2024, 6, 10), UpdateStatus::Work)];

        let policy = AutoLeavePolicy::default();
        assert_eq!(
            policy.decide(&existing, Specialization::Software, local(2024, 6, 10, 22, 30)),
            None
        );
    }

    #[test]
    fn test_yesterdays_update_does_not_count() {
        let bob = employee("bob", "Bob", Some(Specialization::Software));
        let existing = vec![update(1, &bob, date(2024, 6, 9), UpdateStatus::Work)];

        let draft = AutoLeavePolicy::default()
            .decide(&existing, Specialization::Software, local(2024, 6, 10, 21, 0));
        assert_eq!(draft.map(|d| d.date), Some(date(2024, 6, 10)));
    }

    #[test]
    fn test_second_check_after_leave_is_a_no_op() {
        let bob = employee("bob", "Bob", Some(Specialization::Software));
        let policy = AutoLeavePolicy::default();
        let now = local(2024, 6, 10, 20, 5);

        let draft = policy.decide(&[], Specialization::Software, now).unwrap();
        let mut leave = update(7, &bob, draft.date, UpdateStatus::Leave);
        leave.work_done = draft.work_done;

        assert_eq!(policy.decide(&[leave], Specialization::Software, now), None);
    }

    #[test]
    fn test_cutoff_is_clamped() {
        assert_eq!(AutoLeavePolicy::new(42).cutoff_hour(), 23);
        assert_eq!(AutoLeavePolicy::new(18).cutoff_hour(), 18);
    }
}
