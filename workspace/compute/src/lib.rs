//! Storage-free rules for work updates.
//!
//! Everything here operates on already loaded entity models and an explicit
//! "now", so the service layer decides where data and time come from.

pub mod aggregation;
pub mod auto_leave;
pub mod calendar;
pub mod error;
pub mod rules;

pub use aggregation::{
    AdminStats, AdminView, DayDetail, MonthlySummary, TeamMember, ALL_EMPLOYEES,
    ALL_PROJECT_TYPES,
};
pub use auto_leave::{AutoLeavePolicy, LeaveDraft, AUTO_LEAVE_WORK_DONE};
pub use calendar::{CalendarDay, DayKind};
pub use error::{ComputeError, Result};
pub use rules::EditWindow;

#[cfg(test)]
pub(crate) mod testing {
    //! Builders shared by the unit tests of this crate.

    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use model::entities::account::{self, Role, Specialization};
    use model::entities::work_update::{self, UpdateStatus};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    pub fn employee(
        username: &str,
        display_name: &str,
        specialization: Option<Specialization>,
    ) -> account::Model {
        account::Model {
            id: 0,
            username: username.to_string(),
            display_name: display_name.to_string(),
            password_hash: String::new(),
            role: Role::Employee,
            specialization,
        }
    }

    pub fn update(
        id: i32,
        owner: &account::Model,
        date: NaiveDate,
        status: UpdateStatus,
    ) -> work_update::Model {
        let specialization = owner.specialization.unwrap_or(Specialization::Software);
        work_update::Model {
            id,
            username: owner.username.clone(),
            display_name: owner.display_name.clone(),
            specialization,
            date,
            project_type: specialization.as_str().to_string(),
            project_name: "Board bring-up".to_string(),
            work_done: "Soldered the debug header".to_string(),
            task: None,
            help_taken: None,
            status,
            created_at: at(2024, 6, 10, 9, 0, 0),
        }
    }
}
