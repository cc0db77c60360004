//! Admin aggregation over the full account list and all work updates.
//!
//! Filters mirror the admin dashboard: a project-type filter (matched
//! case-insensitively against an employee's specialization or an update's
//! project type) and an employee filter keyed by display name.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use model::entities::account::{self, Specialization};
use model::entities::work_update::{self, UpdateStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

/// Project-type filter value meaning "no filter".
pub const ALL_PROJECT_TYPES: &str = "All Project Types";

/// Employee filter value meaning "no filter".
pub const ALL_EMPLOYEES: &str = "All Employees";

/// Headline numbers of the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminStats {
    pub total_employees: usize,
    pub updates_this_month: usize,
    /// Distinct project types ever seen, compared case-insensitively.
    pub active_project_types: usize,
}

/// One row of the team overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeamMember {
    pub username: String,
    pub display_name: String,
    pub specialization: Option<Specialization>,
    pub updates_this_month: usize,
}

/// Updates on one date, split by the specialization stamped on each update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub software: Vec<work_update::Model>,
    pub hardware: Vec<work_update::Model>,
}

impl DayDetail {
    fn from_updates<'a, I>(date: NaiveDate, updates: I) -> Self
    where
        I: IntoIterator<Item = &'a work_update::Model>,
    {
        let mut detail = DayDetail {
            date,
            software: Vec::new(),
            hardware: Vec::new(),
        };
        for update in updates {
            match update.specialization {
                Specialization::Software => detail.software.push(update.clone()),
                Specialization::Hardware => detail.hardware.push(update.clone()),
            }
        }
        detail
    }

    pub fn len(&self) -> usize {
        self.software.len() + self.hardware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-employee counts for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlySummary {
    pub updates_this_month: usize,
    pub days_worked: usize,
    pub leave_days: usize,
}

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// Normalizes a filter value: empty or the sentinel means no filter.
fn active_filter<'f>(value: Option<&'f str>, sentinel: &str) -> Option<&'f str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != sentinel)
}

/// Counts an employee's updates in the month containing `reference`.
pub fn monthly_summary(updates: &[work_update::Model], reference: NaiveDate) -> MonthlySummary {
    updates
        .iter()
        .filter(|update| same_month(update.date, reference))
        .fold(MonthlySummary::default(), |mut summary, update| {
            summary.updates_this_month += 1;
            match update.status {
                UpdateStatus::Work => summary.days_worked += 1,
                UpdateStatus::Leave => summary.leave_days += 1,
            }
            summary
        })
}

/// Read-only view over everything the admin dashboard loads.
#[derive(Debug, Clone, Copy)]
pub struct AdminView<'a> {
    employees: &'a [account::Model],
    updates: &'a [work_update::Model],
}

impl<'a> AdminView<'a> {
    pub fn new(employees: &'a [account::Model], updates: &'a [work_update::Model]) -> Self {
        Self { employees, updates }
    }

    /// Accounts whose specialization matches the project-type filter.
    ///
    /// Accounts without a specialization never match an active filter.
    pub fn filter_employees(&self, project_type: Option<&str>) -> Vec<&'a account::Model> {
        match active_filter(project_type, ALL_PROJECT_TYPES) {
            None => self.employees.iter().collect(),
            Some(wanted) => self
                .employees
                .iter()
                .filter(|employee| {
                    employee
                        .specialization
                        .is_some_and(|s| s.as_str().eq_ignore_ascii_case(wanted))
                })
                .collect(),
        }
    }

    /// Updates matching the project-type filter and then the employee filter.
    ///
    /// The employee filter is a display name. Every account carrying that
    /// name matches; a name no account carries leaves the list unfiltered.
    #[instrument(skip(self))]
    pub fn filter_updates(
        &self,
        project_type: Option<&str>,
        employee_name: Option<&str>,
    ) -> Vec<&'a work_update::Model> {
        let mut filtered: Vec<&'a work_update::Model> = self.updates.iter().collect();

        if let Some(wanted) = active_filter(project_type, ALL_PROJECT_TYPES) {
            filtered.retain(|update| update.project_type.eq_ignore_ascii_case(wanted));
        }

        if let Some(name) = active_filter(employee_name, ALL_EMPLOYEES) {
            let usernames: HashSet<&str> = self
                .employees
                .iter()
                .filter(|employee| employee.display_name == name)
                .map(|employee| employee.username.as_str())
                .collect();

            if usernames.is_empty() {
                debug!("No account named '{}', employee filter ignored", name);
            } else {
                filtered.retain(|update| usernames.contains(update.username.as_str()));
            }
        }

        debug!("{} of {} updates match", filtered.len(), self.updates.len());
        filtered
    }

    /// Dashboard totals, counted over all accounts and all updates.
    pub fn stats(&self, today: NaiveDate) -> AdminStats {
        let project_types: HashSet<String> = self
            .updates
            .iter()
            .map(|update| update.project_type.to_lowercase())
            .collect();

        AdminStats {
            total_employees: self.employees.len(),
            updates_this_month: self
                .updates
                .iter()
                .filter(|update| same_month(update.date, today))
                .count(),
            active_project_types: project_types.len(),
        }
    }

    /// Filtered employees with their update count for the current month.
    pub fn team_overview(&self, project_type: Option<&str>, today: NaiveDate) -> Vec<TeamMember> {
        self.filter_employees(project_type)
            .into_iter()
            .map(|employee| TeamMember {
                username: employee.username.clone(),
                display_name: employee.display_name.clone(),
                specialization: employee.specialization,
                updates_this_month: self
                    .updates
                    .iter()
                    .filter(|u| u.username == employee.username && same_month(u.date, today))
                    .count(),
            })
            .collect()
    }

    /// Filtered updates on `date`, grouped by specialization.
    pub fn day_detail(
        &self,
        date: NaiveDate,
        project_type: Option<&str>,
        employee_name: Option<&str>,
    ) -> DayDetail {
        let filtered = self.filter_updates(project_type, employee_name);
        DayDetail::from_updates(date, filtered.into_iter().filter(|u| u.date == date))
    }

    /// Filtered updates grouped per date, most recent date first.
    pub fn recent_by_date(
        &self,
        project_type: Option<&str>,
        employee_name: Option<&str>,
    ) -> Vec<DayDetail> {
        let mut by_date: BTreeMap<NaiveDate, Vec<&work_update::Model>> = BTreeMap::new();
        for update in self.filter_updates(project_type, employee_name) {
            by_date.entry(update.date).or_default().push(update);
        }

        by_date
            .into_iter()
            .rev()
            .map(|(date, updates)| DayDetail::from_updates(date, updates))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, employee, update};

    struct Fixture {
        employees: Vec<account::Model>,
        updates: Vec<work_update::Model>,
    }

    /// A (software) and B (hardware), each with one update on 2024-06-10.
    fn fixture() -> Fixture {
        let a = employee("anna", "Anna", Some(Specialization::Software));
        let b = employee("ben", "Ben", Some(Specialization::Hardware));
        let updates = vec![
            update(1, &a, date(2024, 6, 10), UpdateStatus::Work),
            update(2, &b, date(2024, 6, 10), UpdateStatus::Work),
        ];
        Fixture {
            employees: vec![a, b],
            updates,
        }
    }

    fn usernames(employees: &[&account::Model]) -> Vec<String> {
        employees.iter().map(|e| e.username.clone()).collect()
    }

    fn ids(updates: &[&work_update::Model]) -> Vec<i32> {
        updates.iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_filter_by_project_type() {
        let f = fixture();
        let view = AdminView::new(&f.employees, &f.updates);

        assert_eq!(usernames(&view.filter_employees(Some("hardware"))), vec!["ben"]);
        assert_eq!(ids(&view.filter_updates(Some("hardware"), Some(""))), vec![2]);

        // Case-insensitive
        assert_eq!(usernames(&view.filter_employees(Some("SOFTWARE"))), vec!["anna"]);
        assert_eq!(ids(&view.filter_updates(Some("Software"), None)), vec![1]);
    }

    #[test]
    fn test_sentinels_and_empty_mean_no_filter() {
        let f = fixture();
        let view = AdminView::new(&f.employees, &f.updates);

        assert_eq!(view.filter_employees(None).len(), 2);
        assert_eq!(view.filter_employees(Some("")).len(), 2);
        assert_eq!(view.filter_employees(Some(ALL_PROJECT_TYPES)).len(), 2);
        assert_eq!(
            view.filter_updates(Some(ALL_PROJECT_TYPES), Some(ALL_EMPLOYEES)).len(),
            2
        );
    }

    #[test]
    fn test_unset_specialization_never_matches_a_filter() {
        let mut f = fixture();
        f.employees.push(employee("newbie", "Newbie", None));
        let view = AdminView::new(&f.employees, &f.updates);

        assert_eq!(view.filter_employees(None).len(), 3);
        assert_eq!(usernames(&view.filter_employees(Some("software"))), vec!["anna"]);
    }

    #[test]
    fn test_employee_filter_uses_display_name() {
        let mut f = fixture();
        // A second hardware engineer who happens to share Anna's display name.
        let twin = employee("anna2", "Anna", Some(Specialization::Hardware));
        f.updates.push(update(3, &twin, date(2024, 6, 11), UpdateStatus::Work));
        f.employees.push(twin);
        let view = AdminView::new(&f.employees, &f.updates);

        assert_eq!(ids(&view.filter_updates(None, Some("Anna"))), vec![1, 3]);
        assert_eq!(ids(&view.filter_updates(Some("hardware"), Some("Anna"))), vec![3]);
        assert_eq!(ids(&view.filter_updates(None, Some("Ben"))), vec![2]);

        // Unknown names are ignored
        assert_eq!(view.filter_updates(None, Some("Nobody")).len(), 3);
    }

    #[test]
    fn test_stats() {
        let mut f = fixture();
        let anna = f.employees[0].clone();
        let mut odd_case = update(3, &anna, date(2024, 5, 31), UpdateStatus::Work);
        odd_case.project_type = "Software".to_string();
        f.updates.push(odd_case);
        let mut other = update(4, &anna, date(2023, 6, 1), UpdateStatus::Work);
        other.project_type = "research".to_string();
        f.updates.push(other);
        let view = AdminView::new(&f.employees, &f.updates);

        let stats = view.stats(date(2024, 6, 20));
        assert_eq!(
            stats,
            AdminStats {
                total_employees: 2,
                updates_this_month: 2,
                active_project_types: 3,
            }
        );
    }

    #[test]
    fn test_team_overview() {
        let mut f = fixture();
        let anna = f.employees[0].clone();
        f.updates.push(update(3, &anna, date(2024, 6, 12), UpdateStatus::Leave));
        f.updates.push(update(4, &anna, date(2024, 5, 12), UpdateStatus::Work));
        let view = AdminView::new(&f.employees, &f.updates);

        let team = view.team_overview(None, date(2024, 6, 30));
        assert_eq!(team.len(), 2);
        assert_eq!(team[0].username, "anna");
        assert_eq!(team[0].updates_this_month, 2);
        assert_eq!(team[1].updates_this_month, 1);

        let hardware = view.team_overview(Some("hardware"), date(2024, 6, 30));
        assert_eq!(hardware.len(), 1);
        assert_eq!(hardware[0].display_name, "Ben");
    }

    #[test]
    fn test_day_detail_groups_by_specialization() {
        let f = fixture();
        let view = AdminView::new(&f.employees, &f.updates);

        let detail = view.day_detail(date(2024, 6, 10), None, None);
        assert_eq!(detail.len(), 2);
        assert_eq!(detail.software[0].username, "anna");
        assert_eq!(detail.hardware[0].username, "ben");

        let filtered = view.day_detail(date(2024, 6, 10), Some("hardware"), None);
        assert!(filtered.software.is_empty());
        assert_eq!(filtered.hardware.len(), 1);

        assert!(view.day_detail(date(2024, 6, 11), None, None).is_empty());
    }

    #[test]
    fn test_recent_by_date_is_descending() {
        let mut f = fixture();
        let ben = f.employees[1].clone();
        f.updates.push(update(3, &ben, date(2024, 6, 12), UpdateStatus::Work));
        f.updates.push(update(4, &ben, date(2024, 6, 1), UpdateStatus::Leave));
        let view = AdminView::new(&f.employees, &f.updates);

        let recent = view.recent_by_date(None, None);
        let dates: Vec<NaiveDate> = recent.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2024, 6, 12), date(2024, 6, 10), date(2024, 6, 1)]);
        assert_eq!(recent[1].len(), 2);
    }

    #[test]
    fn test_monthly_summary() {
        let bob = employee("bob", "Bob", Some(Specialization::Software));
        let updates = vec![
            update(1, &bob, date(2024, 6, 3), UpdateStatus::Work),
            update(2, &bob, date(2024, 6, 4), UpdateStatus::Leave),
            update(3, &bob, date(2024, 6, 5), UpdateStatus::Work),
            update(4, &bob, date(2024, 7, 1), UpdateStatus::Work),
        ];

        assert_eq!(
            monthly_summary(&updates, date(2024, 6, 15)),
            MonthlySummary {
                updates_this_month: 3,
                days_worked: 2,
                leave_days: 1,
            }
        );
        assert_eq!(monthly_summary(&[], date(2024, 6, 15)), MonthlySummary::default());
    }
}
