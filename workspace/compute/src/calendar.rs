//! Month calendar bucketing for the admin view.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use model::entities::work_update::{self, UpdateStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ComputeError, Result};

/// How a calendar day is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// No updates on this day.
    Empty,
    /// Only leave updates.
    Leave,
    /// At least one work update on a weekday.
    Work,
    /// At least one work update on a Saturday or Sunday.
    WeekendWork,
}

/// One cell of the month calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub kind: DayKind,
    pub update_count: usize,
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Classifies a day from the updates that fall on it.
///
/// Leave wins only when there is no work at all; otherwise the weekday
/// decides between plain work and weekend work.
pub fn classify_day<'a, I>(date: NaiveDate, updates: I) -> DayKind
where
    I: IntoIterator<Item = &'a work_update::Model>,
{
    let mut any = false;
    let mut has_work = false;
    for update in updates {
        any = true;
        if update.status == UpdateStatus::Work {
            has_work = true;
        }
    }

    match (any, has_work) {
        (false, _) => DayKind::Empty,
        (true, false) => DayKind::Leave,
        (true, true) if is_weekend(date) => DayKind::WeekendWork,
        (true, true) => DayKind::Work,
    }
}

/// Last day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .ok_or_else(|| ComputeError::Date(format!("invalid month {}-{}", year, month)))
}

/// Builds every day of `year`-`month` from the given updates.
pub fn calendar_month<'a, I>(updates: I, year: i32, month: u32) -> Result<Vec<CalendarDay>>
where
    I: IntoIterator<Item = &'a work_update::Model>,
{
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ComputeError::Date(format!("invalid month {}-{}", year, month)))?;
    let last = last_day_of_month(year, month)?;

    let mut by_date: HashMap<NaiveDate, Vec<&work_update::Model>> = HashMap::new();
    for update in updates {
        if update.date >= first && update.date <= last {
            by_date.entry(update.date).or_default().push(update);
        }
    }

    Ok(first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| {
            let on_day = by_date.get(&day).map(Vec::as_slice).unwrap_or(&[]);
            CalendarDay {
                date: day,
                is_weekend: is_weekend(day),
                kind: classify_day(day, on_day.iter().copied()),
                update_count: on_day.len(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, employee, update};
    use model::entities::account::Specialization;

    #[test]
    fn test_classify_day() {
        let alice = employee("alice", "Alice Smith", Some(Specialization::Software));
        let bob = employee("bob", "Bob", Some(Specialization::Hardware));

        // Monday with a single leave
        let monday = date(2024, 6, 10);
        let leave = update(1, &alice, monday, UpdateStatus::Leave);
        assert_eq!(classify_day(monday, [&leave]), DayKind::Leave);

        // Saturday with a single work update
        let saturday = date(2024, 6, 15);
        let weekend = update(2, &alice, saturday, UpdateStatus::Work);
        assert_eq!(classify_day(saturday, [&weekend]), DayKind::WeekendWork);

        // Tuesday with a single work update
        let tuesday = date(2024, 6, 11);
        let work = update(3, &alice, tuesday, UpdateStatus::Work);
        assert_eq!(classify_day(tuesday, [&work]), DayKind::Work);

        // Mixed leave and work counts as work
        let mixed_leave = update(4, &bob, tuesday, UpdateStatus::Leave);
        assert_eq!(classify_day(tuesday, [&mixed_leave, &work]), DayKind::Work);

        assert_eq!(classify_day(tuesday, std::iter::empty()), DayKind::Empty);
    }

    #[test]
    fn test_calendar_month_covers_every_day() {
        let alice = employee("alice", "Alice Smith", Some(Specialization::Software));
        let updates = vec![
            update(1, &alice, date(2024, 2, 29), UpdateStatus::Work),
            update(2, &alice, date(2024, 2, 3), UpdateStatus::Work),
            update(3, &alice, date(2024, 3, 1), UpdateStatus::Leave),
        ];

        let days = calendar_month(&updates, 2024, 2).unwrap();
        assert_eq!(days.len(), 29);
        assert_eq!(days[0].date, date(2024, 2, 1));
        assert_eq!(days[28].date, date(2024, 2, 29));

        // 2024-02-03 is a Saturday
        assert!(days[2].is_weekend);
        assert_eq!(days[2].kind, DayKind::WeekendWork);
        assert_eq!(days[28].kind, DayKind::Work);
        assert_eq!(days[28].update_count, 1);
        assert_eq!(days[10].kind, DayKind::Empty);
        assert_eq!(days.iter().map(|d| d.update_count).sum::<usize>(), 2);
    }

    #[test]
    fn test_calendar_month_december() {
        let days = calendar_month(std::iter::empty(), 2024, 12).unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(last_day_of_month(2023, 2).unwrap(), date(2023, 2, 28));
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            calendar_month(std::iter::empty(), 2024, 13),
            Err(ComputeError::Date(_))
        ));
    }
}
