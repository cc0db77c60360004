//! Wall clock used by the services, swappable in tests.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current instant, used for creation timestamps and the edit window.
    fn now(&self) -> DateTime<Utc>;

    /// Current local wall-clock time, used for "today" and the leave cutoff.
    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&Local).naive_local()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Its local time is UTC.
#[cfg(test)]
#[derive(Debug)]
pub struct FixedClock {
    instant: std::sync::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: std::sync::Mutex::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().unwrap() = instant;
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.instant.lock().unwrap() += by;
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().unwrap()
    }

    fn local_now(&self) -> NaiveDateTime {
        self.now().naive_utc()
    }
}
