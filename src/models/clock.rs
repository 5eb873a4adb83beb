//! Source of "today" for every date-sensitive operation.
use chrono::{Local, NaiveDate};

pub trait Clock {
    /// Current calendar date. Time of day is never observed by the scheduler.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the local time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date, for tests and replays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
