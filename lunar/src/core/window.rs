//! Date window covered by one generation run.

use anyhow::{Result, anyhow};
use chrono::{Days, NaiveDate};

/// Half-open range of dates `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CalendarWindow {
    /// Window reaching `days_before` into the past and `days_after` into the
    /// future of `today`.
    pub fn around(today: NaiveDate, days_before: u32, days_after: u32) -> Result<Self> {
        let start = today
            .checked_sub_days(Days::new(u64::from(days_before)))
            .ok_or_else(|| anyhow!("window start out of range: {today} - {days_before} days"))?;
        let end = today
            .checked_add_days(Days::new(u64::from(days_after)))
            .ok_or_else(|| anyhow!("window end out of range: {today} + {days_after} days"))?;
        Ok(Self { start, end })
    }

    pub fn len_days(&self) -> u64 {
        u64::try_from((self.end - self.start).num_days()).unwrap_or(0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}
