//! Trailing lookback windows.

use crate::error::{DataError, Result};
use chrono::{NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive date range `[start, end]` ending on a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl LookbackWindow {
    /// Window covering `[today - days, today]`.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidWindow`] when `days` is zero, negative, or
    /// reaches past the representable calendar.
    pub fn trailing(days: i64, today: NaiveDate) -> Result<Self> {
        if days <= 0 {
            return Err(DataError::InvalidWindow { days });
        }

        let start = TimeDelta::try_days(days)
            .and_then(|delta| today.checked_sub_signed(delta))
            .ok_or(DataError::InvalidWindow { days })?;

        Ok(Self { start, end: today })
    }

    /// Window of `days` ending on the current UTC date.
    pub fn ending_today(days: i64) -> Result<Self> {
        Self::trailing(days, Utc::now().date_naive())
    }

    /// First day of the window.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window (inclusive).
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
