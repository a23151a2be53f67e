//! Calendar month used as the payroll and accrual period.
//!
//! This module contains the [`PayrollMonth`] type, written `YYYY-MM` on the
//! wire, and the date arithmetic the processors need (day counts, membership,
//! interval overlap).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{HrmsError, HrmsResult};

/// A calendar month such as `2025-03`.
///
/// Internally represented by the first day of the month, so every value is a
/// valid date range.
///
/// # Example
///
/// ```
/// use hrms_engine::models::PayrollMonth;
/// use chrono::NaiveDate;
///
/// let month: PayrollMonth = "2024-02".parse().unwrap();
/// assert_eq!(month.days_in_month(), 29);
/// assert_eq!(month.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(month.to_string(), "2024-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayrollMonth(NaiveDate);

impl PayrollMonth {
    /// Creates a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> HrmsResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(PayrollMonth)
            .ok_or_else(|| HrmsError::validation(format!("invalid month {year}-{month:02}")))
    }

    /// Returns the month a date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        PayrollMonth(date.with_day(1).unwrap_or(date))
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The 1-based month number.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// The number of calendar days in the month.
    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            4 | 6 | 9 | 11 => 30,
            2 if NaiveDate::from_ymd_opt(self.year(), 2, 29).is_some() => 29,
            2 => 28,
            _ => 31,
        }
    }

    /// The last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.0.with_day(self.days_in_month()).unwrap_or(self.0)
    }

    /// Checks if a date falls within this month (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    /// Counts the days of the inclusive range `start..=end` that fall inside
    /// this month.
    ///
    /// Returns zero when the range does not intersect the month or is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::models::PayrollMonth;
    /// use chrono::NaiveDate;
    ///
    /// let month: PayrollMonth = "2025-03".parse().unwrap();
    /// let start = NaiveDate::from_ymd_opt(2025, 2, 25).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
    /// assert_eq!(month.overlap_days(start, end), 4);
    /// ```
    pub fn overlap_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        let from = start.max(self.first_day());
        let to = end.min(self.last_day());
        if to < from {
            return 0;
        }
        (to - from).num_days() as u32 + 1
    }
}

impl fmt::Display for PayrollMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for PayrollMonth {
    type Err = HrmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HrmsError::validation(format!("month must be formatted YYYY-MM, got '{s}'"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        PayrollMonth::new(year, month)
    }
}

impl Serialize for PayrollMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PayrollMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
