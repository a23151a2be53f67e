//! Daily attendance records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Attendance outcome for one employee on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Attended the full day.
    Present,
    /// Attended but arrived late.
    Late,
    /// Attended half a day.
    HalfDay,
    /// Did not attend.
    Absent,
    /// On paid leave.
    OnLeave,
}

impl AttendanceStatus {
    /// The fraction of a working day this status counts as present.
    pub fn present_fraction(&self) -> Decimal {
        match self {
            AttendanceStatus::Present | AttendanceStatus::Late | AttendanceStatus::OnLeave => {
                Decimal::ONE
            }
            AttendanceStatus::HalfDay => Decimal::new(5, 1),
            AttendanceStatus::Absent => Decimal::ZERO,
        }
    }
}

/// A single attendance entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier.
    pub id: String,
    /// The employee this entry belongs to.
    pub employee_id: String,
    /// The attendance date.
    pub date: NaiveDate,
    /// Attendance outcome.
    pub status: AttendanceStatus,
    /// Overtime hours worked on this date.
    #[serde(default)]
    pub overtime_hours: Decimal,
}
