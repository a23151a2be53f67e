//! Monthly attendance summary.
//!
//! Attendance statuses are converted into present days (full, late and paid
//! leave days count as one; half days as one half), absent days and overtime
//! hours for a single payroll month.

use rust_decimal::Decimal;

use crate::config::PayrollConfig;
use crate::models::{AttendanceRecord, AuditStep, PayrollMonth};

/// The attendance figures used by the payroll run.
#[derive(Debug, Clone)]
pub struct AttendanceSummary {
    /// Days counted as present.
    pub present_days: Decimal,
    /// Working days not attended.
    pub absent_days: Decimal,
    /// Overtime hours worked in the month.
    pub overtime_hours: Decimal,
    /// Number of attendance entries inside the month.
    pub record_count: usize,
    /// The audit step recording this summary.
    pub audit_step: AuditStep,
}

/// Summarizes an employee's attendance records for `month`.
///
/// Records outside the month are ignored. Every configured working day
/// without a present record is absent, so a month with no records at all is
/// a month of absence.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::summarize_attendance;
/// use hrms_engine::config::ConfigLoader;
/// use hrms_engine::models::PayrollMonth;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("config/saudi").unwrap().into_config();
/// let month: PayrollMonth = "2025-01".parse().unwrap();
///
/// let summary = summarize_attendance(&[], month, config.payroll(), 1);
/// assert_eq!(summary.record_count, 0);
/// assert_eq!(summary.absent_days, Decimal::from(30));
/// ```
pub fn summarize_attendance(
    records: &[AttendanceRecord],
    month: PayrollMonth,
    config: &PayrollConfig,
    step_number: u32,
) -> AttendanceSummary {
    let in_month: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| month.contains_date(r.date))
        .collect();

    let working_days = config.working_days_per_month;
    let present_days: Decimal = in_month.iter().map(|r| r.status.present_fraction()).sum();
    let absent_days = (working_days - present_days).max(Decimal::ZERO);
    let overtime_hours: Decimal = in_month.iter().map(|r| r.overtime_hours).sum();

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_summary".to_string(),
        rule_name: "Attendance Summary".to_string(),
        input: serde_json::json!({
            "month": month.to_string(),
            "records": in_month.len(),
            "working_days_per_month": working_days.to_string()
        }),
        output: serde_json::json!({
            "present_days": present_days.to_string(),
            "absent_days": absent_days.to_string(),
            "overtime_hours": overtime_hours.to_string()
        }),
        reasoning: format!(
            "{} attendance records in {}: {} present of {} working days, {} absent, {} overtime hours",
            in_month.len(),
            month,
            present_days,
            working_days,
            absent_days,
            overtime_hours
        ),
    };

    AttendanceSummary {
        present_days,
        absent_days,
        overtime_hours,
        record_count: in_month.len(),
        audit_step,
    }
}
