//! Payroll records and the earning/deduction inputs they are computed from.
//!
//! A [`Payroll`] is written once per (employee, month) by the payroll
//! processor and afterwards only moves forward through [`PayrollStatus`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, PayrollMonth};

/// Lifecycle of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Computed by the payroll processor.
    Calculated,
    /// Reviewed and approved for payment.
    Approved,
    /// Salary transferred.
    Paid,
}

impl PayrollStatus {
    /// Returns true if moving to `next` is a permitted forward step.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::models::PayrollStatus;
    ///
    /// assert!(PayrollStatus::Calculated.can_transition_to(PayrollStatus::Approved));
    /// assert!(!PayrollStatus::Calculated.can_transition_to(PayrollStatus::Paid));
    /// assert!(!PayrollStatus::Paid.can_transition_to(PayrollStatus::Approved));
    /// ```
    pub fn can_transition_to(&self, next: PayrollStatus) -> bool {
        matches!(
            (self, next),
            (PayrollStatus::Calculated, PayrollStatus::Approved)
                | (PayrollStatus::Approved, PayrollStatus::Paid)
        )
    }

    /// The wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayrollStatus::Calculated => "calculated",
            PayrollStatus::Approved => "approved",
            PayrollStatus::Paid => "paid",
        }
    }
}

/// One employee's computed payroll for one month.
///
/// `net_salary == gross_salary - total_deductions` always holds; both sides
/// are recomputed from the components rather than maintained incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier.
    pub id: String,
    /// The employee paid.
    pub employee_id: String,
    /// The payroll month.
    pub month: PayrollMonth,
    /// Days counted as present.
    pub present_days: Decimal,
    /// Working days not attended.
    pub absent_days: Decimal,
    /// Days of approved unpaid leave inside the month.
    pub unpaid_leave_days: Decimal,
    /// Overtime hours worked.
    pub overtime_hours: Decimal,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Housing allowance.
    pub housing_allowance: Decimal,
    /// Transport allowance.
    pub transport_allowance: Decimal,
    /// Other fixed allowances.
    pub other_allowances: Decimal,
    /// Overtime pay.
    pub overtime_pay: Decimal,
    /// One-off bonuses for the month.
    pub bonus: Decimal,
    /// Sales commission for the month.
    pub commission: Decimal,
    /// Total earnings.
    pub gross_salary: Decimal,
    /// Salary base used for GOSI.
    pub gosi_calculation_base: Decimal,
    /// Employee GOSI share (deducted).
    pub gosi_employee: Decimal,
    /// Employer GOSI share (cost, not deducted).
    pub gosi_employer: Decimal,
    /// Loan installments deducted.
    pub loan_deduction: Decimal,
    /// Advances and other one-off deductions.
    pub other_deductions: Decimal,
    /// Deduction for absence and unpaid leave.
    pub absence_deduction: Decimal,
    /// Employee contributions to benefit plans.
    pub benefit_deductions: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Take-home pay.
    pub net_salary: Decimal,
    /// Lifecycle status.
    pub status: PayrollStatus,
    /// Explanation of how each figure was reached.
    pub audit_trace: AuditTrace,
    /// E-mail of the account that ran the payroll.
    pub processed_by: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Category of a one-off deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    /// Salary advance recovery.
    Advance,
    /// Any other one-off deduction.
    Other,
    /// Audit entry written by the payroll processor for unpaid leave.
    UnpaidLeave,
}

/// A one-off deduction for an employee in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    /// Unique identifier.
    pub id: String,
    /// The employee charged.
    pub employee_id: String,
    /// The month the deduction applies to.
    pub month: PayrollMonth,
    /// Category.
    pub deduction_type: DeductionType,
    /// Amount in SAR.
    pub amount: Decimal,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Category of a one-off earning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    /// Discretionary or performance bonus.
    Bonus,
    /// Sales commission.
    Commission,
}

/// A one-off earning for an employee in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    /// Unique identifier.
    pub id: String,
    /// The employee paid.
    pub employee_id: String,
    /// The month the earning is paid in.
    pub month: PayrollMonth,
    /// Category.
    pub bonus_type: BonusType,
    /// Amount in SAR.
    pub amount: Decimal,
}

/// Status of a benefit plan enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// Contributions are deducted every month.
    Active,
    /// Temporarily paused.
    Suspended,
    /// Ended.
    Cancelled,
}

/// An employee's enrollment in a benefit plan with a monthly contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitEnrollment {
    /// Unique identifier.
    pub id: String,
    /// The enrolled employee.
    pub employee_id: String,
    /// Plan name (e.g. "Family medical upgrade").
    pub benefit_name: String,
    /// Enrollment status.
    pub status: EnrollmentStatus,
    /// Monthly amount deducted from salary.
    pub employee_contribution: Decimal,
}
