//! Salary deductions.
//!
//! Deductions are the employee GOSI share, active loan installments, one-off
//! advance and other deductions for the month, the absence deduction, and
//! employee contributions to active benefit plans.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;
use crate::error::{HrmsError, HrmsResult};
use crate::models::{
    AuditStep, BenefitEnrollment, Deduction, DeductionType, EnrollmentStatus, LoanRequest,
    PayrollMonth,
};
use crate::workflow::RequestStatus;

/// An installment charged against one loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanCharge {
    /// The loan charged.
    pub loan_id: String,
    /// The installment deducted.
    pub amount: Decimal,
}

/// Installments due this month on approved loans with active repayment.
///
/// Each installment is capped at the loan's remaining balance.
pub fn collect_loan_charges(loans: &[LoanRequest]) -> Vec<LoanCharge> {
    loans
        .iter()
        .filter(|loan| loan.approval.status == RequestStatus::Approved)
        .map(|loan| LoanCharge {
            loan_id: loan.id.clone(),
            amount: loan.due_installment(),
        })
        .filter(|charge| charge.amount > Decimal::ZERO)
        .collect()
}

/// Sum of the month's advance and other one-off deductions.
///
/// Unpaid-leave entries are audit records written by the payroll run itself
/// and are not charged again.
pub fn sum_one_off_deductions(deductions: &[Deduction], month: PayrollMonth) -> Decimal {
    deductions
        .iter()
        .filter(|d| d.month == month && d.deduction_type != DeductionType::UnpaidLeave)
        .map(|d| d.amount)
        .sum()
}

/// Sum of the employee contributions of active benefit enrollments.
pub fn sum_benefit_contributions(enrollments: &[BenefitEnrollment]) -> Decimal {
    enrollments
        .iter()
        .filter(|e| e.status == EnrollmentStatus::Active)
        .map(|e| e.employee_contribution)
        .sum()
}

/// The result of the absence deduction calculation.
#[derive(Debug, Clone)]
pub struct AbsenceDeductionResult {
    /// Deduction for absent days.
    pub absent_amount: Decimal,
    /// Deduction for unpaid leave days.
    pub unpaid_leave_amount: Decimal,
    /// Total absence deduction, rounded to 2 decimal places.
    pub total: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates `basic / working_days × (absent_days + unpaid_leave_days)`.
///
/// # Errors
///
/// Returns [`HrmsError::CalculationError`] if the configured working days
/// are zero.
pub fn calculate_absence_deduction(
    basic_salary: Decimal,
    absent_days: Decimal,
    unpaid_leave_days: Decimal,
    config: &PayrollConfig,
    step_number: u32,
) -> HrmsResult<AbsenceDeductionResult> {
    if config.working_days_per_month.is_zero() {
        return Err(HrmsError::CalculationError {
            message: "working_days_per_month must be positive".to_string(),
        });
    }

    let daily_rate = basic_salary / config.working_days_per_month;
    let total = (daily_rate * (absent_days + unpaid_leave_days)).round_dp(2);
    let unpaid_leave_amount = (daily_rate * unpaid_leave_days).round_dp(2);
    let absent_amount = total - unpaid_leave_amount;

    let audit_step = AuditStep {
        step_number,
        rule_id: "absence_deduction".to_string(),
        rule_name: "Absence Deduction".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.to_string(),
            "working_days_per_month": config.working_days_per_month.to_string(),
            "absent_days": absent_days.to_string(),
            "unpaid_leave_days": unpaid_leave_days.to_string()
        }),
        output: serde_json::json!({
            "daily_rate": daily_rate.round_dp(4).to_string(),
            "absent_amount": absent_amount.to_string(),
            "unpaid_leave_amount": unpaid_leave_amount.to_string(),
            "absence_deduction": total.to_string()
        }),
        reasoning: format!(
            "{} per day × ({} absent + {} unpaid leave) = {}",
            daily_rate.round_dp(4),
            absent_days,
            unpaid_leave_days,
            total
        ),
    };

    Ok(AbsenceDeductionResult {
        absent_amount,
        unpaid_leave_amount,
        total,
        audit_step,
    })
}

/// The deduction components of a payroll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Employee GOSI share.
    pub gosi_employee: Decimal,
    /// Loan installments.
    pub loan_deduction: Decimal,
    /// Advances and other one-off deductions.
    pub other_deductions: Decimal,
    /// Absence and unpaid leave deduction.
    pub absence_deduction: Decimal,
    /// Benefit plan contributions.
    pub benefit_deductions: Decimal,
}

impl DeductionBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> Decimal {
        self.gosi_employee
            + self.loan_deduction
            + self.other_deductions
            + self.absence_deduction
            + self.benefit_deductions
    }
}

/// The result of totalling the deductions.
#[derive(Debug, Clone)]
pub struct TotalDeductionsResult {
    /// Total deductions, rounded to 2 decimal places.
    pub total_deductions: Decimal,
    /// The audit step recording the breakdown.
    pub audit_step: AuditStep,
}

/// Totals the deduction components.
pub fn calculate_total_deductions(
    breakdown: &DeductionBreakdown,
    loan_charges: &[LoanCharge],
    step_number: u32,
) -> TotalDeductionsResult {
    let total_deductions = breakdown.total().round_dp(2);

    let audit_step = AuditStep {
        step_number,
        rule_id: "total_deductions".to_string(),
        rule_name: "Total Deductions".to_string(),
        input: serde_json::json!({
            "breakdown": breakdown,
            "loan_charges": loan_charges
        }),
        output: serde_json::json!({
            "total_deductions": total_deductions.to_string()
        }),
        reasoning: format!(
            "GOSI {} + loans {} + other {} + absence {} + benefits {} = {}",
            breakdown.gosi_employee,
            breakdown.loan_deduction,
            breakdown.other_deductions,
            breakdown.absence_deduction,
            breakdown.benefit_deductions,
            total_deductions
        ),
    };

    TotalDeductionsResult {
        total_deductions,
        audit_step,
    }
}
