//! Calculation logic for the HRMS engine.
//!
//! This module contains the pure payroll and accrual rules: attendance
//! summary, unpaid leave counting, overtime and gross pay, GOSI
//! contributions, deductions, the composed monthly payroll, and the monthly
//! leave accrual decision. Every rule records an
//! [`AuditStep`](crate::models::AuditStep).

mod accrual;
mod attendance;
mod deductions;
mod earnings;
mod gosi;
mod payroll;
mod unpaid_leave;

pub use accrual::{AccrualCredit, AccrualDecision, SkipReason, evaluate_accrual, months_of_service};
pub use attendance::{AttendanceSummary, summarize_attendance};
pub use deductions::{
    AbsenceDeductionResult, DeductionBreakdown, LoanCharge, TotalDeductionsResult,
    calculate_absence_deduction, calculate_total_deductions, collect_loan_charges,
    sum_benefit_contributions, sum_one_off_deductions,
};
pub use earnings::{
    Earnings, GrossSalaryResult, OvertimePayResult, VariablePay, calculate_gross_salary,
    calculate_overtime_pay, sum_variable_pay,
};
pub use gosi::{GosiContribution, calculate_gosi};
pub use payroll::{PayrollCalculation, PayrollInputs, calculate_payroll};
pub use unpaid_leave::{UnpaidLeaveResult, calculate_unpaid_leave_days};
