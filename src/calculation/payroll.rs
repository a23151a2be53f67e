//! Monthly payroll calculation for a single employee.
//!
//! Composes the attendance, unpaid leave, earnings, GOSI and deduction rules
//! into one [`PayrollCalculation`] with a complete audit trace. The function
//! is pure: loading the inputs and persisting the result is the payroll
//! service's job.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::config::PayrollConfig;
use crate::error::HrmsResult;
use crate::models::{
    AttendanceRecord, AuditStep, AuditTrace, BenefitEnrollment, Bonus, Deduction, Employee,
    LeaveRequest, LoanRequest, Payroll, PayrollMonth, PayrollStatus,
};

use super::attendance::summarize_attendance;
use super::deductions::{
    DeductionBreakdown, LoanCharge, calculate_absence_deduction, calculate_total_deductions,
    collect_loan_charges, sum_benefit_contributions, sum_one_off_deductions,
};
use super::earnings::{Earnings, calculate_gross_salary, calculate_overtime_pay, sum_variable_pay};
use super::gosi::calculate_gosi;
use super::unpaid_leave::calculate_unpaid_leave_days;

/// Everything the payroll rules read for one employee and month.
#[derive(Debug, Clone, Copy)]
pub struct PayrollInputs<'a> {
    /// The employee being paid.
    pub employee: &'a Employee,
    /// The payroll month.
    pub month: PayrollMonth,
    /// The employee's attendance records for the month.
    pub attendance: &'a [AttendanceRecord],
    /// The employee's leave requests.
    pub leave_requests: &'a [LeaveRequest],
    /// The employee's bonus and commission records.
    pub bonuses: &'a [Bonus],
    /// The employee's one-off deductions.
    pub deductions: &'a [Deduction],
    /// The employee's loans.
    pub loans: &'a [LoanRequest],
    /// The employee's benefit enrollments.
    pub benefits: &'a [BenefitEnrollment],
}

/// The computed payroll figures for one employee and month.
#[derive(Debug, Clone)]
pub struct PayrollCalculation {
    /// The employee paid.
    pub employee_id: String,
    /// The payroll month.
    pub month: PayrollMonth,
    /// Days counted as present.
    pub present_days: Decimal,
    /// Working days not attended.
    pub absent_days: Decimal,
    /// Approved unpaid leave days inside the month.
    pub unpaid_leave_days: Decimal,
    /// Overtime hours.
    pub overtime_hours: Decimal,
    /// Earning components.
    pub earnings: Earnings,
    /// Gross salary.
    pub gross_salary: Decimal,
    /// GOSI contribution base.
    pub gosi_calculation_base: Decimal,
    /// Employer GOSI share.
    pub gosi_employer: Decimal,
    /// Deduction components.
    pub deductions: DeductionBreakdown,
    /// Portion of the absence deduction caused by unpaid leave.
    pub unpaid_leave_deduction: Decimal,
    /// Installments charged per loan.
    pub loan_charges: Vec<LoanCharge>,
    /// Total deductions.
    pub total_deductions: Decimal,
    /// Net salary.
    pub net_salary: Decimal,
    /// Explanation of every figure.
    pub audit_trace: AuditTrace,
}

impl PayrollCalculation {
    /// Builds the persisted payroll record, status `calculated`.
    pub fn into_payroll(self, id: String, processed_by: String, created_at: DateTime<Utc>) -> Payroll {
        Payroll {
            id,
            employee_id: self.employee_id,
            month: self.month,
            present_days: self.present_days,
            absent_days: self.absent_days,
            unpaid_leave_days: self.unpaid_leave_days,
            overtime_hours: self.overtime_hours,
            basic_salary: self.earnings.basic_salary,
            housing_allowance: self.earnings.housing_allowance,
            transport_allowance: self.earnings.transport_allowance,
            other_allowances: self.earnings.other_allowances,
            overtime_pay: self.earnings.overtime_pay,
            bonus: self.earnings.bonus,
            commission: self.earnings.commission,
            gross_salary: self.gross_salary,
            gosi_calculation_base: self.gosi_calculation_base,
            gosi_employee: self.deductions.gosi_employee,
            gosi_employer: self.gosi_employer,
            loan_deduction: self.deductions.loan_deduction,
            other_deductions: self.deductions.other_deductions,
            absence_deduction: self.deductions.absence_deduction,
            benefit_deductions: self.deductions.benefit_deductions,
            total_deductions: self.total_deductions,
            net_salary: self.net_salary,
            status: PayrollStatus::Calculated,
            audit_trace: self.audit_trace,
            processed_by,
            created_at,
        }
    }
}

/// Calculates one employee's payroll for a month.
///
/// Steps, each recorded in the audit trace:
/// 1. Attendance summary
/// 2. Unpaid leave days
/// 3. Overtime pay
/// 4. Gross salary
/// 5. GOSI contribution
/// 6. Absence deduction
/// 7. Total deductions
/// 8. Net salary
///
/// # Errors
///
/// Returns [`crate::error::HrmsError::CalculationError`] when the payroll
/// configuration makes a rate undefined.
pub fn calculate_payroll(
    inputs: &PayrollInputs<'_>,
    config: &PayrollConfig,
) -> HrmsResult<PayrollCalculation> {
    let employee = inputs.employee;
    let month = inputs.month;
    let mut trace = AuditTrace::default();

    let attendance = summarize_attendance(inputs.attendance, month, config, 1);
    trace.push(attendance.audit_step);

    let unpaid = calculate_unpaid_leave_days(inputs.leave_requests, month, 2);
    trace.push(unpaid.audit_step);

    let overtime =
        calculate_overtime_pay(employee.basic_salary, attendance.overtime_hours, config, 3)?;
    trace.push(overtime.audit_step);

    let variable = sum_variable_pay(inputs.bonuses, month);
    let earnings = Earnings {
        overtime_pay: overtime.overtime_pay,
        bonus: variable.bonus,
        commission: variable.commission,
        ..Earnings::from_employee(employee)
    };
    let gross = calculate_gross_salary(&earnings, 4);
    trace.push(gross.audit_step);

    let gosi = calculate_gosi(employee, config, 5);
    trace.push(gosi.audit_step);

    let absence = calculate_absence_deduction(
        employee.basic_salary,
        attendance.absent_days,
        unpaid.days,
        config,
        6,
    )?;
    trace.push(absence.audit_step);

    let loan_charges = collect_loan_charges(inputs.loans);
    let breakdown = DeductionBreakdown {
        gosi_employee: gosi.employee_share,
        loan_deduction: loan_charges.iter().map(|c| c.amount).sum(),
        other_deductions: sum_one_off_deductions(inputs.deductions, month),
        absence_deduction: absence.total,
        benefit_deductions: sum_benefit_contributions(inputs.benefits),
    };
    let totals = calculate_total_deductions(&breakdown, &loan_charges, 7);
    trace.push(totals.audit_step);

    let net_salary = gross.gross_salary - totals.total_deductions;
    trace.push(AuditStep {
        step_number: 8,
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        input: serde_json::json!({
            "gross_salary": gross.gross_salary.to_string(),
            "total_deductions": totals.total_deductions.to_string()
        }),
        output: serde_json::json!({
            "net_salary": net_salary.to_string()
        }),
        reasoning: format!(
            "{} gross − {} deductions = {}",
            gross.gross_salary, totals.total_deductions, net_salary
        ),
    });

    if net_salary < Decimal::ZERO {
        trace.warn(
            "NEGATIVE_NET_SALARY",
            format!("deductions of {} exceed gross salary of {}", totals.total_deductions, gross.gross_salary),
        );
    }
    if attendance.record_count == 0 {
        trace.warn(
            "NO_ATTENDANCE_RECORDS",
            format!("no attendance records for {month}; every working day deducted as absence"),
        );
    }

    Ok(PayrollCalculation {
        employee_id: employee.id.clone(),
        month,
        present_days: attendance.present_days,
        absent_days: attendance.absent_days,
        unpaid_leave_days: unpaid.days,
        overtime_hours: attendance.overtime_hours,
        earnings,
        gross_salary: gross.gross_salary,
        gosi_calculation_base: gosi.calculation_base,
        gosi_employer: gosi.employer_share,
        deductions: breakdown,
        unpaid_leave_deduction: absence.unpaid_leave_amount,
        loan_charges,
        total_deductions: totals.total_deductions,
        net_salary,
        audit_trace: trace,
    })
}
