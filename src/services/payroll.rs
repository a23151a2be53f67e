//! Monthly payroll processing.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::calculation::{PayrollInputs, calculate_payroll};
use crate::error::{HrmsError, HrmsResult};
use crate::models::{
    Deduction, DeductionType, Employee, EmployeeStatus, EnrollmentStatus, LeaveType, Payroll,
    PayrollMonth, PayrollStatus, RepaymentStatus,
};
use crate::store::{
    AttendanceQuery, BenefitEnrollmentQuery, BonusQuery, DeductionQuery, EmployeeQuery,
    LeaveRequestQuery, LoanRequestQuery, PayrollQuery,
};
use crate::workflow::RequestStatus;

use super::{AuthContext, BatchError, HrmsContext, new_id};

/// A payroll run for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollRun {
    /// Month to pay.
    pub month: PayrollMonth,
    /// Restrict the run to these employees. `None` means every active one.
    pub employee_ids: Option<Vec<String>>,
}

/// Aggregate amounts of the payrolls created by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct PayrollTotals {
    pub total_gross: Decimal,
    pub total_deductions: Decimal,
    pub total_net: Decimal,
    pub total_gosi_employee: Decimal,
    pub total_gosi_employer: Decimal,
}

impl PayrollTotals {
    fn add(&mut self, payroll: &Payroll) {
        self.total_gross += payroll.gross_salary;
        self.total_deductions += payroll.total_deductions;
        self.total_net += payroll.net_salary;
        self.total_gosi_employee += payroll.gosi_employee;
        self.total_gosi_employer += payroll.gosi_employer;
    }
}

/// The result of a payroll run.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollRunSummary {
    /// Month paid.
    pub month: PayrollMonth,
    /// Payrolls created.
    pub processed: usize,
    /// Employees that failed.
    pub errors: usize,
    /// Sums over [`payrolls`](Self::payrolls).
    pub totals: PayrollTotals,
    /// Created payroll records.
    pub payrolls: Vec<Payroll>,
    /// One entry per failed employee.
    pub failures: Vec<BatchError>,
}

/// Computes and stores the month's payroll for every selected active
/// employee.
///
/// Employees are processed one after another. A failure for one employee,
/// including an existing payroll for the month, is recorded in
/// [`PayrollRunSummary::failures`] and the run continues; nothing already
/// written is rolled back.
///
/// # Errors
///
/// [`HrmsError::Forbidden`] unless the caller is an admin, or a store error
/// while listing employees.
pub async fn process_monthly_payroll(
    ctx: &HrmsContext,
    auth: &AuthContext,
    run: PayrollRun,
) -> HrmsResult<PayrollRunSummary> {
    auth.require_admin()?;

    let mut query = EmployeeQuery::new().status(EmployeeStatus::Active);
    if let Some(ids) = run.employee_ids.clone() {
        query = query.ids(ids);
    }
    let employees = ctx.store.employees.find(&query).await?;

    info!(
        month = %run.month,
        employees = employees.len(),
        processed_by = %auth.email(),
        "Processing monthly payroll"
    );
    let start_time = Instant::now();

    let mut totals = PayrollTotals::default();
    let mut payrolls = Vec::new();
    let mut failures = Vec::new();

    for employee in &employees {
        match process_employee(ctx, auth, employee, run.month).await {
            Ok(payroll) => {
                totals.add(&payroll);
                payrolls.push(payroll);
            }
            Err(error) => {
                warn!(
                    employee_id = %employee.id,
                    month = %run.month,
                    error = %error,
                    "Payroll failed for employee"
                );
                failures.push(BatchError::new(&employee.id, &error));
            }
        }
    }

    info!(
        month = %run.month,
        processed = payrolls.len(),
        errors = failures.len(),
        total_net = %totals.total_net,
        duration_us = start_time.elapsed().as_micros(),
        "Monthly payroll completed"
    );

    Ok(PayrollRunSummary {
        month: run.month,
        processed: payrolls.len(),
        errors: failures.len(),
        totals,
        payrolls,
        failures,
    })
}

async fn process_employee(
    ctx: &HrmsContext,
    auth: &AuthContext,
    employee: &Employee,
    month: PayrollMonth,
) -> HrmsResult<Payroll> {
    let store = &ctx.store;
    let existing = PayrollQuery::new()
        .employee_id(employee.id.as_str())
        .month(month);
    if store.payrolls.exists(&existing).await? {
        return Err(HrmsError::AlreadyProcessed {
            message: format!("payroll for {} in {month} already exists", employee.id),
        });
    }

    let attendance = store
        .attendance
        .find(&AttendanceQuery::new().employee_id(employee.id.as_str()).month(month))
        .await?;
    let leave_requests = store
        .leave_requests
        .find(
            &LeaveRequestQuery::new()
                .employee_id(employee.id.as_str())
                .leave_type(LeaveType::Unpaid)
                .status(RequestStatus::Approved),
        )
        .await?;
    let bonuses = store
        .bonuses
        .find(&BonusQuery::new().employee_id(employee.id.as_str()).month(month))
        .await?;
    let deductions = store
        .deductions
        .find(&DeductionQuery::new().employee_id(employee.id.as_str()).month(month))
        .await?;
    let loans = store
        .loan_requests
        .find(
            &LoanRequestQuery::new()
                .employee_id(employee.id.as_str())
                .status(RequestStatus::Approved)
                .repayment_status(RepaymentStatus::Active),
        )
        .await?;
    let benefits = store
        .benefit_enrollments
        .find(
            &BenefitEnrollmentQuery::new()
                .employee_id(employee.id.as_str())
                .status(EnrollmentStatus::Active),
        )
        .await?;

    let calculation = calculate_payroll(
        &PayrollInputs {
            employee,
            month,
            attendance: &attendance,
            leave_requests: &leave_requests,
            bonuses: &bonuses,
            deductions: &deductions,
            loans: &loans,
            benefits: &benefits,
        },
        ctx.config.payroll(),
    )?;

    let unpaid_leave_days = calculation.unpaid_leave_days;
    let unpaid_leave_deduction = calculation.unpaid_leave_deduction;
    let loan_charges = calculation.loan_charges.clone();
    let payroll = calculation.into_payroll(new_id("pay"), auth.email().to_string(), Utc::now());
    let payroll = store.payrolls.create(payroll).await?;

    if unpaid_leave_deduction > Decimal::ZERO {
        store
            .deductions
            .create(Deduction {
                id: new_id("ded"),
                employee_id: employee.id.clone(),
                month,
                deduction_type: DeductionType::UnpaidLeave,
                amount: unpaid_leave_deduction,
                description: Some(format!("{unpaid_leave_days} unpaid leave days in {month}")),
            })
            .await?;
    }

    for charge in &loan_charges {
        let mut loan = store.loan_requests.require(&charge.loan_id).await?;
        loan.record_repayment(charge.amount);
        store.loan_requests.update(loan).await?;
    }

    info!(
        employee_id = %employee.id,
        month = %month,
        gross_salary = %payroll.gross_salary,
        net_salary = %payroll.net_salary,
        "Payroll calculated"
    );
    Ok(payroll)
}

/// Moves a payroll forward: `calculated → approved → paid`.
///
/// # Errors
///
/// [`HrmsError::Forbidden`] for non-admins, [`HrmsError::NotFound`] for an
/// unknown payroll, [`HrmsError::InvalidTransition`] for any other move.
pub async fn update_payroll_status(
    ctx: &HrmsContext,
    auth: &AuthContext,
    payroll_id: &str,
    status: PayrollStatus,
) -> HrmsResult<Payroll> {
    auth.require_admin()?;

    let mut payroll = ctx.store.payrolls.require(payroll_id).await?;
    if !payroll.status.can_transition_to(status) {
        return Err(HrmsError::InvalidTransition {
            from: payroll.status.as_str().to_string(),
            to: status.as_str().to_string(),
        });
    }

    let previous = payroll.status;
    payroll.status = status;
    let payroll = ctx.store.payrolls.update(payroll).await?;
    info!(
        payroll_id = %payroll.id,
        from = previous.as_str(),
        to = status.as_str(),
        updated_by = %auth.email(),
        "Payroll status updated"
    );
    Ok(payroll)
}
