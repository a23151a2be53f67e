//! Monthly leave accrual processing.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::calculation::{AccrualDecision, SkipReason, evaluate_accrual};
use crate::error::{HrmsError, HrmsResult};
use crate::models::{
    Employee, EmployeeStatus, LeaveAccrual, LeaveAccrualPolicy, LeaveBalance, PayrollMonth,
};
use crate::store::{EmployeeQuery, LeaveAccrualPolicyQuery, LeaveAccrualQuery, LeaveBalanceQuery};

use super::{AuthContext, BatchError, HrmsContext, new_id};

/// An accrual run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccrualRun {
    /// Period to credit. Defaults to the current month.
    pub accrual_period: Option<PayrollMonth>,
    /// Run again even if the period already has accrual records.
    pub force_reprocess: bool,
}

/// An employee and policy pair that was not credited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAccrual {
    /// Employee.
    pub employee_id: String,
    /// Policy.
    pub policy_id: String,
    /// Structured reason.
    #[serde(flatten)]
    pub reason: SkipReason,
    /// Readable form of `reason`.
    pub message: String,
}

/// The result of an accrual run.
#[derive(Debug, Clone, Serialize)]
pub struct AccrualRunSummary {
    /// Period credited.
    pub accrual_period: PayrollMonth,
    /// Accrual records written.
    pub processed: usize,
    /// Pairs skipped, with reasons.
    pub skipped: Vec<SkippedAccrual>,
    /// Pairs that failed.
    pub errors: Vec<BatchError>,
    /// Sum of days credited.
    pub total_days_accrued: Decimal,
    /// The records written by this run.
    pub records: Vec<LeaveAccrual>,
}

/// Credits every active accrual policy to every active employee for one
/// period.
///
/// A period that already has accrual records is refused unless
/// `force_reprocess` is set; a forced run adds new records next to the old
/// ones.
///
/// # Errors
///
/// - [`HrmsError::Forbidden`] unless the caller is an admin.
/// - [`HrmsError::AlreadyProcessed`] when the period was already run.
pub async fn process_monthly_accrual(
    ctx: &HrmsContext,
    auth: &AuthContext,
    run: AccrualRun,
) -> HrmsResult<AccrualRunSummary> {
    auth.require_admin()?;
    let period = run
        .accrual_period
        .unwrap_or_else(|| PayrollMonth::from_date(Utc::now().date_naive()));

    let already_run = ctx
        .store
        .leave_accruals
        .exists(&LeaveAccrualQuery::new().accrual_period(period))
        .await?;
    if already_run && !run.force_reprocess {
        return Err(HrmsError::AlreadyProcessed {
            message: format!(
                "leave accrual for {period} was already processed; set force_reprocess to run again"
            ),
        });
    }

    let employees = ctx
        .store
        .employees
        .find(&EmployeeQuery::new().status(EmployeeStatus::Active))
        .await?;
    let policies = ctx
        .store
        .accrual_policies
        .find(&LeaveAccrualPolicyQuery::new().is_active(true))
        .await?;

    info!(
        period = %period,
        employees = employees.len(),
        policies = policies.len(),
        forced = run.force_reprocess,
        "Processing leave accrual"
    );
    let start_time = Instant::now();

    let mut summary = AccrualRunSummary {
        accrual_period: period,
        processed: 0,
        skipped: Vec::new(),
        errors: Vec::new(),
        total_days_accrued: Decimal::ZERO,
        records: Vec::new(),
    };

    for employee in &employees {
        for policy in &policies {
            match accrue(ctx, auth, employee, policy, period).await {
                Ok(Ok(record)) => {
                    summary.total_days_accrued += record.days_accrued;
                    summary.records.push(record);
                }
                Ok(Err(reason)) => {
                    debug!(
                        employee_id = %employee.id,
                        policy_id = %policy.id,
                        reason = %reason.describe(),
                        "Accrual skipped"
                    );
                    summary.skipped.push(SkippedAccrual {
                        employee_id: employee.id.clone(),
                        policy_id: policy.id.clone(),
                        message: reason.describe(),
                        reason,
                    });
                }
                Err(error) => {
                    warn!(
                        employee_id = %employee.id,
                        policy_id = %policy.id,
                        error = %error,
                        "Accrual failed"
                    );
                    summary.errors.push(BatchError::new(&employee.id, &error));
                }
            }
        }
    }
    summary.processed = summary.records.len();

    info!(
        period = %period,
        processed = summary.processed,
        skipped = summary.skipped.len(),
        errors = summary.errors.len(),
        total_days = %summary.total_days_accrued,
        duration_us = start_time.elapsed().as_micros(),
        "Leave accrual completed"
    );
    Ok(summary)
}

/// Credits one policy to one employee, or says why not.
async fn accrue(
    ctx: &HrmsContext,
    auth: &AuthContext,
    employee: &Employee,
    policy: &LeaveAccrualPolicy,
    period: PayrollMonth,
) -> HrmsResult<Result<LeaveAccrual, SkipReason>> {
    let balance_query = LeaveBalanceQuery::new()
        .employee_id(employee.id.as_str())
        .leave_type(policy.leave_type)
        .year(period.year());
    let balance = ctx.store.leave_balances.find_one(&balance_query).await?;
    let current_entitlement = balance
        .as_ref()
        .map_or(Decimal::ZERO, |b| b.total_entitled);

    let credit = match evaluate_accrual(employee, policy, period, current_entitlement, 1) {
        AccrualDecision::Accrue(credit) => credit,
        AccrualDecision::Skip(reason) => return Ok(Err(reason)),
    };
    debug!(
        employee_id = %employee.id,
        policy_id = %policy.id,
        reasoning = %credit.audit_step.reasoning,
        "Accrual evaluated"
    );

    let (balance_before, balance_after) = match balance {
        Some(mut balance) => {
            let before = balance.remaining;
            balance.accrue(credit.days);
            let balance = ctx.store.leave_balances.update(balance).await?;
            (before, balance.remaining)
        }
        None => {
            let mut balance = LeaveBalance {
                id: new_id("bal"),
                employee_id: employee.id.clone(),
                leave_type: policy.leave_type,
                year: period.year(),
                total_entitled: Decimal::ZERO,
                used: Decimal::ZERO,
                pending: Decimal::ZERO,
                remaining: Decimal::ZERO,
            };
            balance.accrue(credit.days);
            let balance = ctx.store.leave_balances.create(balance).await?;
            (Decimal::ZERO, balance.remaining)
        }
    };

    let record = LeaveAccrual {
        id: new_id("acc"),
        employee_id: employee.id.clone(),
        policy_id: policy.id.clone(),
        leave_type: policy.leave_type,
        accrual_period: period,
        days_accrued: credit.days,
        balance_before,
        balance_after,
        proration_factor: credit.proration_factor,
        processed_by: auth.email().to_string(),
        processed_at: Utc::now(),
    };
    Ok(Ok(ctx.store.leave_accruals.create(record).await?))
}
