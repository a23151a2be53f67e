//! Monthly leave accrual for a single employee and policy.
//!
//! This module provides a pure, deterministic accrual decision: whether the
//! employee is eligible in the period, the proration of the hire month, and
//! the cap imposed by the policy's maximum balance.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, Employee, EmploymentType, LeaveAccrualPolicy, PayrollMonth};

/// Why an employee was not credited under a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The policy does not cover the employee's employment type.
    IneligibleEmploymentType {
        /// The employee's employment type.
        employment_type: EmploymentType,
    },
    /// The employee was hired after the period ended.
    NotYetHired {
        /// The hire date.
        hire_date: NaiveDate,
    },
    /// The employee has not completed probation.
    InProbation {
        /// Completed months of service at the end of the period.
        months_of_service: u32,
        /// Months of probation required by the policy.
        probation_period_months: u32,
    },
    /// The entitlement already reached the policy's maximum balance.
    AtMaximumBalance {
        /// The policy's cap.
        max_balance: Decimal,
    },
}

impl SkipReason {
    /// A short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            SkipReason::IneligibleEmploymentType { employment_type } => {
                format!("employment type {employment_type:?} not eligible")
            }
            SkipReason::NotYetHired { hire_date } => format!("hired after period end ({hire_date})"),
            SkipReason::InProbation {
                months_of_service,
                probation_period_months,
            } => format!("in probation ({months_of_service} of {probation_period_months} months)"),
            SkipReason::AtMaximumBalance { max_balance } => {
                format!("maximum balance of {max_balance} days reached")
            }
        }
    }
}

/// Days to credit and how they were derived.
#[derive(Debug, Clone)]
pub struct AccrualCredit {
    /// Days to add to the entitlement, rounded to 2 decimal places.
    pub days: Decimal,
    /// Fraction of the monthly rate applied.
    pub proration_factor: Decimal,
    /// The audit step recording the decision.
    pub audit_step: AuditStep,
}

/// The outcome of evaluating a policy for an employee and period.
#[derive(Debug, Clone)]
pub enum AccrualDecision {
    /// Credit the given days.
    Accrue(AccrualCredit),
    /// Do not credit anything.
    Skip(SkipReason),
}

/// Completed whole months between `hire_date` and `as_of`.
///
/// A hire day past the end of a shorter month has its anniversary on that
/// month's last day, so a 31 January hire completes a month on 28 February.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::months_of_service;
/// use chrono::NaiveDate;
///
/// let hired = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
/// assert_eq!(months_of_service(hired, NaiveDate::from_ymd_opt(2025, 4, 14).unwrap()), 2);
/// assert_eq!(months_of_service(hired, NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()), 3);
/// assert_eq!(months_of_service(hired, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()), 0);
///
/// let month_end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
/// assert_eq!(months_of_service(month_end, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()), 1);
/// ```
pub fn months_of_service(hire_date: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of < hire_date {
        return 0;
    }
    let mut months = (as_of.year() - hire_date.year()) * 12 + as_of.month() as i32
        - hire_date.month() as i32;
    let anniversary_day = hire_date
        .day()
        .min(PayrollMonth::from_date(as_of).days_in_month());
    if as_of.day() < anniversary_day {
        months -= 1;
    }
    months.max(0) as u32
}

/// Decides how many days `policy` credits to `employee` for `period`.
///
/// `current_entitlement` is the employee's `total_entitled` for the period
/// year before this accrual, used to enforce `max_balance`.
pub fn evaluate_accrual(
    employee: &Employee,
    policy: &LeaveAccrualPolicy,
    period: PayrollMonth,
    current_entitlement: Decimal,
    step_number: u32,
) -> AccrualDecision {
    if !policy.covers(employee.employment_type) {
        return AccrualDecision::Skip(SkipReason::IneligibleEmploymentType {
            employment_type: employee.employment_type,
        });
    }

    let period_end = period.last_day();
    if employee.hire_date > period_end {
        return AccrualDecision::Skip(SkipReason::NotYetHired {
            hire_date: employee.hire_date,
        });
    }

    let service = months_of_service(employee.hire_date, period_end);
    if service < policy.probation_period_months && !policy.accrue_during_probation {
        return AccrualDecision::Skip(SkipReason::InProbation {
            months_of_service: service,
            probation_period_months: policy.probation_period_months,
        });
    }

    let days_in_month = Decimal::from(period.days_in_month());
    let hired_in_period = period.contains_date(employee.hire_date);
    let (days, proration_factor) = if hired_in_period && policy.prorate_first_month {
        let days_employed = days_in_month - Decimal::from(employee.hire_date.day()) + Decimal::ONE;
        (
            (policy.monthly_accrual_rate * days_employed / days_in_month).round_dp(2),
            (days_employed / days_in_month).round_dp(4),
        )
    } else {
        (policy.monthly_accrual_rate.round_dp(2), Decimal::ONE)
    };

    let mut capped_days = days;
    if let Some(max_balance) = policy.max_balance {
        if current_entitlement >= max_balance {
            return AccrualDecision::Skip(SkipReason::AtMaximumBalance { max_balance });
        }
        capped_days = days.min(max_balance - current_entitlement);
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_accrual".to_string(),
        rule_name: "Monthly Leave Accrual".to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "policy_id": policy.id,
            "period": period.to_string(),
            "hire_date": employee.hire_date.to_string(),
            "monthly_accrual_rate": policy.monthly_accrual_rate.to_string(),
            "months_of_service": service,
            "current_entitlement": current_entitlement.to_string()
        }),
        output: serde_json::json!({
            "days_accrued": capped_days.to_string(),
            "proration_factor": proration_factor.to_string(),
            "capped": capped_days < days
        }),
        reasoning: if capped_days < days {
            format!(
                "{} days limited to {} by maximum balance",
                days, capped_days
            )
        } else if proration_factor < Decimal::ONE {
            format!(
                "Hired {} in {}: {} × {} = {} days",
                employee.hire_date, period, policy.monthly_accrual_rate, proration_factor, days
            )
        } else {
            format!("Full month: {} days", days)
        },
    };

    AccrualDecision::Accrue(AccrualCredit {
        days: capped_days,
        proration_factor,
        audit_step,
    })
}
