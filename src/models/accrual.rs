//! Leave accrual policies and the audit records of each accrual run.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmploymentType, LeaveType, PayrollMonth};

/// Configuration of a monthly leave accrual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAccrualPolicy {
    /// Unique identifier.
    pub id: String,
    /// Display name (e.g. "Annual leave - 21 days").
    pub name: String,
    /// Leave type credited.
    pub leave_type: LeaveType,
    /// Inactive policies are ignored by the processor.
    pub is_active: bool,
    /// Days credited per month of service.
    pub monthly_accrual_rate: Decimal,
    /// Employment types the policy applies to; empty means all.
    #[serde(default)]
    pub eligible_employment_types: Vec<EmploymentType>,
    /// Months of service before accrual starts.
    #[serde(default)]
    pub probation_period_months: u32,
    /// Whether employees in probation still accrue.
    #[serde(default)]
    pub accrue_during_probation: bool,
    /// Whether the hire month is prorated by days employed.
    #[serde(default)]
    pub prorate_first_month: bool,
    /// Cap on the yearly entitlement.
    #[serde(default)]
    pub max_balance: Option<Decimal>,
}

impl LeaveAccrualPolicy {
    /// Returns true if the policy covers the employment type.
    pub fn covers(&self, employment_type: EmploymentType) -> bool {
        self.eligible_employment_types.is_empty()
            || self.eligible_employment_types.contains(&employment_type)
    }
}

/// Immutable audit record of one accrual for one employee, policy and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAccrual {
    /// Unique identifier.
    pub id: String,
    /// The employee credited.
    pub employee_id: String,
    /// The policy applied.
    pub policy_id: String,
    /// Leave type credited.
    pub leave_type: LeaveType,
    /// The accrual period.
    pub accrual_period: PayrollMonth,
    /// Days credited.
    pub days_accrued: Decimal,
    /// Remaining balance before the credit.
    pub balance_before: Decimal,
    /// Remaining balance after the credit.
    pub balance_after: Decimal,
    /// Fraction of the monthly rate applied (1 unless prorated).
    pub proration_factor: Decimal,
    /// E-mail of the account that ran the processor.
    pub processed_by: String,
    /// When the accrual was written.
    pub processed_at: DateTime<Utc>,
}
