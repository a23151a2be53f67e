//! Leave requests and leave balances.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::workflow::ApprovalState;

/// Category of leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Annual vacation.
    Annual,
    /// Sick leave.
    Sick,
    /// Unpaid leave; deducted by the payroll processor.
    Unpaid,
    /// Maternity leave.
    Maternity,
    /// Paternity leave.
    Paternity,
    /// Hajj leave.
    Hajj,
    /// Marriage leave.
    Marriage,
    /// Bereavement leave.
    Bereavement,
    /// Emergency leave.
    Emergency,
}

impl LeaveType {
    /// The wire name of the leave type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Unpaid => "unpaid",
            LeaveType::Maternity => "maternity",
            LeaveType::Paternity => "paternity",
            LeaveType::Hajj => "hajj",
            LeaveType::Marriage => "marriage",
            LeaveType::Bereavement => "bereavement",
            LeaveType::Emergency => "emergency",
        }
    }
}

/// A leave request moving through the manager and HR tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: String,
    /// The requesting employee.
    pub employee_id: String,
    /// Category of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Number of leave days requested.
    pub total_days: Decimal,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Approval workflow state.
    #[serde(flatten)]
    pub approval: ApprovalState,
}

/// Entitlement and consumption of one leave type for one employee and year.
///
/// `remaining == total_entitled - used - pending`, clamped at zero, after
/// every mutation made through [`LeaveBalance::recompute_remaining`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Unique identifier.
    pub id: String,
    /// The employee.
    pub employee_id: String,
    /// Leave category.
    pub leave_type: LeaveType,
    /// Calendar year.
    pub year: i32,
    /// Days granted so far this year.
    pub total_entitled: Decimal,
    /// Days taken.
    pub used: Decimal,
    /// Days requested but not yet finally approved.
    pub pending: Decimal,
    /// Days still available.
    pub remaining: Decimal,
}

impl LeaveBalance {
    /// Recomputes `remaining` from the other fields.
    pub fn recompute_remaining(&mut self) {
        self.remaining = (self.total_entitled - self.used - self.pending).max(Decimal::ZERO);
    }

    /// Reserves days for a submitted request.
    pub fn reserve(&mut self, days: Decimal) {
        self.pending += days;
        self.recompute_remaining();
    }

    /// Releases days reserved by a rejected request.
    pub fn release(&mut self, days: Decimal) {
        self.pending = (self.pending - days).max(Decimal::ZERO);
        self.recompute_remaining();
    }

    /// Moves days from pending to used on final approval.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::models::{LeaveBalance, LeaveType};
    /// use rust_decimal::Decimal;
    ///
    /// let mut balance = LeaveBalance {
    ///     id: "bal_1".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     leave_type: LeaveType::Annual,
    ///     year: 2025,
    ///     total_entitled: Decimal::new(21, 0),
    ///     used: Decimal::ZERO,
    ///     pending: Decimal::new(5, 0),
    ///     remaining: Decimal::new(16, 0),
    /// };
    /// balance.consume(Decimal::new(5, 0));
    /// assert_eq!(balance.used, Decimal::new(5, 0));
    /// assert_eq!(balance.pending, Decimal::ZERO);
    /// assert_eq!(balance.remaining, Decimal::new(16, 0));
    /// ```
    pub fn consume(&mut self, days: Decimal) {
        self.used += days;
        self.pending = (self.pending - days).max(Decimal::ZERO);
        self.recompute_remaining();
    }

    /// Adds accrued days to the entitlement.
    pub fn accrue(&mut self, days: Decimal) {
        self.total_entitled += days;
        self.recompute_remaining();
    }
}
