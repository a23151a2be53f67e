//! Salary loan requests and their repayment state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::workflow::ApprovalState;

/// Repayment state of a loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentStatus {
    /// Not yet approved; nothing is deducted.
    #[default]
    NotStarted,
    /// Installments are deducted by payroll.
    Active,
    /// Fully repaid.
    Completed,
}

/// A salary loan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Unique identifier.
    pub id: String,
    /// The requesting employee.
    pub employee_id: String,
    /// Requested principal in SAR.
    pub amount_requested: Decimal,
    /// Number of monthly installments.
    pub installment_months: u32,
    /// Amount deducted each month.
    pub monthly_installment: Decimal,
    /// Principal still to be repaid.
    #[serde(default)]
    pub remaining_balance: Decimal,
    /// Repayment state.
    #[serde(default)]
    pub repayment_status: RepaymentStatus,
    /// Free-text purpose.
    #[serde(default)]
    pub purpose: Option<String>,
    /// Approval workflow state.
    #[serde(flatten)]
    pub approval: ApprovalState,
}

impl LoanRequest {
    /// The installment payroll deducts this month: the monthly installment,
    /// capped at the remaining balance. Zero unless repayment is active.
    ///
    /// The installment is rounded to cents, so the final payment may differ
    /// from it by the accumulated rounding. When what would be left after
    /// this installment is smaller than one cent per installment month, the
    /// whole remaining balance is charged instead.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::models::{LoanRequest, RepaymentStatus};
    /// use hrms_engine::workflow::ApprovalState;
    /// use rust_decimal::Decimal;
    ///
    /// let loan = LoanRequest {
    ///     id: "loan_1".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     amount_requested: Decimal::new(6000, 0),
    ///     installment_months: 12,
    ///     monthly_installment: Decimal::new(500, 0),
    ///     remaining_balance: Decimal::new(300, 0),
    ///     repayment_status: RepaymentStatus::Active,
    ///     purpose: None,
    ///     approval: ApprovalState::default(),
    /// };
    /// assert_eq!(loan.due_installment(), Decimal::new(300, 0));
    /// ```
    pub fn due_installment(&self) -> Decimal {
        if self.repayment_status != RepaymentStatus::Active {
            return Decimal::ZERO;
        }
        let residue = self.remaining_balance - self.monthly_installment;
        if residue > Decimal::ZERO && residue < Decimal::new(i64::from(self.installment_months), 2) {
            return self.remaining_balance;
        }
        self.monthly_installment
            .min(self.remaining_balance)
            .max(Decimal::ZERO)
    }

    /// Records a deducted installment, completing the loan at zero balance.
    pub fn record_repayment(&mut self, amount: Decimal) {
        self.remaining_balance = (self.remaining_balance - amount).max(Decimal::ZERO);
        if self.remaining_balance.is_zero() {
            self.repayment_status = RepaymentStatus::Completed;
        }
    }
}
