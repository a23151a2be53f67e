//! Application services.
//!
//! Each service function takes the shared [`HrmsContext`], the
//! authenticated caller and a typed input, and returns a serializable
//! result. The HTTP layer in [`crate::api`] is a thin shell over these.

mod accrual;
mod approvals;
mod context;
mod onboarding;
mod payroll;
mod qiwa;
mod self_service;
mod sinad;

#[cfg(test)]
pub(crate) mod testing;

use serde::Serialize;

use crate::error::HrmsError;

pub use accrual::{AccrualRun, AccrualRunSummary, SkippedAccrual, process_monthly_accrual};
pub use approvals::{
    ApprovalCommand, ApprovalResult, ApprovalSubject, ReviewedRequest, process_approval,
};
pub use context::{AuthContext, HrmsContext};
pub(crate) use context::new_id;
pub use onboarding::{
    OnboardingAssignment, OnboardingPlan, ReminderRun, ReminderSummary, TaskStatusUpdate,
    assign_onboarding_tasks, send_onboarding_reminders, update_task_status,
};
pub use payroll::{
    PayrollRun, PayrollRunSummary, PayrollTotals, process_monthly_payroll, update_payroll_status,
};
pub use qiwa::{QiwaAction, QiwaCommand, QiwaOutcome, QiwaSyncSummary, qiwa_action};
pub use self_service::{
    LeaveSubmission, LoanSubmission, TravelSubmission, submit_leave_request,
    submit_loan_request, submit_travel_request,
};
pub use sinad::{SinadAction, SinadCommand, sinad_action};

/// One record that failed inside a batch operation.
///
/// Batch runs keep going past individual failures and report them with the
/// summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchError {
    /// The employee or task the failure belongs to.
    pub id: String,
    /// The error message.
    pub message: String,
}

impl BatchError {
    /// Records `error` against `id`.
    pub fn new(id: &str, error: &HrmsError) -> Self {
        Self {
            id: id.to_string(),
            message: error.to_string(),
        }
    }
}
