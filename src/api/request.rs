//! Request types for the HRMS API.
//!
//! Each endpoint takes a JSON body defined here and converts it into the
//! input of the matching service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{LeaveType, PayrollMonth, PayrollStatus, TaskStatus};
use crate::services::{
    AccrualRun, ApprovalCommand, LeaveSubmission, LoanSubmission, OnboardingAssignment,
    PayrollRun, QiwaAction, QiwaCommand, ReminderRun, SinadAction, SinadCommand,
    TaskStatusUpdate, TravelSubmission,
};
use crate::workflow::ApprovalAction;

/// Body of `POST /payroll/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollProcessRequest {
    /// Month to pay, `YYYY-MM`.
    pub month: PayrollMonth,
    /// Restrict the run to these employees.
    #[serde(default)]
    pub employee_ids: Option<Vec<String>>,
}

impl From<PayrollProcessRequest> for PayrollRun {
    fn from(req: PayrollProcessRequest) -> Self {
        PayrollRun {
            month: req.month,
            employee_ids: req.employee_ids,
        }
    }
}

/// Body of `POST /payroll/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollStatusRequest {
    /// Payroll record to move.
    pub payroll_id: String,
    /// Target status.
    pub status: PayrollStatus,
}

/// Body of `POST /approvals/{leave,loan,travel}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// The request to act on.
    pub request_id: String,
    /// Tier and decision, e.g. `manager_approve`.
    pub action: ApprovalAction,
    /// Required when rejecting.
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Optional approver note.
    #[serde(default)]
    pub comments: Option<String>,
}

impl From<ApprovalRequest> for ApprovalCommand {
    fn from(req: ApprovalRequest) -> Self {
        ApprovalCommand {
            request_id: req.request_id,
            action: req.action,
            rejection_reason: req.rejection_reason,
            comments: req.comments,
        }
    }
}

/// Body of `POST /requests/leave`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveSubmissionRequest {
    /// Requesting employee.
    pub employee_id: String,
    /// Leave category.
    pub leave_type: LeaveType,
    /// First day off.
    pub start_date: NaiveDate,
    /// Last day off, inclusive.
    pub end_date: NaiveDate,
    /// Optional note.
    #[serde(default)]
    pub reason: Option<String>,
}

impl From<LeaveSubmissionRequest> for LeaveSubmission {
    fn from(req: LeaveSubmissionRequest) -> Self {
        LeaveSubmission {
            employee_id: req.employee_id,
            leave_type: req.leave_type,
            start_date: req.start_date,
            end_date: req.end_date,
            reason: req.reason,
        }
    }
}

/// Body of `POST /requests/loan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSubmissionRequest {
    /// Requesting employee.
    pub employee_id: String,
    /// Principal in SAR.
    pub amount_requested: Decimal,
    /// Number of monthly installments.
    pub installment_months: u32,
    /// Optional purpose.
    #[serde(default)]
    pub purpose: Option<String>,
}

impl From<LoanSubmissionRequest> for LoanSubmission {
    fn from(req: LoanSubmissionRequest) -> Self {
        LoanSubmission {
            employee_id: req.employee_id,
            amount_requested: req.amount_requested,
            installment_months: req.installment_months,
            purpose: req.purpose,
        }
    }
}

/// Body of `POST /requests/travel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelSubmissionRequest {
    /// Requesting employee.
    pub employee_id: String,
    /// Destination city.
    pub destination: String,
    /// Business purpose.
    pub purpose: String,
    /// Outbound date.
    pub departure_date: NaiveDate,
    /// Return date.
    pub return_date: NaiveDate,
    /// Estimated cost in SAR.
    pub estimated_cost: Decimal,
}

impl From<TravelSubmissionRequest> for TravelSubmission {
    fn from(req: TravelSubmissionRequest) -> Self {
        TravelSubmission {
            employee_id: req.employee_id,
            destination: req.destination,
            purpose: req.purpose,
            departure_date: req.departure_date,
            return_date: req.return_date,
            estimated_cost: req.estimated_cost,
        }
    }
}

/// Body of `POST /leave-accrual/process`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccrualRequest {
    /// Period to credit, `YYYY-MM`. Defaults to the current month.
    #[serde(default)]
    pub accrual_period: Option<PayrollMonth>,
    /// Run again for a period that already has records.
    #[serde(default)]
    pub force_reprocess: bool,
}

impl From<AccrualRequest> for AccrualRun {
    fn from(req: AccrualRequest) -> Self {
        AccrualRun {
            accrual_period: req.accrual_period,
            force_reprocess: req.force_reprocess,
        }
    }
}

/// Body of `POST /onboarding/assign`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingAssignRequest {
    /// The new hire.
    pub employee_id: String,
    /// Day zero of the checklist. Defaults to the hire date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Checklist to use.
    #[serde(default)]
    pub checklist_id: Option<String>,
}

impl From<OnboardingAssignRequest> for OnboardingAssignment {
    fn from(req: OnboardingAssignRequest) -> Self {
        OnboardingAssignment {
            employee_id: req.employee_id,
            start_date: req.start_date,
            checklist_id: req.checklist_id,
        }
    }
}

/// Body of `POST /onboarding/tasks/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusRequest {
    /// Task to update.
    pub task_id: String,
    /// Requested status.
    pub status: TaskStatus,
}

impl From<TaskStatusRequest> for TaskStatusUpdate {
    fn from(req: TaskStatusRequest) -> Self {
        TaskStatusUpdate {
            task_id: req.task_id,
            status: req.status,
        }
    }
}

/// Body of `POST /onboarding/reminders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderRequest {
    /// Sweep date. Defaults to today.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl From<ReminderRequest> for ReminderRun {
    fn from(req: ReminderRequest) -> Self {
        ReminderRun { today: req.today }
    }
}

/// Body of `POST /integrations/qiwa`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QiwaRequest {
    /// Operation to run.
    pub action: QiwaAction,
    /// Target employee for single-employee actions.
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl From<QiwaRequest> for QiwaCommand {
    fn from(req: QiwaRequest) -> Self {
        QiwaCommand {
            action: req.action,
            employee_id: req.employee_id,
        }
    }
}

/// Body of `POST /integrations/sinad`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinadRequest {
    /// Operation to run.
    pub action: SinadAction,
    /// Month for `generate_wage_file`.
    #[serde(default)]
    pub month: Option<PayrollMonth>,
    /// Wage file record for the other actions.
    #[serde(default)]
    pub record_id: Option<String>,
}

impl From<SinadRequest> for SinadCommand {
    fn from(req: SinadRequest) -> Self {
        SinadCommand {
            action: req.action,
            month: req.month,
            record_id: req.record_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payroll_request_parses_month() {
        let req: PayrollProcessRequest = serde_json::from_str(r#"{"month": "2025-01"}"#).unwrap();
        let run: PayrollRun = req.into();
        assert_eq!(run.month, PayrollMonth::new(2025, 1).unwrap());
        assert!(run.employee_ids.is_none());
    }

    #[test]
    fn test_payroll_request_rejects_bad_month() {
        let result = serde_json::from_str::<PayrollProcessRequest>(r#"{"month": "2025-13"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_approval_request_optional_fields_default() {
        let req: ApprovalRequest =
            serde_json::from_str(r#"{"request_id": "lr_1", "action": "hr_reject"}"#).unwrap();
        let command: ApprovalCommand = req.into();
        assert_eq!(command.action, ApprovalAction::HrReject);
        assert!(command.rejection_reason.is_none());
    }

    #[test]
    fn test_accrual_request_accepts_empty_body() {
        let req: AccrualRequest = serde_json::from_str("{}").unwrap();
        let run: AccrualRun = req.into();
        assert_eq!(run, AccrualRun::default());
    }

    #[test]
    fn test_loan_request_accepts_string_amounts() {
        let req: LoanSubmissionRequest = serde_json::from_str(
            r#"{"employee_id": "emp_001", "amount_requested": "6000", "installment_months": 12}"#,
        )
        .unwrap();
        assert_eq!(req.amount_requested, Decimal::new(6000, 0));
    }
}
