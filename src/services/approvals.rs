//! Leave, loan and travel approval decisions.
//!
//! The three request kinds share one state machine
//! ([`crate::workflow::ApprovalState`]); this module loads the request,
//! checks the caller against the acting tier, stores the new state and
//! applies the kind-specific effects: leave balances move on final
//! approval or rejection, and an approved loan starts repayment.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::HrmsResult;
use crate::models::{
    Employee, LeaveBalance, LeaveRequest, LoanRequest, RepaymentStatus, TravelRequest,
};
use crate::notify::Email;
use crate::store::{Entity, LeaveBalanceQuery, Repo};
use crate::workflow::{
    ApprovalAction, ApprovalRoute, ApprovalState, ApprovalTier, ApproverCapabilities,
    DecisionInput, RequestKind, RequestStatus, TransitionOutcome,
};

use super::{AuthContext, HrmsContext};

/// A request that moves through the approval workflow.
pub trait ApprovalSubject: Entity + Serialize {
    /// Which workflow the request follows.
    const KIND: RequestKind;

    /// The requesting employee.
    fn employee_id(&self) -> &str;

    /// Current workflow state.
    fn approval(&self) -> &ApprovalState;

    /// Mutable workflow state.
    fn approval_mut(&mut self) -> &mut ApprovalState;

    /// The amount compared against routing thresholds.
    fn routed_amount(&self) -> Decimal {
        Decimal::ZERO
    }

    /// One-line description used in notifications.
    fn describe(&self) -> String;

    /// Applies effects carried on the request itself once a decision is made.
    fn on_decided(&mut self, _outcome: TransitionOutcome) {}
}

impl ApprovalSubject for LeaveRequest {
    const KIND: RequestKind = RequestKind::Leave;

    fn employee_id(&self) -> &str {
        &self.employee_id
    }

    fn approval(&self) -> &ApprovalState {
        &self.approval
    }

    fn approval_mut(&mut self) -> &mut ApprovalState {
        &mut self.approval
    }

    fn describe(&self) -> String {
        format!(
            "{} leave from {} to {} ({} days)",
            self.leave_type.as_str(),
            self.start_date,
            self.end_date,
            self.total_days
        )
    }
}

impl ApprovalSubject for LoanRequest {
    const KIND: RequestKind = RequestKind::Loan;

    fn employee_id(&self) -> &str {
        &self.employee_id
    }

    fn approval(&self) -> &ApprovalState {
        &self.approval
    }

    fn approval_mut(&mut self) -> &mut ApprovalState {
        &mut self.approval
    }

    fn routed_amount(&self) -> Decimal {
        self.amount_requested
    }

    fn describe(&self) -> String {
        format!(
            "loan of {} SAR over {} months",
            self.amount_requested, self.installment_months
        )
    }

    fn on_decided(&mut self, outcome: TransitionOutcome) {
        if outcome == TransitionOutcome::Approved {
            self.repayment_status = RepaymentStatus::Active;
            self.remaining_balance = self.amount_requested;
        }
    }
}

impl ApprovalSubject for TravelRequest {
    const KIND: RequestKind = RequestKind::Travel;

    fn employee_id(&self) -> &str {
        &self.employee_id
    }

    fn approval(&self) -> &ApprovalState {
        &self.approval
    }

    fn approval_mut(&mut self) -> &mut ApprovalState {
        &mut self.approval
    }

    fn routed_amount(&self) -> Decimal {
        self.estimated_cost
    }

    fn describe(&self) -> String {
        format!(
            "travel to {} from {} to {} (estimated {} SAR)",
            self.destination, self.departure_date, self.return_date, self.estimated_cost
        )
    }
}

/// A decision taken by an approver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalCommand {
    /// The request to act on.
    pub request_id: String,
    /// Tier and decision.
    pub action: ApprovalAction,
    /// Required when rejecting.
    pub rejection_reason: Option<String>,
    /// Free-text note kept in the approval history.
    pub comments: Option<String>,
}

/// The request after the decision.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReviewedRequest {
    /// A leave request.
    Leave(LeaveRequest),
    /// A loan request.
    Loan(LoanRequest),
    /// A travel request.
    Travel(TravelRequest),
}

/// The result of [`process_approval`].
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalResult {
    /// Request kind.
    pub kind: RequestKind,
    /// Overall status after the decision.
    pub status: RequestStatus,
    /// Tier now awaiting a decision, `completed` when final.
    pub current_approver_role: ApprovalTier,
    /// The stored request.
    pub request: ReviewedRequest,
    /// The leave balance changed by a final leave decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_balance: Option<LeaveBalance>,
}

/// Applies an approver's decision to a leave, loan or travel request.
///
/// # Errors
///
/// - [`crate::error::HrmsError::NotFound`] for an unknown request or requester.
/// - [`crate::error::HrmsError::Forbidden`] when the caller may not act at the action's
///   tier. Nothing is stored.
/// - [`crate::error::HrmsError::Validation`] when the request is already decided, awaits a
///   different tier, or a rejection has no reason.
pub async fn process_approval(
    ctx: &HrmsContext,
    auth: &AuthContext,
    kind: RequestKind,
    command: ApprovalCommand,
) -> HrmsResult<ApprovalResult> {
    match kind {
        RequestKind::Leave => {
            let (request, outcome) = decide(ctx, auth, &ctx.store.leave_requests, command).await?;
            let leave_balance = settle_leave_balance(ctx, &request, outcome).await?;
            Ok(ApprovalResult {
                kind,
                status: request.approval.status,
                current_approver_role: request.approval.current_approver_role,
                request: ReviewedRequest::Leave(request),
                leave_balance,
            })
        }
        RequestKind::Loan => {
            let (request, _) = decide(ctx, auth, &ctx.store.loan_requests, command).await?;
            Ok(ApprovalResult {
                kind,
                status: request.approval.status,
                current_approver_role: request.approval.current_approver_role,
                request: ReviewedRequest::Loan(request),
                leave_balance: None,
            })
        }
        RequestKind::Travel => {
            let (request, _) = decide(ctx, auth, &ctx.store.travel_requests, command).await?;
            Ok(ApprovalResult {
                kind,
                status: request.approval.status,
                current_approver_role: request.approval.current_approver_role,
                request: ReviewedRequest::Travel(request),
                leave_balance: None,
            })
        }
    }
}

async fn decide<T: ApprovalSubject>(
    ctx: &HrmsContext,
    auth: &AuthContext,
    repo: &Repo<T>,
    command: ApprovalCommand,
) -> HrmsResult<(T, TransitionOutcome)> {
    let mut request = repo.require(&command.request_id).await?;
    let employee = ctx.store.employees.require(request.employee_id()).await?;
    let manager = ctx.manager_of(&employee).await?;

    let capabilities = ApproverCapabilities {
        is_admin: auth.is_admin(),
        manages_requester: manager
            .as_ref()
            .is_some_and(|m| m.email.eq_ignore_ascii_case(auth.email())),
    };
    command.action.tier().authorize(&capabilities)?;

    let route = ApprovalRoute::new(T::KIND, request.routed_amount(), ctx.config.approvals());
    let (state, outcome) = request.approval().decide(
        &route,
        DecisionInput {
            action: command.action,
            actor: auth.email(),
            at: Utc::now(),
            rejection_reason: command.rejection_reason,
            comments: command.comments,
        },
    )?;

    let from = request.approval().current_approver_role;
    *request.approval_mut() = state;
    request.on_decided(outcome);
    let request = repo.update(request).await?;

    info!(
        kind = ?T::KIND,
        request_id = %request.id(),
        from = %from,
        to = %request.approval().current_approver_role,
        status = request.approval().status.as_str(),
        actor = %auth.email(),
        "Approval decision recorded"
    );

    notify_decision(ctx, &request, &employee, manager.as_ref(), outcome).await;
    Ok((request, outcome))
}

async fn settle_leave_balance(
    ctx: &HrmsContext,
    request: &LeaveRequest,
    outcome: TransitionOutcome,
) -> HrmsResult<Option<LeaveBalance>> {
    if !outcome.is_final() {
        return Ok(None);
    }

    let query = LeaveBalanceQuery::new()
        .employee_id(request.employee_id.as_str())
        .leave_type(request.leave_type)
        .year(request.start_date.year());
    let Some(mut balance) = ctx.store.leave_balances.find_one(&query).await? else {
        debug!(
            request_id = %request.id,
            leave_type = request.leave_type.as_str(),
            "No leave balance to update"
        );
        return Ok(None);
    };

    match outcome {
        TransitionOutcome::Approved => balance.consume(request.total_days),
        TransitionOutcome::Rejected => balance.release(request.total_days),
        TransitionOutcome::Advanced(_) => {}
    }
    Ok(Some(ctx.store.leave_balances.update(balance).await?))
}

/// Addresses of whoever decides at `tier` for `employee`'s requests.
pub(crate) async fn approver_emails(
    ctx: &HrmsContext,
    tier: ApprovalTier,
    manager: Option<&Employee>,
) -> Vec<String> {
    match tier {
        ApprovalTier::Manager => manager.map(|m| vec![m.email.clone()]).unwrap_or_default(),
        ApprovalTier::Completed => Vec::new(),
        _ => match ctx.admins().await {
            Ok(admins) => admins.into_iter().map(|a| a.email).collect(),
            Err(error) => {
                warn!(error = %error, "Could not load admins for notification");
                Vec::new()
            }
        },
    }
}

/// E-mails the approvers of `tier` that `request` awaits them.
pub(crate) async fn notify_approvers<T: ApprovalSubject>(
    ctx: &HrmsContext,
    request: &T,
    employee: &Employee,
    manager: Option<&Employee>,
    tier: ApprovalTier,
) {
    let subject = format!("{} awaiting {} approval", T::KIND.label(), tier);
    let body = format!(
        "{} submitted a {}.\nRequest id: {}",
        employee.full_name,
        request.describe(),
        request.id()
    );
    for to in approver_emails(ctx, tier, manager).await {
        ctx.notify(Email::new(to, subject.clone(), body.clone())).await;
    }
}

async fn notify_decision<T: ApprovalSubject>(
    ctx: &HrmsContext,
    request: &T,
    employee: &Employee,
    manager: Option<&Employee>,
    outcome: TransitionOutcome,
) {
    match outcome {
        TransitionOutcome::Advanced(next) => {
            notify_approvers(ctx, request, employee, manager, next).await;
        }
        TransitionOutcome::Approved => {
            let subject = format!("{} approved", T::KIND.label());
            let body = format!("Your {} has been approved.", request.describe());
            ctx.notify(Email::new(employee.email.clone(), subject, body)).await;
        }
        TransitionOutcome::Rejected => {
            let subject = format!("{} rejected", T::KIND.label());
            let reason = request
                .approval()
                .rejection_reason
                .clone()
                .unwrap_or_default();
            let body = format!("Your {} was rejected.\nReason: {reason}", request.describe());
            ctx.notify(Email::new(employee.email.clone(), subject, body)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HrmsError;
    use crate::models::{LeaveType, User};
    use crate::notify::OutboxMailer;
    use crate::services::testing::{admin, auth, context, staff};
    use crate::test_support::{date, dec, employee, leave_request, loan};
    use crate::workflow::TierStatus;

    struct Fixture {
        ctx: HrmsContext,
        outbox: OutboxMailer,
        manager: User,
        hr: User,
        requester: User,
    }

    /// emp_002 reports to emp_001.
    async fn fixture() -> Fixture {
        let (ctx, outbox) = context().await;
        let hr = admin("hr@example.sa", "HR");
        ctx.store.users.create(hr.clone()).await.unwrap();
        ctx.store.employees.create(employee("emp_001", "Saudi")).await.unwrap();
        let mut report = employee("emp_002", "Saudi");
        report.manager_id = Some("emp_001".to_string());
        ctx.store.employees.create(report).await.unwrap();

        Fixture {
            ctx,
            outbox,
            manager: staff("emp_001@example.sa"),
            hr,
            requester: staff("emp_002@example.sa"),
        }
    }

    fn command(id: &str, action: ApprovalAction) -> ApprovalCommand {
        ApprovalCommand {
            request_id: id.to_string(),
            action,
            rejection_reason: None,
            comments: None,
        }
    }

    fn travel(id: &str, cost: &str) -> TravelRequest {
        TravelRequest {
            id: id.to_string(),
            employee_id: "emp_002".to_string(),
            destination: "Jeddah".to_string(),
            purpose: "Client visit".to_string(),
            departure_date: date(2025, 3, 10),
            return_date: date(2025, 3, 12),
            estimated_cost: dec(cost),
            approval: ApprovalState::new(ApprovalTier::Manager),
        }
    }

    #[tokio::test]
    async fn test_loan_above_hr_threshold_routes_to_hr_then_finalizes() {
        let f = fixture().await;
        f.ctx.store.loan_requests.create(loan("loan_1", "emp_002", "6000", 12)).await.unwrap();

        let first = process_approval(
            &f.ctx,
            &auth(&f.manager),
            RequestKind::Loan,
            command("loan_1", ApprovalAction::ManagerApprove),
        )
        .await
        .unwrap();
        assert_eq!(first.status, RequestStatus::Pending);
        assert_eq!(first.current_approver_role, ApprovalTier::Hr);
        assert_eq!(f.outbox.sent_to("hr@example.sa").await.len(), 1);

        let second = process_approval(
            &f.ctx,
            &auth(&f.hr),
            RequestKind::Loan,
            command("loan_1", ApprovalAction::HrApprove),
        )
        .await
        .unwrap();
        assert_eq!(second.status, RequestStatus::Approved);
        assert_eq!(second.current_approver_role, ApprovalTier::Completed);

        let stored = f.ctx.store.loan_requests.require("loan_1").await.unwrap();
        assert_eq!(stored.approval.manager_status, TierStatus::Approved);
        assert_eq!(stored.approval.hr_status, TierStatus::Approved);
        assert_eq!(stored.approval.senior_management_status, TierStatus::NotRequired);
        assert_eq!(stored.repayment_status, RepaymentStatus::Active);
        assert_eq!(stored.remaining_balance, dec("6000"));
        assert_eq!(stored.approval.approval_history.len(), 2);
        assert_eq!(f.outbox.sent_to("emp_002@example.sa").await.len(), 1);
    }

    #[tokio::test]
    async fn test_small_loan_is_final_after_manager() {
        let f = fixture().await;
        f.ctx.store.loan_requests.create(loan("loan_1", "emp_002", "4000", 4)).await.unwrap();

        let result = process_approval(
            &f.ctx,
            &auth(&f.manager),
            RequestKind::Loan,
            command("loan_1", ApprovalAction::ManagerApprove),
        )
        .await
        .unwrap();
        assert_eq!(result.status, RequestStatus::Approved);
        assert!(f.outbox.sent_to("hr@example.sa").await.is_empty());
    }

    #[tokio::test]
    async fn test_large_loan_needs_senior_management() {
        let f = fixture().await;
        f.ctx.store.loan_requests.create(loan("loan_1", "emp_002", "20000", 20)).await.unwrap();

        for (caller, action) in [
            (&f.manager, ApprovalAction::ManagerApprove),
            (&f.hr, ApprovalAction::HrApprove),
        ] {
            process_approval(&f.ctx, &auth(caller), RequestKind::Loan, command("loan_1", action))
                .await
                .unwrap();
        }
        let stored = f.ctx.store.loan_requests.require("loan_1").await.unwrap();
        assert_eq!(stored.approval.current_approver_role, ApprovalTier::SeniorManagement);
        assert_eq!(stored.approval.senior_management_status, TierStatus::Pending);
        assert_eq!(stored.repayment_status, RepaymentStatus::NotStarted);

        let result = process_approval(
            &f.ctx,
            &auth(&f.hr),
            RequestKind::Loan,
            command("loan_1", ApprovalAction::SeniorManagementApprove),
        )
        .await
        .unwrap();
        assert_eq!(result.status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn test_expensive_travel_needs_finance() {
        let f = fixture().await;
        f.ctx.store.travel_requests.create(travel("tr_1", "12000")).await.unwrap();

        for (caller, action) in [
            (&f.manager, ApprovalAction::ManagerApprove),
            (&f.hr, ApprovalAction::HrApprove),
        ] {
            let result = process_approval(
                &f.ctx,
                &auth(caller),
                RequestKind::Travel,
                command("tr_1", action),
            )
            .await
            .unwrap();
            assert_eq!(result.status, RequestStatus::Pending);
        }

        let result = process_approval(
            &f.ctx,
            &auth(&f.hr),
            RequestKind::Travel,
            command("tr_1", ApprovalAction::FinanceApprove),
        )
        .await
        .unwrap();
        assert_eq!(result.status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn test_final_leave_approval_consumes_reserved_days() {
        let f = fixture().await;
        let request = leave_request(
            "lr_1",
            "emp_002",
            LeaveType::Annual,
            date(2025, 3, 2),
            date(2025, 3, 4),
        );
        f.ctx.store.leave_requests.create(request).await.unwrap();
        let mut balance = LeaveBalance {
            id: "bal_1".to_string(),
            employee_id: "emp_002".to_string(),
            leave_type: LeaveType::Annual,
            year: 2025,
            total_entitled: dec("21"),
            used: Decimal::ZERO,
            pending: Decimal::ZERO,
            remaining: Decimal::ZERO,
        };
        balance.reserve(dec("3"));
        f.ctx.store.leave_balances.create(balance).await.unwrap();

        let first = process_approval(
            &f.ctx,
            &auth(&f.manager),
            RequestKind::Leave,
            command("lr_1", ApprovalAction::ManagerApprove),
        )
        .await
        .unwrap();
        assert!(first.leave_balance.is_none());

        let result = process_approval(
            &f.ctx,
            &auth(&f.hr),
            RequestKind::Leave,
            command("lr_1", ApprovalAction::HrApprove),
        )
        .await
        .unwrap();

        let balance = result.leave_balance.unwrap();
        assert_eq!(balance.used, dec("3"));
        assert_eq!(balance.pending, Decimal::ZERO);
        assert_eq!(balance.remaining, dec("18"));
    }

    #[tokio::test]
    async fn test_rejection_requires_reason_and_releases_days() {
        let f = fixture().await;
        let request = leave_request(
            "lr_1",
            "emp_002",
            LeaveType::Annual,
            date(2025, 3, 2),
            date(2025, 3, 6),
        );
        f.ctx.store.leave_requests.create(request).await.unwrap();
        let mut balance = LeaveBalance {
            id: "bal_1".to_string(),
            employee_id: "emp_002".to_string(),
            leave_type: LeaveType::Annual,
            year: 2025,
            total_entitled: dec("21"),
            used: Decimal::ZERO,
            pending: Decimal::ZERO,
            remaining: Decimal::ZERO,
        };
        balance.reserve(dec("5"));
        f.ctx.store.leave_balances.create(balance).await.unwrap();

        let missing = process_approval(
            &f.ctx,
            &auth(&f.manager),
            RequestKind::Leave,
            command("lr_1", ApprovalAction::ManagerReject),
        )
        .await;
        assert!(matches!(missing, Err(HrmsError::Validation { .. })));

        let mut reject = command("lr_1", ApprovalAction::ManagerReject);
        reject.rejection_reason = Some("Project deadline".to_string());
        let result = process_approval(&f.ctx, &auth(&f.manager), RequestKind::Leave, reject)
            .await
            .unwrap();

        assert_eq!(result.status, RequestStatus::Rejected);
        assert_eq!(result.current_approver_role, ApprovalTier::Completed);
        let balance = result.leave_balance.unwrap();
        assert_eq!(balance.pending, Decimal::ZERO);
        assert_eq!(balance.remaining, dec("21"));

        let emails = f.outbox.sent_to("emp_002@example.sa").await;
        assert_eq!(emails.len(), 1);
        assert!(emails[0].body.contains("Project deadline"));
    }

    #[tokio::test]
    async fn test_only_the_requesters_manager_acts_at_manager_tier() {
        let f = fixture().await;
        f.ctx.store.loan_requests.create(loan("loan_1", "emp_002", "6000", 12)).await.unwrap();

        for caller in [&f.requester, &f.hr] {
            let result = process_approval(
                &f.ctx,
                &auth(caller),
                RequestKind::Loan,
                command("loan_1", ApprovalAction::ManagerApprove),
            )
            .await;
            assert!(matches!(result, Err(HrmsError::Forbidden { .. })));
        }

        let stored = f.ctx.store.loan_requests.require("loan_1").await.unwrap();
        assert_eq!(stored.approval.manager_status, TierStatus::Pending);
        assert!(stored.approval.approval_history.is_empty());
        assert!(f.outbox.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_admin_cannot_act_at_hr_tier() {
        let f = fixture().await;
        f.ctx.store.loan_requests.create(loan("loan_1", "emp_002", "6000", 12)).await.unwrap();
        process_approval(
            &f.ctx,
            &auth(&f.manager),
            RequestKind::Loan,
            command("loan_1", ApprovalAction::ManagerApprove),
        )
        .await
        .unwrap();

        let result = process_approval(
            &f.ctx,
            &auth(&f.manager),
            RequestKind::Loan,
            command("loan_1", ApprovalAction::HrApprove),
        )
        .await;
        assert!(matches!(result, Err(HrmsError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_wrong_tier_and_terminal_requests_are_rejected() {
        let f = fixture().await;
        f.ctx.store.loan_requests.create(loan("loan_1", "emp_002", "4000", 4)).await.unwrap();

        let early = process_approval(
            &f.ctx,
            &auth(&f.hr),
            RequestKind::Loan,
            command("loan_1", ApprovalAction::HrApprove),
        )
        .await;
        assert!(matches!(early, Err(HrmsError::Validation { .. })));

        process_approval(
            &f.ctx,
            &auth(&f.manager),
            RequestKind::Loan,
            command("loan_1", ApprovalAction::ManagerApprove),
        )
        .await
        .unwrap();
        let before = f.ctx.store.loan_requests.require("loan_1").await.unwrap();

        let again = process_approval(
            &f.ctx,
            &auth(&f.manager),
            RequestKind::Loan,
            command("loan_1", ApprovalAction::ManagerApprove),
        )
        .await;
        assert!(matches!(again, Err(HrmsError::Validation { .. })));
        assert_eq!(f.ctx.store.loan_requests.require("loan_1").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_request_is_not_found() {
        let f = fixture().await;
        let result = process_approval(
            &f.ctx,
            &auth(&f.hr),
            RequestKind::Travel,
            command("tr_404", ApprovalAction::HrApprove),
        )
        .await;
        assert!(matches!(
            result,
            Err(HrmsError::NotFound { entity: "TravelRequest", .. })
        ));
    }
}
