//! Employee self-service submission of leave, loan and travel requests.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{HrmsError, HrmsResult};
use crate::models::{Employee, LeaveRequest, LeaveType, LoanRequest, RepaymentStatus, TravelRequest};
use crate::store::LeaveBalanceQuery;
use crate::workflow::{ApprovalRoute, ApprovalState, RequestKind};

use super::approvals::{ApprovalSubject, notify_approvers};
use super::{AuthContext, HrmsContext, new_id};

/// A new leave request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveSubmission {
    /// Requesting employee.
    pub employee_id: String,
    /// Leave category.
    pub leave_type: LeaveType,
    /// First day off.
    pub start_date: NaiveDate,
    /// Last day off, inclusive.
    pub end_date: NaiveDate,
    /// Optional note for the approvers.
    pub reason: Option<String>,
}

/// A new salary loan request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanSubmission {
    /// Requesting employee.
    pub employee_id: String,
    /// Principal in SAR.
    pub amount_requested: Decimal,
    /// Number of monthly installments.
    pub installment_months: u32,
    /// Optional purpose.
    pub purpose: Option<String>,
}

/// A new business travel request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct TravelSubmission {
    pub employee_id: String,
    pub destination: String,
    pub purpose: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub estimated_cost: Decimal,
}

/// The requester and their manager, after checking the caller may submit
/// on the requester's behalf.
async fn requester(
    ctx: &HrmsContext,
    auth: &AuthContext,
    employee_id: &str,
) -> HrmsResult<(Employee, Option<Employee>)> {
    let employee = ctx.store.employees.require(employee_id).await?;
    if !auth.is_employee(&employee) && !auth.is_admin() {
        return Err(HrmsError::forbidden(
            "requests can only be submitted by the employee or an admin",
        ));
    }
    if !employee.is_active() {
        return Err(HrmsError::validation(format!(
            "employee {} is not active",
            employee.id
        )));
    }
    let manager = ctx.manager_of(&employee).await?;
    Ok((employee, manager))
}

fn initial_state(
    ctx: &HrmsContext,
    kind: RequestKind,
    amount: Decimal,
    manager: Option<&Employee>,
) -> ApprovalState {
    let route = ApprovalRoute::new(kind, amount, ctx.config.approvals());
    ApprovalState::new(route.first_tier(manager.is_some()))
}

async fn announce<T: ApprovalSubject>(
    ctx: &HrmsContext,
    request: &T,
    employee: &Employee,
    manager: Option<&Employee>,
) {
    let tier = request.approval().current_approver_role;
    info!(
        kind = ?T::KIND,
        request_id = %request.id(),
        employee_id = %employee.id,
        first_tier = %tier,
        "Request submitted"
    );
    notify_approvers(ctx, request, employee, manager, tier).await;
}

/// Files a leave request.
///
/// When the employee has a balance for the leave type and year, the days
/// must fit in `remaining` and are reserved as `pending`.
pub async fn submit_leave_request(
    ctx: &HrmsContext,
    auth: &AuthContext,
    submission: LeaveSubmission,
) -> HrmsResult<LeaveRequest> {
    if submission.end_date < submission.start_date {
        return Err(HrmsError::validation("end_date is before start_date"));
    }
    let (employee, manager) = requester(ctx, auth, &submission.employee_id).await?;
    let total_days = Decimal::from((submission.end_date - submission.start_date).num_days() + 1);

    let balance_query = LeaveBalanceQuery::new()
        .employee_id(employee.id.as_str())
        .leave_type(submission.leave_type)
        .year(submission.start_date.year());
    let balance = ctx.store.leave_balances.find_one(&balance_query).await?;
    if let Some(balance) = &balance {
        if total_days > balance.remaining {
            return Err(HrmsError::validation(format!(
                "{} days requested but only {} {} days remain",
                total_days,
                balance.remaining,
                submission.leave_type.as_str()
            )));
        }
    }

    let request = LeaveRequest {
        id: new_id("lr"),
        employee_id: employee.id.clone(),
        leave_type: submission.leave_type,
        start_date: submission.start_date,
        end_date: submission.end_date,
        total_days,
        reason: submission.reason,
        approval: initial_state(ctx, RequestKind::Leave, Decimal::ZERO, manager.as_ref()),
    };
    let request = ctx.store.leave_requests.create(request).await?;

    if let Some(mut balance) = balance {
        balance.reserve(total_days);
        ctx.store.leave_balances.update(balance).await?;
    }

    announce(ctx, &request, &employee, manager.as_ref()).await;
    Ok(request)
}

/// Files a salary loan request. The installment is the amount spread evenly
/// over the months, rounded to 2 decimal places.
pub async fn submit_loan_request(
    ctx: &HrmsContext,
    auth: &AuthContext,
    submission: LoanSubmission,
) -> HrmsResult<LoanRequest> {
    if submission.amount_requested <= Decimal::ZERO {
        return Err(HrmsError::validation("amount_requested must be positive"));
    }
    if submission.installment_months == 0 {
        return Err(HrmsError::validation("installment_months must be at least 1"));
    }
    let (employee, manager) = requester(ctx, auth, &submission.employee_id).await?;

    let monthly_installment = (submission.amount_requested
        / Decimal::from(submission.installment_months))
    .round_dp(2);
    let request = LoanRequest {
        id: new_id("loan"),
        employee_id: employee.id.clone(),
        amount_requested: submission.amount_requested,
        installment_months: submission.installment_months,
        monthly_installment,
        remaining_balance: Decimal::ZERO,
        repayment_status: RepaymentStatus::NotStarted,
        purpose: submission.purpose,
        approval: initial_state(
            ctx,
            RequestKind::Loan,
            submission.amount_requested,
            manager.as_ref(),
        ),
    };
    let request = ctx.store.loan_requests.create(request).await?;

    announce(ctx, &request, &employee, manager.as_ref()).await;
    Ok(request)
}

/// Files a business travel request.
pub async fn submit_travel_request(
    ctx: &HrmsContext,
    auth: &AuthContext,
    submission: TravelSubmission,
) -> HrmsResult<TravelRequest> {
    if submission.return_date < submission.departure_date {
        return Err(HrmsError::validation("return_date is before departure_date"));
    }
    if submission.estimated_cost < Decimal::ZERO {
        return Err(HrmsError::validation("estimated_cost cannot be negative"));
    }
    if submission.destination.trim().is_empty() {
        return Err(HrmsError::validation("destination is required"));
    }
    let (employee, manager) = requester(ctx, auth, &submission.employee_id).await?;

    let request = TravelRequest {
        id: new_id("tr"),
        employee_id: employee.id.clone(),
        destination: submission.destination,
        purpose: submission.purpose,
        departure_date: submission.departure_date,
        return_date: submission.return_date,
        estimated_cost: submission.estimated_cost,
        approval: initial_state(
            ctx,
            RequestKind::Travel,
            submission.estimated_cost,
            manager.as_ref(),
        ),
    };
    let request = ctx.store.travel_requests.create(request).await?;

    announce(ctx, &request, &employee, manager.as_ref()).await;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveBalance;
    use crate::services::testing::{admin, auth, context, staff};
    use crate::test_support::{date, dec, employee};
    use crate::workflow::{ApprovalTier, RequestStatus, TierStatus};

    async fn seeded() -> (HrmsContext, crate::notify::OutboxMailer) {
        let (ctx, outbox) = context().await;
        ctx.store.users.create(admin("hr@example.sa", "HR")).await.unwrap();
        ctx.store.employees.create(employee("emp_001", "Saudi")).await.unwrap();
        let mut report = employee("emp_002", "Saudi");
        report.manager_id = Some("emp_001".to_string());
        ctx.store.employees.create(report).await.unwrap();
        (ctx, outbox)
    }

    fn leave(employee_id: &str, start: NaiveDate, end: NaiveDate) -> LeaveSubmission {
        LeaveSubmission {
            employee_id: employee_id.to_string(),
            leave_type: LeaveType::Annual,
            start_date: start,
            end_date: end,
            reason: Some("Family visit".to_string()),
        }
    }

    fn annual_balance(remaining: &str) -> LeaveBalance {
        let mut balance = LeaveBalance {
            id: "bal_1".to_string(),
            employee_id: "emp_002".to_string(),
            leave_type: LeaveType::Annual,
            year: 2025,
            total_entitled: dec(remaining),
            used: Decimal::ZERO,
            pending: Decimal::ZERO,
            remaining: Decimal::ZERO,
        };
        balance.recompute_remaining();
        balance
    }

    #[tokio::test]
    async fn test_leave_submission_reserves_days_and_notifies_manager() {
        let (ctx, outbox) = seeded().await;
        ctx.store.leave_balances.create(annual_balance("21")).await.unwrap();
        let caller = staff("emp_002@example.sa");

        let request = submit_leave_request(
            &ctx,
            &auth(&caller),
            leave("emp_002", date(2025, 3, 2), date(2025, 3, 6)),
        )
        .await
        .unwrap();

        assert_eq!(request.total_days, dec("5"));
        assert_eq!(request.approval.status, RequestStatus::Pending);
        assert_eq!(request.approval.current_approver_role, ApprovalTier::Manager);
        assert_eq!(request.approval.manager_status, TierStatus::Pending);

        let balance = ctx.store.leave_balances.require("bal_1").await.unwrap();
        assert_eq!(balance.pending, dec("5"));
        assert_eq!(balance.remaining, dec("16"));
        assert_eq!(outbox.sent_to("emp_001@example.sa").await.len(), 1);
    }

    #[tokio::test]
    async fn test_leave_beyond_remaining_balance_is_rejected() {
        let (ctx, _) = seeded().await;
        ctx.store.leave_balances.create(annual_balance("2")).await.unwrap();
        let caller = staff("emp_002@example.sa");

        let result = submit_leave_request(
            &ctx,
            &auth(&caller),
            leave("emp_002", date(2025, 3, 2), date(2025, 3, 6)),
        )
        .await;
        assert!(matches!(result, Err(HrmsError::Validation { .. })));
        assert!(ctx.store.leave_requests.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_leave_dates_must_be_ordered() {
        let (ctx, _) = seeded().await;
        let caller = staff("emp_002@example.sa");
        let result = submit_leave_request(
            &ctx,
            &auth(&caller),
            leave("emp_002", date(2025, 3, 6), date(2025, 3, 2)),
        )
        .await;
        assert!(matches!(result, Err(HrmsError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_only_the_employee_or_an_admin_may_submit() {
        let (ctx, _) = seeded().await;
        let other = staff("emp_001@example.sa");
        let result = submit_leave_request(
            &ctx,
            &auth(&other),
            leave("emp_002", date(2025, 3, 2), date(2025, 3, 3)),
        )
        .await;
        assert!(matches!(result, Err(HrmsError::Forbidden { .. })));

        let hr = admin("hr@example.sa", "HR");
        let request = submit_leave_request(
            &ctx,
            &auth(&hr),
            leave("emp_002", date(2025, 3, 2), date(2025, 3, 3)),
        )
        .await
        .unwrap();
        assert_eq!(request.employee_id, "emp_002");
    }

    #[tokio::test]
    async fn test_employee_without_manager_starts_at_hr() {
        let (ctx, outbox) = seeded().await;
        let caller = staff("emp_001@example.sa");

        let request = submit_loan_request(
            &ctx,
            &auth(&caller),
            LoanSubmission {
                employee_id: "emp_001".to_string(),
                amount_requested: dec("10000"),
                installment_months: 3,
                purpose: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(request.approval.current_approver_role, ApprovalTier::Hr);
        assert_eq!(request.approval.manager_status, TierStatus::NotRequired);
        assert_eq!(request.approval.hr_status, TierStatus::Pending);
        assert_eq!(request.monthly_installment, dec("3333.33"));
        assert_eq!(request.repayment_status, RepaymentStatus::NotStarted);
        assert_eq!(outbox.sent_to("hr@example.sa").await.len(), 1);
    }

    #[tokio::test]
    async fn test_loan_amount_and_months_are_validated() {
        let (ctx, _) = seeded().await;
        let caller = staff("emp_002@example.sa");
        for (amount, months) in [("0", 12), ("5000", 0)] {
            let result = submit_loan_request(
                &ctx,
                &auth(&caller),
                LoanSubmission {
                    employee_id: "emp_002".to_string(),
                    amount_requested: dec(amount),
                    installment_months: months,
                    purpose: None,
                },
            )
            .await;
            assert!(matches!(result, Err(HrmsError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_travel_submission() {
        let (ctx, outbox) = seeded().await;
        let caller = staff("emp_002@example.sa");

        let request = submit_travel_request(
            &ctx,
            &auth(&caller),
            TravelSubmission {
                employee_id: "emp_002".to_string(),
                destination: "Dubai".to_string(),
                purpose: "Conference".to_string(),
                departure_date: date(2025, 4, 1),
                return_date: date(2025, 4, 3),
                estimated_cost: dec("12000"),
            },
        )
        .await
        .unwrap();

        assert_eq!(request.approval.current_approver_role, ApprovalTier::Manager);
        assert_eq!(
            ctx.store.travel_requests.require(&request.id).await.unwrap(),
            request
        );
        assert_eq!(outbox.sent_to("emp_001@example.sa").await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_employee_is_not_found() {
        let (ctx, _) = seeded().await;
        let hr = admin("hr@example.sa", "HR");
        let result = submit_leave_request(
            &ctx,
            &auth(&hr),
            leave("emp_404", date(2025, 3, 2), date(2025, 3, 3)),
        )
        .await;
        assert!(matches!(result, Err(HrmsError::NotFound { .. })));
    }
}
