//! Unpaid leave day counting.

use rust_decimal::Decimal;

use crate::models::{AuditStep, LeaveRequest, LeaveType, PayrollMonth};
use crate::workflow::RequestStatus;

/// Unpaid leave days falling inside a payroll month.
#[derive(Debug, Clone)]
pub struct UnpaidLeaveResult {
    /// Calendar days of approved unpaid leave inside the month.
    pub days: Decimal,
    /// The audit step recording the count.
    pub audit_step: AuditStep,
}

/// Counts the days of approved unpaid leave that overlap `month`.
///
/// Each request contributes the inclusive overlap of its date range with the
/// month, so leave spanning a month boundary is split between both payrolls.
/// Requests of other leave types, or not yet finally approved, are ignored.
pub fn calculate_unpaid_leave_days(
    requests: &[LeaveRequest],
    month: PayrollMonth,
    step_number: u32,
) -> UnpaidLeaveResult {
    let mut days = 0u32;
    let mut counted = Vec::new();

    for request in requests.iter().filter(|r| {
        r.leave_type == LeaveType::Unpaid && r.approval.status == RequestStatus::Approved
    }) {
        let overlap = month.overlap_days(request.start_date, request.end_date);
        if overlap > 0 {
            days += overlap;
            counted.push(serde_json::json!({
                "request_id": request.id,
                "start_date": request.start_date.to_string(),
                "end_date": request.end_date.to_string(),
                "days_in_month": overlap
            }));
        }
    }

    let days = Decimal::from(days);
    let audit_step = AuditStep {
        step_number,
        rule_id: "unpaid_leave".to_string(),
        rule_name: "Unpaid Leave Days".to_string(),
        input: serde_json::json!({
            "month": month.to_string(),
            "approved_unpaid_requests": counted
        }),
        output: serde_json::json!({
            "unpaid_leave_days": days.to_string()
        }),
        reasoning: format!("{days} days of approved unpaid leave fall within {month}"),
    };

    UnpaidLeaveResult { days, audit_step }
}
