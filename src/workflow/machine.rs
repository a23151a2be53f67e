//! The approval state carried by every request and its transition function.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HrmsError, HrmsResult};

use super::{ApprovalAction, ApprovalRoute, ApprovalTier, Decision, RequestStatus, TierStatus};

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalEntry {
    /// The tier the decision was taken at.
    pub tier: ApprovalTier,
    /// Approve or reject.
    pub decision: Decision,
    /// E-mail of the approver.
    pub actor: String,
    /// When the decision was recorded.
    pub decided_at: DateTime<Utc>,
    /// Optional approver comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Per-tier statuses plus the cursor naming the tier that acts next.
///
/// Flattened into leave, loan and travel requests so all three expose the
/// same fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalState {
    /// Overall request status.
    pub status: RequestStatus,
    /// The next unresolved tier, or `completed`.
    pub current_approver_role: ApprovalTier,
    /// Manager tier status.
    #[serde(default)]
    pub manager_status: TierStatus,
    /// HR tier status.
    #[serde(default)]
    pub hr_status: TierStatus,
    /// Senior management tier status.
    #[serde(default)]
    pub senior_management_status: TierStatus,
    /// Finance tier status.
    #[serde(default)]
    pub finance_status: TierStatus,
    /// Reason given by the rejecting tier.
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Every decision taken, oldest first.
    #[serde(default)]
    pub approval_history: Vec<ApprovalEntry>,
}

/// What a successful transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The tier approved and the cursor moved to the given tier.
    Advanced(ApprovalTier),
    /// The final tier approved.
    Approved,
    /// A tier rejected the request.
    Rejected,
}

impl TransitionOutcome {
    /// Returns true when the request reached a terminal status.
    pub fn is_final(&self) -> bool {
        !matches!(self, TransitionOutcome::Advanced(_))
    }
}

/// The inputs to a single decision.
#[derive(Debug, Clone)]
pub struct DecisionInput<'a> {
    /// The requested action.
    pub action: ApprovalAction,
    /// E-mail of the caller.
    pub actor: &'a str,
    /// Decision timestamp.
    pub at: DateTime<Utc>,
    /// Required for rejections.
    pub rejection_reason: Option<String>,
    /// Optional approver comments.
    pub comments: Option<String>,
}

impl ApprovalState {
    /// Creates the state of a freshly submitted request whose first tier is
    /// `first_tier`.
    pub fn new(first_tier: ApprovalTier) -> Self {
        let mut state = ApprovalState {
            current_approver_role: first_tier,
            ..ApprovalState::default()
        };
        if let Some(status) = state.tier_status_mut(first_tier) {
            *status = TierStatus::Pending;
        }
        state
    }

    /// The status field of a tier.
    pub fn tier_status(&self, tier: ApprovalTier) -> TierStatus {
        match tier {
            ApprovalTier::Manager => self.manager_status,
            ApprovalTier::Hr => self.hr_status,
            ApprovalTier::SeniorManagement => self.senior_management_status,
            ApprovalTier::Finance => self.finance_status,
            ApprovalTier::Completed => TierStatus::NotRequired,
        }
    }

    fn tier_status_mut(&mut self, tier: ApprovalTier) -> Option<&mut TierStatus> {
        match tier {
            ApprovalTier::Manager => Some(&mut self.manager_status),
            ApprovalTier::Hr => Some(&mut self.hr_status),
            ApprovalTier::SeniorManagement => Some(&mut self.senior_management_status),
            ApprovalTier::Finance => Some(&mut self.finance_status),
            ApprovalTier::Completed => None,
        }
    }

    /// Applies a decision and returns the resulting state.
    ///
    /// `self` is left untouched, so a failed check never mutates the request.
    ///
    /// # Errors
    ///
    /// - [`HrmsError::Validation`] if the request is already approved or
    ///   rejected, if the action's tier is not the current tier, or if a
    ///   rejection has no reason.
    pub fn decide(
        &self,
        route: &ApprovalRoute,
        input: DecisionInput<'_>,
    ) -> HrmsResult<(ApprovalState, TransitionOutcome)> {
        if self.status.is_terminal() {
            return Err(HrmsError::validation(format!(
                "request is already {}",
                self.status.as_str()
            )));
        }

        let tier = input.action.tier();
        if tier != self.current_approver_role {
            return Err(HrmsError::validation(format!(
                "request is awaiting {} approval, not {}",
                self.current_approver_role, tier
            )));
        }

        let mut next = self.clone();
        let outcome = match input.action.decision() {
            Decision::Approve => {
                if let Some(status) = next.tier_status_mut(tier) {
                    *status = TierStatus::Approved;
                }
                match route.next_after(tier) {
                    ApprovalTier::Completed => {
                        next.status = RequestStatus::Approved;
                        next.current_approver_role = ApprovalTier::Completed;
                        TransitionOutcome::Approved
                    }
                    following => {
                        if let Some(status) = next.tier_status_mut(following) {
                            *status = TierStatus::Pending;
                        }
                        next.current_approver_role = following;
                        TransitionOutcome::Advanced(following)
                    }
                }
            }
            Decision::Reject => {
                let reason = input
                    .rejection_reason
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| HrmsError::validation("rejection_reason is required"))?;
                if let Some(status) = next.tier_status_mut(tier) {
                    *status = TierStatus::Rejected;
                }
                next.status = RequestStatus::Rejected;
                next.current_approver_role = ApprovalTier::Completed;
                next.rejection_reason = Some(reason.to_string());
                TransitionOutcome::Rejected
            }
        };

        next.approval_history.push(ApprovalEntry {
            tier,
            decision: input.action.decision(),
            actor: input.actor.to_string(),
            decided_at: input.at,
            comments: input.comments,
        });

        Ok((next, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApprovalThresholds;
    use crate::workflow::RequestKind;
    use rust_decimal::Decimal;

    fn route(kind: RequestKind, amount: i64) -> ApprovalRoute {
        let thresholds = ApprovalThresholds {
            loan_hr_threshold: Decimal::new(5000, 0),
            loan_senior_management_threshold: Decimal::new(15000, 0),
            travel_finance_threshold: Decimal::new(10000, 0),
        };
        ApprovalRoute::new(kind, Decimal::new(amount, 0), &thresholds)
    }

    fn input(action: ApprovalAction) -> DecisionInput<'static> {
        DecisionInput {
            action,
            actor: "approver@example.sa",
            at: Utc::now(),
            rejection_reason: None,
            comments: None,
        }
    }

    fn reject(action: ApprovalAction, reason: &str) -> DecisionInput<'static> {
        DecisionInput {
            rejection_reason: Some(reason.to_string()),
            ..input(action)
        }
    }

    #[test]
    fn test_new_state_marks_first_tier_pending() {
        let state = ApprovalState::new(ApprovalTier::Manager);
        assert_eq!(state.status, RequestStatus::Pending);
        assert_eq!(state.current_approver_role, ApprovalTier::Manager);
        assert_eq!(state.manager_status, TierStatus::Pending);
        assert_eq!(state.hr_status, TierStatus::NotRequired);
    }

    #[test]
    fn test_loan_6000_manager_then_hr_approves() {
        let route = route(RequestKind::Loan, 6000);
        let state = ApprovalState::new(ApprovalTier::Manager);

        let (state, outcome) = state
            .decide(&route, input(ApprovalAction::ManagerApprove))
            .unwrap();
        assert_eq!(outcome, TransitionOutcome::Advanced(ApprovalTier::Hr));
        assert_eq!(state.manager_status, TierStatus::Approved);
        assert_eq!(state.hr_status, TierStatus::Pending);
        assert_eq!(state.current_approver_role, ApprovalTier::Hr);

        let (state, outcome) = state
            .decide(&route, input(ApprovalAction::HrApprove))
            .unwrap();
        assert_eq!(outcome, TransitionOutcome::Approved);
        assert_eq!(state.status, RequestStatus::Approved);
        assert_eq!(state.current_approver_role, ApprovalTier::Completed);
        assert_eq!(state.senior_management_status, TierStatus::NotRequired);
        assert_eq!(state.approval_history.len(), 2);
    }

    #[test]
    fn test_wrong_tier_is_rejected_without_mutation() {
        let route = route(RequestKind::Leave, 0);
        let state = ApprovalState::new(ApprovalTier::Manager);
        let result = state.decide(&route, input(ApprovalAction::HrApprove));
        assert!(matches!(result, Err(HrmsError::Validation { .. })));
        assert_eq!(state, ApprovalState::new(ApprovalTier::Manager));
    }

    #[test]
    fn test_rejection_is_terminal() {
        let route = route(RequestKind::Travel, 12000);
        let state = ApprovalState::new(ApprovalTier::Manager);
        let (state, outcome) = state
            .decide(&route, reject(ApprovalAction::ManagerReject, "Budget freeze"))
            .unwrap();

        assert_eq!(outcome, TransitionOutcome::Rejected);
        assert_eq!(state.status, RequestStatus::Rejected);
        assert_eq!(state.current_approver_role, ApprovalTier::Completed);
        assert_eq!(state.rejection_reason.as_deref(), Some("Budget freeze"));

        let again = state.decide(&route, input(ApprovalAction::ManagerApprove));
        assert!(matches!(again, Err(HrmsError::Validation { .. })));
    }

    #[test]
    fn test_rejection_requires_reason() {
        let route = route(RequestKind::Leave, 0);
        let state = ApprovalState::new(ApprovalTier::Manager);
        let result = state.decide(&route, reject(ApprovalAction::ManagerReject, "   "));
        assert!(matches!(result, Err(HrmsError::Validation { .. })));
    }

    #[test]
    fn test_approved_request_accepts_no_further_action() {
        let route = route(RequestKind::Loan, 1000);
        let state = ApprovalState::new(ApprovalTier::Manager);
        let (state, outcome) = state
            .decide(&route, input(ApprovalAction::ManagerApprove))
            .unwrap();
        assert_eq!(outcome, TransitionOutcome::Approved);

        for action in [
            ApprovalAction::ManagerApprove,
            ApprovalAction::HrApprove,
            ApprovalAction::FinanceReject,
        ] {
            assert!(state.decide(&route, reject(action, "late")).is_err());
        }
    }

    #[test]
    fn test_cursor_only_moves_forward_through_large_loan() {
        let route = route(RequestKind::Loan, 20000);
        let mut state = ApprovalState::new(ApprovalTier::Manager);
        let mut last_rank = state.current_approver_role.rank();

        for action in [
            ApprovalAction::ManagerApprove,
            ApprovalAction::HrApprove,
            ApprovalAction::SeniorManagementApprove,
        ] {
            let (next, _) = state.decide(&route, input(action)).unwrap();
            assert!(next.current_approver_role.rank() > last_rank);
            last_rank = next.current_approver_role.rank();
            state = next;
        }
        assert_eq!(state.status, RequestStatus::Approved);
        assert_eq!(state.senior_management_status, TierStatus::Approved);
    }

    #[test]
    fn test_state_serializes_flat_fields() {
        let state = ApprovalState::new(ApprovalTier::Hr);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["current_approver_role"], "hr");
        assert_eq!(json["hr_status"], "pending");
        assert_eq!(json["manager_status"], "not_required");
        assert_eq!(json["status"], "pending");
    }
}
