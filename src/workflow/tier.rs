//! Approval tiers, statuses and actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HrmsError, HrmsResult};

/// One stage of a sequential sign-off, or `Completed` once none remain.
///
/// Tiers are ordered: the cursor of a request only ever moves to a tier with
/// a strictly higher [`rank`](ApprovalTier::rank).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalTier {
    /// The requester's direct manager.
    #[default]
    Manager,
    /// HR administration.
    Hr,
    /// Senior management (large loans).
    SeniorManagement,
    /// Finance (expensive travel).
    Finance,
    /// No tier left to act.
    Completed,
}

impl ApprovalTier {
    /// Position of the tier in the sign-off order.
    pub fn rank(&self) -> u8 {
        match self {
            ApprovalTier::Manager => 0,
            ApprovalTier::Hr => 1,
            ApprovalTier::SeniorManagement | ApprovalTier::Finance => 2,
            ApprovalTier::Completed => 3,
        }
    }

    /// The wire name of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalTier::Manager => "manager",
            ApprovalTier::Hr => "hr",
            ApprovalTier::SeniorManagement => "senior_management",
            ApprovalTier::Finance => "finance",
            ApprovalTier::Completed => "completed",
        }
    }

    /// Checks that a caller holding `capabilities` may act at this tier.
    ///
    /// The manager tier is reserved for the requester's own manager; holding
    /// the admin role does not substitute for it. Every later tier requires
    /// the admin role.
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::workflow::{ApprovalTier, ApproverCapabilities};
    ///
    /// let admin = ApproverCapabilities { is_admin: true, manages_requester: false };
    /// assert!(ApprovalTier::Hr.authorize(&admin).is_ok());
    /// assert!(ApprovalTier::Manager.authorize(&admin).is_err());
    /// ```
    pub fn authorize(&self, capabilities: &ApproverCapabilities) -> HrmsResult<()> {
        match self {
            ApprovalTier::Manager if capabilities.manages_requester => Ok(()),
            ApprovalTier::Manager => Err(HrmsError::forbidden(
                "only the requester's manager can act at the manager tier",
            )),
            ApprovalTier::Hr | ApprovalTier::SeniorManagement | ApprovalTier::Finance
                if capabilities.is_admin =>
            {
                Ok(())
            }
            ApprovalTier::Completed => Err(HrmsError::validation(
                "no approval tier is awaiting a decision",
            )),
            tier => Err(HrmsError::forbidden(format!(
                "admin role required to act at the {tier} tier"
            ))),
        }
    }
}

impl fmt::Display for ApprovalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller is entitled to do, resolved from the store by the service
/// layer before a transition is attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApproverCapabilities {
    /// The caller holds the admin role.
    pub is_admin: bool,
    /// The caller is the requester's direct manager.
    pub manages_requester: bool,
}

/// Decision state of a single tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierStatus {
    /// The tier is not part of this request's route.
    #[default]
    NotRequired,
    /// Waiting for this tier.
    Pending,
    /// The tier approved.
    Approved,
    /// The tier rejected.
    Rejected,
}

/// Overall status of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Still moving through the tiers.
    #[default]
    Pending,
    /// Finally approved.
    Approved,
    /// Rejected at some tier.
    Rejected,
}

impl RequestStatus {
    /// Returns true once no further decisions are accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }

    /// The wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

/// Approve or reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Sign off at the tier.
    Approve,
    /// Reject the request.
    Reject,
}

/// The transitions callers can request, named `<tier>_<decision>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    /// Manager signs off.
    ManagerApprove,
    /// Manager rejects.
    ManagerReject,
    /// HR signs off.
    HrApprove,
    /// HR rejects.
    HrReject,
    /// Senior management signs off.
    SeniorManagementApprove,
    /// Senior management rejects.
    SeniorManagementReject,
    /// Finance signs off.
    FinanceApprove,
    /// Finance rejects.
    FinanceReject,
}

impl ApprovalAction {
    /// The tier this action is taken at.
    pub fn tier(&self) -> ApprovalTier {
        match self {
            ApprovalAction::ManagerApprove | ApprovalAction::ManagerReject => ApprovalTier::Manager,
            ApprovalAction::HrApprove | ApprovalAction::HrReject => ApprovalTier::Hr,
            ApprovalAction::SeniorManagementApprove | ApprovalAction::SeniorManagementReject => {
                ApprovalTier::SeniorManagement
            }
            ApprovalAction::FinanceApprove | ApprovalAction::FinanceReject => ApprovalTier::Finance,
        }
    }

    /// Whether the action approves or rejects.
    pub fn decision(&self) -> Decision {
        match self {
            ApprovalAction::ManagerApprove
            | ApprovalAction::HrApprove
            | ApprovalAction::SeniorManagementApprove
            | ApprovalAction::FinanceApprove => Decision::Approve,
            _ => Decision::Reject,
        }
    }
}

/// The kinds of request that share the approval machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Leave request.
    Leave,
    /// Salary loan request.
    Loan,
    /// Business travel request.
    Travel,
}

impl RequestKind {
    /// Human-readable label used in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Leave => "Leave request",
            RequestKind::Loan => "Loan request",
            RequestKind::Travel => "Travel request",
        }
    }
}
