//! Multi-tier approval workflow shared by leave, loan and travel requests.
//!
//! The workflow is a pure state machine: [`ApprovalRoute`] decides which tier
//! follows an approval based on the request kind and amount,
//! [`ApprovalTier::authorize`] checks the caller's capabilities, and
//! [`ApprovalState::decide`] produces the next state without mutating the
//! current one. Persistence and notifications live in
//! [`crate::services::approvals`].

mod machine;
mod route;
mod tier;

pub use machine::{ApprovalEntry, ApprovalState, DecisionInput, TransitionOutcome};
pub use route::ApprovalRoute;
pub use tier::{
    ApprovalAction, ApprovalTier, ApproverCapabilities, Decision, RequestKind, RequestStatus,
    TierStatus,
};
