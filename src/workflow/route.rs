//! Threshold-gated routing between approval tiers.

use rust_decimal::Decimal;

use crate::config::ApprovalThresholds;

use super::{ApprovalTier, RequestKind};

/// The ordered path a specific request takes through the tiers.
///
/// Leave always goes manager then HR. Loans reach HR only at or above the HR
/// threshold and senior management only at or above the senior threshold.
/// Travel always goes manager then HR, and reaches finance at or above the
/// finance threshold.
///
/// # Example
///
/// ```
/// use hrms_engine::config::ApprovalThresholds;
/// use hrms_engine::workflow::{ApprovalRoute, ApprovalTier, RequestKind};
/// use rust_decimal::Decimal;
///
/// let thresholds = ApprovalThresholds {
///     loan_hr_threshold: Decimal::new(5000, 0),
///     loan_senior_management_threshold: Decimal::new(15000, 0),
///     travel_finance_threshold: Decimal::new(10000, 0),
/// };
/// let route = ApprovalRoute::new(RequestKind::Loan, Decimal::new(6000, 0), &thresholds);
/// assert_eq!(route.next_after(ApprovalTier::Manager), ApprovalTier::Hr);
/// assert_eq!(route.next_after(ApprovalTier::Hr), ApprovalTier::Completed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalRoute {
    kind: RequestKind,
    amount: Decimal,
    thresholds: ApprovalThresholds,
}

impl ApprovalRoute {
    /// Builds the route for a request of `kind` worth `amount` SAR.
    /// Leave requests pass zero.
    pub fn new(kind: RequestKind, amount: Decimal, thresholds: &ApprovalThresholds) -> Self {
        Self {
            kind,
            amount,
            thresholds: *thresholds,
        }
    }

    /// The tier that acts first.
    pub fn first_tier(&self, has_manager: bool) -> ApprovalTier {
        if has_manager {
            ApprovalTier::Manager
        } else {
            ApprovalTier::Hr
        }
    }

    /// The tier that follows an approval at `tier`, or `Completed` when the
    /// approval is final.
    pub fn next_after(&self, tier: ApprovalTier) -> ApprovalTier {
        match (self.kind, tier) {
            (RequestKind::Leave, ApprovalTier::Manager) => ApprovalTier::Hr,
            (RequestKind::Loan, ApprovalTier::Manager)
                if self.amount >= self.thresholds.loan_hr_threshold =>
            {
                ApprovalTier::Hr
            }
            (RequestKind::Loan, ApprovalTier::Hr)
                if self.amount >= self.thresholds.loan_senior_management_threshold =>
            {
                ApprovalTier::SeniorManagement
            }
            (RequestKind::Travel, ApprovalTier::Manager) => ApprovalTier::Hr,
            (RequestKind::Travel, ApprovalTier::Hr)
                if self.amount >= self.thresholds.travel_finance_threshold =>
            {
                ApprovalTier::Finance
            }
            _ => ApprovalTier::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> ApprovalThresholds {
        ApprovalThresholds {
            loan_hr_threshold: Decimal::new(5000, 0),
            loan_senior_management_threshold: Decimal::new(15000, 0),
            travel_finance_threshold: Decimal::new(10000, 0),
        }
    }

    fn route(kind: RequestKind, amount: i64) -> ApprovalRoute {
        ApprovalRoute::new(kind, Decimal::new(amount, 0), &thresholds())
    }

    #[test]
    fn test_leave_routes_manager_then_hr() {
        let route = route(RequestKind::Leave, 0);
        assert_eq!(route.next_after(ApprovalTier::Manager), ApprovalTier::Hr);
        assert_eq!(route.next_after(ApprovalTier::Hr), ApprovalTier::Completed);
    }

    #[test]
    fn test_small_loan_finalizes_at_manager() {
        let route = route(RequestKind::Loan, 4999);
        assert_eq!(
            route.next_after(ApprovalTier::Manager),
            ApprovalTier::Completed
        );
    }

    #[test]
    fn test_loan_at_hr_threshold_goes_to_hr() {
        let route = route(RequestKind::Loan, 5000);
        assert_eq!(route.next_after(ApprovalTier::Manager), ApprovalTier::Hr);
        assert_eq!(route.next_after(ApprovalTier::Hr), ApprovalTier::Completed);
    }

    #[test]
    fn test_large_loan_goes_to_senior_management() {
        let route = route(RequestKind::Loan, 15000);
        assert_eq!(route.next_after(ApprovalTier::Manager), ApprovalTier::Hr);
        assert_eq!(
            route.next_after(ApprovalTier::Hr),
            ApprovalTier::SeniorManagement
        );
        assert_eq!(
            route.next_after(ApprovalTier::SeniorManagement),
            ApprovalTier::Completed
        );
    }

    #[test]
    fn test_travel_finance_threshold() {
        let cheap = route(RequestKind::Travel, 9999);
        assert_eq!(cheap.next_after(ApprovalTier::Manager), ApprovalTier::Hr);
        assert_eq!(cheap.next_after(ApprovalTier::Hr), ApprovalTier::Completed);

        let expensive = route(RequestKind::Travel, 10000);
        assert_eq!(expensive.next_after(ApprovalTier::Hr), ApprovalTier::Finance);
        assert_eq!(
            expensive.next_after(ApprovalTier::Finance),
            ApprovalTier::Completed
        );
    }

    #[test]
    fn test_next_tier_always_ranks_higher() {
        for kind in [RequestKind::Leave, RequestKind::Loan, RequestKind::Travel] {
            for amount in [0, 5000, 10000, 20000] {
                let route = route(kind, amount);
                for tier in [
                    ApprovalTier::Manager,
                    ApprovalTier::Hr,
                    ApprovalTier::SeniorManagement,
                    ApprovalTier::Finance,
                ] {
                    assert!(route.next_after(tier).rank() > tier.rank());
                }
            }
        }
    }

    #[test]
    fn test_first_tier_without_manager_is_hr() {
        let route = route(RequestKind::Leave, 0);
        assert_eq!(route.first_tier(true), ApprovalTier::Manager);
        assert_eq!(route.first_tier(false), ApprovalTier::Hr);
    }
}
