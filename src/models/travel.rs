//! Business travel requests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::workflow::ApprovalState;

/// A business travel request. Expensive trips additionally need finance
/// sign-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelRequest {
    /// Unique identifier.
    pub id: String,
    /// The travelling employee.
    pub employee_id: String,
    /// Destination city or country.
    pub destination: String,
    /// Business purpose.
    pub purpose: String,
    /// Departure date.
    pub departure_date: NaiveDate,
    /// Return date.
    pub return_date: NaiveDate,
    /// Estimated total cost in SAR.
    pub estimated_cost: Decimal,
    /// Approval workflow state.
    #[serde(flatten)]
    pub approval: ApprovalState,
}
