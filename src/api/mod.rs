//! HTTP API module for the HRMS engine.
//!
//! Every operation is exposed as a POST endpoint taking and returning JSON.
//! The caller is identified by the `x-user-email` header.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AccrualRequest, ApprovalRequest, LeaveSubmissionRequest, LoanSubmissionRequest,
    OnboardingAssignRequest, PayrollProcessRequest, PayrollStatusRequest, QiwaRequest,
    ReminderRequest, SinadRequest, TaskStatusRequest, TravelSubmissionRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::{AppState, USER_EMAIL_HEADER};
