//! HTTP request handlers for the HRMS API.
//!
//! Every endpoint is a POST taking a JSON body. A handler parses the body,
//! identifies the caller, runs the matching service and renders the result.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::HrmsResult;
use crate::services::{
    AuthContext, assign_onboarding_tasks, process_approval, process_monthly_accrual,
    process_monthly_payroll, qiwa_action, send_onboarding_reminders, sinad_action,
    submit_leave_request, submit_loan_request, submit_travel_request, update_payroll_status,
    update_task_status,
};
use crate::workflow::RequestKind;

use super::request::{
    AccrualRequest, ApprovalRequest, LeaveSubmissionRequest, LoanSubmissionRequest,
    OnboardingAssignRequest, PayrollProcessRequest, PayrollStatusRequest, QiwaRequest,
    ReminderRequest, SinadRequest, TaskStatusRequest, TravelSubmissionRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/process", post(process_payroll_handler))
        .route("/payroll/status", post(payroll_status_handler))
        .route("/approvals/leave", post(approve_leave_handler))
        .route("/approvals/loan", post(approve_loan_handler))
        .route("/approvals/travel", post(approve_travel_handler))
        .route("/requests/leave", post(submit_leave_handler))
        .route("/requests/loan", post(submit_loan_handler))
        .route("/requests/travel", post(submit_travel_handler))
        .route("/leave-accrual/process", post(process_accrual_handler))
        .route("/onboarding/assign", post(assign_onboarding_handler))
        .route("/onboarding/tasks/status", post(task_status_handler))
        .route("/onboarding/reminders", post(onboarding_reminders_handler))
        .route("/integrations/qiwa", post(qiwa_handler))
        .route("/integrations/sinad", post(sinad_handler))
        .with_state(state)
}

/// Unwraps a JSON body or renders the 400 for a rejected one.
fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // serde's message, e.g. "missing field `month`"
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error).into_response())
}

/// Identifies the caller or renders the 401.
async fn caller(
    state: &AppState,
    headers: &HeaderMap,
    correlation_id: Uuid,
) -> Result<AuthContext, Response> {
    state.authenticate(headers).await.map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Caller not authenticated"
        );
        ApiErrorResponse::from(err).into_response()
    })
}

/// Renders a service result.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    started: Instant,
    result: HrmsResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                duration_us = started.elapsed().as_micros(),
                "Request completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payroll/process.
async fn process_payroll_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PayrollProcessRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    info!(correlation_id = %correlation_id, "Processing payroll run");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = process_monthly_payroll(state.context(), &auth, request.into()).await;
    respond(correlation_id, "payroll_process", started, result)
}

/// Handler for POST /payroll/status.
async fn payroll_status_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PayrollStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        payroll_id = %request.payroll_id,
        status = request.status.as_str(),
        "Updating payroll status"
    );

    let result = update_payroll_status(
        state.context(),
        &auth,
        &request.payroll_id,
        request.status,
    )
    .await;
    respond(correlation_id, "payroll_status", started, result)
}

async fn approve_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ApprovalRequest>, JsonRejection>,
) -> Response {
    approval(state, headers, payload, RequestKind::Leave).await
}

async fn approve_loan_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ApprovalRequest>, JsonRejection>,
) -> Response {
    approval(state, headers, payload, RequestKind::Loan).await
}

async fn approve_travel_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ApprovalRequest>, JsonRejection>,
) -> Response {
    approval(state, headers, payload, RequestKind::Travel).await
}

/// Shared body of the three POST /approvals/* handlers.
async fn approval(
    state: AppState,
    headers: HeaderMap,
    payload: Result<Json<ApprovalRequest>, JsonRejection>,
    kind: RequestKind,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        kind = kind.label(),
        request_id = %request.request_id,
        approver = auth.email(),
        "Processing approval"
    );

    let result = process_approval(state.context(), &auth, kind, request.into()).await;
    respond(correlation_id, "approval", started, result)
}

/// Handler for POST /requests/leave.
async fn submit_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LeaveSubmissionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = submit_leave_request(state.context(), &auth, request.into()).await;
    respond(correlation_id, "submit_leave", started, result)
}

/// Handler for POST /requests/loan.
async fn submit_loan_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LoanSubmissionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = submit_loan_request(state.context(), &auth, request.into()).await;
    respond(correlation_id, "submit_loan", started, result)
}

/// Handler for POST /requests/travel.
async fn submit_travel_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TravelSubmissionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = submit_travel_request(state.context(), &auth, request.into()).await;
    respond(correlation_id, "submit_travel", started, result)
}

/// Handler for POST /leave-accrual/process.
async fn process_accrual_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AccrualRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    info!(correlation_id = %correlation_id, "Processing leave accrual");

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = process_monthly_accrual(state.context(), &auth, request.into()).await;
    respond(correlation_id, "leave_accrual", started, result)
}

/// Handler for POST /onboarding/assign.
async fn assign_onboarding_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<OnboardingAssignRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = assign_onboarding_tasks(state.context(), &auth, request.into()).await;
    respond(correlation_id, "onboarding_assign", started, result)
}

/// Handler for POST /onboarding/tasks/status.
async fn task_status_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TaskStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = update_task_status(state.context(), &auth, request.into()).await;
    respond(correlation_id, "task_status", started, result)
}

/// Handler for POST /onboarding/reminders.
async fn onboarding_reminders_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ReminderRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = send_onboarding_reminders(state.context(), &auth, request.into()).await;
    respond(correlation_id, "onboarding_reminders", started, result)
}

/// Handler for POST /integrations/qiwa.
async fn qiwa_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<QiwaRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = qiwa_action(state.context(), &auth, request.into()).await;
    respond(correlation_id, "qiwa", started, result)
}

/// Handler for POST /integrations/sinad.
async fn sinad_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SinadRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();

    let request = match parse_body(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let auth = match caller(&state, &headers, correlation_id).await {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let result = sinad_action(state.context(), &auth, request.into()).await;
    respond(correlation_id, "sinad", started, result)
}
