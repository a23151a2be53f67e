//! Response types for the HRMS API.
//!
//! This module defines the error response body and the mapping from
//! [`HrmsError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::HrmsError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<HrmsError> for ApiErrorResponse {
    fn from(error: HrmsError) -> Self {
        let message = error.to_string();
        match error {
            HrmsError::Validation { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(message),
            },
            HrmsError::AlreadyProcessed { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("ALREADY_PROCESSED", message),
            },
            HrmsError::InvalidTransition { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_TRANSITION", message),
            },
            HrmsError::Unauthenticated { .. } => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("UNAUTHENTICATED", message),
            },
            HrmsError::Forbidden { .. } => ApiErrorResponse {
                status: StatusCode::FORBIDDEN,
                error: ApiError::new("FORBIDDEN", message),
            },
            HrmsError::NotFound { entity, .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "NOT_FOUND",
                    message,
                    format!("No {entity} with the given identifier exists"),
                ),
            },
            HrmsError::ExternalService { service, .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "EXTERNAL_SERVICE_ERROR",
                    format!("{service} request failed"),
                    message,
                ),
            },
            HrmsError::Store { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORE_ERROR", "Storage operation failed", message),
            },
            HrmsError::ConfigNotFound { .. } | HrmsError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            HrmsError::CalculationError { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_status_codes_by_error_kind() {
        let cases = [
            (HrmsError::validation("bad"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                HrmsError::AlreadyProcessed {
                    message: "2025-01".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "ALREADY_PROCESSED",
            ),
            (
                HrmsError::Unauthenticated {
                    message: "no caller".to_string(),
                },
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
            ),
            (HrmsError::forbidden("admin"), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (
                HrmsError::not_found("Employee", "emp_404"),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                HrmsError::ExternalService {
                    service: "QIWA",
                    message: "timeout".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXTERNAL_SERVICE_ERROR",
            ),
        ];
        for (error, status, code) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
            assert_eq!(response.error.code, code);
        }
    }

    #[test]
    fn test_external_failure_keeps_detail() {
        let response: ApiErrorResponse = HrmsError::ExternalService {
            service: "SINAD",
            message: "API error 502".to_string(),
        }
        .into();
        assert_eq!(response.error.message, "SINAD request failed");
        assert!(response.error.details.unwrap().contains("API error 502"));
    }
}
