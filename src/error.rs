//! Error types for the HRMS engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a handler can report: validation, authorization,
//! missing records, store failures and external API failures.

use thiserror::Error;

/// The main error type for the HRMS engine.
///
/// Services, repositories and connectors all return this error type, and the
/// HTTP layer maps each variant to a status code.
///
/// # Example
///
/// ```
/// use hrms_engine::error::HrmsError;
///
/// let error = HrmsError::NotFound {
///     entity: "Employee",
///     id: "emp_001".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_001");
/// ```
#[derive(Debug, Error)]
pub enum HrmsError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Request input failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// A description of what was invalid.
        message: String,
    },

    /// The caller could not be identified.
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Why the caller could not be identified.
        message: String,
    },

    /// The caller is identified but lacks the required capability.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// The capability that was missing.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The entity name (e.g. "Employee").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A batch for the given period has already been processed.
    #[error("Already processed: {message}")]
    AlreadyProcessed {
        /// A description of the existing run.
        message: String,
    },

    /// A status transition was not permitted from the current state.
    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition {
        /// The current state.
        from: String,
        /// The requested state.
        to: String,
    },

    /// The backing store rejected an operation.
    #[error("Store error: {message}")]
    Store {
        /// A description of the store failure.
        message: String,
    },

    /// A call to an external service failed.
    #[error("{service} request failed: {message}")]
    ExternalService {
        /// The external service name (e.g. "QIWA").
        service: &'static str,
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl HrmsError {
    /// Shorthand for a [`HrmsError::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        HrmsError::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`HrmsError::Forbidden`] error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        HrmsError::Forbidden {
            message: message.into(),
        }
    }

    /// Shorthand for a [`HrmsError::NotFound`] error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        HrmsError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// A type alias for Results that return HrmsError.
pub type HrmsResult<T> = Result<T, HrmsError>;
