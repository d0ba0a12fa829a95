//! Errors raised by the mock resolver layer and its transports
//!
//! Every variant maps to a machine-readable code via [`MockError::error_code`],
//! which is what callers see in `extensions.code` of a GraphQL error.
//!
//! # Examples
//!
//! ```rust
//! use agreement_mock::errors::MockError;
//!
//! let err = MockError::not_found("Agreement", "AGR999");
//! assert_eq!(err.to_string(), "Agreement with id AGR999 not found");
//! assert_eq!(err.error_code(), "NOT_FOUND");
//! ```

use thiserror::Error;

pub const NOT_FOUND: &str = "NOT_FOUND";
pub const MOCK_ERROR: &str = "MOCK_ERROR";
pub const UNRESOLVABLE_OPERATION: &str = "UNRESOLVABLE_OPERATION";
pub const BAD_REQUEST: &str = "BAD_REQUEST";
pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MockError {
    /// Referenced record is absent from the store
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Record kind, e.g. `Agreement`
        resource: String,
        /// Identifier the caller asked for
        id: String,
    },

    /// Failure injected by the error simulation settings
    #[error("{0}")]
    Simulated(String),

    /// No operation could be derived from the request
    #[error("Could not determine operation name from query")]
    UnresolvableOperation,

    /// Document, variables or input values were rejected
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Error reported by schema execution, carrying its extension code
    #[error("{message}")]
    Execution {
        /// Code taken from `extensions.code`
        code: String,
        /// Human-readable message
        message: String,
    },

    /// Remote endpoint could not be reached or answered garbage
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MockError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        MockError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Check if this is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        self.error_code() == NOT_FOUND
    }

    /// Check if this failure was injected by the error simulation
    pub fn is_simulated(&self) -> bool {
        self.error_code() == MOCK_ERROR
    }

    /// Get error code for GraphQL/API responses
    pub fn error_code(&self) -> &str {
        match self {
            MockError::NotFound { .. } => NOT_FOUND,
            MockError::Simulated(_) => MOCK_ERROR,
            MockError::UnresolvableOperation => UNRESOLVABLE_OPERATION,
            MockError::InvalidRequest(_) => BAD_REQUEST,
            MockError::Execution { code, .. } => code.as_str(),
            MockError::Transport(_) => TRANSPORT_ERROR,
            MockError::Internal(_) => INTERNAL_ERROR,
        }
    }
}
