//! Error types for Nudge
//!
//! Three caller-facing failure classes plus a generic storage failure. All of
//! them are terminal: actions are rejected before any mutation, so a failed
//! call never leaves partial effects behind.

use thiserror::Error;

/// Result type for nudge operations
pub type Result<T> = std::result::Result<T, NudgeError>;

/// Nudge error types
#[derive(Debug, Clone, Error)]
pub enum NudgeError {
    /// Malformed or out-of-range creation or action payload
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// Token does not resolve to a side on this agreement
    #[error("Token does not grant access to agreement {agreement_id}")]
    Forbidden { agreement_id: String },

    /// Unknown agreement id
    #[error("Agreement {agreement_id} not found")]
    AgreementNotFound { agreement_id: String },

    /// Storage-layer failure
    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl NudgeError {
    /// Create an invalid input error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(agreement_id: impl ToString) -> Self {
        Self::Forbidden {
            agreement_id: agreement_id.to_string(),
        }
    }

    /// Create a not-found error
    pub fn not_found(agreement_id: impl ToString) -> Self {
        Self::AgreementNotFound {
            agreement_id: agreement_id.to_string(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether this failure is the caller's to correct
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage { .. })
    }

    /// Get an error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::AgreementNotFound { .. } => "NOT_FOUND",
            Self::Storage { .. } => "STORAGE_ERROR",
        }
    }
}
