//! Store Error Types
//!
//! This module defines the errors collaborator stores report back to the
//! service layer. They mirror the failure classes of the repository API:
//! missing entities, denied access, rejected arguments, and opaque backend
//! failures.

use thiserror::Error;

/// Errors reported by location, content, trash, permission and path stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced entity does not exist
    #[error("Could not find '{entity}' with identifier '{id}'")]
    NotFound { entity: String, id: String },

    /// Current user lacks the capability for the operation
    #[error("User does not have access to '{function}' {target}")]
    Unauthorized { function: String, target: String },

    /// Store rejected an argument (e.g., moving a location under itself)
    #[error("Argument '{argument}' is invalid: {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// Opaque failure from the underlying backend
    #[error("Store operation failed: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(function: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Unauthorized {
            function: function.into(),
            target: target.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
