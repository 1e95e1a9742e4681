//! Service Layer Error Types
//!
//! This module defines the errors location operations surface to callers.
//! Placement violations are detected by the service itself before any
//! mutating store call; everything else originates in a collaborator and is
//! passed through unchanged in meaning.

use crate::db::StoreError;
use thiserror::Error;

/// Location operation errors
#[derive(Error, Debug)]
pub enum LocationServiceError {
    /// Referenced location, parent, content or content type does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Current user lacks the required capability
    #[error("Permission denied: cannot {function} {target}")]
    PermissionDenied { function: String, target: String },

    /// Target parent or peer cannot receive the location
    #[error("Invalid placement for '{argument}': {reason}")]
    InvalidPlacement { argument: String, reason: String },

    /// Opaque failure from the underlying repository
    #[error("Store operation failed: {0}")]
    StoreFailure(String),

    /// Service configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LocationServiceError {
    /// Create an invalid placement error
    pub fn invalid_placement(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPlacement {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Create a store failure error
    pub fn store_failure(msg: impl Into<String>) -> Self {
        Self::StoreFailure(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<StoreError> for LocationServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::Unauthorized { function, target } => {
                Self::PermissionDenied { function, target }
            }
            StoreError::InvalidArgument { argument, reason } => {
                Self::StoreFailure(format!("Argument '{}' is invalid: {}", argument, reason))
            }
            StoreError::Backend(source) => Self::StoreFailure(format!("{:#}", source)),
        }
    }
}
