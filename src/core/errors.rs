/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for permission operations
pub type CanResult<T> = Result<T, CanError>;

/// Permission errors with serialization support
///
/// References that match nothing and inputs of an unsupported shape are
/// never errors; they simply drop out of the result.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CanError {
    #[error("Call to undefined method {method}()")]
    #[diagnostic(
        code(can::unhandled_dynamic_call),
        help("Permission checks by name must start with \"can\", e.g. canCreateUsers.")
    )]
    UnhandledDynamicCall { method: String },

    #[error("Repository failure: {reason}")]
    #[diagnostic(
        code(can::repository),
        help("The storage backend rejected the operation. Nothing was retried.")
    )]
    Repository { reason: String },

    #[error("Permission slug already exists: {slug}")]
    #[diagnostic(
        code(can::duplicate_slug),
        help("Slugs are unique. Update the existing permission or choose another name.")
    )]
    DuplicateSlug { slug: String },

    #[error("Permission {id} not found")]
    #[diagnostic(code(can::not_found))]
    NotFound { id: String },

    #[error("Access denied. Missing required permission \"{required}\".")]
    #[diagnostic(
        code(can::forbidden),
        help("Attach one of the required permissions to the subject.")
    )]
    Forbidden { required: String },

    #[error("Invalid configuration: {reason}")]
    #[diagnostic(
        code(can::invalid_config),
        help("Check the CAN_* environment variables.")
    )]
    InvalidConfig { reason: String },
}

impl CanError {
    /// Storage failure with a message
    pub fn repository(reason: impl Into<String>) -> Self {
        CanError::Repository {
            reason: reason.into(),
        }
    }

    /// Whether the error came from the storage boundary
    pub fn is_repository(&self) -> bool {
        matches!(self, CanError::Repository { .. })
    }
}
