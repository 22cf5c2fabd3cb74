//! Error types for resolution requests
//!
//! Every failure a caller can see is one of two kinds, `BadRequest` or
//! `NotFound`. Each carries a human-readable message and the list of
//! violated conditions, which together form the wire-level [`ErrorBody`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolution::ResolutionId;

/// Result type alias for resolution operations
pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Message used for plain field validation failures
pub const VALIDATION_FAILED: &str = "Validation failed.";

/// Message used when the route and body identifiers disagree
pub const ID_MISMATCH: &str = "Route id does not match body id.";

/// Message used when no record carries the requested identifier
pub const NOT_FOUND: &str = "Resolution not found.";

/// Errors surfaced to callers of the resolution handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Client input is malformed or violates a precondition
    #[error("{message} {details:?}")]
    BadRequest {
        /// Human-readable summary
        message: String,
        /// Specific violated conditions
        details: Vec<String>,
    },

    /// The referenced record does not exist
    #[error("{message} {details:?}")]
    NotFound {
        /// Human-readable summary
        message: String,
        /// Specific violated conditions
        details: Vec<String>,
    },
}

impl ResolutionError {
    /// A validation failure with a single detail
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            message: VALIDATION_FAILED.to_string(),
            details: vec![detail.into()],
        }
    }

    /// Route id and body id disagree on an update
    pub fn id_mismatch(route: ResolutionId, body: ResolutionId) -> Self {
        Self::BadRequest {
            message: ID_MISMATCH.to_string(),
            details: vec![format!("route id: {route}"), format!("body id: {body}")],
        }
    }

    /// No record with the given identifier
    pub fn not_found(id: ResolutionId) -> Self {
        Self::NotFound {
            message: NOT_FOUND.to_string(),
            details: vec![format!("id: {id}")],
        }
    }

    /// Stable error tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "BadRequest",
            Self::NotFound { .. } => "NotFound",
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::NotFound { message, .. } => message,
        }
    }

    /// Violated conditions
    pub fn details(&self) -> &[String] {
        match self {
            Self::BadRequest { details, .. } | Self::NotFound { details, .. } => details,
        }
    }
}

/// Wire shape of an error response: `{error, message, details}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable tag, `BadRequest` or `NotFound`
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Violated conditions
    pub details: Vec<String>,
}

impl From<&ResolutionError> for ErrorBody {
    fn from(err: &ResolutionError) -> Self {
        Self {
            error: err.kind().to_string(),
            message: err.message().to_string(),
            details: err.details().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_shape() {
        let err = ResolutionError::validation("title is required");
        let body = ErrorBody::from(&err);

        assert_eq!(body.error, "BadRequest");
        assert_eq!(body.message, VALIDATION_FAILED);
        assert_eq!(body.details, vec!["title is required".to_string()]);
    }

    #[test]
    fn test_id_mismatch_details() {
        let err = ResolutionError::id_mismatch(3, 5);

        assert_eq!(err.kind(), "BadRequest");
        assert_eq!(err.message(), ID_MISMATCH);
        assert_eq!(err.details(), ["route id: 3", "body id: 5"]);
    }

    #[test]
    fn test_not_found_serializes_to_wire_shape() {
        let body = ErrorBody::from(&ResolutionError::not_found(42));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "error": "NotFound",
                "message": "Resolution not found.",
                "details": ["id: 42"]
            })
        );
    }
}
