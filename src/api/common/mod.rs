//
//  stash-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Stash REST client
//!
//! This module provides the types shared by every part of the API layer: the
//! error taxonomy, the structured server error entity, and the [`Outcome`]
//! wrapper that distinguishes a completed call from a dry-run capture.
//!
//! # Overview
//!
//! - [`StashError`] - Unified error type for all API operations
//! - [`ErrorKind`] - Plain classification of a [`StashError`]
//! - [`ApiError`] - One entry of a server error list
//! - [`Outcome`] - Completed result or dry-run sentinel
//! - Pagination types (re-exported from [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use stash_client::api::common::{ErrorKind, StashError};
//!
//! fn describe(err: &StashError) -> &'static str {
//!     match err.kind() {
//!         ErrorKind::InvalidUsage => "check your arguments",
//!         ErrorKind::ResponseFailure => "the server refused the request",
//!         _ => "something else went wrong",
//!     }
//! }
//!
//! let err = StashError::InvalidUsage("EITHER user or project may be supplied".to_string());
//! assert_eq!(describe(&err), "check your arguments");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

mod pagination;

pub use pagination::*;

/// Unified error type for all Stash API operations.
///
/// # Variants
///
/// | Variant | Raised when | Network call made |
/// |---------|-------------|-------------------|
/// | `InvalidUsage` | Caller arguments violate a precondition | Never |
/// | `ResponseFailure` | The server answered with a non-2xx status | Yes |
/// | `MalformedResponse` | A 2xx body does not match the expected shape | Yes |
/// | `NotFound` | A requested item is absent from a decoded entity | - |
/// | `Configuration` | Host or user identity cannot be determined | Never |
/// | `Network` | Transport-level failure | Yes |
///
/// # Notes
///
/// - `ResponseFailure` keeps the raw body so structured errors can be extracted
///   later with [`StashError::api_errors`]
/// - The `Network` variant automatically converts from `reqwest::Error`
#[derive(Error, Debug)]
pub enum StashError {
    /// Caller-supplied arguments violate a precondition.
    #[error("{0}")]
    InvalidUsage(String),

    /// The server returned a status outside the 2xx range.
    #[error("Application failure with status code {status}: {reason}")]
    ResponseFailure {
        /// Raw HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        reason: String,
        /// Raw response body
        body: String,
    },

    /// A success response whose body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A lookup on a decoded entity found nothing.
    #[error("{0}")]
    NotFound(String),

    /// The client environment is incomplete (no host, no user identity).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Classification of a [`StashError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUsage,
    ResponseFailure,
    MalformedResponse,
    NotFound,
    Configuration,
    Network,
}

impl StashError {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUsage(_) => ErrorKind::InvalidUsage,
            Self::ResponseFailure { .. } => ErrorKind::ResponseFailure,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Network(_) => ErrorKind::Network,
        }
    }

    /// HTTP status of a `ResponseFailure`, `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ResponseFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extracts the structured server errors carried by a `ResponseFailure`.
    ///
    /// Returns `None` for other variants, and also when the body is not a
    /// server error envelope. Extraction problems are logged rather than
    /// raised so they never mask the original failure.
    pub fn api_errors(&self) -> Option<Vec<ApiError>> {
        match self {
            Self::ResponseFailure { body, .. } => ApiError::decode_list(body),
            _ => None,
        }
    }
}

/// Result type used across the library API.
pub type Result<T> = std::result::Result<T, StashError>;

/// A single entry from a server error envelope.
///
/// Failed responses carry a body of the form:
///
/// ```json
/// {"errors": [{"message": "...", "exceptionName": "...", "context": "..."}]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human readable message.
    #[serde(default)]
    pub message: Option<String>,

    /// Fully qualified name of the server-side exception.
    #[serde(default, rename = "exceptionName")]
    pub exception_name: Option<String>,

    /// Field or entity the error refers to, when the server names one.
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    errors: Vec<ApiError>,
}

impl ApiError {
    /// Decodes the `errors` array of a failed response body.
    ///
    /// Yields `None` (and logs a warning) when the body is not JSON or lacks
    /// the array; an empty array yields `Some(vec![])`.
    pub fn decode_list(body: &str) -> Option<Vec<ApiError>> {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Some(envelope.errors),
            Err(err) => {
                warn!(error = %err, "Could not decode server error list");
                None
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message.as_deref().unwrap_or("(no message)");
        match (&self.context, &self.exception_name) {
            (Some(context), _) => write!(f, "{} [{}]", message, context),
            (None, Some(exception)) => write!(f, "{} ({})", message, exception),
            (None, None) => write!(f, "{}", message),
        }
    }
}

/// Result of an operation that may have been suppressed by dry-run mode.
///
/// In dry-run mode the request is captured instead of sent, so there is no
/// response to read back. Callers that need fields of the response must
/// handle `DryRun` explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The request was sent and the response decoded.
    Completed(T),
    /// The request was captured and never sent.
    DryRun,
}

impl<T> Outcome<T> {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::DryRun => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Completed(value) => Outcome::Completed(f(value)),
            Self::DryRun => Outcome::DryRun,
        }
    }

    /// Applies a fallible conversion to a completed value.
    pub fn try_map<U, F: FnOnce(T) -> Result<U>>(self, f: F) -> Result<Outcome<U>> {
        match self {
            Self::Completed(value) => Ok(Outcome::Completed(f(value)?)),
            Self::DryRun => Ok(Outcome::DryRun),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_list() {
        let body = r#"{"errors":[{"message":"not found","exceptionName":"com.atlassian.NoSuchRepositoryException","context":null}]}"#;
        let errors = ApiError::decode_list(body).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message.as_deref(), Some("not found"));
        assert_eq!(
            errors[0].exception_name.as_deref(),
            Some("com.atlassian.NoSuchRepositoryException")
        );
        assert!(errors[0].context.is_none());
    }

    #[test]
    fn test_decode_error_list_tolerates_garbage() {
        assert!(ApiError::decode_list("<html>gateway timeout</html>").is_none());
        assert!(ApiError::decode_list(r#"{"message":"no list here"}"#).is_none());
        assert_eq!(ApiError::decode_list(r#"{"errors":[]}"#), Some(vec![]));
    }

    #[test]
    fn test_response_failure_exposes_api_errors() {
        let err = StashError::ResponseFailure {
            status: 404,
            reason: "Not Found".to_string(),
            body: r#"{"errors":[{"message":"not found"}]}"#.to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ResponseFailure);
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "Application failure with status code 404: Not Found"
        );
        let errors = err.api_errors().unwrap();
        assert_eq!(errors[0].to_string(), "not found");
    }

    #[test]
    fn test_api_errors_only_for_response_failures() {
        let err = StashError::InvalidUsage("nope".to_string());
        assert!(err.api_errors().is_none());
        assert!(err.status().is_none());
    }

    #[test]
    fn test_outcome_helpers() {
        let done: Outcome<u32> = Outcome::Completed(2);
        assert_eq!(done.clone().map(|v| v * 2), Outcome::Completed(4));
        assert_eq!(done.completed(), Some(2));

        let skipped: Outcome<u32> = Outcome::DryRun;
        assert!(skipped.is_dry_run());
        assert_eq!(skipped.try_map(|v| Ok(v + 1)).unwrap(), Outcome::DryRun);
    }
}
