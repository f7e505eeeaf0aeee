//! The public error taxonomy of the client.
//!
//! - [`FeedsError::Validation`]: a caller-supplied argument was rejected
//!   before any network call.
//! - [`FeedsError::Banned`]: the API answered HTTP 503, its way of blocking
//!   clients that send too many requests.
//! - [`FeedsError::Api`]: the API reported a structured error payload.
//! - [`FeedsError::RequestFailed`]: any other transport or decoding failure,
//!   with the context of what was being fetched.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::model::ApiError;
use crate::transport::TransportError;

/// Guidance carried by [`FeedsError::Banned`].
pub const BANNED_MESSAGE: &str = "you may have been banned by Delicious (HTTP 503). \
    Send requests less frequently and set a custom user agent for your requests";

/// Errors returned by feed operations.
#[derive(Debug, Error)]
pub enum FeedsError {
    /// An argument was out of range or empty. Never retried, never wrapped.
    #[error("invalid argument: {message}")]
    Validation {
        /// What was wrong with the argument.
        message: String,
    },

    /// The API answered HTTP 503.
    #[error("{}", BANNED_MESSAGE)]
    Banned {
        /// The URL that was rejected, with its query string removed.
        url: String,
        /// The underlying status error.
        #[source]
        source: TransportError,
    },

    /// The API reported an error payload. Its message and code are also
    /// folded into `message`.
    #[error("{message}")]
    Api {
        /// Full message including the call context.
        message: String,
        /// The decoded payload.
        api_error: ApiError,
    },

    /// A transport or decoding failure.
    #[error("{message}")]
    RequestFailed {
        /// Description of the failed call including its context pairs.
        message: String,
        /// The underlying failure.
        #[source]
        source: FailureCause,
    },
}

/// The underlying failure of a [`FeedsError::RequestFailed`].
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl FeedsError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a banned error for `url`.
    pub fn banned(url: impl Into<String>, source: TransportError) -> Self {
        Self::Banned {
            url: url.into(),
            source,
        }
    }

    /// Creates a request-failed error.
    pub fn request_failed(message: impl Into<String>, source: impl Into<FailureCause>) -> Self {
        Self::RequestFailed {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Returns true when the API blocked the client.
    #[must_use]
    pub fn is_banned(&self) -> bool {
        matches!(self, Self::Banned { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_validation_display() {
        let err = FeedsError::validation("count has to be a value from 1 to 100");
        assert_eq!(
            err.to_string(),
            "invalid argument: count has to be a value from 1 to 100"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_banned_carries_guidance_and_source() {
        let err = FeedsError::banned(
            "http://feeds.example/v2/json/recent",
            TransportError::http_status("http://feeds.example/v2/json/recent", 503),
        );
        let msg = err.to_string();
        assert!(msg.contains("less frequently"), "got: {msg}");
        assert!(msg.contains("user agent"), "got: {msg}");
        assert!(err.is_banned());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_request_failed_keeps_cause() {
        let err = FeedsError::request_failed(
            "Error while finding recent bookmarks!",
            TransportError::timeout("http://feeds.example/"),
        );
        assert_eq!(err.to_string(), "Error while finding recent bookmarks!");
        let source = err.source().unwrap();
        assert!(source.to_string().contains("timeout"));
    }

    #[test]
    fn test_api_error_has_no_source() {
        let err = FeedsError::Api {
            message: "Test: [message -> boom, code -> 7]".to_string(),
            api_error: ApiError {
                message: "boom".to_string(),
                code: 7,
            },
        };
        assert!(err.source().is_none());
        assert!(!err.is_banned());
    }
}
