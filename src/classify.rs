//! Failure classification and error construction.
//!
//! Transport results are turned into a [`RequestOutcome`]; decode failures
//! are turned into a [`FeedsError`] by [`build_error`], which prefers the
//! API's own error payload over the local cause when the body carries one.

use std::fmt;

use tracing::{debug, warn};

use crate::decode::decode_api_error;
use crate::error::{FailureCause, FeedsError};
use crate::transport::TransportError;

/// HTTP status the API uses to block misbehaving clients.
pub const BANNED_STATUS: u16 = 503;

/// Classified result of executing one feed request.
#[derive(Debug)]
pub enum RequestOutcome {
    /// 2xx response with its body.
    Success(String),
    /// HTTP 503: the client has been blocked.
    Banned(TransportError),
    /// Any other transport failure.
    RequestFailed(TransportError),
}

impl RequestOutcome {
    /// Converts the outcome into a body or a [`FeedsError`].
    ///
    /// `display_url` names the request in error messages and must not carry
    /// secrets.
    ///
    /// # Errors
    ///
    /// Returns [`FeedsError::Banned`] or [`FeedsError::RequestFailed`] for the
    /// non-success outcomes.
    pub fn into_body(self, display_url: &str) -> Result<String, FeedsError> {
        match self {
            Self::Success(body) => Ok(body),
            Self::Banned(source) => Err(FeedsError::banned(display_url, source)),
            Self::RequestFailed(source) => Err(FeedsError::request_failed(
                format!("Error while executing GET request to {display_url}"),
                source,
            )),
        }
    }
}

/// Classifies a transport result. Status 503 is always [`RequestOutcome::Banned`].
#[must_use]
pub fn classify(result: Result<String, TransportError>) -> RequestOutcome {
    match result {
        Ok(body) => RequestOutcome::Success(body),
        Err(error) if error.status() == Some(BANNED_STATUS) => {
            warn!("feed API answered 503, the client may have been banned");
            RequestOutcome::Banned(error)
        }
        Err(error) => {
            debug!(%error, "request failed");
            RequestOutcome::RequestFailed(error)
        }
    }
}

/// One `name -> value` item of call context attached to error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPair {
    name: &'static str,
    value: String,
}

impl ContextPair {
    pub fn new(name: &'static str, value: impl fmt::Display) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }

    /// A pair whose value must never appear in messages.
    pub fn redacted(name: &'static str) -> Self {
        Self::new(name, "<redacted>")
    }
}

impl fmt::Display for ContextPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.value)
    }
}

/// Formats a context pair as `name -> value`.
///
/// # Errors
///
/// Returns [`FeedsError::Validation`] when `name` is empty.
pub fn build_pair(name: &str, value: &str) -> Result<String, FeedsError> {
    if name.is_empty() {
        return Err(FeedsError::validation("pair name must not be empty"));
    }
    Ok(format!("{name} -> {value}"))
}

/// Builds the error surfaced for a failed decode of `body`.
///
/// Without context the message is `"{message}!"`; with context it is
/// `"{message}: [a -> 1, b -> 2]"`. When `body` is an API error payload its
/// message and code are appended to the pairs and the result is
/// [`FeedsError::Api`] with `cause` dropped; otherwise the result is
/// [`FeedsError::RequestFailed`] wrapping `cause`.
pub fn build_error(
    cause: impl Into<FailureCause>,
    body: &str,
    message: &str,
    pairs: &[ContextPair],
) -> FeedsError {
    let mut parts: Vec<String> = pairs.iter().map(ToString::to_string).collect();

    let api_error = decode_api_error(body);
    if let Some(api_error) = &api_error {
        parts.push(ContextPair::new("message", &api_error.message).to_string());
        parts.push(ContextPair::new("code", api_error.code).to_string());
    }

    let full_message = if parts.is_empty() {
        format!("{message}!")
    } else {
        format!("{message}: [{}]", parts.join(", "))
    };

    match api_error {
        Some(api_error) => {
            debug!(code = api_error.code, "response body is an api error payload");
            FeedsError::Api {
                message: full_message,
                api_error,
            }
        }
        None => FeedsError::request_failed(full_message, cause),
    }
}
