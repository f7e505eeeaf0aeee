//! Error types for the transport layer.
//!
//! Every failure of a single GET is one of these variants, so callers can
//! branch on the HTTP status instead of inspecting an opaque error.

use thiserror::Error;

/// Errors that can occur while executing a single HTTP request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS, body read).
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The requested URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The URL could not be parsed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Maps a reqwest send/read error, promoting timeouts. The URL is
    /// removed from `source` because it may carry a private key.
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::network(url, source.without_url())
        }
    }

    /// Returns the HTTP status code when the server answered with one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_http_status_display() {
        let error = TransportError::http_status("http://feeds.example/v2/json/recent", 503);
        let msg = error.to_string();
        assert!(msg.contains("503"), "Expected '503' in: {msg}");
        assert!(msg.contains("/v2/json/recent"), "Expected URL in: {msg}");
        assert_eq!(error.status(), Some(503));
    }

    #[test]
    fn test_transport_error_timeout_has_no_status() {
        let error = TransportError::timeout("http://feeds.example/");
        assert!(error.to_string().contains("timeout"));
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_transport_error_invalid_url_display() {
        let error = TransportError::invalid_url("not-a-url");
        assert_eq!(error.to_string(), "invalid URL: not-a-url");
    }
}
