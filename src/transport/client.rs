//! `reqwest` blocking implementation of [`Transport`].

use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{LOCATION, USER_AGENT};
use reqwest::redirect::Policy;
use tracing::{debug, instrument};
use url::Url;

use super::{Transport, TransportError};
use crate::config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS};
use crate::user_agent;

/// Maximum redirects followed by [`Transport::get`].
const MAX_REDIRECTS: usize = 10;

/// Pooled HTTP transport.
///
/// Designed to be created once and shared: the underlying clients keep a
/// connection pool that is safe for concurrent use. Two clients are held
/// because redirect handling is a per-client policy in `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    no_redirect: Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Creates a transport with the default timeouts (10s connect, 30s read).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS)
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a transport with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if either client fails to build.
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        let client = base_builder(connect_timeout_secs, read_timeout_secs)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|source| TransportError::ClientBuild { source })?;
        let no_redirect = base_builder(connect_timeout_secs, read_timeout_secs)
            .redirect(Policy::none())
            .build()
            .map_err(|source| TransportError::ClientBuild { source })?;
        Ok(Self {
            client,
            no_redirect,
        })
    }

    fn send(
        &self,
        client: &Client,
        url: &str,
        user_agent: &str,
    ) -> Result<reqwest::blocking::Response, TransportError> {
        Url::parse(url).map_err(|_| TransportError::invalid_url(without_query(url)))?;
        client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .map_err(|e| TransportError::from_reqwest(without_query(url), e))
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, url, user_agent), fields(path = %without_query(url)))]
    fn get(&self, url: &str, user_agent: &str) -> Result<String, TransportError> {
        let response = self.send(&self.client, url, user_agent)?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "request failed with HTTP status");
            return Err(TransportError::http_status(without_query(url), status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| TransportError::from_reqwest(without_query(url), e))?;
        debug!(bytes = body.len(), "response received");
        Ok(body)
    }

    #[instrument(skip(self, url, user_agent), fields(path = %without_query(url)))]
    fn redirect_location(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<Option<String>, TransportError> {
        let response = self.send(&self.no_redirect, url, user_agent)?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        debug!(
            status = response.status().as_u16(),
            has_location = location.is_some(),
            "redirect probe complete"
        );
        Ok(location)
    }
}

fn base_builder(connect_timeout_secs: u64, read_timeout_secs: u64) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
}

/// Strips the query string so private feed keys stay out of logs and errors.
pub(crate) fn without_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}
