//! Resolution of shortened `icio.us/+` bookmark URLs.
//!
//! The API sometimes returns a redirector URL in place of the bookmarked
//! page. The redirector answers with a `Location` header whose `url=`
//! parameter holds the real target. Expansion never fails because of the
//! network: on any problem the original URL is kept.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::error::FeedsError;
use crate::model::Bookmark;
use crate::transport::Transport;

/// Substring identifying a shortened URL.
pub const SHORTENED_URL_MARKER: &str = "icio.us/+";

/// Target parameter in the redirector's `Location` header, up to the next `&`.
static TARGET_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"url=([^&]*)"));

/// Compiles a regex literal that is known to be valid.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Returns true when `url` points at the shortener.
#[must_use]
pub fn is_shortened(url: &str) -> bool {
    url.contains(SHORTENED_URL_MARKER)
}

/// Extracts the `url=` value from a redirect location, as found.
///
/// An empty value (`url=&...`) is returned as an empty string.
#[must_use]
pub fn extract_target(location: &str) -> Option<&str> {
    TARGET_PARAM_RE
        .captures(location)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Expands shortened URLs with one non-following request each.
#[derive(Clone)]
pub struct UrlExpander {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for UrlExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlExpander").finish_non_exhaustive()
    }
}

impl UrlExpander {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Returns the redirect target of a shortened `url`, or `url` unchanged.
    ///
    /// An empty `url` is returned as-is. URLs without the shortener marker
    /// never touch the network.
    ///
    /// # Errors
    ///
    /// Returns [`FeedsError::Validation`] when `url` is non-empty and
    /// `user_agent` is empty.
    #[instrument(skip(self, user_agent))]
    pub fn expand(&self, url: &str, user_agent: &str) -> Result<String, FeedsError> {
        if url.is_empty() {
            return Ok(String::new());
        }
        if user_agent.is_empty() {
            return Err(FeedsError::validation("user agent must not be empty"));
        }
        if !is_shortened(url) {
            return Ok(url.to_string());
        }

        match self.transport.redirect_location(url, user_agent) {
            Ok(Some(location)) => match extract_target(&location) {
                Some(target) => {
                    debug!(expanded = target, "expanded shortened url");
                    Ok(target.to_string())
                }
                None => {
                    debug!(location, "redirect location has no url parameter");
                    Ok(url.to_string())
                }
            },
            Ok(None) => {
                debug!("shortener answered without a location");
                Ok(url.to_string())
            }
            Err(error) => {
                warn!(%error, "url expansion failed, keeping original");
                Ok(url.to_string())
            }
        }
    }

    /// Expands the URL of every bookmark in place, one at a time.
    ///
    /// # Errors
    ///
    /// Returns [`FeedsError::Validation`] when `user_agent` is empty and some
    /// bookmark has a URL.
    pub fn expand_all(&self, bookmarks: &mut [Bookmark], user_agent: &str) -> Result<(), FeedsError> {
        for bookmark in bookmarks.iter_mut() {
            bookmark.url = self.expand(&bookmark.url, user_agent)?;
        }
        Ok(())
    }
}
