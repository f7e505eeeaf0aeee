//! Blocking HTTP transport for feed requests and redirect probing.
//!
//! The [`Transport`] trait is the seam between the request pipeline and the
//! network. [`HttpTransport`] is the production implementation over a pooled
//! `reqwest` blocking client; tests substitute scripted fakes.
//!
//! # Example
//!
//! ```no_run
//! use delicious_feeds::transport::{HttpTransport, Transport};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new();
//! let body = transport.get("http://feeds.delicious.com/v2/json/recent?count=5", "my-app/1.0")?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::HttpTransport;
pub use error::TransportError;

/// A synchronous HTTP GET primitive.
///
/// Implementations must be safe to share between threads: one transport is
/// constructed per client and borrowed by every call.
pub trait Transport: Send + Sync {
    /// Executes a GET with the given User-Agent, following redirects, and
    /// returns the response body.
    ///
    /// # Errors
    ///
    /// Non-2xx responses are reported as [`TransportError::HttpStatus`];
    /// connection and read failures as the other variants.
    fn get(&self, url: &str, user_agent: &str) -> Result<String, TransportError>;

    /// Executes a GET without following redirects and returns the `Location`
    /// header of the response, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request itself fails.
    fn redirect_location(&self, url: &str, user_agent: &str)
    -> Result<Option<String>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn get(&self, url: &str, user_agent: &str) -> Result<String, TransportError> {
        (**self).get(url, user_agent)
    }

    fn redirect_location(
        &self,
        url: &str,
        user_agent: &str,
    ) -> Result<Option<String>, TransportError> {
        (**self).redirect_location(url, user_agent)
    }
}
