//! Delicious Feeds Client Library
//!
//! A blocking client for the Delicious Feeds v2 JSON API: recent, popular,
//! tagged, per-user, network and per-URL bookmark feeds plus user, tag and
//! URL summaries.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`feeds`] - The public queries ([`FeedsClient`])
//! - [`pipeline`] - Request assembly and execution
//! - [`transport`] - Blocking HTTP GET and redirect probing
//! - [`pacer`] - Fixed delay before each request
//! - [`classify`] - Outcome classification and error construction
//! - [`decode`] - Normalization of the feed's inconsistent JSON shapes
//! - [`expand`] - Resolution of shortened `icio.us/+` URLs
//! - [`model`] - Domain records
//!
//! # Example
//!
//! ```no_run
//! use delicious_feeds::{FeedsClient, FeedsConfig};
//!
//! # fn example() -> Result<(), delicious_feeds::FeedsError> {
//! let config = FeedsConfig {
//!     user_agent: "my-app/1.0 (+mailto:me@example.com)".to_string(),
//!     pace_requests: true,
//!     ..FeedsConfig::default()
//! };
//! let client = FeedsClient::new(config)?;
//! if let Some(info) = client.find_public_user_summary("alice")? {
//!     println!("{} has {} bookmarks", info.user, info.items);
//! }
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod decode;
pub mod error;
pub mod expand;
pub mod feeds;
pub mod model;
pub mod pacer;
pub mod pipeline;
pub mod transport;
mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use classify::{ContextPair, RequestOutcome, build_error, build_pair, classify};
pub use config::FeedsConfig;
pub use decode::DecodeError;
pub use error::{BANNED_MESSAGE, FailureCause, FeedsError};
pub use expand::UrlExpander;
pub use feeds::{DEFAULT_COUNT, FeedsClient, MAX_COUNT, url_hash};
pub use model::{ApiError, Bookmark, Tag, UrlInfo, User, UserInfo, UserInfoDetail};
pub use pacer::Pacer;
pub use pipeline::{FeedRequest, RequestPipeline};
pub use transport::{HttpTransport, Transport, TransportError};
