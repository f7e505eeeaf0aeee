//! Fixed-delay request pacing.
//!
//! The feed API enforces an undocumented rate limit and answers HTTP 503 to
//! clients that exceed it. The [`Pacer`] inserts one blocking sleep on the
//! calling thread immediately before a request is sent. It keeps no state
//! between calls: threads that need to share a budget must share a pacer
//! *and* serialize their requests themselves.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use delicious_feeds::Pacer;
//!
//! let pacer = Pacer::new(Duration::from_millis(10));
//! pacer.before_request(true); // sleeps 10ms
//! pacer.before_request(false); // returns immediately
//! ```

use std::thread;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::config::DEFAULT_PACING_DELAY;

/// Blocking fixed-delay pacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_PACING_DELAY)
    }
}

impl Pacer {
    /// Creates a pacer that sleeps for `delay` before each paced request.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Returns the delay applied before each paced request.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Blocks for the configured delay when `enabled`, otherwise returns at once.
    #[instrument(level = "debug", skip(self), fields(delay = ?self.delay))]
    pub fn before_request(&self, enabled: bool) {
        if !enabled {
            return;
        }
        debug!("waiting before request to stay under the API limit");
        thread::sleep(self.delay);
    }
}
