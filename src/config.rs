//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::FeedsError;
use crate::user_agent;

/// Base URL of the Delicious Feeds v2 JSON API.
pub const DEFAULT_ENDPOINT: &str = "http://feeds.delicious.com/v2/json/";

/// Fixed delay inserted before each request when pacing is enabled.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_secs(1);

/// Default HTTP connect timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout (30 seconds).
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Settings for a [`FeedsClient`](crate::FeedsClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedsConfig {
    /// Base URL every feed path is appended to.
    pub endpoint: String,
    /// User-Agent sent with every request, including redirect probes.
    pub user_agent: String,
    /// Resolve shortened `icio.us/+` URLs in bookmark results.
    pub expand_urls: bool,
    /// Sleep [`pacing_delay`](Self::pacing_delay) before every request.
    pub pace_requests: bool,
    pub pacing_delay: Duration,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: user_agent::default_user_agent(),
            expand_urls: false,
            pace_requests: false,
            pacing_delay: DEFAULT_PACING_DELAY,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

impl FeedsConfig {
    /// Validates values that would otherwise only fail at request time.
    ///
    /// # Errors
    ///
    /// Returns [`FeedsError::Validation`] for an empty user agent, an endpoint
    /// that is not an absolute URL, or a timeout outside `1..=3600` seconds.
    pub fn validate(&self) -> Result<(), FeedsError> {
        if self.user_agent.trim().is_empty() {
            return Err(FeedsError::validation("user agent must not be empty"));
        }
        if Url::parse(&self.endpoint).is_err() {
            return Err(FeedsError::validation(format!(
                "endpoint must be an absolute URL, got '{}'",
                self.endpoint
            )));
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: u64) -> Result<(), FeedsError> {
    if !(1..=3600).contains(&value) {
        return Err(FeedsError::validation(format!(
            "`{field}` must be in 1..=3600, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FeedsConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.expand_urls);
        assert!(!config.pace_requests);
        assert_eq!(config.pacing_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_validate_rejects_blank_user_agent() {
        let config = FeedsConfig {
            user_agent: "  ".to_string(),
            ..FeedsConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, FeedsError::Validation { .. }));
        assert!(err.to_string().contains("user agent"));
    }

    #[test]
    fn test_validate_rejects_relative_endpoint() {
        let config = FeedsConfig {
            endpoint: "feeds/v2/json".to_string(),
            ..FeedsConfig::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("endpoint"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = FeedsConfig {
            read_timeout_secs: 0,
            ..FeedsConfig::default()
        };
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("read_timeout_secs")
        );
    }
}
