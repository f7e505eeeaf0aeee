//! The public feed queries.
//!
//! Every query validates its arguments before touching the network, builds a
//! [`FeedRequest`], runs it through the [`RequestPipeline`] and decodes the
//! body. `Ok(None)` means the feed had nothing for the query.

use std::collections::BTreeSet;
use std::sync::Arc;

use md5::{Digest, Md5};
use tracing::{debug, info, instrument};

use crate::classify::{ContextPair, build_error};
use crate::config::FeedsConfig;
use crate::decode::{self, DecodeError};
use crate::error::FeedsError;
use crate::expand::UrlExpander;
use crate::model::{Bookmark, Tag, UrlInfo, User, UserInfo};
use crate::pacer::Pacer;
use crate::pipeline::{FeedRequest, RequestPipeline};
use crate::transport::{HttpTransport, Transport};

/// Number of bookmarks requested when the caller has no preference.
pub const DEFAULT_COUNT: u32 = 10;

/// Largest `count` the API accepts.
pub const MAX_COUNT: u32 = 100;

/// Blocking client for the feed API.
///
/// # Example
///
/// ```no_run
/// use delicious_feeds::{FeedsClient, FeedsConfig, DEFAULT_COUNT};
///
/// # fn example() -> Result<(), delicious_feeds::FeedsError> {
/// let client = FeedsClient::new(FeedsConfig::default())?;
/// if let Some(bookmarks) = client.find_bookmarks_by_tags(DEFAULT_COUNT, &["rust"])? {
///     for bookmark in bookmarks {
///         println!("{} {}", bookmark.title, bookmark.url);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FeedsClient {
    config: FeedsConfig,
    pipeline: RequestPipeline,
    expander: UrlExpander,
}

impl FeedsClient {
    /// Creates a client over a pooled HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`FeedsError::Validation`] for an invalid `config` and
    /// [`FeedsError::RequestFailed`] if the HTTP client cannot be built.
    pub fn new(config: FeedsConfig) -> Result<Self, FeedsError> {
        config.validate()?;
        let transport =
            HttpTransport::with_timeouts(config.connect_timeout_secs, config.read_timeout_secs)
                .map_err(|e| FeedsError::request_failed("Error while creating HTTP transport", e))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client over any [`Transport`].
    ///
    /// # Errors
    ///
    /// Returns [`FeedsError::Validation`] for an invalid `config`.
    pub fn with_transport(
        config: FeedsConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, FeedsError> {
        config.validate()?;
        info!(
            endpoint = %config.endpoint,
            expand_urls = config.expand_urls,
            pace_requests = config.pace_requests,
            "feeds client configured"
        );
        let pipeline = RequestPipeline::new(
            Arc::clone(&transport),
            config.endpoint.clone(),
            config.user_agent.clone(),
            Pacer::new(config.pacing_delay),
        );
        Ok(Self {
            config,
            pipeline,
            expander: UrlExpander::new(transport),
        })
    }

    #[must_use]
    pub fn config(&self) -> &FeedsConfig {
        &self.config
    }

    /// Most recent public bookmarks.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_bookmarks(&self, count: u32) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        self.fetch_bookmarks(
            &FeedRequest::new("recent").count(count),
            "Error while finding bookmarks",
            &[ContextPair::new("count", count)],
        )
    }

    /// Currently popular bookmarks.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_popular_bookmarks(&self, count: u32) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        self.fetch_bookmarks(
            &FeedRequest::new("popular").count(count),
            "Error while finding popular bookmarks",
            &[ContextPair::new("count", count)],
        )
    }

    /// Recent bookmarks carrying all of `tags`.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_bookmarks_by_tags<S: AsRef<str>>(
        &self,
        count: u32,
        tags: &[S],
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        validate_tags(tags)?;
        self.fetch_bookmarks(
            &FeedRequest::new("tag").tags(tags).count(count),
            "Error while finding bookmarks by tags",
            &[ContextPair::new("count", count), tags_pair(tags)],
        )
    }

    /// Popular bookmarks carrying all of `tags`.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_popular_bookmarks_by_tags<S: AsRef<str>>(
        &self,
        count: u32,
        tags: &[S],
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        validate_tags(tags)?;
        self.fetch_bookmarks(
            &FeedRequest::new("popular").tags(tags).count(count),
            "Error while finding popular bookmarks by tags",
            &[ContextPair::new("count", count), tags_pair(tags)],
        )
    }

    /// Public bookmarks of `user`.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_bookmarks_by_user(
        &self,
        count: u32,
        user: &str,
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        require("username", user)?;
        self.fetch_bookmarks(
            &FeedRequest::new(user).count(count),
            "Error while finding bookmarks by user",
            &[ContextPair::new("count", count), ContextPair::new("user", user)],
        )
    }

    /// Public and private bookmarks of `user`, authorized by their private feed key.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_private_bookmarks_by_user(
        &self,
        count: u32,
        user: &str,
        key: &str,
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        require("username", user)?;
        require("key", key)?;
        self.fetch_bookmarks(
            &FeedRequest::new(user).private_key(key).count(count),
            "Error while finding private bookmarks by user",
            &[
                ContextPair::new("count", count),
                ContextPair::new("user", user),
                ContextPair::redacted("key"),
            ],
        )
    }

    /// Public bookmarks of `user` carrying all of `tags`.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_bookmarks_by_user_and_tags<S: AsRef<str>>(
        &self,
        count: u32,
        user: &str,
        tags: &[S],
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        require("username", user)?;
        validate_tags(tags)?;
        self.fetch_bookmarks(
            &FeedRequest::new(user).tags(tags).count(count),
            "Error while finding bookmarks by user and tags",
            &[
                ContextPair::new("count", count),
                ContextPair::new("user", user),
                tags_pair(tags),
            ],
        )
    }

    /// Public and private bookmarks of `user` carrying all of `tags`.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_private_bookmarks_by_user_and_tags<S: AsRef<str>>(
        &self,
        count: u32,
        user: &str,
        key: &str,
        tags: &[S],
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        require("username", user)?;
        require("key", key)?;
        validate_tags(tags)?;
        self.fetch_bookmarks(
            &FeedRequest::new(user).tags(tags).private_key(key).count(count),
            "Error while finding private bookmarks by user and tags",
            &[
                ContextPair::new("count", count),
                ContextPair::new("user", user),
                ContextPair::redacted("key"),
                tags_pair(tags),
            ],
        )
    }

    /// Bookmarks other users sent to `user`'s inbox.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_private_inbox_bookmarks_by_user(
        &self,
        count: u32,
        user: &str,
        key: &str,
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        require("username", user)?;
        require("key", key)?;
        self.fetch_bookmarks(
            &FeedRequest::new("inbox").segment(user).private_key(key).count(count),
            "Error while finding private inbox bookmarks by user",
            &[
                ContextPair::new("count", count),
                ContextPair::new("user", user),
                ContextPair::redacted("key"),
            ],
        )
    }

    /// Bookmarks from the network of users `user` follows.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_network_bookmarks_by_user(
        &self,
        count: u32,
        user: &str,
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        require("username", user)?;
        self.fetch_bookmarks(
            &FeedRequest::new("network").segment(user).count(count),
            "Error while finding network bookmarks by user",
            &[ContextPair::new("count", count), ContextPair::new("user", user)],
        )
    }

    /// Network bookmarks of `user` carrying all of `tags`.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_network_bookmarks_by_user_and_tags<S: AsRef<str>>(
        &self,
        count: u32,
        user: &str,
        tags: &[S],
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        require("username", user)?;
        validate_tags(tags)?;
        self.fetch_bookmarks(
            &FeedRequest::new("network").segment(user).tags(tags).count(count),
            "Error while finding network bookmarks by user and tags",
            &[
                ContextPair::new("count", count),
                ContextPair::new("user", user),
                tags_pair(tags),
            ],
        )
    }

    /// Recent bookmarks of `url` by any user.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_bookmarks_by_url(
        &self,
        count: u32,
        url: &str,
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        validate_count(count)?;
        require("url", url)?;
        self.fetch_bookmarks(
            &FeedRequest::new("url").segment(url_hash(url)).count(count),
            "Error while finding bookmarks by url",
            &[ContextPair::new("count", count), ContextPair::new("url", url)],
        )
    }

    /// Public summary of `user`: bookmark, following and follower counts.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_public_user_summary(&self, user: &str) -> Result<Option<UserInfo>, FeedsError> {
        require("username", user)?;
        self.fetch(
            &FeedRequest::new("userinfo").segment(user),
            "Error while finding public user summary",
            &[ContextPair::new("user", user)],
            |body| decode::decode_user_info(user, body),
        )
    }

    /// Public tags of `user` with their use counts.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_public_tags_by_user(&self, user: &str) -> Result<Option<BTreeSet<Tag>>, FeedsError> {
        require("username", user)?;
        self.fetch(
            &FeedRequest::new("tags").segment(user),
            "Error while finding public tags by user",
            &[ContextPair::new("user", user)],
            decode::decode_tags,
        )
    }

    /// Public tags of `user` that co-occur with `tags`.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_related_public_tags_by_user_and_tags<S: AsRef<str>>(
        &self,
        user: &str,
        tags: &[S],
    ) -> Result<Option<BTreeSet<Tag>>, FeedsError> {
        require("username", user)?;
        validate_tags(tags)?;
        self.fetch(
            &FeedRequest::new("tags").segment(user).tags(tags),
            "Error while finding related public tags by user and tags",
            &[ContextPair::new("user", user), tags_pair(tags)],
            decode::decode_tags,
        )
    }

    /// Users in `user`'s network.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_network_members_by_user(
        &self,
        user: &str,
    ) -> Result<Option<BTreeSet<User>>, FeedsError> {
        require("username", user)?;
        self.fetch(
            &FeedRequest::new("networkmembers").segment(user),
            "Error while finding network members by user",
            &[ContextPair::new("user", user)],
            decode::decode_users,
        )
    }

    /// Summary of `url`: title, post count and top tags.
    ///
    /// # Errors
    ///
    /// See [`FeedsError`].
    pub fn find_url_info_by_url(&self, url: &str) -> Result<Option<UrlInfo>, FeedsError> {
        require("url", url)?;
        self.fetch(
            &FeedRequest::new("urlinfo").segment(url_hash(url)),
            "Error while finding url info by url",
            &[ContextPair::new("url", url)],
            decode::decode_url_info,
        )
    }

    fn fetch_bookmarks(
        &self,
        request: &FeedRequest,
        message: &str,
        pairs: &[ContextPair],
    ) -> Result<Option<Vec<Bookmark>>, FeedsError> {
        let mut bookmarks = self.fetch(request, message, pairs, decode::decode_bookmarks)?;
        if self.config.expand_urls
            && let Some(bookmarks) = bookmarks.as_mut()
        {
            self.expander
                .expand_all(bookmarks, &self.config.user_agent)?;
        }
        Ok(bookmarks)
    }

    #[instrument(level = "debug", skip(self, request, pairs, decode))]
    fn fetch<T>(
        &self,
        request: &FeedRequest,
        message: &str,
        pairs: &[ContextPair],
        decode: impl FnOnce(&str) -> Result<Option<T>, DecodeError>,
    ) -> Result<Option<T>, FeedsError> {
        let body = self.pipeline.execute(request, self.config.pace_requests)?;
        let decoded = decode(&body).map_err(|e| build_error(e, &body, message, pairs))?;
        if decoded.is_none() {
            debug!("feed returned no results");
        }
        Ok(decoded)
    }
}

/// Hex MD5 digest of `url`, the key of the url and urlinfo feeds.
#[must_use]
pub fn url_hash(url: &str) -> String {
    hex::encode(Md5::digest(url.as_bytes()))
}

fn validate_count(count: u32) -> Result<(), FeedsError> {
    if !(1..=MAX_COUNT).contains(&count) {
        return Err(FeedsError::validation(format!(
            "count has to be a value from 1 to {MAX_COUNT}, got {count}"
        )));
    }
    Ok(())
}

fn require(name: &str, value: &str) -> Result<(), FeedsError> {
    if value.is_empty() {
        return Err(FeedsError::validation(format!("{name} must not be empty")));
    }
    Ok(())
}

fn validate_tags<S: AsRef<str>>(tags: &[S]) -> Result<(), FeedsError> {
    if tags.is_empty() {
        return Err(FeedsError::validation("tags must not be empty"));
    }
    if tags.iter().any(|tag| tag.as_ref().is_empty()) {
        return Err(FeedsError::validation("tags must not contain an empty tag"));
    }
    Ok(())
}

fn tags_pair<S: AsRef<str>>(tags: &[S]) -> ContextPair {
    let names: Vec<&str> = tags.iter().map(|tag| tag.as_ref()).collect();
    ContextPair::new("tags", format!("[{}]", names.join(", ")))
}
