//! Request assembly and execution.
//!
//! A [`FeedRequest`] is the path and query of one feed call. The
//! [`RequestPipeline`] joins it to the endpoint, paces, sends it through the
//! [`Transport`] and classifies the outcome.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::classify::{RequestOutcome, classify};
use crate::error::FeedsError;
use crate::pacer::Pacer;
use crate::transport::Transport;

/// Placeholder substituted for the private key wherever a URL is displayed.
const REDACTED: &str = "<redacted>";

/// Path segments, tags and query parameters of one feed call.
///
/// Segments and tags are percent-encoded individually; tags are joined with
/// `+` into a single trailing segment. The query carries `private` before
/// `count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    segments: Vec<String>,
    tags: Vec<String>,
    private_key: Option<String>,
    count: Option<u32>,
}

impl FeedRequest {
    /// Starts a request at `first_segment`, e.g. `recent` or a username.
    pub fn new(first_segment: impl Into<String>) -> Self {
        Self {
            segments: vec![first_segment.into()],
            tags: Vec::new(),
            private_key: None,
            count: None,
        }
    }

    /// Appends a path segment.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Appends a `+`-joined tag segment. An empty iterator appends nothing.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags
            .extend(tags.into_iter().map(|tag| tag.as_ref().to_string()));
        self
    }

    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// Full request URL under `endpoint`.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        self.render(endpoint, false)
    }

    /// Request URL with the private key replaced, safe for messages and logs.
    #[must_use]
    pub fn display_url(&self, endpoint: &str) -> String {
        self.render(endpoint, true)
    }

    fn render(&self, endpoint: &str, redact_key: bool) -> String {
        let mut url = endpoint.trim_end_matches('/').to_string();
        for segment in &self.segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        if !self.tags.is_empty() {
            let joined: Vec<_> = self
                .tags
                .iter()
                .map(|tag| urlencoding::encode(tag))
                .collect();
            url.push('/');
            url.push_str(&joined.join("+"));
        }

        let mut query = Vec::new();
        if let Some(key) = &self.private_key {
            if redact_key {
                query.push(format!("private={REDACTED}"));
            } else {
                query.push(format!("private={}", urlencoding::encode(key)));
            }
        }
        if let Some(count) = self.count {
            query.push(format!("count={count}"));
        }
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }
}

/// Executes feed requests against one endpoint with one user agent.
#[derive(Clone)]
pub struct RequestPipeline {
    transport: Arc<dyn Transport>,
    endpoint: String,
    user_agent: String,
    pacer: Pacer,
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("endpoint", &self.endpoint)
            .field("user_agent", &self.user_agent)
            .field("pacer", &self.pacer)
            .finish_non_exhaustive()
    }
}

impl RequestPipeline {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: impl Into<String>,
        user_agent: impl Into<String>,
        pacer: Pacer,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            user_agent: user_agent.into(),
            pacer,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Paces when `pacing_enabled`, then issues one GET and classifies it.
    #[instrument(skip(self, request), fields(url = %request.display_url(&self.endpoint)))]
    pub fn execute_request(&self, request: &FeedRequest, pacing_enabled: bool) -> RequestOutcome {
        self.pacer.before_request(pacing_enabled);
        let outcome = classify(self.transport.get(&request.url(&self.endpoint), &self.user_agent));
        debug!(
            success = matches!(outcome, RequestOutcome::Success(_)),
            "request executed"
        );
        outcome
    }

    /// [`execute_request`](Self::execute_request) with the outcome converted
    /// into a body or an error.
    ///
    /// # Errors
    ///
    /// Returns [`FeedsError::Banned`] on HTTP 503 and
    /// [`FeedsError::RequestFailed`] on any other transport failure.
    pub fn execute(&self, request: &FeedRequest, pacing_enabled: bool) -> Result<String, FeedsError> {
        self.execute_request(request, pacing_enabled)
            .into_body(&request.display_url(&self.endpoint))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::transport::TransportError;

    const ENDPOINT: &str = "http://feeds.example/v2/json/";

    /// Records requested URLs and replays one canned result.
    struct RecordingTransport {
        status: Option<u16>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl RecordingTransport {
        fn ok() -> Self {
            Self {
                status: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                status: Some(status),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for RecordingTransport {
        fn get(&self, url: &str, user_agent: &str) -> Result<String, TransportError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), user_agent.to_string()));
            match self.status {
                Some(status) => Err(TransportError::http_status(url, status)),
                None => Ok("[]".to_string()),
            }
        }

        fn redirect_location(&self, _: &str, _: &str) -> Result<Option<String>, TransportError> {
            Ok(None)
        }
    }

    fn pipeline(transport: Arc<RecordingTransport>) -> RequestPipeline {
        RequestPipeline::new(transport, ENDPOINT, "feeds-test/1.0", Pacer::new(Duration::ZERO))
    }

    #[test]
    fn test_url_simple_feed() {
        assert_eq!(
            FeedRequest::new("recent").count(10).url(ENDPOINT),
            "http://feeds.example/v2/json/recent?count=10"
        );
    }

    #[test]
    fn test_url_without_query() {
        assert_eq!(
            FeedRequest::new("userinfo").segment("alice").url(ENDPOINT),
            "http://feeds.example/v2/json/userinfo/alice"
        );
    }

    #[test]
    fn test_url_tags_joined_with_plus_and_encoded() {
        let request = FeedRequest::new("tag").tags(["rust", "c++", "new york"]).count(5);
        assert_eq!(
            request.url(ENDPOINT),
            "http://feeds.example/v2/json/tag/rust+c%2B%2B+new%20york?count=5"
        );
    }

    #[test]
    fn test_url_private_before_count() {
        let request = FeedRequest::new("alice").private_key("s3cr&t").count(20);
        assert_eq!(
            request.url(ENDPOINT),
            "http://feeds.example/v2/json/alice?private=s3cr%26t&count=20"
        );
        assert_eq!(
            request.display_url(ENDPOINT),
            "http://feeds.example/v2/json/alice?private=<redacted>&count=20"
        );
    }

    #[test]
    fn test_url_endpoint_without_trailing_slash() {
        assert_eq!(
            FeedRequest::new("popular").url("http://feeds.example/v2/json"),
            "http://feeds.example/v2/json/popular"
        );
    }

    #[test]
    fn test_execute_sends_user_agent() {
        let transport = Arc::new(RecordingTransport::ok());
        let body = pipeline(Arc::clone(&transport))
            .execute(&FeedRequest::new("recent").count(10), false)
            .unwrap();

        assert_eq!(body, "[]");
        let requests = transport.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            [(
                "http://feeds.example/v2/json/recent?count=10".to_string(),
                "feeds-test/1.0".to_string()
            )]
        );
    }

    #[test]
    fn test_execute_503_is_banned_without_key_in_message() {
        let transport = Arc::new(RecordingTransport::failing(503));
        let err = pipeline(transport)
            .execute(&FeedRequest::new("alice").private_key("secret"), false)
            .unwrap_err();

        assert!(err.is_banned());
        match err {
            FeedsError::Banned { url, .. } => assert!(!url.contains("secret")),
            other => panic!("Expected Banned error, got: {other:?}"),
        }
    }

    #[test]
    fn test_execute_other_status_is_request_failed() {
        let transport = Arc::new(RecordingTransport::failing(500));
        let err = pipeline(transport)
            .execute(&FeedRequest::new("alice").private_key("secret"), false)
            .unwrap_err();

        assert!(matches!(err, FeedsError::RequestFailed { .. }));
        assert!(!err.to_string().contains("secret"));
    }
}
