//! Normalization of the feed API's loosely-typed JSON into typed records.
//!
//! The API is inconsistent about top-level shapes: some endpoints answer with
//! a single object where an array is documented, summaries come back as
//! `{"name": count}` maps, and empty results are sometimes an empty body,
//! sometimes `null` and sometimes `[]`. Every decode function here first
//! classifies the body into a [`Document`], then applies one explicit rule per
//! shape:
//!
//! - an empty/blank body, `null`, or an empty collection is "not found"
//!   (`Ok(None)`), never an empty container
//! - a single object where an array is expected is a one-element array
//! - anything else that does not fit is a [`DecodeError`] naming the shape

mod error;

use std::collections::BTreeSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::model::{ApiError, Bookmark, Tag, UrlInfo, User, UserInfo, UserInfoDetail, tags_from_counts};

pub use error::DecodeError;

/// The record shapes a response body can be decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Bookmarks,
    Tags,
    Users,
    UserInfoDetails,
    UrlInfo,
    ApiError,
}

impl Shape {
    /// Returns the stable label used in logs and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bookmarks => "bookmarks",
            Self::Tags => "tags",
            Self::Users => "users",
            Self::UserInfoDetails => "user info details",
            Self::UrlInfo => "url info",
            Self::ApiError => "api error",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member holding the payload of an API error entry.
const API_ERROR_MEMBER: &str = "result";

/// Top-level classification of a response body.
#[derive(Debug)]
enum Document {
    /// Empty or blank body, or a literal `null`.
    Absent,
    Object(Map<String, Value>),
    Array(Vec<Value>),
    /// A string, number or boolean at the top level.
    Scalar(&'static str),
}

fn parse_document(body: &str, shape: Shape) -> Result<Document, DecodeError> {
    debug!(%shape, "decoding response body");
    trace!(%shape, body, "raw response body");

    if body.trim().is_empty() {
        debug!(%shape, "nothing to decode, body was empty");
        return Ok(Document::Absent);
    }

    let root: Value =
        serde_json::from_str(body).map_err(|source| DecodeError::malformed(shape, source))?;

    Ok(match root {
        Value::Null => Document::Absent,
        Value::Object(map) => Document::Object(map),
        Value::Array(items) => Document::Array(items),
        other => Document::Scalar(json_kind(&other)),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Applies the array rules: a lone object becomes a one-element array.
fn array_elements(document: Document, shape: Shape) -> Result<Option<Vec<Value>>, DecodeError> {
    match document {
        Document::Absent => Ok(None),
        Document::Array(items) if items.is_empty() => {
            debug!(%shape, "no entries found, collection was empty");
            Ok(None)
        }
        Document::Array(items) => Ok(Some(items)),
        Document::Object(map) => {
            debug!(%shape, "single object where an array was expected, treating as one element");
            Ok(Some(vec![Value::Object(map)]))
        }
        Document::Scalar(found) => Err(DecodeError::unexpected_shape(shape, "an array", found)),
    }
}

fn decode_elements<T: DeserializeOwned>(
    body: &str,
    shape: Shape,
) -> Result<Option<Vec<T>>, DecodeError> {
    let document = parse_document(body, shape)?;
    let Some(elements) = array_elements(document, shape)? else {
        return Ok(None);
    };
    elements
        .into_iter()
        .map(|element| {
            if is_api_error_entry(&element) {
                debug!(%shape, "element is an api error entry");
                return Err(DecodeError::unexpected_shape(
                    shape,
                    "a record object",
                    "an api error entry",
                ));
            }
            serde_json::from_value(element).map_err(|source| DecodeError::malformed(shape, source))
        })
        .collect::<Result<Vec<T>, _>>()
        .map(Some)
}

// Record fields all default, so an error entry would otherwise decode as an empty record.
fn is_api_error_entry(element: &Value) -> bool {
    element.get(API_ERROR_MEMBER).is_some()
}

/// Decodes a bookmark feed, preserving response order.
///
/// # Errors
///
/// Returns [`DecodeError`] when the body is not valid JSON or an element is
/// not a bookmark object.
pub fn decode_bookmarks(body: &str) -> Result<Option<Vec<Bookmark>>, DecodeError> {
    let bookmarks = decode_elements::<Bookmark>(body, Shape::Bookmarks)?;
    if let Some(bookmarks) = &bookmarks {
        debug!(count = bookmarks.len(), "decoded bookmarks");
    }
    Ok(bookmarks)
}

/// Decodes a `{"name": count}` object into tags ordered by name.
///
/// # Errors
///
/// Returns [`DecodeError`] when the body is not an object of non-negative
/// integer counts.
pub fn decode_tags(body: &str) -> Result<Option<BTreeSet<Tag>>, DecodeError> {
    let shape = Shape::Tags;
    let map = match parse_document(body, shape)? {
        Document::Absent => return Ok(None),
        Document::Array(items) if items.is_empty() => return Ok(None),
        Document::Object(map) => map,
        Document::Array(_) => {
            return Err(DecodeError::unexpected_shape(shape, "an object", "an array"));
        }
        Document::Scalar(found) => {
            return Err(DecodeError::unexpected_shape(shape, "an object", found));
        }
    };

    if map.is_empty() {
        debug!(%shape, "no entries found, collection was empty");
        return Ok(None);
    }

    let counts = serde_json::from_value(Value::Object(map))
        .map_err(|source| DecodeError::malformed(shape, source))?;
    let tags = tags_from_counts(counts);
    debug!(count = tags.len(), "decoded tags");
    Ok(Some(tags))
}

/// Decodes a network member list.
///
/// # Errors
///
/// Returns [`DecodeError`] when the body is not valid JSON or an element is
/// not a member object.
pub fn decode_users(body: &str) -> Result<Option<BTreeSet<User>>, DecodeError> {
    let Some(users) = decode_elements::<User>(body, Shape::Users)? else {
        return Ok(None);
    };
    debug!(count = users.len(), "decoded users");
    Ok(Some(users.into_iter().collect()))
}

/// Decodes the raw `userinfo` entries and folds them into a [`UserInfo`] for `user`.
///
/// # Errors
///
/// Returns [`DecodeError`] when the body is not valid JSON or an element is
/// not a detail object.
pub fn decode_user_info(user: &str, body: &str) -> Result<Option<UserInfo>, DecodeError> {
    let Some(details) = decode_elements::<UserInfoDetail>(body, Shape::UserInfoDetails)? else {
        return Ok(None);
    };
    debug!(count = details.len(), "decoded user info details");
    Ok(Some(UserInfo::from_details(user, details.into_iter().collect())))
}

/// Decodes a `urlinfo` response, which must hold exactly one entry.
///
/// Zero or several entries are "not found" rather than an error.
///
/// # Errors
///
/// Returns [`DecodeError`] when the body is not valid JSON or an element is
/// not a url-info object.
pub fn decode_url_info(body: &str) -> Result<Option<UrlInfo>, DecodeError> {
    let Some(mut infos) = decode_elements::<UrlInfo>(body, Shape::UrlInfo)? else {
        return Ok(None);
    };
    if infos.len() != 1 {
        debug!(count = infos.len(), "expected exactly one url info entry");
        return Ok(None);
    }
    Ok(infos.pop())
}

/// Detects an API error payload: `[{"result": {"message": ..., "code": ...}}]`.
///
/// Any mismatch yields `None`; this never fails.
#[must_use]
pub fn decode_api_error(body: &str) -> Option<ApiError> {
    let shape = Shape::ApiError;
    let document = match parse_document(body, shape) {
        Ok(document) => document,
        Err(error) => {
            debug!(%error, "body is not an api error payload");
            return None;
        }
    };

    let Document::Array(mut items) = document else {
        debug!("api error payload must be an array");
        return None;
    };
    if items.len() != 1 {
        debug!(entries = items.len(), "api error payload must have exactly one entry");
        return None;
    }

    let Some(result) = items
        .pop()
        .and_then(|mut entry| entry.get_mut(API_ERROR_MEMBER).map(Value::take))
    else {
        debug!("api error payload has no 'result' member");
        return None;
    };

    serde_json::from_value::<ApiError>(result)
        .inspect_err(|error| debug!(%error, "'result' member is not an api error"))
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BOOKMARK: &str = r#"{"a":"u1","d":"T","n":"","u":"http://x","t":["a","b"],"dt":"2012-10-22T13:40:31Z","md5":"m"}"#;

    #[test]
    fn test_empty_bodies_are_not_found_for_every_shape() {
        for body in ["", "   ", "\n", "null", " null "] {
            assert!(decode_bookmarks(body).unwrap().is_none(), "bookmarks: {body:?}");
            assert!(decode_tags(body).unwrap().is_none(), "tags: {body:?}");
            assert!(decode_users(body).unwrap().is_none(), "users: {body:?}");
            assert!(decode_user_info("u", body).unwrap().is_none(), "userinfo: {body:?}");
            assert!(decode_url_info(body).unwrap().is_none(), "urlinfo: {body:?}");
        }
    }

    #[test]
    fn test_empty_collections_are_not_found() {
        assert!(decode_bookmarks("[]").unwrap().is_none());
        assert!(decode_tags("{}").unwrap().is_none());
        assert!(decode_tags("[]").unwrap().is_none());
        assert!(decode_users("[]").unwrap().is_none());
        assert!(decode_user_info("u", "[]").unwrap().is_none());
        assert!(decode_url_info("[]").unwrap().is_none());
    }

    #[test]
    fn test_decode_bookmarks_sample() {
        let bookmarks = decode_bookmarks(&format!("[{BOOKMARK}]")).unwrap().unwrap();
        assert_eq!(bookmarks.len(), 1);
        assert_eq!(bookmarks[0].user, "u1");
        assert_eq!(bookmarks[0].title, "T");
        assert_eq!(
            bookmarks[0].tags,
            BTreeSet::from(["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_single_object_decodes_like_one_element_array() {
        let from_object = decode_bookmarks(BOOKMARK).unwrap();
        let from_array = decode_bookmarks(&format!("[{BOOKMARK}]")).unwrap();
        assert_eq!(from_object, from_array);

        let member = r#"{"user":"testuser","dt":"2012-10-29T12:42:29Z"}"#;
        assert_eq!(
            decode_users(member).unwrap(),
            decode_users(&format!("[{member}]")).unwrap()
        );
    }

    #[test]
    fn test_decode_bookmarks_preserves_order() {
        let body = r#"[{"u":"http://c"},{"u":"http://a"},{"u":"http://b"}]"#;
        let urls: Vec<String> = decode_bookmarks(body)
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|b| b.url)
            .collect();
        assert_eq!(urls, ["http://c", "http://a", "http://b"]);
    }

    #[test]
    fn test_decode_bookmarks_malformed_json() {
        let err = decode_bookmarks("[{\"a\":").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { shape: Shape::Bookmarks, .. }));
    }

    #[test]
    fn test_decode_bookmarks_scalar_body_is_unexpected_shape() {
        let err = decode_bookmarks("42").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedShape { found: "a number", .. }
        ));
    }

    #[test]
    fn test_api_error_entry_is_not_decoded_as_a_record() {
        let body = r#"[{"result": {"message": "user not found", "code": 404}}]"#;

        let bookmarks = decode_bookmarks(body).unwrap_err();
        assert!(matches!(
            bookmarks,
            DecodeError::UnexpectedShape { shape: Shape::Bookmarks, found: "an api error entry", .. }
        ));
        assert_eq!(decode_users(body).unwrap_err().shape(), Shape::Users);
        assert_eq!(
            decode_user_info("ghost", body).unwrap_err().shape(),
            Shape::UserInfoDetails
        );
        assert_eq!(decode_url_info(body).unwrap_err().shape(), Shape::UrlInfo);
        // A lone error object is an error entry too.
        assert!(decode_bookmarks(r#"{"result": {"message": "x", "code": 1}}"#).is_err());
    }

    #[test]
    fn test_decode_tags_sorted_by_name() {
        let tags: Vec<Tag> = decode_tags(r#"{"science": 1, "nlp": 2}"#)
            .unwrap()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(tags, vec![Tag::new("nlp", 2), Tag::new("science", 1)]);
    }

    #[test]
    fn test_decode_tags_rejects_array_payload() {
        let err = decode_tags(r#"[{"result": {"message": "x", "code": 1}}]"#).unwrap_err();
        assert_eq!(err.shape(), Shape::Tags);
    }

    #[test]
    fn test_decode_users_sample() {
        let users = decode_users(r#"[{"dt": "2012-10-29T12:42:29Z", "user": "testuser"}]"#)
            .unwrap()
            .unwrap();
        assert_eq!(users.len(), 1);
        let user = users.iter().next().unwrap();
        assert_eq!(user.handle, "testuser");
        assert!(user.added.is_some());
    }

    #[test]
    fn test_decode_user_info_sample() {
        let info = decode_user_info("testuser", r#"[{"n": 196, "d": "Items", "id": "items"}]"#)
            .unwrap()
            .unwrap();
        assert_eq!(info.user, "testuser");
        assert_eq!(info.items, 196);
        let detail = info.details.iter().next().unwrap();
        assert_eq!(detail.id, "items");
        assert_eq!(detail.description, "Items");
        assert_eq!(detail.count, 196);
    }

    #[test]
    fn test_decode_url_info_sample() {
        let body = r#"[{"url": "http://namechk.com/", "total_posts": 5849, "top_tags": {"socialnetworking": 1, "check": 1}, "hash": "80e661f28a8f9fb62b4003af90fad6ed", "title": "Check Username Availability"}]"#;
        let info = decode_url_info(body).unwrap().unwrap();
        assert_eq!(info.url, "http://namechk.com/");
        assert_eq!(info.hash, "80e661f28a8f9fb62b4003af90fad6ed");
        assert_eq!(info.total_posts, 5849);
        let tags: Vec<Tag> = info.top_tags.into_iter().collect();
        assert_eq!(
            tags,
            vec![Tag::new("check", 1), Tag::new("socialnetworking", 1)]
        );
    }

    #[test]
    fn test_decode_url_info_requires_exactly_one_entry() {
        let body = r#"[{"url": "http://a/"}, {"url": "http://b/"}]"#;
        assert!(decode_url_info(body).unwrap().is_none());
        assert!(decode_url_info(r#"{"url": "http://a/"}"#).unwrap().is_some());
    }

    #[test]
    fn test_decode_api_error_sample() {
        let api_error =
            decode_api_error(r#"[{"result": {"message": "something went wrong", "code": 1000}}]"#)
                .unwrap();
        assert_eq!(api_error.message, "something went wrong");
        assert_eq!(api_error.code, 1000);
    }

    #[test]
    fn test_decode_api_error_mismatches_yield_none() {
        let bodies = [
            "",
            "not json",
            r#"{"result": {"message": "something went wrong", "code": 1000}}"#,
            r#"[{"hurz": {"message": "something went wrong", "code": 1000}}]"#,
            r#"[{"result": 2}]"#,
            r#"[{"result": {"message": "a", "code": 1}}, {"result": {"message": "b", "code": 2}}]"#,
            r#"["result"]"#,
        ];
        for body in bodies {
            assert!(decode_api_error(body).is_none(), "expected None for {body}");
        }
    }
}
