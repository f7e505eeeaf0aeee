//! Typed records decoded from Delicious feed responses.
//!
//! All records are plain value objects. They carry no reference back to the
//! client that fetched them and serialize back to JSON for display.

mod api_error;
mod bookmark;
mod tag;
mod url_info;
mod user;

pub use api_error::ApiError;
pub use bookmark::Bookmark;
pub use tag::{Tag, deserialize_tag_counts, tags_from_counts};
pub use url_info::UrlInfo;
pub use user::{
    FOLLOWERS_ID, FOLLOWING_ID, ITEMS_ID, User, UserInfo, UserInfoDetail,
};
