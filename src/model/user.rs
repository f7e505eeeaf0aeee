//! Network members and public user summaries.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detail id carrying the number of public bookmarks.
pub const ITEMS_ID: &str = "items";
/// Detail id carrying the number of network members the user follows.
pub const FOLLOWING_ID: &str = "networkmembers";
/// Detail id carrying the number of network fans following the user.
pub const FOLLOWERS_ID: &str = "networkfans";

/// A member of a user's network.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "user", default)]
    pub handle: String,
    /// When the member was added to the network.
    #[serde(rename = "dt", default)]
    pub added: Option<DateTime<Utc>>,
}

/// One raw entry of the `userinfo` feed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserInfoDetail {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "d", default)]
    pub description: String,
    #[serde(rename = "n", default)]
    pub count: u64,
}

/// Public summary of a user, folded from [`UserInfoDetail`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub user: String,
    pub items: u64,
    pub following: u64,
    pub followers: u64,
    /// Every detail the summary was built from, including unrecognized ids.
    pub details: BTreeSet<UserInfoDetail>,
}

impl UserInfo {
    /// Folds detail entries into a summary for `user`.
    ///
    /// The three well-known ids populate the summary counts; any other id is
    /// only kept in [`UserInfo::details`].
    #[must_use]
    pub fn from_details(user: impl Into<String>, details: BTreeSet<UserInfoDetail>) -> Self {
        let mut info = Self {
            user: user.into(),
            ..Self::default()
        };
        for detail in &details {
            match detail.id.as_str() {
                ITEMS_ID => info.items = detail.count,
                FOLLOWING_ID => info.following = detail.count,
                FOLLOWERS_ID => info.followers = detail.count,
                _ => {}
            }
        }
        info.details = details;
        info
    }
}
