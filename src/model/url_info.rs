use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tag::{Tag, deserialize_tag_counts};

/// Aggregate information about a URL from the `urlinfo` feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub total_posts: u64,
    /// Most used tags for the URL, ordered by name.
    #[serde(default, deserialize_with = "deserialize_tag_counts")]
    pub top_tags: BTreeSet<Tag>,
}
