use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A single bookmark from any bookmark feed.
///
/// The feed uses short keys on the wire (`a`, `d`, `n`, `u`, `t`, `dt`, `md5`);
/// missing string fields decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Handle of the bookmark owner.
    #[serde(rename = "a", default)]
    pub user: String,
    #[serde(rename = "d", default)]
    pub title: String,
    #[serde(rename = "n", default)]
    pub description: String,
    /// Target URL. Rewritten in place when shortened-URL expansion is enabled.
    #[serde(rename = "u", default)]
    pub url: String,
    #[serde(rename = "t", default, deserialize_with = "deserialize_tag_names")]
    pub tags: BTreeSet<String>,
    #[serde(rename = "dt", default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// MD5 hash of the URL, as reported by the feed.
    #[serde(rename = "md5", default)]
    pub hash: String,
}

// The feed sometimes emits a bare string where a tag array is expected.
fn deserialize_tag_names<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TagNames;

    impl<'de> Visitor<'de> for TagNames {
        type Value = BTreeSet<String>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a tag name or an array of tag names")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(BTreeSet::from([value.to_string()]))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(BTreeSet::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(BTreeSet::new())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut names = BTreeSet::new();
            while let Some(name) = seq.next_element::<String>()? {
                names.insert(name);
            }
            Ok(names)
        }
    }

    deserializer.deserialize_any(TagNames)
}
