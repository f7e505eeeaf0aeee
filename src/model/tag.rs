//! Tag records and the `{"name": count}` flattening rule.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

/// A tag name with its usage count.
///
/// Ordering is by name first (ascending, case-sensitive). Tags always come
/// from a JSON object keyed by name, so names are unique within a set and
/// the count never takes part in ordering in practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Tag {
    pub name: String,
    pub count: u64,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Flattens a name-to-count map into an ordered tag set.
#[must_use]
pub fn tags_from_counts(counts: BTreeMap<String, u64>) -> BTreeSet<Tag> {
    counts
        .into_iter()
        .map(|(name, count)| Tag { name, count })
        .collect()
}

/// Field-level deserializer applying [`tags_from_counts`] to a nested object.
///
/// A `null` value yields an empty set.
///
/// # Errors
///
/// Fails when the value is neither `null` nor an object of non-negative integers.
pub fn deserialize_tag_counts<'de, D>(deserializer: D) -> Result<BTreeSet<Tag>, D::Error>
where
    D: Deserializer<'de>,
{
    let counts = Option::<BTreeMap<String, u64>>::deserialize(deserializer)?;
    Ok(counts.map(tags_from_counts).unwrap_or_default())
}
