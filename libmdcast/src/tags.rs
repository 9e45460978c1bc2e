//! Tag normalization and dictionary lookup
//!
//! Platforms disagree about what a tag looks like: dev.to wants bare
//! lowercase alphanumerics, Hashnode wants `{id, slug, name}` triples,
//! Medium wants its own slugs. Dictionaries are supplied statically in
//! the config; lookup normalizes both sides and matches by substring
//! containment with deterministic first-match semantics.

use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};

/// Lowercase a tag and strip everything that is not alphanumeric
///
/// `"Shadcn UI"`, `"shadcn-ui"`, and `"shadcnui"` all normalize to
/// `"shadcnui"`.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// A Hashnode tag as configured in the dictionary and sent in the
/// publish mutation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashnodeTag {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Ordered mapping from a normalized tag key to a platform-specific
/// tag value
///
/// The key is normalized at construction; queries are normalized at
/// lookup. A query matches an entry when the normalized query is a
/// substring of the normalized key. The first matching entry wins.
#[derive(Debug, Clone)]
pub struct TagDictionary<T> {
    entries: Vec<(String, T)>,
}

impl<T> TagDictionary<T> {
    pub fn new(entries: impl IntoIterator<Item = (String, T)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, value)| (normalize_tag(&key), value))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a tag, failing with `TagNotFound` when nothing matches
    pub fn resolve(&self, tag: &str) -> Result<&T> {
        let query = normalize_tag(tag);
        self.entries
            .iter()
            .find(|(key, _)| key.contains(&query))
            .map(|(_, value)| value)
            .ok_or_else(|| PlatformError::TagNotFound(tag.to_string()).into())
    }

    /// Resolve every tag in order, failing on the first miss
    pub fn resolve_all<'a>(&self, tags: impl IntoIterator<Item = &'a str>) -> Result<Vec<&T>> {
        tags.into_iter().map(|tag| self.resolve(tag)).collect()
    }
}

impl TagDictionary<HashnodeTag> {
    /// Build a dictionary keyed by slug from configured Hashnode tags
    pub fn from_hashnode(tags: &[HashnodeTag]) -> Self {
        Self::new(tags.iter().map(|t| (t.slug.clone(), t.clone())))
    }
}

impl TagDictionary<String> {
    /// Build a dictionary from Medium tag slugs (key and value are the
    /// same slug)
    pub fn from_slugs(slugs: &[String]) -> Self {
        Self::new(slugs.iter().map(|s| (s.clone(), s.clone())))
    }
}
