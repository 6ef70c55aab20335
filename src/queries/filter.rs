//! Tag and name-prefix filtering

use super::SavedQuery;
use std::collections::BTreeSet;

/// Name prefix of the queries that ship with the platform
pub const VENDOR_QUERY_PREFIX: &str = "AX -";

/// Selection criteria for an export
///
/// Tags select queries carrying at least one of the listed tags. The name
/// prefix is an exact, case-sensitive `starts_with` check.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryFilter {
    pub tags: Vec<String>,
    pub name_prefix: Option<String>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tags to select on. Surrounding whitespace is trimmed and
    /// blank tags are dropped, so `"prod, eu"` split on commas works.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags
            .into_iter()
            .map(Into::into)
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    /// Only the queries authored by the platform vendor
    pub fn vendor_queries() -> Self {
        Self::new().with_name_prefix(VENDOR_QUERY_PREFIX)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.name_prefix.is_none()
    }

    pub fn matches_tags(&self, query: &SavedQuery) -> bool {
        self.tags.is_empty() || query.has_any_tag(&self.tags)
    }

    pub fn matches_name(&self, query: &SavedQuery) -> bool {
        match &self.name_prefix {
            Some(prefix) => query.name().starts_with(prefix.as_str()),
            None => true,
        }
    }

    pub fn matches(&self, query: &SavedQuery) -> bool {
        self.matches_tags(query) && self.matches_name(query)
    }
}

impl std::fmt::Display for QueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if !self.tags.is_empty() {
            parts.push(format!("tags [{}]", self.tags.join(", ")));
        }
        if let Some(prefix) = &self.name_prefix {
            parts.push(format!("name prefix '{}'", prefix));
        }
        match parts.is_empty() {
            true => write!(f, "no filter"),
            false => write!(f, "{}", parts.join(" and ")),
        }
    }
}

/// Sorted, de-duplicated list for diagnostics, `(none)` when empty
pub(crate) fn known_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let known: BTreeSet<&str> = values.into_iter().collect();
    if known.is_empty() {
        return "(none)".to_string();
    }
    known.into_iter().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tagged(name: &str, tags: serde_json::Value) -> SavedQuery {
        SavedQuery::new(name).with_field("tags", tags)
    }

    #[test]
    fn test_with_tags_trims_and_drops_blanks() {
        let filter = QueryFilter::new().with_tags(["prod", " eu", "  ", ""]);
        assert_eq!(filter.tags, vec!["prod", "eu"]);
        assert!(filter.matches(&tagged("a", json!(["eu"]))));
    }

    #[test]
    fn test_tag_filter_intersects() {
        let filter = QueryFilter::new().with_tags(["prod", "eu"]);
        let queries = [
            tagged("a", json!(["prod"])),
            tagged("b", json!(["eu", "dev"])),
            tagged("c", json!(["dev"])),
        ];

        let selected: Vec<&str> = queries
            .iter()
            .filter(|q| filter.matches(q))
            .map(|q| q.name())
            .collect();
        assert_eq!(selected, vec!["a", "b"]);
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        let filter = QueryFilter::vendor_queries();
        assert!(filter.matches(&SavedQuery::new("AX - Devices seen today")));
        assert!(!filter.matches(&SavedQuery::new("ax - Devices seen today")));
        assert!(!filter.matches(&SavedQuery::new("Devices AX -")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = QueryFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&SavedQuery::new("anything")));
        assert_eq!(filter.to_string(), "no filter");
    }

    #[test]
    fn test_display() {
        let filter = QueryFilter::new()
            .with_tags(["prod", "eu"])
            .with_name_prefix("AX -");
        assert_eq!(filter.to_string(), "tags [prod, eu] and name prefix 'AX -'");
    }

    #[test]
    fn test_known_list() {
        assert_eq!(known_list(["b", "a", "b"]), "a, b");
        assert_eq!(known_list(Vec::<&str>::new()), "(none)");
    }
}
