//! Field dropper transformer
//!
//! Removes fields the server assigns itself before queries are re-submitted.

use crate::etl::Transformer;
use crate::queries::{SERVER_MANAGED_FIELDS, SavedQuery};
use eyre::Result;

/// Transformer that drops specified fields from saved queries
///
/// `name` is never dropped, even if listed.
///
/// # Example
/// ```
/// use query_tool::etl::Transformer;
/// use query_tool::queries::SavedQuery;
/// use query_tool::transform::FieldDropper;
///
/// let dropper = FieldDropper::server_managed();
/// let query = SavedQuery::new("Laptops")
///     .with_field("uuid", "5f1e")
///     .with_field("view", serde_json::json!({"query": {}}));
///
/// let output = dropper.transform(query).unwrap();
/// assert!(!output.contains_key("uuid"));
/// assert!(output.contains_key("view"));
/// ```
pub struct FieldDropper {
    fields: Vec<String>,
}

impl FieldDropper {
    /// Create a new field dropper with the specified fields to remove
    pub fn new(fields: Vec<&str>) -> Self {
        Self {
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Drops: archived, date_fetched, last_updated, updated_by, user_id, uuid
    pub fn server_managed() -> Self {
        Self::new(SERVER_MANAGED_FIELDS.to_vec())
    }
}

impl Transformer for FieldDropper {
    type Input = SavedQuery;
    type Output = SavedQuery;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        for field in &self.fields {
            if input.remove(field).is_some() {
                log::trace!("Dropped '{}' from {}", field, input.name());
            }
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drop_fields() {
        let dropper = FieldDropper::new(vec!["private", "name"]);
        let input = SavedQuery::new("Laptops")
            .with_field("private", true)
            .with_field("description", "All laptops");

        let output = dropper.transform(input).unwrap();

        assert!(!output.contains_key("private"));
        assert_eq!(output.name(), "Laptops");
        assert_eq!(output.get("description"), Some(&json!("All laptops")));
    }

    #[test]
    fn test_server_managed_fields() {
        let dropper = FieldDropper::server_managed();
        let input = SavedQuery::new("Laptops")
            .with_field("archived", false)
            .with_field("date_fetched", "2024-01-01")
            .with_field("last_updated", "2024-01-02")
            .with_field("updated_by", json!({"user_name": "admin"}))
            .with_field("user_id", "42")
            .with_field("uuid", "5f1e")
            .with_field("tags", json!(["prod"]))
            .with_field("view", json!({"query": {"filter": ""}}));

        let output = dropper.transform(input).unwrap();

        for field in SERVER_MANAGED_FIELDS {
            assert!(!output.contains_key(field), "{} should be dropped", field);
        }
        assert_eq!(output.tags(), vec!["prod"]);
        assert!(output.contains_key("view"));
    }

    #[test]
    fn test_missing_fields_are_ignored() {
        let dropper = FieldDropper::server_managed();
        let input = SavedQuery::new("bare");
        let output = dropper.transform(input.clone()).unwrap();
        assert_eq!(output, input);
    }
}
