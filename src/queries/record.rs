//! Saved query record and asset category

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields assigned by the server; they must not be sent back on create.
pub const SERVER_MANAGED_FIELDS: [&str; 6] = [
    "archived",
    "date_fetched",
    "last_updated",
    "updated_by",
    "user_id",
    "uuid",
];

/// The inventory a saved query runs against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    Devices,
    Users,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devices => "devices",
            Self::Users => "users",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One saved query as stored by the service.
///
/// The record is kept as a raw JSON object so fields this tool knows nothing
/// about survive an export/import round trip. The only guarantee is a string
/// `name`, checked on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct SavedQuery(Map<String, Value>);

impl SavedQuery {
    /// Create a record holding only a name
    pub fn new(name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name.into()));
        Self(fields)
    }

    /// Builder-style field setter
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        self.0
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Tags attached to the query; anything other than an array of strings
    /// counts as untagged.
    pub fn tags(&self) -> Vec<&str> {
        self.0
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// True when at least one of `wanted` is among this query's tags
    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        self.tags()
            .iter()
            .any(|tag| wanted.iter().any(|w| w == tag))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove a field. `name` is never removed.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if key == "name" {
            return None;
        }
        self.0.remove(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Map<String, Value>> for SavedQuery {
    type Error = eyre::Report;

    fn try_from(fields: Map<String, Value>) -> Result<Self> {
        match fields.get("name") {
            Some(Value::String(_)) => Ok(Self(fields)),
            Some(other) => Err(eyre!("Saved query 'name' must be a string, found {}", other)),
            None => Err(eyre!("Saved query is missing the 'name' field")),
        }
    }
}

impl TryFrom<Value> for SavedQuery {
    type Error = eyre::Report;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Self::try_from(fields),
            other => Err(eyre!(
                "Saved query must be a JSON object, found {}",
                json_kind(&other)
            )),
        }
    }
}

impl From<SavedQuery> for Map<String, Value> {
    fn from(query: SavedQuery) -> Self {
        query.0
    }
}

impl From<SavedQuery> for Value {
    fn from(query: SavedQuery) -> Self {
        Value::Object(query.0)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_name() {
        let err = SavedQuery::try_from(json!({"view": {}})).unwrap_err();
        assert!(err.to_string().contains("missing the 'name' field"));

        let err = SavedQuery::try_from(json!({"name": 7})).unwrap_err();
        assert!(err.to_string().contains("must be a string"));

        let err = SavedQuery::try_from(json!(["AX - Devices"])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields() {
        let query: SavedQuery = serde_json::from_value(json!({
            "name": "Windows Hosts",
            "view": {"query": {"filter": "os == 'Windows'"}},
            "uuid": "5f1e"
        }))
        .unwrap();

        assert_eq!(query.name(), "Windows Hosts");
        assert_eq!(query.get("uuid"), Some(&json!("5f1e")));
        assert_eq!(
            Value::from(query.clone()),
            serde_json::to_value(&query).unwrap()
        );
    }

    #[test]
    fn test_deserialize_rejects_missing_name() {
        let result: Result<SavedQuery, _> = serde_json::from_value(json!({"tags": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_tags() {
        let query = SavedQuery::new("q").with_field("tags", json!(["prod", 3, "eu"]));
        assert_eq!(query.tags(), vec!["prod", "eu"]);
        assert!(query.has_any_tag(&["eu".to_string()]));
        assert!(!query.has_any_tag(&["dev".to_string()]));

        let untagged = SavedQuery::new("q").with_field("tags", json!("prod"));
        assert!(untagged.tags().is_empty());
    }

    #[test]
    fn test_name_cannot_be_removed() {
        let mut query = SavedQuery::new("q").with_field("uuid", "1");
        assert_eq!(query.remove("name"), None);
        assert_eq!(query.remove("uuid"), Some(json!("1")));
        assert_eq!(query.name(), "q");
    }

    #[test]
    fn test_asset_category_display() {
        assert_eq!(AssetCategory::Devices.to_string(), "devices");
        assert_eq!(AssetCategory::Users.as_str(), "users");
    }
}
