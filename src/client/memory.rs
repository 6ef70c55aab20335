//! In-process saved query store

use super::QueryService;
use crate::queries::{AssetCategory, SavedQuery};
use eyre::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// A [`QueryService`] backed by process memory.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect another afterwards. Created queries get a `uuid` field the
/// way the real service assigns one, and creating a name that already exists
/// is rejected.
///
/// # Example
/// ```
/// use query_tool::client::{MemoryQueryService, QueryService};
/// use query_tool::queries::{AssetCategory, SavedQuery};
///
/// # async fn example() -> eyre::Result<()> {
/// let service = MemoryQueryService::new()
///     .with_queries(AssetCategory::Devices, vec![SavedQuery::new("AX - All Devices")]);
///
/// let id = service
///     .create_saved_query(AssetCategory::Devices, &SavedQuery::new("Windows Hosts"))
///     .await?;
/// assert_eq!(service.created().len(), 1);
/// assert_eq!(service.queries(AssetCategory::Devices).len(), 2);
/// # let _ = id;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryQueryService {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<AssetCategory, Vec<SavedQuery>>,
    created: Vec<SavedQuery>,
    next_id: u64,
}

impl MemoryQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category with existing queries
    pub fn with_queries(self, category: AssetCategory, queries: Vec<SavedQuery>) -> Self {
        self.lock()
            .collections
            .entry(category)
            .or_default()
            .extend(queries);
        self
    }

    /// Everything currently stored for a category
    pub fn queries(&self, category: AssetCategory) -> Vec<SavedQuery> {
        self.lock()
            .collections
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }

    /// Queries submitted through `create_saved_query`, exactly as received
    pub fn created(&self) -> Vec<SavedQuery> {
        self.lock().created.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl QueryService for MemoryQueryService {
    async fn list_saved_queries(
        &self,
        category: AssetCategory,
        tags: &[String],
    ) -> Result<Vec<SavedQuery>> {
        let queries = self
            .queries(category)
            .into_iter()
            .filter(|query| tags.is_empty() || query.has_any_tag(tags))
            .collect();
        Ok(queries)
    }

    async fn create_saved_query(
        &self,
        category: AssetCategory,
        query: &SavedQuery,
    ) -> Result<String> {
        let mut state = self.lock();
        let collection = state.collections.entry(category).or_default();
        if collection.iter().any(|q| q.name() == query.name()) {
            eyre::bail!(
                "A saved query named '{}' already exists in {}",
                query.name(),
                category
            );
        }

        let id = format!("{:024x}", state.next_id + 1);
        state.next_id += 1;

        let stored = query.clone().with_field("uuid", Value::String(id.clone()));
        state
            .collections
            .entry(category)
            .or_default()
            .push(stored);
        state.created.push(query.clone());

        Ok(id)
    }
}
