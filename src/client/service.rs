use crate::queries::{AssetCategory, SavedQuery};
use eyre::Result;
use std::future::Future;

/// Remote store of saved queries
///
/// Both operations act on one asset category. Implementations are expected to
/// be cheap to clone (they share a connection or in-memory state).
pub trait QueryService: Send + Sync {
    /// List saved queries in service order.
    ///
    /// With a non-empty `tags`, only queries carrying at least one of them
    /// are returned.
    fn list_saved_queries(
        &self,
        category: AssetCategory,
        tags: &[String],
    ) -> impl Future<Output = Result<Vec<SavedQuery>>> + Send;

    /// Create a saved query and return the identifier the service assigned.
    fn create_saved_query(
        &self,
        category: AssetCategory,
        query: &SavedQuery,
    ) -> impl Future<Output = Result<String>> + Send;
}
