//! Saved query loader
//!
//! Creates saved queries through the service, skipping names that already
//! exist in the target category.

use super::{AssetCategory, SavedQuery};
use crate::client::QueryService;
use crate::etl::Loader;

use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::collections::HashSet;

/// Outcome of an import run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportSummary {
    /// `(name, id)` for every query created, in submission order
    pub created: Vec<(String, String)>,
    /// Names skipped because they already existed
    pub skipped: Vec<String>,
}

/// Loader that submits saved queries to one asset category
///
/// Existing names are fetched once up front. Queries whose name is taken
/// are skipped with a warning, including repeats within the same batch, so
/// running an import twice creates nothing the second time.
///
/// Records are submitted as given; strip server-managed fields first (see
/// [`crate::transform::FieldDropper::server_managed`]).
pub struct SavedQueriesLoader<S> {
    service: S,
    category: AssetCategory,
}

impl<S: QueryService> SavedQueriesLoader<S> {
    pub fn new(service: S, category: AssetCategory) -> Self {
        Self { service, category }
    }

    async fn existing_names(&self) -> Result<HashSet<String>> {
        let existing = self
            .service
            .list_saved_queries(self.category, &[])
            .await
            .with_context(|| format!("Failed to list existing {} saved queries", self.category))?;

        log::debug!(
            "{} existing {} saved queries",
            existing.len(),
            self.category
        );

        Ok(existing.iter().map(|q| q.name().to_string()).collect())
    }

    /// Submit every query whose name is not yet taken
    ///
    /// # Errors
    /// Fails on the first remote error. Queries created before the failure
    /// stay created.
    pub async fn import(&self, queries: Vec<SavedQuery>) -> Result<ImportSummary> {
        let mut names = self.existing_names().await?;
        let mut summary = ImportSummary::default();

        for query in queries {
            let name = query.name().to_string();

            if names.contains(&name) {
                log::warn!(
                    "Saved query {} already exists in {}, skipping",
                    name.cyan(),
                    self.category
                );
                summary.skipped.push(name);
                continue;
            }

            let id = self
                .service
                .create_saved_query(self.category, &query)
                .await
                .with_context(|| format!("Failed to create saved query '{}'", name))?;

            log::info!(
                "{} Created saved query {} (id: {})",
                "✓".green(),
                name.cyan(),
                id.cyan()
            );

            names.insert(name.clone());
            summary.created.push((name, id));
        }

        Ok(summary)
    }
}

impl<S: QueryService> Loader for SavedQueriesLoader<S> {
    type Item = SavedQuery;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let summary = self.import(items).await?;
        Ok(summary.created.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryQueryService;

    #[tokio::test]
    async fn test_import_skips_existing_names() {
        let service = MemoryQueryService::new()
            .with_queries(AssetCategory::Devices, vec![SavedQuery::new("Laptops")]);
        let loader = SavedQueriesLoader::new(service.clone(), AssetCategory::Devices);

        let summary = loader
            .import(vec![SavedQuery::new("Laptops"), SavedQuery::new("Servers")])
            .await
            .unwrap();

        assert_eq!(summary.skipped, vec!["Laptops".to_string()]);
        assert_eq!(summary.created.len(), 1);
        assert_eq!(summary.created[0].0, "Servers");
        assert_eq!(service.created().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_names_in_batch_created_once() {
        let service = MemoryQueryService::new();
        let loader = SavedQueriesLoader::new(service.clone(), AssetCategory::Users);

        let summary = loader
            .import(vec![SavedQuery::new("Admins"), SavedQuery::new("Admins")])
            .await
            .unwrap();

        assert_eq!(summary.created.len(), 1);
        assert_eq!(summary.skipped, vec!["Admins".to_string()]);
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let service = MemoryQueryService::new();
        let loader = SavedQueriesLoader::new(service.clone(), AssetCategory::Devices);
        let batch = vec![SavedQuery::new("a"), SavedQuery::new("b")];

        assert_eq!(loader.load(batch.clone()).await.unwrap(), 2);
        assert_eq!(loader.load(batch).await.unwrap(), 0);
        assert_eq!(service.created().len(), 2);
    }

    #[tokio::test]
    async fn test_categories_are_independent() {
        let service = MemoryQueryService::new()
            .with_queries(AssetCategory::Devices, vec![SavedQuery::new("Shared name")]);
        let loader = SavedQueriesLoader::new(service.clone(), AssetCategory::Users);

        let summary = loader
            .import(vec![SavedQuery::new("Shared name")])
            .await
            .unwrap();
        assert_eq!(summary.created.len(), 1);
    }
}
