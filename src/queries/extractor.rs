//! Saved query extractor
//!
//! Lists saved queries for one asset category and applies the export filter.

use super::filter::known_list;
use super::{AssetCategory, QueryFilter, SavedQuery};
use crate::client::QueryService;
use crate::etl::Extractor;

use eyre::{Context, Result};
use owo_colors::OwoColorize;

/// Extractor for the saved queries of one asset category
///
/// Tags are handed to the service; the name prefix is applied here. When a
/// filter selects nothing, extraction fails with the known tags or names so
/// the user can correct the filter.
///
/// # Example
/// ```
/// use query_tool::client::MemoryQueryService;
/// use query_tool::etl::Extractor;
/// use query_tool::queries::{AssetCategory, QueryFilter, SavedQueriesExtractor, SavedQuery};
///
/// # async fn example() -> eyre::Result<()> {
/// let service = MemoryQueryService::new().with_queries(
///     AssetCategory::Devices,
///     vec![SavedQuery::new("AX - Unmanaged"), SavedQuery::new("Laptops")],
/// );
/// let extractor = SavedQueriesExtractor::new(
///     service,
///     AssetCategory::Devices,
///     QueryFilter::vendor_queries(),
/// );
/// let queries = extractor.extract().await?;
/// assert_eq!(queries.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct SavedQueriesExtractor<S> {
    service: S,
    category: AssetCategory,
    filter: QueryFilter,
}

impl<S: QueryService> SavedQueriesExtractor<S> {
    pub fn new(service: S, category: AssetCategory, filter: QueryFilter) -> Self {
        Self {
            service,
            category,
            filter,
        }
    }

    async fn fetch(&self) -> Result<Vec<SavedQuery>> {
        log::debug!(
            "Listing {} saved queries ({})",
            self.category,
            self.filter
        );

        let queries = self
            .service
            .list_saved_queries(self.category, &self.filter.tags)
            .await
            .with_context(|| format!("Failed to list {} saved queries", self.category))?;

        if queries.is_empty() && !self.filter.tags.is_empty() {
            let all = self
                .service
                .list_saved_queries(self.category, &[])
                .await
                .with_context(|| format!("Failed to list {} saved queries", self.category))?;
            eyre::bail!(
                "No {} saved queries matched tags [{}]. Known tags: {}",
                self.category,
                self.filter.tags.join(", "),
                known_list(all.iter().flat_map(|q| q.tags()))
            );
        }

        let (matched, rest): (Vec<_>, Vec<_>) = queries
            .into_iter()
            .partition(|query| self.filter.matches(query));

        if matched.is_empty() {
            if let Some(prefix) = &self.filter.name_prefix {
                eyre::bail!(
                    "No {} saved queries have a name starting with '{}'. Known names: {}",
                    self.category,
                    prefix,
                    known_list(rest.iter().map(|q| q.name()))
                );
            }
        }

        Ok(matched)
    }
}

impl<S: QueryService> Extractor for SavedQueriesExtractor<S> {
    type Item = SavedQuery;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        let queries = self.fetch().await?;

        log::info!(
            "Found {} {} saved {}",
            queries.len().cyan(),
            self.category,
            match queries.len() {
                1 => "query",
                _ => "queries",
            }
        );

        Ok(queries)
    }
}
