//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use eyre::Result;

/// ETL Pipeline that chains an Extractor, a Transformer and a Loader
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Item)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```no_run
/// use query_tool::cli::connect;
/// use query_tool::config::ConnectionConfig;
/// use query_tool::etl::{IdentityTransformer, Pipeline};
/// use query_tool::queries::{AssetCategory, QueryFilter, SavedQueriesExtractor};
/// use query_tool::storage::{ExportLayout, JsonExportWriter};
///
/// # async fn example(config: ConnectionConfig) -> eyre::Result<()> {
/// let client = connect(&config).await?;
/// let pipeline = Pipeline::new(
///     SavedQueriesExtractor::new(client, AssetCategory::Devices, QueryFilter::default()),
///     IdentityTransformer::new(),
///     JsonExportWriter::new(".", "devices", ExportLayout::SingleFile),
/// );
///
/// let count = pipeline.run().await?;
/// println!("Exported {} saved queries", count);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    L: Loader<Item = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete ETL pipeline
    ///
    /// Returns the number of items loaded. An empty extraction short-circuits
    /// and the loader is never called.
    ///
    /// # Errors
    /// Returns an error if any stage fails
    pub async fn run(&self) -> Result<usize> {
        log::debug!("Starting ETL pipeline");

        log::debug!("Extracting from source...");
        let items = self.extractor.extract().await?;
        log::debug!("Extracted {} items", items.len());

        if items.is_empty() {
            log::debug!("Nothing to load, pipeline complete");
            return Ok(0);
        }

        log::debug!("Transforming items...");
        let transformed = self.transformer.transform_many(items)?;

        log::debug!("Loading to destination...");
        let count = self.loader.load(transformed).await?;
        log::debug!("Loaded {} items", count);

        Ok(count)
    }
}
