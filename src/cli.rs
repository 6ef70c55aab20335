//! CLI helper functions

use crate::{
    client::{AssetClient, QueryService},
    config::ConnectionConfig,
    etl::{IdentityTransformer, Pipeline, Transformer},
    queries::{AssetCategory, ImportSummary, QueryFilter, SavedQueriesExtractor, SavedQueriesLoader},
    storage::{ExportLayout, JsonExportWriter, JsonSourceReader},
    transform::FieldDropper,
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Open an authenticated session and verify it with one request
pub async fn connect(config: &ConnectionConfig) -> Result<AssetClient> {
    log::info!("Connecting to {}", config.url.as_str().bright_black());
    let client = AssetClient::try_new(
        config.url.clone(),
        config.credentials.clone(),
        config.verify_tls,
    )?;
    client
        .test_connection()
        .await
        .with_context(|| format!("Failed to connect to {}", config.url))?;
    Ok(client)
}

/// Settings for one export run
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub category: AssetCategory,
    pub filter: QueryFilter,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub layout: ExportLayout,
}

impl ExportOptions {
    /// Export everything in `category` to one file in the current directory
    pub fn new(category: AssetCategory) -> Self {
        Self {
            category,
            filter: QueryFilter::default(),
            output_dir: PathBuf::from("."),
            prefix: default_prefix(category),
            layout: ExportLayout::default(),
        }
    }
}

/// `<category>_saved_queries_<YYYYmmdd-HHMMSS>` in local time
pub fn default_prefix(category: AssetCategory) -> String {
    format!(
        "{}_saved_queries_{}",
        category,
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}

/// Export saved queries to JSON files
///
/// Pipeline: SavedQueriesExtractor → IdentityTransformer → JsonExportWriter
pub async fn export_saved_queries<S: QueryService>(
    service: S,
    options: &ExportOptions,
) -> Result<usize> {
    log::info!(
        "Exporting {} saved queries ({}) to {}",
        options.category.cyan(),
        options.filter,
        options.output_dir.display().bright_black()
    );

    let pipeline = Pipeline::new(
        SavedQueriesExtractor::new(service, options.category, options.filter.clone()),
        IdentityTransformer::new(),
        JsonExportWriter::new(&options.output_dir, &options.prefix, options.layout),
    );

    let count = pipeline.run().await?;
    if count == 0 {
        log::warn!("No {} saved queries to export", options.category);
    }

    Ok(count)
}

/// Import saved queries from a `.json` file or a directory of them
///
/// Pipeline: JsonSourceReader → FieldDropper → SavedQueriesLoader
pub async fn import_saved_queries<S: QueryService>(
    service: S,
    category: AssetCategory,
    path: impl AsRef<Path>,
) -> Result<ImportSummary> {
    let path = path.as_ref();
    log::info!(
        "Importing {} saved queries from {}",
        category.cyan(),
        path.display().bright_black()
    );

    let queries = JsonSourceReader::new(path).read_all()?;
    log::info!("Read {} saved queries from disk", queries.len());

    let stripped = FieldDropper::server_managed().transform_many(queries)?;
    let summary = SavedQueriesLoader::new(service, category)
        .import(stripped)
        .await?;

    log::info!(
        "{} Created {}, skipped {} existing",
        "✓".green(),
        summary.created.len(),
        summary.skipped.len()
    );

    Ok(summary)
}
