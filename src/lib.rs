//! Query Tool
//!
//! Export saved queries from an asset inventory to JSON files and import
//! them back, built as small extract/transform/load pipelines.

pub mod cli;
pub mod client;
pub mod config;
pub mod etl;
pub mod queries;
pub mod storage;
pub mod transform;

// Re-exports for convenience
pub use client::{AssetClient, Credentials, MemoryQueryService, QueryService};
pub use etl::{Extractor, IdentityTransformer, Loader, Pipeline, Transformer};
pub use queries::{AssetCategory, QueryFilter, SavedQuery};
pub use storage::{ExportLayout, JsonExportWriter, JsonSourceReader};
