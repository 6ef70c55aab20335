//! Saved queries
//!
//! Record model, filters, and the extract/load operations that move saved
//! queries between the remote service and the rest of the pipeline.

mod extractor;
mod filter;
mod loader;
mod record;

pub use extractor::SavedQueriesExtractor;
pub use filter::{QueryFilter, VENDOR_QUERY_PREFIX};
pub use loader::{ImportSummary, SavedQueriesLoader};
pub use record::{AssetCategory, SERVER_MANAGED_FIELDS, SavedQuery};
