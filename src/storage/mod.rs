//! File system storage operations
//!
//! This module handles all file I/O:
//! - writing exports, as one JSON array or one JSON object per query
//! - reading import sources from a file or a directory
//! - filesystem-safe, never-overwriting file naming

mod filename;
mod reader;
mod writer;

pub use filename::{create_unique_file, safe_file_stem};
pub use reader::JsonSourceReader;
pub use writer::{ExportLayout, JsonExportWriter};
