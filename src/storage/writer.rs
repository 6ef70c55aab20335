//! Export writer

use super::filename::{create_unique_file, safe_file_stem};
use crate::etl::Loader;
use crate::queries::SavedQuery;

use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How an export is laid out on disk
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportLayout {
    /// `<dir>/<prefix>.json` holding a JSON array, replaced if present
    #[default]
    SingleFile,
    /// `<dir>/<prefix>/<name>.json`, one JSON object per query, never
    /// replacing existing files
    PerQuery,
}

/// Write saved queries to JSON files
pub struct JsonExportWriter {
    dir: PathBuf,
    prefix: String,
    layout: ExportLayout,
}

impl JsonExportWriter {
    pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>, layout: ExportLayout) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.into(),
            layout,
        }
    }

    /// Write the queries and return the paths written, in order
    ///
    /// A failure part way through a per-query export leaves the files
    /// already written in place.
    pub fn write_all(&self, queries: &[SavedQuery]) -> Result<Vec<PathBuf>> {
        match self.layout {
            ExportLayout::SingleFile => Ok(vec![self.write_single(queries)?]),
            ExportLayout::PerQuery => self.write_per_query(queries),
        }
    }

    fn write_single(&self, queries: &[SavedQuery]) -> Result<PathBuf> {
        create_dir(&self.dir)?;
        let path = self.dir.join(format!("{}.json", self.prefix));

        std::fs::write(&path, to_json(&queries)?)
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;

        log::info!(
            "{} Wrote {} saved {} to {}",
            "✓".green(),
            queries.len(),
            match queries.len() {
                1 => "query",
                _ => "queries",
            },
            path.display().bright_black()
        );

        Ok(path)
    }

    fn write_per_query(&self, queries: &[SavedQuery]) -> Result<Vec<PathBuf>> {
        let dir = self.dir.join(&self.prefix);
        create_dir(&dir)?;

        let mut written = Vec::with_capacity(queries.len());
        for query in queries {
            let json = to_json(query)?;
            let (path, file) = create_unique_file(&dir, &safe_file_stem(query.name()))?;
            write_new_file(&path, file, json.as_bytes())?;

            log::info!(
                "{} Wrote {} to {}",
                "✓".green(),
                query.name().cyan(),
                path.display().bright_black()
            );
            written.push(path);
        }

        Ok(written)
    }
}

impl Loader for JsonExportWriter {
    type Item = SavedQuery;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        self.write_all(&items)?;
        Ok(items.len())
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))
}

/// Fill a file that was just created, removing it again if the write fails
/// so a later export does not see it as taken.
fn write_new_file(path: &Path, mut out: impl Write, contents: &[u8]) -> Result<()> {
    if let Err(e) = out.write_all(contents).and_then(|()| out.flush()) {
        drop(out);
        if let Err(remove) = std::fs::remove_file(path) {
            log::warn!("Failed to remove {}: {}", path.display(), remove);
        }
        return Err(e).with_context(|| format!("Failed to write export file: {}", path.display()));
    }
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
