//! File naming for per-query exports

use eyre::{Context, Result};
use rand::Rng;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stem used when a name has no characters we can keep
const FALLBACK_STEM: &str = "saved_query";

/// How many random suffixes to try before giving up
const MAX_SUFFIX_ATTEMPTS: usize = 16;

/// Reduce a query name to ASCII letters, digits, spaces and hyphens.
///
/// Other characters are dropped, not replaced. A name with nothing left
/// becomes `saved_query`.
///
/// ```
/// use query_tool::storage::safe_file_stem;
///
/// assert_eq!(safe_file_stem("AX - Devices: seen/today?"), "AX - Devices seentoday");
/// assert_eq!(safe_file_stem("***"), "saved_query");
/// ```
pub fn safe_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect();

    match stem.is_empty() {
        true => FALLBACK_STEM.to_string(),
        false => stem,
    }
}

/// Create `<dir>/<stem>.json` without ever replacing an existing file.
///
/// If the name is taken, `_<0-999999>` is appended to the stem and retried.
/// The file is opened with create-new semantics, so a file that appears
/// between the check and the write is not clobbered either.
pub fn create_unique_file(dir: &Path, stem: &str) -> Result<(PathBuf, File)> {
    let path = dir.join(format!("{}.json", stem));
    if let Some(file) = try_create(&path)? {
        return Ok((path, file));
    }

    let mut rng = rand::thread_rng();
    for _ in 0..MAX_SUFFIX_ATTEMPTS {
        let suffix: u32 = rng.gen_range(0..=999_999);
        let candidate = dir.join(format!("{}_{}.json", stem, suffix));
        log::debug!(
            "{} exists, trying {}",
            path.display(),
            candidate.display()
        );
        if let Some(file) = try_create(&candidate)? {
            return Ok((candidate, file));
        }
    }

    eyre::bail!(
        "Could not find a free file name for '{}' in {}",
        stem,
        dir.display()
    )
}

/// `Ok(None)` when the path already exists
fn try_create(path: &Path) -> Result<Option<File>> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to create file: {}", path.display())),
    }
}
