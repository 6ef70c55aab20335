//! Import source reader

use crate::queries::SavedQuery;

use eyre::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Read saved queries from a `.json` file or a directory of them.
///
/// Each file may hold a single query object or an array of them (the
/// single-file export format). All records are returned as one flat list,
/// files in lexical order and records in file order.
pub struct JsonSourceReader {
    path: PathBuf,
}

impl JsonSourceReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolve the files to import
    ///
    /// # Errors
    /// The path does not exist, a file path lacks the `.json` extension, or a
    /// directory holds no `.json` files.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let path = &self.path;

        if path.is_file() {
            if !is_json(path) {
                eyre::bail!("Import file must have a .json extension: {}", path.display());
            }
            return Ok(vec![path.clone()]);
        }

        if !path.is_dir() {
            eyre::bail!("Import path not found: {}", path.display());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)
            .with_context(|| format!("Failed to read directory: {}", path.display()))?
        {
            let entry_path = entry?.path();
            if entry_path.is_file() && is_json(&entry_path) {
                files.push(entry_path);
            }
        }

        if files.is_empty() {
            eyre::bail!("No .json files found in {}", path.display());
        }

        files.sort();
        Ok(files)
    }

    /// Read every saved query from the resolved files
    pub fn read_all(&self) -> Result<Vec<SavedQuery>> {
        let mut queries = Vec::new();
        for file in self.files()? {
            let found = read_file(&file)?;
            log::debug!("Read {} saved queries from {}", found.len(), file.display());
            queries.extend(found);
        }
        Ok(queries)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("json")
}

fn read_file(path: &Path) -> Result<Vec<SavedQuery>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                SavedQuery::try_from(item)
                    .with_context(|| format!("Invalid saved query #{} in {}", i + 1, path.display()))
            })
            .collect(),
        item => {
            let query = SavedQuery::try_from(item)
                .with_context(|| format!("Invalid saved query in {}", path.display()))?;
            Ok(vec![query])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, value: Value) {
        std::fs::write(dir.join(name), serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    #[test]
    fn test_single_object_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "one.json", json!({"name": "Laptops"}));

        let queries = JsonSourceReader::new(temp.path().join("one.json"))
            .read_all()
            .unwrap();
        assert_eq!(queries, vec![SavedQuery::new("Laptops")]);
    }

    #[test]
    fn test_array_file() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "all.json",
            json!([{"name": "a"}, {"name": "b"}]),
        );

        let queries = JsonSourceReader::new(temp.path().join("all.json"))
            .read_all()
            .unwrap();
        let names: Vec<&str> = queries.iter().map(|q| q.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_directory_mixed_shapes_in_file_order() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.json", json!({"name": "third"}));
        write(
            temp.path(),
            "a.json",
            json!([{"name": "first"}, {"name": "second"}]),
        );
        std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(temp.path().join("nested.json")).unwrap();

        let reader = JsonSourceReader::new(temp.path());
        assert_eq!(reader.files().unwrap().len(), 2);

        let names: Vec<String> = reader
            .read_all()
            .unwrap()
            .iter()
            .map(|q| q.name().to_string())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_non_json_file_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("queries.txt"), "{}").unwrap();

        let err = JsonSourceReader::new(temp.path().join("queries.txt"))
            .files()
            .unwrap_err();
        assert!(err.to_string().contains(".json extension"));
    }

    #[test]
    fn test_empty_directory_rejected() {
        let temp = TempDir::new().unwrap();
        let err = JsonSourceReader::new(temp.path()).files().unwrap_err();
        assert!(err.to_string().contains("No .json files"));
    }

    #[test]
    fn test_missing_path_rejected() {
        let temp = TempDir::new().unwrap();
        let err = JsonSourceReader::new(temp.path().join("missing"))
            .files()
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_record_without_name_rejected() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "bad.json", json!([{"name": "ok"}, {"view": {}}]));

        let err = JsonSourceReader::new(temp.path()).read_all().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("#2"));
        assert!(message.contains("missing the 'name' field"));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("broken.json"), "{not json").unwrap();

        let err = JsonSourceReader::new(temp.path()).read_all().unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
