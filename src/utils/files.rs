//! Local file helpers for publishing and saving previews.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::models::ContentsModel;

/// Pick a file name that does not collide with `existing`.
///
/// Tries `name`, then inserts 1, 2, ... before the extension:
/// `Untitled.ipynb`, `Untitled1.ipynb`, `Untitled2.ipynb`.
pub fn generate_file_name(name: &str, existing: &[String]) -> String {
    let path = Path::new(name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let mut index = 0usize;
    loop {
        let candidate = if index == 0 {
            format!("{stem}{extension}")
        } else {
            format!("{stem}{index}{extension}")
        };
        if !existing.iter().any(|name| name == &candidate) {
            return candidate;
        }
        index += 1;
    }
}

/// Names of the entries of a directory; empty when it cannot be read.
pub fn existing_names(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Read a local notebook into the payload used for publishing.
pub fn load_notebook(path: &Path) -> Result<ContentsModel> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("{} is not a valid notebook", path.display()))?;

    let metadata = std::fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
    let modified: DateTime<Utc> = metadata.modified().map(DateTime::from).unwrap_or_else(|_| Utc::now());
    let created: DateTime<Utc> = metadata.created().map(DateTime::from).unwrap_or(modified);

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(ContentsModel {
        name,
        path: path.to_string_lossy().into_owned(),
        kind: "notebook".to_string(),
        created: created.to_rfc3339(),
        last_modified: modified.to_rfc3339(),
        mimetype: None,
        content,
        format: "json".to_string(),
    })
}
