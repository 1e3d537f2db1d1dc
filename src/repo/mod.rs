//! JSON files that carry records between the pipeline stages.

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::Path};

/// Write `value` as pretty-printed JSON, creating parent directories as needed.
pub fn save_json<T>(value: &T, path: &Path) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {:?}", parent))?;
    }

    let mut json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {:?}", path))?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write {:?}", path))?;

    tracing::debug!(path = %path.display(), "saved json");
    Ok(())
}

pub fn load_json<T>(path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse JSON in {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MetadataItem, MetadataOutput};

    #[test]
    fn writes_indented_json_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/meta.json");
        let output = MetadataOutput {
            fetched_at: "2025-02-11T10:00:00-03:00".to_string(),
            total_items: 1,
            items: vec![MetadataItem {
                title: "Title".to_string(),
                ..MetadataItem::default()
            }],
        };

        save_json(&output, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"fetched_at\""));
        assert!(written.ends_with("}\n"));

        let loaded: MetadataOutput = load_json(&path).unwrap();
        assert_eq!(loaded.items, output.items);
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = load_json::<MetadataOutput>(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));

        fs::write(&path, "not json").unwrap();
        let err = load_json::<MetadataOutput>(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse JSON"));
    }
}
