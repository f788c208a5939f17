//! On-disk theme storage. A theme is a directory under the frames root
//! holding a required `frame.png` and an optional `metadata.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeRecord {
    pub theme: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
struct ThemeMetadata {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ThemeStore {
    root: PathBuf,
}

impl ThemeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a theme's frame bytes. `Ok(None)` means the theme directory
    /// or its frame.png does not exist; the caller decides whether that
    /// is a 404 or an avatar-only render.
    pub fn load_frame(&self, theme: &str) -> Result<Option<Vec<u8>>, ApiError> {
        validate_theme_name(theme)?;
        let path = self.root.join(theme).join("frame.png");
        if !path.is_file() {
            return Ok(None);
        }
        std::fs::read(&path)
            .map(Some)
            .map_err(|e| ApiError::Internal(format!("failed to read frame for '{theme}': {e}")))
    }

    /// Enumerate themes that actually carry a frame asset. Metadata is an
    /// enrichment: a missing or unparseable metadata.json falls back to
    /// theme-name defaults and is never fatal.
    pub fn list(&self) -> Result<Vec<ThemeRecord>, ApiError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            ApiError::Internal(format!(
                "frames directory not found at {}: {e}",
                self.root.display()
            ))
        })?;

        let mut records = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() || !path.join("frame.png").is_file() {
                continue;
            }
            let Some(theme) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            records.push(self.record_for(&theme, &path));
        }
        records.sort_by(|a, b| a.theme.cmp(&b.theme));
        Ok(records)
    }

    fn record_for(&self, theme: &str, dir: &Path) -> ThemeRecord {
        let mut meta = ThemeMetadata::default();
        let meta_path = dir.join("metadata.json");
        if meta_path.is_file() {
            match std::fs::read_to_string(&meta_path)
                .map_err(|e| e.to_string())
                .and_then(|s| serde_json::from_str::<ThemeMetadata>(&s).map_err(|e| e.to_string()))
            {
                Ok(m) => meta = m,
                Err(e) => warn!(theme, error = %e, "invalid metadata.json, using defaults"),
            }
        }
        ThemeRecord {
            theme: theme.to_string(),
            name: meta.name.unwrap_or_else(|| theme.to_string()),
            description: meta
                .description
                .unwrap_or_else(|| format!("{theme} frame theme")),
        }
    }
}

/// Theme names map directly to directory names, so restrict them to a
/// safe character set instead of letting `..` or separators through.
fn validate_theme_name(theme: &str) -> Result<(), ApiError> {
    let ok = !theme.is_empty()
        && theme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "The 'theme' parameter contains invalid characters: '{theme}'."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(themes: &[(&str, bool, Option<&str>)]) -> (tempfile::TempDir, ThemeStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        for (name, with_frame, metadata) in themes {
            let theme_dir = dir.path().join(name);
            std::fs::create_dir_all(&theme_dir).unwrap();
            if *with_frame {
                std::fs::write(theme_dir.join("frame.png"), b"not-a-real-png").unwrap();
            }
            if let Some(json) = metadata {
                std::fs::write(theme_dir.join("metadata.json"), json).unwrap();
            }
        }
        let store = ThemeStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn list_skips_directories_without_frame() {
        let (_dir, store) = store_with(&[("base", true, None), ("empty", false, None)]);
        let records = store.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].theme, "base");
        assert_eq!(records[0].name, "base");
        assert_eq!(records[0].description, "base frame theme");
    }

    #[test]
    fn metadata_enriches_record() {
        let meta = r#"{"name":"Base","description":"the default frame"}"#;
        let (_dir, store) = store_with(&[("base", true, Some(meta))]);
        let records = store.list().unwrap();
        assert_eq!(records[0].name, "Base");
        assert_eq!(records[0].description, "the default frame");
    }

    #[test]
    fn broken_metadata_falls_back_to_defaults() {
        let (_dir, store) = store_with(&[("base", true, Some("{ not json"))]);
        let records = store.list().unwrap();
        assert_eq!(records[0].name, "base");
        assert_eq!(records[0].description, "base frame theme");
    }

    #[test]
    fn load_frame_distinguishes_missing_from_present() {
        let (_dir, store) = store_with(&[("base", true, None)]);
        assert!(store.load_frame("base").unwrap().is_some());
        assert!(store.load_frame("doesnotexist").unwrap().is_none());
    }

    #[test]
    fn path_traversal_names_are_rejected() {
        let (_dir, store) = store_with(&[("base", true, None)]);
        assert!(store.load_frame("../base").is_err());
        assert!(store.load_frame("a/b").is_err());
        assert!(store.load_frame("").is_err());
    }

    #[test]
    fn list_is_sorted_by_theme() {
        let (_dir, store) = store_with(&[("zebra", true, None), ("alpha", true, None)]);
        let names: Vec<_> = store.list().unwrap().into_iter().map(|r| r.theme).collect();
        assert_eq!(names, ["alpha", "zebra"]);
    }
}
