//! Static asset lookup.
//!
//! Scans the static directory once and resolves icon keys such as
//! `img/features/hourglass.svg` (optionally prefixed with `@site/static/`)
//! to files on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Prefix accepted in front of static asset keys.
pub const SITE_STATIC_PREFIX: &str = "@site/static/";

/// An asset key that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ResolvedAsset {
    /// Normalized key, relative to the static directory
    pub key: String,
    /// Absolute file path
    pub path: PathBuf,
}

/// Index of the files under a static directory.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    root: PathBuf,
    /// Files keyed by `/`-separated path relative to `root`
    files: BTreeMap<String, PathBuf>,
}

impl AssetRegistry {
    /// Create an empty registry rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: BTreeMap::new(),
        }
    }

    /// Index every file under `root`.
    pub fn scan(root: &Path) -> Result<Self, AssetResolutionError> {
        if !root.is_dir() {
            return Err(AssetResolutionError::DirectoryNotFound(root.to_path_buf()));
        }

        let mut registry = Self::new(root);

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            registry.files.insert(key, path.to_path_buf());
        }

        tracing::debug!(
            "Indexed {} static assets under {}",
            registry.files.len(),
            root.display()
        );

        Ok(registry)
    }

    /// Register a single file under `key`.
    pub fn insert(&mut self, key: &str, path: impl Into<PathBuf>) {
        self.files.insert(normalize_key(key).to_string(), path.into());
    }

    /// Resolve `key`; `referenced_by` names the field for error messages.
    pub fn resolve(
        &self,
        key: &str,
        referenced_by: &str,
    ) -> Result<ResolvedAsset, AssetResolutionError> {
        let normalized = normalize_key(key);

        self.files
            .get(normalized)
            .map(|path| ResolvedAsset {
                key: normalized.to_string(),
                path: path.clone(),
            })
            .ok_or_else(|| AssetResolutionError::NotFound {
                referenced_by: referenced_by.to_string(),
                key: key.to_string(),
                root: self.root.clone(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.files.contains_key(normalize_key(key))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn normalize_key(key: &str) -> &str {
    key.strip_prefix(SITE_STATIC_PREFIX)
        .unwrap_or(key)
        .trim_start_matches('/')
}

/// A referenced asset or document that does not exist.
#[derive(Debug, thiserror::Error)]
pub enum AssetResolutionError {
    #[error("Static directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("{referenced_by}: asset `{key}` not found under {}", .root.display())]
    NotFound {
        referenced_by: String,
        key: String,
        root: PathBuf,
    },

    #[error("{referenced_by}: file not found: {}", .path.display())]
    MissingFile {
        referenced_by: String,
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn scans_nested_files() {
        let temp = tempdir().unwrap();
        let icons = temp.path().join("img/features");
        fs::create_dir_all(&icons).unwrap();
        fs::write(icons.join("hourglass.svg"), "<svg/>").unwrap();
        fs::write(temp.path().join("favicon.ico"), "").unwrap();

        let registry = AssetRegistry::scan(temp.path()).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("img/features/hourglass.svg"));
        assert!(registry.contains("favicon.ico"));
    }

    #[test]
    fn accepts_site_static_prefix() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("img")).unwrap();
        fs::write(temp.path().join("img/logo.svg"), "<svg/>").unwrap();

        let registry = AssetRegistry::scan(temp.path()).unwrap();
        let asset = registry
            .resolve("@site/static/img/logo.svg", "navbar.logo")
            .unwrap();

        assert_eq!(asset.key, "img/logo.svg");
        assert_eq!(asset.path, temp.path().join("img/logo.svg"));
        assert!(registry.resolve("/img/logo.svg", "navbar.logo").is_ok());
    }

    #[test]
    fn reports_missing_asset() {
        let temp = tempdir().unwrap();

        let registry = AssetRegistry::scan(temp.path()).unwrap();
        let result = registry.resolve("img/missing.svg", "features[0].icon");

        match result {
            Err(AssetResolutionError::NotFound { referenced_by, key, .. }) => {
                assert_eq!(referenced_by, "features[0].icon");
                assert_eq!(key, "img/missing.svg");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn errors_on_missing_directory() {
        let temp = tempdir().unwrap();

        let result = AssetRegistry::scan(&temp.path().join("static"));

        assert!(matches!(
            result,
            Err(AssetResolutionError::DirectoryNotFound(_))
        ));
    }
}
