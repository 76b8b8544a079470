//! Feature records shown on the landing page.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One entry of the feature list. List order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureRecord {
    /// Short label
    pub title: String,
    /// Static asset key of the icon
    pub icon: String,
    /// Inline markdown
    pub description: String,
}

impl FeatureRecord {
    pub fn new(
        title: impl Into<String>,
        icon: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            description: description.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeaturesFile {
    #[serde(default, rename = "feature")]
    features: Vec<FeatureRecord>,
}

/// Errors reading a features file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Read `[[feature]]` entries from a TOML file, keeping file order.
pub fn load_features(path: &Path) -> Result<Vec<FeatureRecord>, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let file: FeaturesFile = toml::from_str(&content).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!("Loaded {} features from {}", file.features.len(), path.display());
    Ok(file.features)
}

/// Write records as a features file that [`load_features`] reads back.
pub fn features_to_toml(records: &[FeatureRecord]) -> Result<String, toml::ser::Error> {
    toml::to_string(&FeaturesFile {
        features: records.to_vec(),
    })
}

/// The Auditum landing page features.
pub fn homepage_features() -> Vec<FeatureRecord> {
    vec![
        FeatureRecord::new(
            "Easy to Use",
            "img/features/hourglass.svg",
            "Auditum is a simple pluggable solution for audit trail that integrates well \
             with any application with as little operational overhead as possible.",
        ),
        FeatureRecord::new(
            "Focus on Your Data",
            "img/features/data.svg",
            "Submit audit records and query them with a simple yet powerful API. \
             Auditum handles all the routine.",
        ),
        FeatureRecord::new(
            "Developer-friendly API",
            "img/features/api.svg",
            "Auditum API provides well-documented Protobuf contracts and supports HTTP \
             and gRPC protocols. OpenAPI (Swagger) specification is also available.",
        ),
        FeatureRecord::new(
            "Cloud Native App",
            "img/features/cloud.svg",
            "Auditum is a [12-factor application](https://12factor.net/), it can be run \
             in a container and easily deployed to a Kubernetes cluster.",
        ),
        FeatureRecord::new(
            "Observability out of the box",
            "img/features/telescope.svg",
            "Auditum has built-in support for structured logging, Prometheus metrics \
             and OpenTelemetry tracing.",
        ),
        FeatureRecord::new(
            "Open Source",
            "img/features/opensource.svg",
            "Powered by Community, Auditum is open source and free. We are open to \
             any contributions.",
        ),
    ]
}
