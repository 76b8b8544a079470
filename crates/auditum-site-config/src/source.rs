//! Declared site configuration, as read from `site.toml`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigValidationError;
use crate::i18n::I18nConfig;
use crate::plugin::PluginDescriptor;
use crate::preset::{is_api_docs_name, RawPreset};
use crate::route::Precedence;
use crate::site::ReportingSeverity;
use crate::theme::ThemeConfig;

/// Unvalidated input to [`SiteComposer`](crate::SiteComposer).
///
/// Inline plugins cannot be written in TOML; push them onto `plugins` after
/// loading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSource {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default = "default_on_broken_links")]
    pub on_broken_links: ReportingSeverity,
    #[serde(default = "default_warn")]
    pub on_broken_markdown_links: ReportingSeverity,
    #[serde(default = "default_warn")]
    pub on_duplicate_routes: ReportingSeverity,
    #[serde(default)]
    pub route_precedence: Precedence,
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub presets: Vec<RawPreset>,
    #[serde(default)]
    pub plugins: Vec<PluginDescriptor>,
    #[serde(default)]
    pub theme_config: ThemeConfig,
}

fn default_base_url() -> String {
    "/".to_string()
}

fn default_on_broken_links() -> ReportingSeverity {
    ReportingSeverity::Throw
}

fn default_warn() -> ReportingSeverity {
    ReportingSeverity::Warn
}

impl Default for SiteSource {
    fn default() -> Self {
        Self {
            title: String::new(),
            tagline: String::new(),
            url: String::new(),
            base_url: default_base_url(),
            favicon: None,
            organization_name: None,
            project_name: None,
            on_broken_links: default_on_broken_links(),
            on_broken_markdown_links: default_warn(),
            on_duplicate_routes: default_warn(),
            route_precedence: Precedence::default(),
            i18n: I18nConfig::default(),
            presets: Vec::new(),
            plugins: Vec::new(),
            theme_config: ThemeConfig::default(),
        }
    }
}

impl SiteSource {
    /// Read and parse a `site.toml` file.
    pub fn load(path: &Path) -> Result<Self, ConfigValidationError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigValidationError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let source = toml::from_str(&content).map_err(|e: toml::de::Error| {
            ConfigValidationError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        tracing::debug!("Loaded site config from {}", path.display());
        Ok(source)
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigValidationError> {
        toml::from_str(content).map_err(|e: toml::de::Error| ConfigValidationError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Whether any preset declaration names the API docs preset.
    pub fn declares_api_docs(&self) -> bool {
        self.presets.iter().any(|p| is_api_docs_name(&p.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const AUDITUM: &str = r##"
title = "Auditum"
tagline = "Audit Log management for any application."
url = "https://auditum.io"
base_url = "/"
favicon = "img/favicon.ico"
organization_name = "infragmo"
project_name = "auditum"
on_broken_links = "throw"

[i18n]
default_locale = "en"
locales = ["en"]

[[presets]]
name = "classic"

[presets.options.docs]
sidebar_path = "sidebars.toml"
edit_url = "https://github.com/infragmo/auditum/tree/main/website/"

[presets.options.blog]
show_reading_time = true

[[presets]]
name = "apiDocs"

[presets.options]
debug_env = "DEBUG"

[[presets.options.specs]]
spec = "openapi/v1alpha1/api.yaml"
route = "/reference/redoc/latest"

[[plugins]]
name = "debug-env-fix"

[theme_config.navbar]
title = "Auditum"

[[theme_config.navbar.items]]
type = "docSidebar"
sidebar_id = "docSidebar"
label = "Docs"

[[theme_config.navbar.items]]
href = "https://github.com/infragmo/auditum"
label = "GitHub"
position = "right"
"##;

    #[test]
    fn parses_full_site_file() {
        let source = SiteSource::from_toml_str(AUDITUM).unwrap();

        assert_eq!(source.title, "Auditum");
        assert_eq!(source.presets.len(), 2);
        assert_eq!(source.presets[0].name, "classic");
        assert_eq!(source.presets[1].name, "apiDocs");
        assert_eq!(source.plugins.len(), 1);
        assert_eq!(source.theme_config.navbar.items.len(), 2);
        assert_eq!(
            source.theme_config.navbar.items[0].kind.as_deref(),
            Some("docSidebar")
        );
        assert!(source.declares_api_docs());
    }

    #[test]
    fn applies_defaults() {
        let source = SiteSource::from_toml_str("title = \"Docs\"").unwrap();

        assert_eq!(source.base_url, "/");
        assert_eq!(source.on_broken_links, ReportingSeverity::Throw);
        assert_eq!(source.on_duplicate_routes, ReportingSeverity::Warn);
        assert_eq!(source.i18n, I18nConfig::default());
        assert_eq!(source.theme_config.prism.theme, "github");
    }

    #[test]
    fn rejects_unknown_top_level_keys() {
        let result = SiteSource::from_toml_str("title = \"Docs\"\nbaseUrl = \"/\"");

        assert!(matches!(result, Err(ConfigValidationError::Parse { .. })));
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = tempdir().unwrap();

        let result = SiteSource::load(&temp.path().join("site.toml"));

        assert!(matches!(result, Err(ConfigValidationError::Read { .. })));
    }

    #[test]
    fn loads_from_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, AUDITUM).unwrap();

        let source = SiteSource::load(&path).unwrap();

        assert_eq!(source.url, "https://auditum.io");
    }
}
