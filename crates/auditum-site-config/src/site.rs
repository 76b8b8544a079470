//! The composed site configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::I18nConfig;
use crate::plugin::PluginDescriptor;
use crate::preset::{PresetEntry, PresetOptions};
use crate::route::{Precedence, RouteTable};
use crate::theme::ThemeConfig;

/// How a build reacts to a class of problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingSeverity {
    Ignore,
    Log,
    Warn,
    Throw,
}

/// Validated, immutable site configuration.
///
/// Only [`SiteComposer`](crate::SiteComposer) creates values of this type, so
/// holding one means every invariant has been checked. Consumers receive it
/// by reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteConfig {
    pub(crate) title: String,
    pub(crate) tagline: String,
    pub(crate) url: String,
    pub(crate) base_url: String,
    pub(crate) favicon: Option<String>,
    pub(crate) organization_name: Option<String>,
    pub(crate) project_name: Option<String>,
    pub(crate) site_dir: PathBuf,
    pub(crate) on_broken_links: ReportingSeverity,
    pub(crate) on_broken_markdown_links: ReportingSeverity,
    pub(crate) on_duplicate_routes: ReportingSeverity,
    pub(crate) i18n: I18nConfig,
    pub(crate) presets: Vec<PresetEntry>,
    pub(crate) plugins: Vec<PluginDescriptor>,
    pub(crate) theme_config: ThemeConfig,
    pub(crate) routes: RouteTable,
}

/// A local file the configuration points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSource {
    /// Config field that references the file
    pub field: String,
    /// Absolute path on disk
    pub path: PathBuf,
}

impl SiteConfig {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tagline(&self) -> &str {
        &self.tagline
    }

    /// Canonical production URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path prefix the site is served under, always slash-wrapped.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn favicon(&self) -> Option<&str> {
        self.favicon.as_deref()
    }

    pub fn organization_name(&self) -> Option<&str> {
        self.organization_name.as_deref()
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    /// Absolute site root.
    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    /// Directory holding static assets (`<site>/static`).
    pub fn static_dir(&self) -> PathBuf {
        self.site_dir.join("static")
    }

    pub fn on_broken_links(&self) -> ReportingSeverity {
        self.on_broken_links
    }

    pub fn on_broken_markdown_links(&self) -> ReportingSeverity {
        self.on_broken_markdown_links
    }

    pub fn on_duplicate_routes(&self) -> ReportingSeverity {
        self.on_duplicate_routes
    }

    pub fn i18n(&self) -> &I18nConfig {
        &self.i18n
    }

    /// Presets in declaration order.
    pub fn presets(&self) -> &[PresetEntry] {
        &self.presets
    }

    /// First preset declared under `name`.
    pub fn preset(&self, name: &str) -> Option<&PresetEntry> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Plugins in declaration order.
    pub fn plugins(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    pub fn theme_config(&self) -> &ThemeConfig {
        &self.theme_config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn route_precedence(&self) -> Precedence {
        self.routes.precedence()
    }

    /// Every local file the build will need, resolved against the site root.
    ///
    /// OpenAPI documents stay unresolved in the configuration itself; they
    /// are joined onto the site root here so the build can check them.
    pub fn local_sources(&self) -> Vec<LocalSource> {
        let mut sources = Vec::new();

        for (i, preset) in self.presets.iter().enumerate() {
            let field = |rest: String| format!("presets[{}].options.{}", i, rest);
            match &preset.options {
                PresetOptions::Classic(classic) => {
                    if let Some(path) = classic
                        .docs
                        .sidebar_path
                        .as_ref()
                        .filter(|_| classic.docs.enabled)
                    {
                        sources.push(LocalSource {
                            field: field("docs.sidebar_path".to_string()),
                            path: path.clone(),
                        });
                    }
                    if let Some(path) = &classic.theme.custom_css {
                        sources.push(LocalSource {
                            field: field("theme.custom_css".to_string()),
                            path: path.clone(),
                        });
                    }
                }
                PresetOptions::ApiDocs(api) => {
                    for (j, spec) in api.specs.iter().enumerate() {
                        sources.push(LocalSource {
                            field: field(format!("specs[{}].spec", j)),
                            path: self.site_dir.join(&spec.spec),
                        });
                    }
                    if let Some(path) = &api.config {
                        sources.push(LocalSource {
                            field: field("config".to_string()),
                            path: self.site_dir.join(path),
                        });
                    }
                }
            }
        }

        sources
    }
}
