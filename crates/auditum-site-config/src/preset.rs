//! Presets: named bundles of content plugins and their options.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::env::BuildEnv;
use crate::error::ConfigValidationError;
use crate::route::{join_route, RouteEntry, RouteKind};

/// Docs, blog and pages.
pub const CLASSIC: &str = "classic";

/// API reference pages rendered from OpenAPI documents.
pub const API_DOCS: &str = "apiDocs";

const API_DOCS_ALIASES: &[&str] = &[API_DOCS, "redocusaurus"];

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

/// A preset as written in the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPreset {
    pub name: String,
    #[serde(default)]
    pub options: toml::Table,
}

impl RawPreset {
    pub fn new(name: impl Into<String>, options: toml::Table) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// A validated preset, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetEntry {
    /// Name as declared
    pub name: String,
    pub options: PresetOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PresetOptions {
    Classic(ClassicOptions),
    ApiDocs(ApiDocsOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassicOptions {
    pub docs: DocsOptions,
    pub blog: BlogOptions,
    pub pages: PagesOptions,
    pub theme: ClassicThemeOptions,
    pub google_analytics: Option<GoogleAnalytics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsOptions {
    pub enabled: bool,
    pub route_base_path: String,
    /// Sidebar definition file, absolute after composition
    pub sidebar_path: Option<PathBuf>,
    /// Base URL for "edit this page" links
    pub edit_url: Option<String>,
}

impl Default for DocsOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            route_base_path: "docs".to_string(),
            sidebar_path: None,
            edit_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogOptions {
    pub enabled: bool,
    pub route_base_path: String,
    pub show_reading_time: bool,
    pub edit_url: Option<String>,
}

impl Default for BlogOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            route_base_path: "blog".to_string(),
            show_reading_time: false,
            edit_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesOptions {
    pub enabled: bool,
    pub route_base_path: String,
}

impl Default for PagesOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            route_base_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassicThemeOptions {
    /// Stylesheet layered over the theme, absolute after composition
    pub custom_css: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleAnalytics {
    pub tracking_id: String,
    #[serde(default)]
    pub anonymize_ip: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiDocsOptions {
    /// Verbose output from the API reference renderer
    pub debug: bool,
    /// Turn `debug` on when this environment variable is set and non-empty
    pub debug_env: Option<String>,
    /// OpenAPI documents and the routes they are served at
    pub specs: Vec<ApiSpec>,
    pub theme: ApiDocsTheme,
    /// Renderer config file, passed through as declared
    pub config: Option<PathBuf>,
}

/// An OpenAPI document mapped to a route. The path is never resolved here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSpec {
    pub spec: PathBuf,
    pub route: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiDocsTheme {
    pub primary_color: Option<String>,
    pub primary_color_dark: Option<String>,
}

/// Whether `name` selects the API docs preset.
pub fn is_api_docs_name(name: &str) -> bool {
    API_DOCS_ALIASES.contains(&name)
}

impl PresetEntry {
    /// Validate a declared preset and resolve its local paths.
    ///
    /// `index` is the position in the preset list, used in error messages.
    pub fn from_raw(
        index: usize,
        raw: &RawPreset,
        site_dir: &Path,
        env: &BuildEnv,
    ) -> Result<Self, ConfigValidationError> {
        let field = format!("presets[{}]", index);
        let options = toml::Value::Table(raw.options.clone());
        let parse_error =
            |e: toml::de::Error| ConfigValidationError::invalid(format!("{}.options", field), e.to_string());

        let options = match raw.name.as_str() {
            CLASSIC => {
                let mut classic: ClassicOptions = options.try_into().map_err(parse_error)?;
                classic.validate(&field)?;
                classic.resolve_paths(site_dir);
                PresetOptions::Classic(classic)
            }
            name if is_api_docs_name(name) => {
                let mut api: ApiDocsOptions = options.try_into().map_err(parse_error)?;
                api.validate(&field)?;
                api.apply_env(env);
                PresetOptions::ApiDocs(api)
            }
            _ => {
                return Err(ConfigValidationError::UnknownPreset {
                    index,
                    name: raw.name.clone(),
                })
            }
        };

        Ok(Self {
            name: raw.name.clone(),
            options,
        })
    }

    /// Routes this preset claims, in the order it registers them.
    pub fn routes(&self, base_url: &str) -> Vec<RouteEntry> {
        let entry = |path: String, kind: RouteKind| RouteEntry {
            path,
            preset: self.name.clone(),
            kind,
        };

        match &self.options {
            PresetOptions::Classic(classic) => {
                let mut routes = Vec::new();
                if classic.docs.enabled {
                    routes.push(entry(
                        join_route(base_url, &classic.docs.route_base_path),
                        RouteKind::Docs {
                            sidebar: classic.docs.sidebar_path.clone(),
                        },
                    ));
                }
                if classic.blog.enabled {
                    routes.push(entry(
                        join_route(base_url, &classic.blog.route_base_path),
                        RouteKind::Blog,
                    ));
                }
                if classic.pages.enabled {
                    routes.push(entry(
                        join_route(base_url, &classic.pages.route_base_path),
                        RouteKind::Pages,
                    ));
                }
                routes
            }
            PresetOptions::ApiDocs(api) => api
                .specs
                .iter()
                .map(|s| {
                    entry(
                        join_route(base_url, &s.route),
                        RouteKind::ApiReference {
                            spec: s.spec.clone(),
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn is_api_docs(&self) -> bool {
        matches!(self.options, PresetOptions::ApiDocs(_))
    }
}

impl ClassicOptions {
    fn validate(&self, field: &str) -> Result<(), ConfigValidationError> {
        let bases = [
            ("docs", &self.docs.route_base_path),
            ("blog", &self.blog.route_base_path),
            ("pages", &self.pages.route_base_path),
        ];
        for (section, base) in bases {
            if base.chars().any(char::is_whitespace) {
                return Err(ConfigValidationError::invalid(
                    format!("{}.options.{}.route_base_path", field, section),
                    format!("`{}` contains whitespace", base),
                ));
            }
        }

        if let Some(ga) = &self.google_analytics {
            if ga.tracking_id.trim().is_empty() {
                return Err(ConfigValidationError::invalid(
                    format!("{}.options.google_analytics.tracking_id", field),
                    "tracking id must not be empty",
                ));
            }
        }

        Ok(())
    }

    fn resolve_paths(&mut self, site_dir: &Path) {
        if let Some(path) = self.docs.sidebar_path.take() {
            self.docs.sidebar_path = Some(resolve_local(site_dir, &path));
        }
        if let Some(path) = self.theme.custom_css.take() {
            self.theme.custom_css = Some(resolve_local(site_dir, &path));
        }
    }
}

impl ApiDocsOptions {
    fn validate(&self, field: &str) -> Result<(), ConfigValidationError> {
        if self.specs.is_empty() {
            return Err(ConfigValidationError::invalid(
                format!("{}.options.specs", field),
                "at least one OpenAPI document is required",
            ));
        }

        for (i, spec) in self.specs.iter().enumerate() {
            if spec.spec.as_os_str().is_empty() {
                return Err(ConfigValidationError::invalid(
                    format!("{}.options.specs[{}].spec", field, i),
                    "document path must not be empty",
                ));
            }
            if !spec.route.starts_with('/') {
                return Err(ConfigValidationError::invalid(
                    format!("{}.options.specs[{}].route", field, i),
                    format!("`{}` must start with `/`", spec.route),
                ));
            }
        }

        let colors = [
            ("primary_color", &self.theme.primary_color),
            ("primary_color_dark", &self.theme.primary_color_dark),
        ];
        for (name, color) in colors {
            if let Some(color) = color {
                if !HEX_COLOR.is_match(color) {
                    return Err(ConfigValidationError::invalid(
                        format!("{}.options.theme.{}", field, name),
                        format!("`{}` is not a hex color", color),
                    ));
                }
            }
        }

        Ok(())
    }

    fn apply_env(&mut self, env: &BuildEnv) {
        if let Some(var) = &self.debug_env {
            self.debug = self.debug || env.flag(var);
        }
    }
}

/// Make a site-relative path absolute without touching the filesystem.
pub(crate) fn resolve_local(site_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&site_dir.join(path))
    }
}

/// Drop `.` components and fold `..` lexically.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
