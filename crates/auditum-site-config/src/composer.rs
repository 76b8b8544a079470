//! Builds the [`SiteConfig`] from a declared [`SiteSource`].

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::env::BuildEnv;
use crate::error::ConfigValidationError;
use crate::plugin::{PluginDescriptor, PluginRegistry};
use crate::preset::{normalize, PresetEntry};
use crate::route::{RouteCollision, RouteTable};
use crate::site::{ReportingSeverity, SiteConfig};
use crate::source::SiteSource;

static SITE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/]+(/\S*)?$").expect("valid regex"));

/// Composes and validates the site configuration.
///
/// Composition is a pure function of the source, the site directory, the
/// plugin registry and the environment snapshot.
#[derive(Debug)]
pub struct SiteComposer<'a> {
    site_dir: PathBuf,
    registry: &'a PluginRegistry,
    env: BuildEnv,
}

impl<'a> SiteComposer<'a> {
    /// Create a composer for the site rooted at `site_dir`.
    pub fn new(site_dir: impl Into<PathBuf>, registry: &'a PluginRegistry) -> Self {
        Self {
            site_dir: site_dir.into(),
            registry,
            env: BuildEnv::default(),
        }
    }

    /// Use an environment snapshot instead of an empty one.
    pub fn with_env(mut self, env: BuildEnv) -> Self {
        self.env = env;
        self
    }

    pub fn env(&self) -> &BuildEnv {
        &self.env
    }

    /// Validate `source` and build the immutable configuration.
    pub fn build_config(&self, source: &SiteSource) -> Result<SiteConfig, ConfigValidationError> {
        validate_identity(source)?;
        source.i18n.validate()?;

        let site_dir = std::path::absolute(&self.site_dir)
            .map(|p| normalize(&p))
            .map_err(|e| ConfigValidationError::invalid("site_dir", e.to_string()))?;

        let presets = source
            .presets
            .iter()
            .enumerate()
            .map(|(i, raw)| PresetEntry::from_raw(i, raw, &site_dir, &self.env))
            .collect::<Result<Vec<_>, _>>()?;

        self.validate_plugins(&source.plugins)?;

        let mut routes = RouteTable::new(source.route_precedence);
        for preset in &presets {
            for entry in preset.routes(&source.base_url) {
                if let Some(collision) = routes.register(entry) {
                    report_collision(source.on_duplicate_routes, collision)?;
                }
            }
        }

        tracing::debug!(
            "Composed site config: {} presets, {} plugins, {} routes",
            presets.len(),
            source.plugins.len(),
            routes.len()
        );

        Ok(SiteConfig {
            title: source.title.clone(),
            tagline: source.tagline.clone(),
            url: source.url.clone(),
            base_url: source.base_url.clone(),
            favicon: source.favicon.clone(),
            organization_name: source.organization_name.clone(),
            project_name: source.project_name.clone(),
            site_dir,
            on_broken_links: source.on_broken_links,
            on_broken_markdown_links: source.on_broken_markdown_links,
            on_duplicate_routes: source.on_duplicate_routes,
            i18n: source.i18n.clone(),
            presets,
            plugins: source.plugins.clone(),
            theme_config: source.theme_config.clone(),
            routes,
        })
    }

    fn validate_plugins(&self, plugins: &[PluginDescriptor]) -> Result<(), ConfigValidationError> {
        let mut seen = HashSet::new();

        for (index, plugin) in plugins.iter().enumerate() {
            let name = plugin.name();
            if name.trim().is_empty() {
                return Err(ConfigValidationError::invalid(
                    format!("plugins[{}].name", index),
                    "plugin name must not be empty",
                ));
            }
            if let PluginDescriptor::Named { name, .. } = plugin {
                if !self.registry.contains(name) {
                    return Err(ConfigValidationError::UnknownPlugin {
                        index,
                        name: name.clone(),
                    });
                }
            }
            if !seen.insert(name) {
                return Err(ConfigValidationError::invalid(
                    format!("plugins[{}]", index),
                    format!("plugin `{}` is declared more than once", name),
                ));
            }
        }

        Ok(())
    }
}

fn validate_identity(source: &SiteSource) -> Result<(), ConfigValidationError> {
    if source.title.trim().is_empty() {
        return Err(ConfigValidationError::invalid("title", "must not be empty"));
    }

    if !SITE_URL.is_match(&source.url) {
        return Err(ConfigValidationError::invalid(
            "url",
            format!("`{}` is not an absolute http(s) URL", source.url),
        ));
    }

    if !source.base_url.starts_with('/') || !source.base_url.ends_with('/') {
        return Err(ConfigValidationError::invalid(
            "base_url",
            format!("`{}` must start and end with `/`", source.base_url),
        ));
    }

    Ok(())
}

fn report_collision(
    severity: ReportingSeverity,
    collision: &RouteCollision,
) -> Result<(), ConfigValidationError> {
    match severity {
        ReportingSeverity::Throw => Err(ConfigValidationError::DuplicateRoute {
            path: collision.path.clone(),
            kept: collision.kept.preset.clone(),
            shadowed: collision.shadowed.preset.clone(),
        }),
        ReportingSeverity::Warn => {
            tracing::warn!(
                "Duplicate route {}: keeping {} over {}",
                collision.path,
                collision.kept.preset,
                collision.shadowed.preset
            );
            Ok(())
        }
        ReportingSeverity::Log => {
            tracing::info!(
                "Duplicate route {}: keeping {} over {}",
                collision.path,
                collision.kept.preset,
                collision.shadowed.preset
            );
            Ok(())
        }
        ReportingSeverity::Ignore => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::RawPreset;
    use crate::route::Precedence;
    use crate::{DebugEnvFix, PresetOptions};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn classic() -> RawPreset {
        RawPreset::new(
            "classic",
            toml::toml! {
                [docs]
                sidebar_path = "sidebars.toml"
            },
        )
    }

    fn api_docs() -> RawPreset {
        RawPreset::new(
            "apiDocs",
            toml::toml! {
                debug_env = "DEBUG"

                [[specs]]
                spec = "openapi/v1alpha1/api.yaml"
                route = "/reference/redoc/latest"
            },
        )
    }

    fn source(presets: Vec<RawPreset>) -> SiteSource {
        SiteSource {
            title: "Auditum".to_string(),
            url: "https://auditum.io".to_string(),
            presets,
            ..Default::default()
        }
    }

    fn compose(source: &SiteSource) -> Result<SiteConfig, ConfigValidationError> {
        let registry = PluginRegistry::with_builtins();
        SiteComposer::new("/srv/site", &registry).build_config(source)
    }

    #[test]
    fn classic_then_api_docs() {
        let config = compose(&source(vec![classic(), api_docs()])).unwrap();

        assert_eq!(config.presets()[0].name, "classic");
        assert_eq!(config.presets()[1].name, "apiDocs");
        assert_eq!(config.i18n().default_locale, "en");
        assert!(config.i18n().contains(&config.i18n().default_locale));
    }

    #[test]
    fn preset_order_is_not_commutative() {
        let ab = compose(&source(vec![classic(), api_docs()])).unwrap();
        let ba = compose(&source(vec![api_docs(), classic()])).unwrap();

        let names = |c: &SiteConfig| c.presets().iter().map(|p| p.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&ab), vec!["classic", "apiDocs"]);
        assert_eq!(names(&ba), vec!["apiDocs", "classic"]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn plugin_order_is_preserved() {
        let mut src = source(vec![classic()]);
        src.plugins = vec![
            PluginDescriptor::named("debug-env-fix", json!({})),
            PluginDescriptor::inline(Renamed("late-inline"), json!({ "n": 1 })),
            PluginDescriptor::inline(Renamed("early-inline"), json!({ "n": 2 })),
        ];

        let config = compose(&src).unwrap();

        let names: Vec<&str> = config.plugins().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["debug-env-fix", "late-inline", "early-inline"]);
    }

    #[test]
    fn rejects_default_locale_outside_locales() {
        let mut src = source(vec![classic()]);
        src.i18n.default_locale = "de".to_string();

        let result = compose(&src);

        assert!(matches!(
            result,
            Err(ConfigValidationError::DefaultLocaleNotListed { .. })
        ));
    }

    #[test]
    fn identical_inputs_compose_equal_values() {
        let src = source(vec![classic(), api_docs()]);
        let registry = PluginRegistry::with_builtins();
        let env = BuildEnv::new().with_var("DEBUG", "1");

        let first = SiteComposer::new("/srv/site", &registry)
            .with_env(env.clone())
            .build_config(&src)
            .unwrap();
        let second = SiteComposer::new("/srv/site", &registry)
            .with_env(env)
            .build_config(&src)
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn env_state_changes_the_value() {
        let src = source(vec![api_docs()]);
        let registry = PluginRegistry::with_builtins();

        let quiet = SiteComposer::new("/srv/site", &registry)
            .build_config(&src)
            .unwrap();
        let noisy = SiteComposer::new("/srv/site", &registry)
            .with_env(BuildEnv::new().with_var("DEBUG", "1"))
            .build_config(&src)
            .unwrap();

        assert_ne!(quiet, noisy);
        let PresetOptions::ApiDocs(api) = &noisy.presets()[0].options else {
            panic!("expected api docs options");
        };
        assert!(api.debug);
    }

    #[test]
    fn resolves_site_relative_paths() {
        let config = compose(&source(vec![classic()])).unwrap();

        let sources = config.local_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].field, "presets[0].options.docs.sidebar_path");
        assert_eq!(sources[0].path, PathBuf::from("/srv/site/sidebars.toml"));
    }

    #[test]
    fn disabled_docs_skip_sidebar_source() {
        let preset = RawPreset::new(
            "classic",
            toml::toml! {
                [docs]
                enabled = false
                sidebar_path = "sidebars.toml"

                [theme]
                custom_css = "src/css/custom.css"
            },
        );

        let config = compose(&source(vec![preset])).unwrap();

        let sources = config.local_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].field, "presets[0].options.theme.custom_css");
    }

    #[test]
    fn derives_routes_in_preset_order() {
        let config = compose(&source(vec![classic(), api_docs()])).unwrap();

        let paths: Vec<&str> = config
            .routes()
            .entries()
            .iter()
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(paths, vec!["/docs", "/blog", "/", "/reference/redoc/latest"]);
    }

    #[test]
    fn duplicate_routes_follow_precedence() {
        let blog_at_docs = RawPreset::new(
            "classic",
            toml::toml! {
                [docs]
                enabled = false
                [blog]
                route_base_path = "docs"
                [pages]
                enabled = false
            },
        );

        let mut src = source(vec![classic(), blog_at_docs]);
        let first = compose(&src).unwrap();
        assert_eq!(first.routes().collisions().len(), 1);
        assert!(matches!(
            first.routes().get("/docs").unwrap().kind,
            crate::RouteKind::Docs { .. }
        ));

        src.route_precedence = Precedence::LastWins;
        let last = compose(&src).unwrap();
        assert_eq!(last.routes().get("/docs").unwrap().kind, crate::RouteKind::Blog);
    }

    #[test]
    fn duplicate_routes_can_fail_the_build() {
        let mut src = source(vec![classic(), classic()]);
        src.on_duplicate_routes = ReportingSeverity::Throw;

        let result = compose(&src);

        assert!(matches!(
            result,
            Err(ConfigValidationError::DuplicateRoute { ref path, .. }) if path == "/docs"
        ));
    }

    #[test]
    fn rejects_unregistered_named_plugin() {
        let mut src = source(vec![classic()]);
        src.plugins = vec![PluginDescriptor::named("sitemap-ng", json!({}))];

        let result = compose(&src);

        assert!(matches!(
            result,
            Err(ConfigValidationError::UnknownPlugin { index: 0, ref name }) if name == "sitemap-ng"
        ));
    }

    #[test]
    fn rejects_duplicate_plugins() {
        let mut src = source(vec![classic()]);
        src.plugins = vec![
            PluginDescriptor::named("debug-env-fix", json!({})),
            PluginDescriptor::inline(DebugEnvFix, json!({})),
        ];

        assert!(compose(&src).is_err());
    }

    #[test]
    fn rejects_bad_identity_fields() {
        let mut src = source(vec![]);
        src.url = "auditum.io".to_string();
        assert!(matches!(
            compose(&src),
            Err(ConfigValidationError::Invalid { ref field, .. }) if field == "url"
        ));

        let mut src = source(vec![]);
        src.base_url = "/docs".to_string();
        assert!(matches!(
            compose(&src),
            Err(ConfigValidationError::Invalid { ref field, .. }) if field == "base_url"
        ));

        let mut src = source(vec![]);
        src.title = "  ".to_string();
        assert!(compose(&src).is_err());
    }

    #[test]
    fn base_url_prefixes_routes() {
        let mut src = source(vec![classic()]);
        src.base_url = "/auditum/".to_string();

        let config = compose(&src).unwrap();

        assert!(config.routes().get("/auditum/docs").is_some());
        assert!(config.routes().get("/auditum/").is_some());
    }

    struct Renamed(&'static str);

    impl crate::PluginFactory for Renamed {
        fn name(&self) -> &str {
            self.0
        }

        fn create(
            &self,
            _ctx: &crate::BuildContext<'_>,
            _options: &serde_json::Value,
        ) -> Result<Box<dyn crate::Plugin>, ConfigValidationError> {
            Err(ConfigValidationError::invalid(self.0, "not instantiated in tests"))
        }
    }
}
