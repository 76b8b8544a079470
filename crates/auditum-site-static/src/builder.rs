//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use auditum_site_config::{
    BuildContext, BuildEnv, BundleTarget, BundlerConfig, ConfigValidationError, Plugin,
    PluginRegistry, ReportingSeverity, SiteConfig,
};
use auditum_site_features::grid::DEFAULT_COLUMNS;
use auditum_site_features::{render, AssetRegistry, AssetResolutionError, FeatureRecord};

use crate::manifest::RouteManifest;
use crate::templates::{internal_links, LandingContext, PageTemplates};

/// Options that are not part of the site configuration.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Output directory
    pub output_dir: PathBuf,

    /// Feature blocks per row on the landing page
    pub columns: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("build"),
            columns: DEFAULT_COLUMNS,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of routes in the manifest
    pub routes: usize,

    /// Number of feature blocks on the landing page
    pub features: usize,

    /// Number of plugins instantiated
    pub plugins: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    #[error(transparent)]
    Asset(#[from] AssetResolutionError),

    #[error("Broken links: {}", .0.join(", "))]
    BrokenLinks(Vec<String>),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Files produced by a build, held in memory until everything succeeded.
struct Output {
    files: Vec<(PathBuf, String)>,
    features: usize,
    plugins: usize,
}

/// Builds the site from a composed configuration.
pub struct SiteBuilder<'a> {
    config: &'a SiteConfig,
    registry: &'a PluginRegistry,
    env: &'a BuildEnv,
    options: BuildOptions,
    templates: PageTemplates,
}

impl<'a> SiteBuilder<'a> {
    /// Create a builder. `env` must be the snapshot the config was composed with.
    pub fn new(
        config: &'a SiteConfig,
        registry: &'a PluginRegistry,
        env: &'a BuildEnv,
        options: BuildOptions,
    ) -> Self {
        Self {
            config,
            registry,
            env,
            options,
            templates: PageTemplates::new(),
        }
    }

    /// Build the site.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn build(&self, features: &[FeatureRecord]) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let output = self.render_output(features)?;
        self.write(&output)?;

        Ok(BuildResult {
            routes: self.config.routes().len(),
            features: output.features,
            plugins: output.plugins,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.options.output_dir.clone(),
        })
    }

    /// Run every build step without writing anything.
    pub fn check(&self, features: &[FeatureRecord]) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let output = self.render_output(features)?;

        Ok(BuildResult {
            routes: self.config.routes().len(),
            features: output.features,
            plugins: output.plugins,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.options.output_dir.clone(),
        })
    }

    fn render_output(&self, features: &[FeatureRecord]) -> Result<Output, BuildError> {
        self.verify_sources()?;

        let assets = self.scan_assets()?;
        self.verify_theme_assets(&assets)?;
        self.check_links()?;

        let grid = render(features, &assets)?;
        tracing::debug!("Rendered {} feature blocks", grid.len());

        let plugins = self.instantiate_plugins()?;

        let mut output = Output {
            files: Vec::new(),
            features: grid.len(),
            plugins: plugins.len(),
        };

        for target in BundleTarget::ALL {
            let bundler = self.bundler_config(&plugins, target);
            let json = serde_json::to_string_pretty(&bundler)
                .map_err(|e| BuildError::WriteError(e.to_string()))?;
            output
                .files
                .push((Path::new("bundler").join(format!("{}.json", target.as_str())), json));
        }

        let manifest = RouteManifest::from_config(self.config)
            .to_json()
            .map_err(|e| BuildError::WriteError(e.to_string()))?;
        output.files.push((PathBuf::from("routes.json"), manifest));

        let features_html = grid
            .to_html(self.config.base_url(), self.options.columns)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        let context = LandingContext::from_config(self.config, features_html);
        let html = self
            .templates
            .render_landing(&context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        output.files.push((PathBuf::from("index.html"), html));

        Ok(output)
    }

    /// Check that every local file the configuration references exists.
    pub fn verify_sources(&self) -> Result<(), AssetResolutionError> {
        for source in self.config.local_sources() {
            if !source.path.is_file() {
                return Err(AssetResolutionError::MissingFile {
                    referenced_by: source.field,
                    path: source.path,
                });
            }
        }
        Ok(())
    }

    fn scan_assets(&self) -> Result<AssetRegistry, AssetResolutionError> {
        let static_dir = self.config.static_dir();
        if static_dir.is_dir() {
            AssetRegistry::scan(&static_dir)
        } else {
            tracing::warn!("No static directory at {}", static_dir.display());
            Ok(AssetRegistry::new(static_dir))
        }
    }

    /// Favicon, navbar logo and social card are static assets too.
    fn verify_theme_assets(&self, assets: &AssetRegistry) -> Result<(), AssetResolutionError> {
        let theme = self.config.theme_config();
        let referenced = [
            ("favicon", self.config.favicon()),
            ("theme_config.image", theme.image.as_deref()),
            (
                "theme_config.navbar.logo.src",
                theme.navbar.logo.as_ref().map(|l| l.src.as_str()),
            ),
        ];

        for (field, key) in referenced {
            if let Some(key) = key {
                assets.resolve(key, field)?;
            }
        }
        Ok(())
    }

    /// Check internal navbar and footer links against the route table.
    ///
    /// The landing page at the base URL always exists.
    fn check_links(&self) -> Result<(), BuildError> {
        let routes = self.config.routes();
        let broken: Vec<String> = internal_links(self.config)
            .into_iter()
            .filter(|link| {
                link.href != self.config.base_url() && routes.resolve(&link.href).is_none()
            })
            .map(|link| format!("{} -> {}", link.field, link.href))
            .collect();

        if broken.is_empty() {
            return Ok(());
        }

        match self.config.on_broken_links() {
            ReportingSeverity::Throw => return Err(BuildError::BrokenLinks(broken)),
            ReportingSeverity::Warn => {
                for link in &broken {
                    tracing::warn!("Broken link {}", link);
                }
            }
            ReportingSeverity::Log => {
                for link in &broken {
                    tracing::info!("Broken link {}", link);
                }
            }
            ReportingSeverity::Ignore => {}
        }
        Ok(())
    }

    /// Instantiate plugins in declaration order.
    fn instantiate_plugins(&self) -> Result<Vec<Box<dyn Plugin>>, ConfigValidationError> {
        let ctx = BuildContext {
            config: self.config,
            env: self.env,
        };

        self.config
            .plugins()
            .iter()
            .map(|descriptor| -> Result<Box<dyn Plugin>, ConfigValidationError> {
                let plugin = descriptor.instantiate(self.registry, &ctx)?;
                tracing::debug!(
                    "Loaded {} plugin {}",
                    if descriptor.is_inline() { "inline" } else { "named" },
                    plugin.name()
                );
                Ok(plugin)
            })
            .collect()
    }

    /// Apply every plugin's patch, in order, to the baseline for `target`.
    fn bundler_config(&self, plugins: &[Box<dyn Plugin>], target: BundleTarget) -> BundlerConfig {
        let mut config = BundlerConfig::new(target);
        for plugin in plugins {
            if let Some(patch) = plugin.configure_bundler(&config, target) {
                tracing::debug!(
                    "Plugin {} patched the {} bundler config",
                    plugin.name(),
                    target.as_str()
                );
                config.apply(&patch);
            }
        }
        config
    }

    /// Write into a sibling staging directory, then swap it into place.
    ///
    /// A previous output directory is replaced as a whole.
    fn write(&self, output: &Output) -> Result<(), BuildError> {
        let out = &self.options.output_dir;
        let Some(name) = out.file_name() else {
            return Err(BuildError::WriteError(format!(
                "{}: output must name a directory",
                out.display()
            )));
        };
        let staging = out.with_file_name(format!(".{}.staging", name.to_string_lossy()));

        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| io_error(&staging, e))?;
        }

        if let Err(e) = write_files(&staging, &output.files) {
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                tracing::warn!("Failed to remove {}: {}", staging.display(), cleanup);
            }
            return Err(e);
        }

        if out.exists() {
            fs::remove_dir_all(out).map_err(|e| io_error(out, e))?;
        }
        fs::rename(&staging, out).map_err(|e| io_error(out, e))?;

        tracing::debug!("Wrote {} files to {}", output.files.len(), out.display());
        Ok(())
    }
}

fn write_files(root: &Path, files: &[(PathBuf, String)]) -> Result<(), BuildError> {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        fs::write(&path, content).map_err(|e| io_error(&path, e))?;
    }
    Ok(())
}

fn io_error(path: &Path, e: std::io::Error) -> BuildError {
    BuildError::WriteError(format!("{}: {}", path.display(), e))
}
