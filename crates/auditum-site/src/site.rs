//! Loading and composing the site for a command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use auditum_site_config::{
    BuildEnv, DebugEnvFix, PluginDescriptor, PluginRegistry, SiteComposer, SiteConfig, SiteSource,
    DEBUG_ENV_FIX, DEBUG_VAR,
};
use auditum_site_features::{homepage_features, load_features, FeatureRecord};

/// A composed site and the pieces it was composed with.
pub struct Site {
    pub config: SiteConfig,
    pub registry: PluginRegistry,
    pub env: BuildEnv,
}

/// Load `site.toml`, install the inline plugins and compose the config.
pub fn load(config_path: &Path) -> Result<Site> {
    let mut source = SiteSource::load(config_path)?;

    // The API reference renderer reads process.env.DEBUG at runtime.
    if source.declares_api_docs() && !source.plugins.iter().any(|p| p.name() == DEBUG_ENV_FIX) {
        source
            .plugins
            .push(PluginDescriptor::inline(DebugEnvFix, json!({ "var": DEBUG_VAR })));
    }

    let registry = PluginRegistry::with_builtins();
    let env = BuildEnv::capture();

    let config = SiteComposer::new(site_dir(config_path), &registry)
        .with_env(env.clone())
        .build_config(&source)
        .with_context(|| format!("Invalid site configuration in {}", config_path.display()))?;

    tracing::info!("Loaded site config from {}", config_path.display());

    Ok(Site {
        config,
        registry,
        env,
    })
}

/// Load the features file, falling back to the built-in list when absent.
pub fn features(path: &Path) -> Result<Vec<FeatureRecord>> {
    if path.exists() {
        let features = load_features(path)?;
        tracing::info!("Loaded {} features from {}", features.len(), path.display());
        return Ok(features);
    }

    tracing::info!("{} not found, using built-in features", path.display());
    Ok(homepage_features())
}

fn site_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn site_dir_defaults_to_cwd() {
        assert_eq!(site_dir(Path::new("site.toml")), PathBuf::from("."));
        assert_eq!(site_dir(Path::new("website/site.toml")), PathBuf::from("website"));
    }

    #[test]
    fn installs_debug_fix_for_api_docs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(
            &path,
            r#"
title = "Auditum"
url = "https://auditum.io"

[[presets]]
name = "apiDocs"

[[presets.options.specs]]
spec = "api.yaml"
route = "/reference"
"#,
        )
        .unwrap();

        let site = load(&path).unwrap();

        assert_eq!(site.config.plugins().len(), 1);
        assert!(site.config.plugins()[0].is_inline());
        assert_eq!(site.config.plugins()[0].name(), DEBUG_ENV_FIX);
    }

    #[test]
    fn no_debug_fix_without_api_docs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "title = \"Auditum\"\nurl = \"https://auditum.io\"\n").unwrap();

        let site = load(&path).unwrap();

        assert!(site.config.plugins().is_empty());
    }

    #[test]
    fn missing_features_file_uses_builtins() {
        let temp = tempdir().unwrap();

        let features = features(&temp.path().join("features.toml")).unwrap();

        assert_eq!(features.len(), 6);
    }
}
