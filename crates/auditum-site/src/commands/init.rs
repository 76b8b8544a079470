//! Write a starter Auditum site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use auditum_site_features::{features_to_toml, homepage_features};

/// Run the init command.
pub fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing Auditum site...");

    init_in(Path::new("."), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'auditum-site build' to build the site.");

    Ok(())
}

fn init_in(root: &Path, yes: bool) -> Result<()> {
    let config_path = root.join("site.toml");
    if config_path.exists() && !yes {
        tracing::warn!("site.toml already exists. Use --yes to overwrite.");
        return Ok(());
    }

    write_file(&config_path, DEFAULT_CONFIG)?;
    write_file(&root.join("sidebars.toml"), DEFAULT_SIDEBARS)?;
    write_file(&root.join("openapi/v1alpha1/api.yaml"), DEFAULT_OPENAPI)?;

    let features = homepage_features();
    let features_toml = features_to_toml(&features).context("Failed to serialize features")?;
    write_file(&root.join("features.toml"), &features_toml)?;

    let static_dir = root.join("static");
    for feature in &features {
        let icon = static_dir.join(&feature.icon);
        if !icon.exists() || yes {
            write_file(&icon, PLACEHOLDER_ICON)?;
        }
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG: &str = r##"# Auditum website configuration

title = "Auditum"
tagline = "Audit Log management for any application."
url = "https://auditum.io"
base_url = "/"
organization_name = "infragmo"
project_name = "auditum"

on_broken_links = "throw"
on_broken_markdown_links = "warn"

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
edit_url = "https://github.com/infragmo/auditum/tree/main/website/"

[[presets]]
name = "apiDocs"

[presets.options]
debug_env = "DEBUG"

[[presets.options.specs]]
spec = "openapi/v1alpha1/api.yaml"
route = "/reference/redoc/latest"

[presets.options.theme]
primary_color = "#1890ff"

[theme_config.navbar]
title = "Auditum"

[[theme_config.navbar.items]]
type = "docSidebar"
sidebar_id = "docSidebar"
position = "left"
label = "Docs"

[[theme_config.navbar.items]]
to = "/reference/redoc/latest"
label = "API"
position = "left"

[[theme_config.navbar.items]]
href = "https://github.com/infragmo/auditum"
label = "GitHub"
position = "right"

[theme_config.footer]
style = "dark"
copyright = "Copyright © Infragmo. Built with Auditum."

[[theme_config.footer.links]]
title = "Docs"

[[theme_config.footer.links.items]]
label = "Introduction"
to = "/docs"

[[theme_config.footer.links]]
title = "More"

[[theme_config.footer.links.items]]
label = "GitHub"
href = "https://github.com/infragmo/auditum"
"##;

const DEFAULT_SIDEBARS: &str = r#"# Documentation sidebars

[[docSidebar]]
type = "autogenerated"
dir_name = "."
"#;

const DEFAULT_OPENAPI: &str = r#"openapi: 3.0.3
info:
  title: Auditum API
  version: v1alpha1
paths: {}
"#;

const PLACEHOLDER_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><circle cx="32" cy="32" r="28"/></svg>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site;
    use auditum_site_static::{BuildOptions, SiteBuilder};
    use tempfile::tempdir;

    #[test]
    fn starter_site_builds() {
        let temp = tempdir().unwrap();
        init_in(temp.path(), false).unwrap();

        let site = site::load(&temp.path().join("site.toml")).unwrap();
        let features = site::features(&temp.path().join("features.toml")).unwrap();
        let options = BuildOptions {
            output_dir: temp.path().join("build"),
            ..BuildOptions::default()
        };

        let result = SiteBuilder::new(&site.config, &site.registry, &site.env, options)
            .build(&features)
            .unwrap();

        assert_eq!(result.features, 6);
        assert_eq!(result.routes, 4);
        assert_eq!(result.plugins, 1);
        assert!(temp.path().join("build/index.html").exists());
    }

    #[test]
    fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("site.toml");
        fs::write(&config, "title = \"Mine\"\n").unwrap();

        init_in(temp.path(), false).unwrap();

        assert_eq!(fs::read_to_string(&config).unwrap(), "title = \"Mine\"\n");
        assert!(!temp.path().join("features.toml").exists());
    }
}
