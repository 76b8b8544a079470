//! Configuration check command.

use std::path::Path;

use anyhow::Result;
use auditum_site_static::{BuildOptions, SiteBuilder};

use crate::site;

/// Run every build step without writing output.
pub fn run(config_path: &Path, features_path: &Path) -> Result<()> {
    let site = site::load(config_path)?;
    let features = site::features(features_path)?;

    let result = SiteBuilder::new(
        &site.config,
        &site.registry,
        &site.env,
        BuildOptions::default(),
    )
    .check(&features)?;

    tracing::info!(
        "Config OK: {} presets, {} plugins, {} routes, {} features",
        site.config.presets().len(),
        result.plugins,
        result.routes,
        result.features
    );

    Ok(())
}
