//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use auditum_site_static::{BuildOptions, SiteBuilder};

use crate::site;

/// Run the build command.
pub fn run(config_path: &Path, features_path: &Path, output: PathBuf, columns: usize) -> Result<()> {
    tracing::info!("Building static site...");

    let site = site::load(config_path)?;
    let features = site::features(features_path)?;

    let options = BuildOptions {
        output_dir: output,
        columns,
    };

    let result = SiteBuilder::new(&site.config, &site.registry, &site.env, options).build(&features)?;

    tracing::info!(
        "Built {} routes with {} features and {} plugins in {}ms",
        result.routes,
        result.features,
        result.plugins,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
