//! Route table listing.

use std::path::Path;

use anyhow::Result;
use auditum_site_config::{RouteKind, SiteConfig};

use crate::site;

/// Print the composed route table.
pub fn run(config_path: &Path) -> Result<()> {
    let site = site::load(config_path)?;
    print!("{}", format_routes(&site.config));
    Ok(())
}

fn format_routes(config: &SiteConfig) -> String {
    let mut out = String::new();

    for route in config.routes().entries() {
        let kind = match &route.kind {
            RouteKind::Docs { .. } => "docs".to_string(),
            RouteKind::Blog => "blog".to_string(),
            RouteKind::Pages => "pages".to_string(),
            RouteKind::ApiReference { spec } => format!("api ({})", spec.display()),
        };
        out.push_str(&format!("{:<32} {:<12} {}\n", route.path, route.preset, kind));
    }

    for collision in config.routes().collisions() {
        out.push_str(&format!(
            "{:<32} {:<12} shadowed by {}\n",
            collision.path, collision.shadowed.preset, collision.kept.preset
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditum_site_config::{PluginRegistry, SiteComposer, SiteSource};

    #[test]
    fn lists_routes_in_registration_order() {
        let source = SiteSource::from_toml_str(
            r#"
title = "Auditum"
url = "https://auditum.io"

[[presets]]
name = "classic"

[[presets]]
name = "apiDocs"

[[presets.options.specs]]
spec = "api.yaml"
route = "/reference"
"#,
        )
        .unwrap();
        let registry = PluginRegistry::new();
        let config = SiteComposer::new("/srv/site", &registry)
            .build_config(&source)
            .unwrap();

        let listing = format_routes(&config);
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("/docs"));
        assert!(lines[3].starts_with("/reference"));
        assert!(lines[3].ends_with("api (api.yaml)"));
    }
}
