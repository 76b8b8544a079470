//! Route manifest written next to the generated pages.

use serde::Serialize;

use auditum_site_config::{Precedence, RouteCollision, RouteEntry, SiteConfig};

/// Route-to-content mapping handed to the hosting layer.
#[derive(Debug, Serialize)]
pub struct RouteManifest<'a> {
    pub base_url: &'a str,
    pub default_locale: &'a str,
    pub locales: &'a [String],
    pub precedence: Precedence,
    pub routes: &'a [RouteEntry],
    pub shadowed: &'a [RouteCollision],
}

impl<'a> RouteManifest<'a> {
    pub fn from_config(config: &'a SiteConfig) -> Self {
        let i18n = config.i18n();
        Self {
            base_url: config.base_url(),
            default_locale: &i18n.default_locale,
            locales: &i18n.locales,
            precedence: config.route_precedence(),
            routes: config.routes().entries(),
            shadowed: config.routes().collisions(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
