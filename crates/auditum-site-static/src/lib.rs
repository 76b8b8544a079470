//! Static build host for the Auditum website.
//!
//! Consumes a composed [`SiteConfig`](auditum_site_config::SiteConfig):
//! checks the local files it references, renders the landing page with
//! the feature grid, dispatches plugins to collect bundler patches and
//! writes the route manifest.

pub mod builder;
pub mod manifest;
pub mod templates;

pub use builder::{BuildError, BuildOptions, BuildResult, SiteBuilder};
pub use manifest::RouteManifest;
