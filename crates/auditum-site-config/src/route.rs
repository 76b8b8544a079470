//! Ordered route registration.
//!
//! Presets contribute routes in declaration order. When two presets claim
//! the same path the table keeps one of them according to its
//! [`Precedence`] and records the other as shadowed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which registration wins when two routes share a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precedence {
    /// The route registered first keeps the path
    #[default]
    FirstWins,
    /// Each later registration replaces the earlier one
    LastWins,
}

/// What a route serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteKind {
    /// Documentation section, optionally driven by a sidebar file
    Docs { sidebar: Option<PathBuf> },
    /// Blog index
    Blog,
    /// Standalone pages (landing page lives here)
    Pages,
    /// API reference rendered from an OpenAPI document (path left unresolved)
    ApiReference { spec: PathBuf },
}

/// A path claimed by a preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// URL path including the base URL
    pub path: String,
    /// Name of the preset that contributed the route
    pub preset: String,
    /// Content served at the path
    #[serde(flatten)]
    pub kind: RouteKind,
}

/// Two registrations for the same path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCollision {
    pub path: String,
    pub kept: RouteEntry,
    pub shadowed: RouteEntry,
}

/// Routes in first-registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    precedence: Precedence,
    entries: Vec<RouteEntry>,
    collisions: Vec<RouteCollision>,
}

impl RouteTable {
    /// Create an empty table with the given precedence rule.
    pub fn new(precedence: Precedence) -> Self {
        Self {
            precedence,
            entries: Vec::new(),
            collisions: Vec::new(),
        }
    }

    /// Register a route.
    ///
    /// Returns the collision when the path was already taken. A replaced
    /// route keeps its original position in the table.
    pub fn register(&mut self, entry: RouteEntry) -> Option<&RouteCollision> {
        let Some(existing) = self.entries.iter_mut().find(|e| e.path == entry.path) else {
            self.entries.push(entry);
            return None;
        };

        let collision = match self.precedence {
            Precedence::FirstWins => RouteCollision {
                path: entry.path.clone(),
                kept: existing.clone(),
                shadowed: entry,
            },
            Precedence::LastWins => {
                let shadowed = std::mem::replace(existing, entry);
                RouteCollision {
                    path: shadowed.path.clone(),
                    kept: existing.clone(),
                    shadowed,
                }
            }
        };

        self.collisions.push(collision);
        self.collisions.last()
    }

    /// Look up the winning route for a path.
    pub fn get(&self, path: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Find the route that serves a site path.
    ///
    /// Query strings and fragments are ignored. Docs and blog routes also
    /// serve every path below them; pages and API reference routes only
    /// match exactly.
    pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
        let path = trim_trailing_slash(path.split(['?', '#']).next().unwrap_or(path));

        self.entries.iter().find(|e| {
            let route = trim_trailing_slash(&e.path);
            if path == route {
                return true;
            }
            matches!(e.kind, RouteKind::Docs { .. } | RouteKind::Blog)
                && (route == "/"
                    || path
                        .strip_prefix(route)
                        .is_some_and(|rest| rest.starts_with('/')))
        })
    }

    /// The precedence rule in use.
    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// All winning routes.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Every collision seen while registering.
    pub fn collisions(&self) -> &[RouteCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Join a route segment onto the site base URL.
///
/// `base_url` is expected to start and end with `/`.
pub fn join_route(base_url: &str, segment: &str) -> String {
    let trimmed = segment.trim_matches('/');
    if trimmed.is_empty() {
        base_url.to_string()
    } else {
        format!("{}{}", base_url, trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn route(path: &str, preset: &str) -> RouteEntry {
        RouteEntry {
            path: path.to_string(),
            preset: preset.to_string(),
            kind: RouteKind::Pages,
        }
    }

    #[test]
    fn keeps_registration_order() {
        let mut table = RouteTable::new(Precedence::FirstWins);
        table.register(route("/docs", "classic"));
        table.register(route("/blog", "classic"));
        table.register(route("/reference", "apiDocs"));

        let paths: Vec<&str> = table.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/docs", "/blog", "/reference"]);
        assert!(table.collisions().is_empty());
    }

    #[test]
    fn first_registration_wins() {
        let mut table = RouteTable::new(Precedence::FirstWins);
        table.register(route("/", "classic"));

        let collision = table.register(route("/", "apiDocs")).cloned().unwrap();

        assert_eq!(collision.kept.preset, "classic");
        assert_eq!(collision.shadowed.preset, "apiDocs");
        assert_eq!(table.get("/").unwrap().preset, "classic");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn last_registration_wins_in_place() {
        let mut table = RouteTable::new(Precedence::LastWins);
        table.register(route("/", "classic"));
        table.register(route("/blog", "classic"));

        let collision = table.register(route("/", "apiDocs")).cloned().unwrap();

        assert_eq!(collision.kept.preset, "apiDocs");
        assert_eq!(collision.shadowed.preset, "classic");
        assert_eq!(table.entries()[0].preset, "apiDocs");
        assert_eq!(table.entries()[1].path, "/blog");
    }

    #[test]
    fn resolves_paths_below_docs_and_blog() {
        let mut table = RouteTable::new(Precedence::FirstWins);
        table.register(RouteEntry {
            path: "/docs".to_string(),
            preset: "classic".to_string(),
            kind: RouteKind::Docs { sidebar: None },
        });
        table.register(RouteEntry {
            path: "/blog".to_string(),
            preset: "classic".to_string(),
            kind: RouteKind::Blog,
        });
        table.register(route("/", "classic"));

        assert_eq!(table.resolve("/docs/intro#setup").unwrap().path, "/docs");
        assert_eq!(table.resolve("/blog/").unwrap().path, "/blog");
        assert_eq!(table.resolve("/?ref=nav").unwrap().path, "/");
        assert!(table.resolve("/credits").is_none());
        assert!(table.resolve("/docsearch").is_none());
    }

    #[test]
    fn joins_segments_onto_base_url() {
        assert_eq!(join_route("/", "docs"), "/docs");
        assert_eq!(join_route("/", ""), "/");
        assert_eq!(join_route("/site/", "/reference/redoc/latest"), "/site/reference/redoc/latest");
        assert_eq!(join_route("/site/", "/"), "/site/");
    }
}
