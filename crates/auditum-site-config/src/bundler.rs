//! Bundler configuration and plugin patches.

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Which bundle a configuration is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleTarget {
    /// Browser bundle, also used by the dev server
    Client,
    /// Server-side rendering bundle used by the static build
    Server,
}

impl BundleTarget {
    pub const ALL: [BundleTarget; 2] = [BundleTarget::Client, BundleTarget::Server];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }

    pub fn is_server(self) -> bool {
        matches!(self, Self::Server)
    }
}

/// A bundler configuration as a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BundlerConfig(Value);

impl BundlerConfig {
    /// The baseline configuration for a target, before any plugin patches.
    pub fn new(target: BundleTarget) -> Self {
        Self(json!({
            "name": target.as_str(),
            "mode": "production",
            "define": {},
            "plugins": [],
        }))
    }

    /// Wrap an existing configuration document.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// The substitution registered for an expression, if any.
    pub fn define(&self, key: &str) -> Option<&str> {
        self.0
            .get("define")
            .and_then(|d| d.get(key))
            .and_then(Value::as_str)
    }

    /// Merge a patch into this configuration.
    pub fn apply(&mut self, patch: &BundlerPatch) {
        merge(&mut self.0, &patch.0);
    }
}

/// A partial configuration merged into a [`BundlerConfig`].
///
/// Objects merge key by key, arrays are appended and any other value
/// replaces what was there.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BundlerPatch(Value);

impl BundlerPatch {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// A patch that substitutes `expression` with `literal` at compile time.
    pub fn define(expression: &str, literal: &str) -> Self {
        let mut define = Map::new();
        define.insert(expression.to_string(), Value::String(literal.to_string()));
        Self(json!({ "define": define }))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }
}

fn merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(patch)) => {
            base.extend(patch.iter().cloned());
        }
        (base, patch) => *base = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn baseline_names_the_target() {
        let config = BundlerConfig::new(BundleTarget::Server);

        assert_eq!(config.value()["name"], "server");
        assert_eq!(config.define("process.env.DEBUG"), None);
    }

    #[test]
    fn objects_merge_recursively() {
        let mut config = BundlerConfig::from_value(json!({
            "define": { "process.env.NODE_ENV": "\"production\"" },
        }));

        config.apply(&BundlerPatch::define("process.env.DEBUG", "undefined"));

        assert_eq!(config.define("process.env.NODE_ENV"), Some("\"production\""));
        assert_eq!(config.define("process.env.DEBUG"), Some("undefined"));
    }

    #[test]
    fn arrays_append_and_scalars_replace() {
        let mut config = BundlerConfig::from_value(json!({
            "mode": "production",
            "plugins": ["progress"],
        }));

        config.apply(&BundlerPatch::new(json!({
            "mode": "development",
            "plugins": ["define"],
        })));

        assert_eq!(
            config.value(),
            &json!({
                "mode": "development",
                "plugins": ["progress", "define"],
            })
        );
    }
}
