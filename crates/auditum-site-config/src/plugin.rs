//! Plugin descriptors and the registry used to resolve them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::bundler::{BundleTarget, BundlerConfig, BundlerPatch};
use crate::debug_fix::DebugEnvFix;
use crate::env::BuildEnv;
use crate::error::ConfigValidationError;
use crate::site::SiteConfig;

/// What a plugin factory sees when it is called.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// The composed site configuration
    pub config: &'a SiteConfig,
    /// Environment snapshot the configuration was composed with
    pub env: &'a BuildEnv,
}

/// Hooks a plugin offers to the build.
pub trait Plugin {
    /// Plugin identifier used in logs
    fn name(&self) -> &str;

    /// Return a patch to merge into the in-progress bundler configuration.
    fn configure_bundler(
        &self,
        _config: &BundlerConfig,
        _target: BundleTarget,
    ) -> Option<BundlerPatch> {
        None
    }
}

/// Creates a [`Plugin`] from its options.
pub trait PluginFactory: Send + Sync {
    /// Registry name of the plugin
    fn name(&self) -> &str;

    /// Instantiate the plugin for a build.
    fn create(
        &self,
        ctx: &BuildContext<'_>,
        options: &Value,
    ) -> Result<Box<dyn Plugin>, ConfigValidationError>;
}

/// A declared plugin.
#[derive(Clone)]
pub enum PluginDescriptor {
    /// Resolved by name through a [`PluginRegistry`]
    Named { name: String, options: Value },
    /// Called directly with the build context
    Inline {
        factory: Arc<dyn PluginFactory>,
        options: Value,
    },
}

impl PluginDescriptor {
    pub fn named(name: impl Into<String>, options: Value) -> Self {
        Self::Named {
            name: name.into(),
            options,
        }
    }

    pub fn inline(factory: impl PluginFactory + 'static, options: Value) -> Self {
        Self::Inline {
            factory: Arc::new(factory),
            options,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Named { name, .. } => name,
            Self::Inline { factory, .. } => factory.name(),
        }
    }

    pub fn options(&self) -> &Value {
        match self {
            Self::Named { options, .. } | Self::Inline { options, .. } => options,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    /// Create the plugin: registry lookup for named plugins, a direct
    /// factory call for inline ones.
    pub fn instantiate(
        &self,
        registry: &PluginRegistry,
        ctx: &BuildContext<'_>,
    ) -> Result<Box<dyn Plugin>, ConfigValidationError> {
        match self {
            Self::Named { name, options } => {
                let factory = registry.get(name).ok_or_else(|| {
                    ConfigValidationError::invalid(
                        format!("plugins.{}", name),
                        "plugin is not registered",
                    )
                })?;
                factory.create(ctx, options)
            }
            Self::Inline { factory, options } => factory.create(ctx, options),
        }
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_inline() { "Inline" } else { "Named" };
        f.debug_struct(kind)
            .field("name", &self.name())
            .field("options", self.options())
            .finish()
    }
}

/// Inline descriptors compare by factory name, since factories carry no data.
impl PartialEq for PluginDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.is_inline() == other.is_inline()
            && self.name() == other.name()
            && self.options() == other.options()
    }
}

#[derive(Serialize)]
struct DescriptorRepr<'a> {
    kind: &'static str,
    name: &'a str,
    options: &'a Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NamedRepr {
    name: String,
    #[serde(default)]
    options: Value,
}

impl Serialize for PluginDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DescriptorRepr {
            kind: if self.is_inline() { "inline" } else { "named" },
            name: self.name(),
            options: self.options(),
        }
        .serialize(serializer)
    }
}

/// Only the named form can be written in a config file.
impl<'de> Deserialize<'de> for PluginDescriptor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = NamedRepr::deserialize(deserializer)?;
        Ok(Self::named(repr.name, repr.options))
    }
}

/// Plugin factories available by name.
#[derive(Default)]
pub struct PluginRegistry {
    factories: BTreeMap<String, Arc<dyn PluginFactory>>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the plugins shipped with the site tooling.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(DebugEnvFix);
        registry
    }

    /// Register a factory under its own name, replacing any previous one.
    pub fn register(&mut self, factory: impl PluginFactory + 'static) {
        self.factories
            .insert(factory.name().to_string(), Arc::new(factory));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn PluginFactory>> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("factories", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Marker;

    impl PluginFactory for Marker {
        fn name(&self) -> &str {
            "marker"
        }

        fn create(
            &self,
            _ctx: &BuildContext<'_>,
            _options: &Value,
        ) -> Result<Box<dyn Plugin>, ConfigValidationError> {
            Ok(Box::new(MarkerPlugin))
        }
    }

    struct MarkerPlugin;

    impl Plugin for MarkerPlugin {
        fn name(&self) -> &str {
            "marker"
        }
    }

    #[test]
    fn builtins_include_debug_env_fix() {
        let registry = PluginRegistry::with_builtins();

        assert!(registry.contains("debug-env-fix"));
        assert!(!registry.contains("marker"));
    }

    #[test]
    fn named_and_inline_descriptors_differ() {
        let named = PluginDescriptor::named("marker", json!({}));
        let inline = PluginDescriptor::inline(Marker, json!({}));

        assert_eq!(named.name(), inline.name());
        assert_ne!(named, inline);
        assert_eq!(inline, PluginDescriptor::inline(Marker, json!({})));
    }

    #[test]
    fn deserializes_named_form() {
        let descriptor: PluginDescriptor =
            toml::from_str("name = \"debug-env-fix\"\noptions = { var = \"DEBUG\" }").unwrap();

        assert_eq!(
            descriptor,
            PluginDescriptor::named("debug-env-fix", json!({ "var": "DEBUG" }))
        );
    }

    #[test]
    fn serializes_with_kind() {
        let value = serde_json::to_value(PluginDescriptor::inline(Marker, json!(null))).unwrap();

        assert_eq!(value["kind"], "inline");
        assert_eq!(value["name"], "marker");
    }
}
