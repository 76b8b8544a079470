//! Keeps the API reference debug flag consistent across bundles.
//!
//! The API docs runtime checks `process.env.<VAR>` in the browser. Without a
//! compile-time substitution the server bundle sees the build process
//! environment while the client bundle sees nothing, so the guard evaluates
//! differently between the static build and the dev server.
//!
//! Two modes:
//! - `snapshot` (default) pins the expression to the value captured in
//!   [`BuildEnv`](crate::BuildEnv), so both bundles carry the same literal.
//! - `runtime` defines the expression as itself. The bundler then leaves the
//!   lookup to the page at run time instead of substituting the build
//!   machine's value. This is what the original webpack hook did.

use serde_json::Value;

use crate::bundler::{BundleTarget, BundlerConfig, BundlerPatch};
use crate::env::DEBUG_VAR;
use crate::error::ConfigValidationError;
use crate::plugin::{BuildContext, Plugin, PluginFactory};

/// Registry name of the plugin.
pub const DEBUG_ENV_FIX: &str = "debug-env-fix";

/// Factory for the debug flag substitution plugin.
///
/// Options: `{ "var": "DEBUG", "mode": "snapshot" }`; `var` defaults to
/// [`DEBUG_VAR`] and `mode` to `snapshot`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugEnvFix;

impl PluginFactory for DebugEnvFix {
    fn name(&self) -> &str {
        DEBUG_ENV_FIX
    }

    fn create(
        &self,
        ctx: &BuildContext<'_>,
        options: &Value,
    ) -> Result<Box<dyn Plugin>, ConfigValidationError> {
        let var = match options.get("var") {
            None => DEBUG_VAR,
            Some(Value::String(var)) if is_env_name(var) => var.as_str(),
            Some(other) => {
                return Err(ConfigValidationError::invalid(
                    format!("plugins.{}.options.var", DEBUG_ENV_FIX),
                    format!("expected an environment variable name, got {}", other),
                ))
            }
        };

        let expression = format!("process.env.{}", var);

        let literal = match options.get("mode").and_then(Value::as_str) {
            None | Some("snapshot") => match ctx.env.get(var) {
                // JSON string literals are valid JS string literals.
                Some(value) => Value::String(value.to_string()).to_string(),
                None => "undefined".to_string(),
            },
            Some("runtime") => expression.clone(),
            _ => {
                return Err(ConfigValidationError::invalid(
                    format!("plugins.{}.options.mode", DEBUG_ENV_FIX),
                    "expected `snapshot` or `runtime`",
                ))
            }
        };

        Ok(Box::new(DebugEnvPatch {
            expression,
            literal,
        }))
    }
}

struct DebugEnvPatch {
    expression: String,
    literal: String,
}

impl Plugin for DebugEnvPatch {
    fn name(&self) -> &str {
        DEBUG_ENV_FIX
    }

    fn configure_bundler(
        &self,
        config: &BundlerConfig,
        _target: BundleTarget,
    ) -> Option<BundlerPatch> {
        if config.define(&self.expression) == Some(self.literal.as_str()) {
            return None;
        }
        Some(BundlerPatch::define(&self.expression, &self.literal))
    }
}

fn is_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
