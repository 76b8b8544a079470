//! Build environment snapshot.

use std::collections::BTreeMap;

use serde::Serialize;

/// Environment variable toggling the API reference debug output.
pub const DEBUG_VAR: &str = "DEBUG";

/// The environment variables a build is allowed to observe.
///
/// Captured once at startup and handed to the composer, so two builds with
/// the same snapshot produce the same configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildEnv {
    vars: BTreeMap<String, String>,
}

impl BuildEnv {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the variables the site build reads from the process environment.
    pub fn capture() -> Self {
        Self::capture_keys(&[DEBUG_VAR])
    }

    /// Capture the given variables from the process environment.
    ///
    /// Unset variables are left out of the snapshot.
    pub fn capture_keys(keys: &[&str]) -> Self {
        let vars = keys
            .iter()
            .filter_map(|key| {
                std::env::var_os(key).map(|v| (key.to_string(), v.to_string_lossy().into_owned()))
            })
            .collect();

        Self { vars }
    }

    /// Set a variable in the snapshot.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Whether a variable is set to a non-empty value.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_not_a_flag() {
        let env = BuildEnv::new().with_var("DEBUG", "");

        assert_eq!(env.get("DEBUG"), Some(""));
        assert!(!env.flag("DEBUG"));
    }

    #[test]
    fn any_non_empty_value_is_a_flag() {
        let env = BuildEnv::new().with_var("DEBUG", "0");

        assert!(env.flag("DEBUG"));
        assert!(!env.flag("MISSING"));
    }
}
