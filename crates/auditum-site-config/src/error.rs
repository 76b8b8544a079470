//! Configuration validation errors.

use std::path::PathBuf;

/// Errors raised while loading or composing the site configuration.
///
/// Every variant is fatal to the build and names the offending field or file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("i18n.default_locale `{default_locale}` is not listed in i18n.locales [{locales}]")]
    DefaultLocaleNotListed {
        default_locale: String,
        locales: String,
    },

    #[error("presets[{index}]: unknown preset `{name}`")]
    UnknownPreset { index: usize, name: String },

    #[error("plugins[{index}]: no plugin named `{name}` is registered")]
    UnknownPlugin { index: usize, name: String },

    #[error("Duplicate route `{path}`: declared by preset `{kept}` and again by `{shadowed}`")]
    DuplicateRoute {
        path: String,
        kept: String,
        shadowed: String,
    },

    #[error("{field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigValidationError {
    /// Shorthand for an invalid field value.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}
