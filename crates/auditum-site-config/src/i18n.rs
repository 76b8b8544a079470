//! Internationalization settings.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigValidationError;

static LOCALE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid regex"));

/// Locale settings: the default locale plus every locale the site is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct I18nConfig {
    /// Locale served at the site root
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Supported locales, in declaration order
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Per-locale overrides
    #[serde(default)]
    pub locale_configs: BTreeMap<String, LocaleConfig>,
}

/// Overrides for a single locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleConfig {
    /// Label shown in the locale dropdown
    #[serde(default)]
    pub label: Option<String>,

    /// Text direction
    #[serde(default)]
    pub direction: Direction,

    /// Value of the `<html lang>` attribute
    #[serde(default)]
    pub html_lang: Option<String>,
}

/// Text direction of a locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_locales() -> Vec<String> {
    vec![default_locale()]
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            locales: default_locales(),
            locale_configs: BTreeMap::new(),
        }
    }
}

impl I18nConfig {
    /// Check the locale set.
    ///
    /// The default locale must be one of the declared locales, every locale
    /// must be a well-formed language tag and appear once, and overrides may
    /// only target declared locales.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.locales.is_empty() {
            return Err(ConfigValidationError::invalid(
                "i18n.locales",
                "at least one locale is required",
            ));
        }

        let mut seen = HashSet::new();
        for (i, locale) in self.locales.iter().enumerate() {
            if !LOCALE_TAG.is_match(locale) {
                return Err(ConfigValidationError::invalid(
                    format!("i18n.locales[{}]", i),
                    format!("`{}` is not a valid language tag", locale),
                ));
            }
            if !seen.insert(locale.as_str()) {
                return Err(ConfigValidationError::invalid(
                    format!("i18n.locales[{}]", i),
                    format!("locale `{}` is listed more than once", locale),
                ));
            }
        }

        if !self.contains(&self.default_locale) {
            return Err(ConfigValidationError::DefaultLocaleNotListed {
                default_locale: self.default_locale.clone(),
                locales: self.locales.join(", "),
            });
        }

        if let Some(stray) = self.locale_configs.keys().find(|k| !self.contains(k)) {
            return Err(ConfigValidationError::invalid(
                format!("i18n.locale_configs.{}", stray),
                "configured locale is not listed in i18n.locales",
            ));
        }

        Ok(())
    }

    /// Whether `locale` is one of the declared locales.
    pub fn contains(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    /// The `<html lang>` value for a locale.
    pub fn html_lang<'a>(&'a self, locale: &'a str) -> &'a str {
        self.locale_configs
            .get(locale)
            .and_then(|c| c.html_lang.as_deref())
            .unwrap_or(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i18n(default_locale: &str, locales: &[&str]) -> I18nConfig {
        I18nConfig {
            default_locale: default_locale.to_string(),
            locales: locales.iter().map(|l| l.to_string()).collect(),
            locale_configs: BTreeMap::new(),
        }
    }

    #[test]
    fn default_is_english_only() {
        let config = I18nConfig::default();

        assert_eq!(config.default_locale, "en");
        assert_eq!(config.locales, vec!["en"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn accepts_regional_tags() {
        assert!(i18n("en", &["en", "zh-Hans", "pt-BR"]).validate().is_ok());
    }

    #[test]
    fn rejects_default_outside_locales() {
        let result = i18n("fr", &["en"]).validate();

        assert!(matches!(
            result,
            Err(ConfigValidationError::DefaultLocaleNotListed { ref default_locale, .. })
                if default_locale == "fr"
        ));
    }

    #[test]
    fn rejects_empty_locale_set() {
        let result = i18n("en", &[]).validate();

        assert!(matches!(result, Err(ConfigValidationError::Invalid { .. })));
    }

    #[test]
    fn rejects_duplicate_locales() {
        let result = i18n("en", &["en", "de", "en"]).validate();

        assert!(matches!(
            result,
            Err(ConfigValidationError::Invalid { ref field, .. }) if field == "i18n.locales[2]"
        ));
    }

    #[test]
    fn rejects_malformed_tags() {
        let result = i18n("en", &["en", "not a locale"]).validate();

        assert!(matches!(result, Err(ConfigValidationError::Invalid { .. })));
    }

    #[test]
    fn rejects_overrides_for_unknown_locales() {
        let mut config = i18n("en", &["en"]);
        config
            .locale_configs
            .insert("fa".to_string(), LocaleConfig::default());

        assert!(config.validate().is_err());
    }

    #[test]
    fn html_lang_falls_back_to_locale() {
        let mut config = i18n("en", &["en", "zh-Hans"]);
        config.locale_configs.insert(
            "zh-Hans".to_string(),
            LocaleConfig {
                html_lang: Some("zh-CN".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(config.html_lang("en"), "en");
        assert_eq!(config.html_lang("zh-Hans"), "zh-CN");
    }
}
