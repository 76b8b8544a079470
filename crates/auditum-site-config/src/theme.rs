//! Theme options.
//!
//! Passive data handed to the theme layer as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Social card image
    pub image: Option<String>,
    pub color_mode: ColorMode,
    pub announcement_bar: Option<AnnouncementBar>,
    pub navbar: Navbar,
    pub footer: Footer,
    pub algolia: Option<AlgoliaConfig>,
    pub prism: PrismConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorMode {
    pub default_mode: ColorScheme,
    pub disable_switch: bool,
    pub respect_prefers_color_scheme: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnouncementBar {
    /// Bump when the content changes so dismissed bars reappear
    pub id: String,
    /// HTML content
    pub content: String,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default = "default_true")]
    pub is_closeable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Navbar {
    pub title: Option<String>,
    pub logo: Option<Logo>,
    pub items: Vec<NavbarItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Logo {
    pub alt: String,
    pub src: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavbarItem {
    /// Item type understood by the theme (e.g. `docSidebar`)
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sidebar_id: Option<String>,
    pub label: String,
    /// Internal link
    pub to: Option<String>,
    /// External link
    pub href: Option<String>,
    pub position: Position,
}

impl NavbarItem {
    /// Link target, internal first.
    pub fn target(&self) -> Option<&str> {
        self.to.as_deref().or(self.href.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterStyle {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Footer {
    pub style: FooterStyle,
    pub links: Vec<FooterColumn>,
    /// HTML copyright line
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterColumn {
    pub title: String,
    pub items: Vec<FooterLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterLink {
    pub label: String,
    pub to: Option<String>,
    pub href: Option<String>,
}

impl FooterLink {
    pub fn target(&self) -> Option<&str> {
        self.to.as_deref().or(self.href.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlgoliaConfig {
    pub app_id: String,
    /// Search-only key, safe to publish
    pub api_key: String,
    pub index_name: String,
    #[serde(default = "default_true")]
    pub contextual_search: bool,
    #[serde(default)]
    pub search_parameters: BTreeMap<String, serde_json::Value>,
    #[serde(default = "default_search_page_path")]
    pub search_page_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrismConfig {
    pub theme: String,
    pub dark_theme: String,
    pub additional_languages: Vec<String>,
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            theme: "github".to_string(),
            dark_theme: "dracula".to_string(),
            additional_languages: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_search_page_path() -> String {
    "search".to_string()
}
