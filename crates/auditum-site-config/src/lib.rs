//! Site configuration composer.
//!
//! Builds the single immutable [`SiteConfig`] value that the static build
//! consumes: site metadata, i18n settings, the ordered preset and plugin
//! lists, the derived route table and passive theme options.

pub mod bundler;
pub mod composer;
pub mod debug_fix;
pub mod env;
pub mod error;
pub mod i18n;
pub mod plugin;
pub mod preset;
pub mod route;
pub mod site;
pub mod source;
pub mod theme;

pub use bundler::{BundleTarget, BundlerConfig, BundlerPatch};
pub use composer::SiteComposer;
pub use debug_fix::{DebugEnvFix, DEBUG_ENV_FIX};
pub use env::{BuildEnv, DEBUG_VAR};
pub use error::ConfigValidationError;
pub use i18n::{I18nConfig, LocaleConfig};
pub use plugin::{BuildContext, Plugin, PluginDescriptor, PluginFactory, PluginRegistry};
pub use preset::{ApiDocsOptions, ApiSpec, ClassicOptions, PresetEntry, PresetOptions, RawPreset};
pub use route::{Precedence, RouteCollision, RouteEntry, RouteKind, RouteTable};
pub use site::{LocalSource, ReportingSeverity, SiteConfig};
pub use source::SiteSource;
pub use theme::ThemeConfig;
