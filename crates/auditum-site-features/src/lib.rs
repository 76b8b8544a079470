//! Landing page feature list renderer.
//!
//! Maps a fixed, ordered list of [`FeatureRecord`]s onto a grid of
//! presentational blocks. Icons are resolved against the site's static
//! directory once, before any block is produced.

pub mod assets;
pub mod grid;
pub mod record;
pub mod templates;

pub use assets::{AssetRegistry, AssetResolutionError, ResolvedAsset};
pub use grid::{render, Align, BlockPart, FeatureBlock, FeatureGrid};
pub use record::{features_to_toml, homepage_features, load_features, FeatureRecord, LoadError};
pub use templates::GridTemplates;
