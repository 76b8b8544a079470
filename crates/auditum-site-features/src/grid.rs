//! Feature records to grid blocks.

use pulldown_cmark::{html, Event, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::assets::{AssetRegistry, AssetResolutionError, ResolvedAsset};
use crate::record::FeatureRecord;
use crate::templates::GridTemplates;

/// Blocks per row unless the caller asks otherwise.
pub const DEFAULT_COLUMNS: usize = 3;

/// Horizontal alignment of a block part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Center,
    Left,
}

/// One piece of a block, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockPart<'a> {
    Icon { key: &'a str },
    Title { text: &'a str, align: Align },
    /// `block` is set when the HTML holds block elements (paragraphs, lists).
    Description {
        html: &'a str,
        align: Align,
        block: bool,
    },
}

/// The visual block for one feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureBlock {
    pub icon: ResolvedAsset,
    pub title: String,
    /// Rendered HTML of the description
    pub description_html: String,
    /// Description needs a block container
    pub description_block: bool,
}

impl FeatureBlock {
    /// Parts in their fixed order: icon, centered title, left-aligned description.
    pub fn parts(&self) -> [BlockPart<'_>; 3] {
        [
            BlockPart::Icon {
                key: &self.icon.key,
            },
            BlockPart::Title {
                text: &self.title,
                align: Align::Center,
            },
            BlockPart::Description {
                html: &self.description_html,
                align: Align::Left,
                block: self.description_block,
            },
        ]
    }
}

/// Rendered feature list, one block per record in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureGrid {
    blocks: Vec<FeatureBlock>,
}

impl FeatureGrid {
    pub fn blocks(&self) -> &[FeatureBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks grouped into rows of `columns` (at least one per row).
    pub fn rows(&self, columns: usize) -> impl Iterator<Item = &[FeatureBlock]> {
        self.blocks.chunks(columns.max(1))
    }

    /// Render the grid section as HTML.
    pub fn to_html(&self, base_url: &str, columns: usize) -> Result<String, minijinja::Error> {
        GridTemplates::new().render_grid(self, base_url, columns)
    }
}

/// Map records to blocks.
///
/// Every icon is resolved before any block is built, so a missing asset
/// fails the whole render and no partial grid exists.
pub fn render(
    records: &[FeatureRecord],
    assets: &AssetRegistry,
) -> Result<FeatureGrid, AssetResolutionError> {
    let icons = records
        .iter()
        .enumerate()
        .map(|(i, record)| assets.resolve(&record.icon, &format!("features[{}].icon", i)))
        .collect::<Result<Vec<_>, _>>()?;

    let blocks = records
        .iter()
        .zip(icons)
        .map(|(record, icon)| {
            let (description_html, description_block) = render_description(&record.description);
            FeatureBlock {
                icon,
                title: record.title.clone(),
                description_html,
                description_block,
            }
        })
        .collect();

    Ok(FeatureGrid { blocks })
}

/// Render a description.
///
/// A description that is a single paragraph loses its `<p>` wrapper and is
/// returned as inline HTML. Anything else keeps its block structure and the
/// returned flag is `true`.
fn render_description(markdown: &str) -> (String, bool) {
    let events: Vec<Event<'_>> = Parser::new(markdown).collect();

    let mut depth = 0usize;
    let mut top_level = 0usize;
    for event in &events {
        match event {
            Event::Start(_) => {
                if depth == 0 {
                    top_level += 1;
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            _ if depth == 0 => top_level += 1,
            _ => {}
        }
    }

    let single_paragraph = top_level == 1
        && matches!(events.first(), Some(Event::Start(Tag::Paragraph)))
        && matches!(events.last(), Some(Event::End(TagEnd::Paragraph)));

    let mut output = String::new();
    if single_paragraph {
        html::push_html(&mut output, events[1..events.len() - 1].iter().cloned());
    } else {
        html::push_html(&mut output, events.iter().cloned());
    }

    let block = !single_paragraph && !events.is_empty();
    (output.trim_end().to_string(), block)
}
