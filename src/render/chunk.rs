//! Reflows a grouped menu into display blocks small enough for the message renderer.
//!
//! Two ceilings hold for every block: each field body is at most [`FIELD_SIZE_LIMIT`] and the
//! labels and bodies of a block together are at most [`BLOCK_SIZE_LIMIT`]. Packing is greedy
//! and never reorders items, categories or fields.

use std::mem;

use chrono::NaiveDate;
use serde::Serialize;
use url::Url;

use super::item::{display_len, render_item, split_to_fit};
use crate::menu::{GroupedMenu, MenuGroup};

pub const FIELD_SIZE_LIMIT: usize = 1000;
pub const BLOCK_SIZE_LIMIT: usize = 5000;
/// Longest label the renderer shows; longer category names are cut.
pub const LABEL_SIZE_LIMIT: usize = 256;
pub const FIELDS_PER_BLOCK_LIMIT: usize = 25;
/// Accent colour of every block, `#0099ff`.
pub const BLOCK_COLOR: u32 = 0x0099ff;
/// Label for items the page did not put in a category.
pub const DEFAULT_LABEL: &str = "Other";
const SEPARATOR: &str = "\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: String,
    pub body: String,
}

impl Field {
    /// Label plus body, the amount a field counts toward its block's ceiling.
    pub fn size(&self) -> usize {
        display_len(&self.label) + display_len(&self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayBlock {
    pub title: String,
    /// Link to the page the menu was scraped from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
    /// Day the menu was scraped for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDate>,
    pub color: u32,
    pub fields: Vec<Field>,
}

impl DisplayBlock {
    #[must_use]
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.timestamp = Some(date);
        self
    }

    pub fn size(&self) -> usize {
        self.fields.iter().map(Field::size).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    pub field_limit: usize,
    pub block_limit: usize,
    pub fields_per_block: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            field_limit: FIELD_SIZE_LIMIT,
            block_limit: BLOCK_SIZE_LIMIT,
            fields_per_block: FIELDS_PER_BLOCK_LIMIT,
        }
    }
}

impl Chunker {
    /// The first block is titled `title`, every later one `"{title} (continued)"`.
    /// Every block links to `url` when one is given.
    pub fn chunk(
        &self,
        title: &str,
        url: Option<&Url>,
        grouped: &GroupedMenu<'_>,
    ) -> Vec<DisplayBlock> {
        let continued = format!("{title} (continued)");
        let mut blocks: Vec<DisplayBlock> = Vec::new();
        let mut fields: Vec<Field> = Vec::new();
        let mut size = 0;

        let close = |fields: Vec<Field>, blocks: &mut Vec<DisplayBlock>| {
            let title = if blocks.is_empty() {
                title
            } else {
                continued.as_str()
            };
            blocks.push(DisplayBlock {
                title: title.to_owned(),
                url: url.cloned(),
                timestamp: None,
                color: BLOCK_COLOR,
                fields,
            });
        };

        for field in grouped.iter().flat_map(|group| self.fields_for(group)) {
            let field_size = field.size();
            let full = size + field_size > self.block_limit || fields.len() >= self.fields_per_block;
            if full && !fields.is_empty() {
                close(mem::take(&mut fields), &mut blocks);
                size = 0;
            }
            size += field_size;
            fields.push(field);
        }
        if !fields.is_empty() {
            close(fields, &mut blocks);
        }
        debug_assert!(blocks.iter().all(|b| b.size() <= self.block_limit));
        blocks
    }

    /// Packs one category into as many fields as it takes to keep every body under the field
    /// limit. A category that needs more than one field gets "(Part i/n)" labels.
    fn fields_for(&self, group: &MenuGroup<'_>) -> Vec<Field> {
        let bodies = self.pack_bodies(group.items.iter().map(|item| render_item(item)));
        let label = if group.category.is_empty() {
            DEFAULT_LABEL
        } else {
            group.category
        };

        let n = bodies.len();
        bodies
            .into_iter()
            .enumerate()
            .map(|(i, body)| {
                let suffix = if n > 1 {
                    format!(" (Part {}/{n})", i + 1)
                } else {
                    String::new()
                };
                // the part marker always survives, the category is cut to make room
                let room = LABEL_SIZE_LIMIT.saturating_sub(display_len(&suffix));
                Field {
                    label: format!("{}{suffix}", truncate_label(label, room)),
                    body,
                }
            })
            .collect()
    }

    fn pack_bodies(&self, units: impl Iterator<Item = String>) -> Vec<String> {
        let separator_len = display_len(SEPARATOR);
        let mut bodies = Vec::new();
        let mut body = String::new();
        let mut len = 0;
        for unit in units {
            // an item longer than a whole field is cut into field-sized pieces
            for piece in split_to_fit(&unit, self.field_limit) {
                let piece_len = display_len(piece);
                if !body.is_empty() && len + separator_len + piece_len > self.field_limit {
                    bodies.push(mem::take(&mut body));
                    len = 0;
                }
                if !body.is_empty() {
                    body.push_str(SEPARATOR);
                    len += separator_len;
                }
                body.push_str(piece);
                len += piece_len;
            }
        }
        if !body.is_empty() {
            bodies.push(body);
        }
        bodies
    }
}

fn truncate_label(label: &str, limit: usize) -> &str {
    if display_len(label) <= limit {
        return label;
    }
    split_to_fit(label, limit).first().copied().unwrap_or_default()
}

/// [`Chunker::chunk`] with the renderer's limits.
pub fn chunk(title: &str, url: Option<&Url>, grouped: &GroupedMenu<'_>) -> Vec<DisplayBlock> {
    Chunker::default().chunk(title, url, grouped)
}
