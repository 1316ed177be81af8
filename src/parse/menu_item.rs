use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use super::category::symbol_for;
use super::text_from_selection::{text_from_selection, texts_from_selection};
use super::whitespace::{collapse_whitespace, split_first_word};
use super::{Error, Result};
use crate::static_selector;

/// One dish as listed on a restaurant page.
/// Field names on disk follow the snapshot format: `number`, `name`, `additions`, `type`, `emoji`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    number: u32,
    name: String,
    additions: Vec<String>,
    #[serde(rename = "type")]
    category: String,
    #[serde(rename = "emoji")]
    symbol: String,
}

impl MenuItem {
    pub fn new(number: u32, name: &str, additions: Vec<String>, category: &str) -> Self {
        Self {
            number,
            name: name.to_owned(),
            additions,
            category: category.to_owned(),
            symbol: symbol_for(category).to_owned(),
        }
    }

    pub fn from_html_element(element: ElementRef<'_>) -> Result<Self> {
        static_selector!(TITLE_SELECTOR <- "h5 strong");
        static_selector!(ADDITIONS_SELECTOR <- "ul.list-unstyled li i");
        static_selector!(CATEGORY_IMAGE_SELECTOR <- "img");
        const CATEGORY_ATTR: &str = "title";

        // the title looks like "12 Dunajski zrezek s krompirjem"
        let title = text_from_selection(&TITLE_SELECTOR, element, "menu item", "title")
            .map_err(|e| Error::malformed_item("", &e.to_string()))?;
        let title = collapse_whitespace(&title);
        let (prefix, name) = split_first_word(&title);
        let number = parse_item_number(prefix).ok_or_else(|| {
            Error::malformed_item(&title, "title should start with the item number")
        })?;

        let additions = texts_from_selection(&ADDITIONS_SELECTOR, element).collect();

        let category = element
            .select(&CATEGORY_IMAGE_SELECTOR)
            .next()
            .and_then(|img| img.attr(CATEGORY_ATTR))
            .map(str::trim)
            .unwrap_or_default();

        Ok(Self::new(number, name, additions, category))
    }

    pub const fn number(&self) -> u32 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn additions(&self) -> &[String] {
        &self.additions
    }

    /// Raw category label; empty when the page did not tag the item.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// Leading ascii digits of the first title word, so "3." and "3)" both read as 3.
fn parse_item_number(prefix: &str) -> Option<u32> {
    let end = prefix
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(prefix.len());
    prefix[..end].parse().ok()
}
