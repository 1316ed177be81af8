use std::slice::Iter;

use scraper::Html;
use serde::{Deserialize, Serialize};

use super::menu_item::MenuItem;
use super::Error;
use crate::static_selector;

/// Every item one restaurant lists, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    items: Vec<MenuItem>,
}

/// The result of reading one menu page: the items that parsed, plus one error for every
/// menu entry that had to be dropped.
#[derive(Debug, Default)]
pub struct Extraction {
    pub menu: Menu,
    pub malformed: Vec<Error>,
}

impl Menu {
    pub const fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Reads every menu entry on the page. A page without entries is an empty menu, not an error,
    /// and a malformed entry never stops the entries after it from being read.
    pub fn from_html_document(document: &Html) -> Extraction {
        static_selector!(MENU_ENTRY_SELECTOR <- "#menu-list .shadow-wrapper");

        let mut extraction = Extraction::default();
        for (position, element) in document.select(&MENU_ENTRY_SELECTOR).enumerate() {
            match MenuItem::from_html_element(element) {
                Ok(item) => extraction.menu.items.push(item),
                Err(e) => {
                    log::warn!("Skipping menu entry #{position}: {e}");
                    extraction.malformed.push(e);
                }
            }
        }
        if extraction.menu.is_empty() && extraction.malformed.is_empty() {
            log::debug!("No element matched {}", MENU_ENTRY_SELECTOR.source());
        }
        extraction
    }

    pub fn from_html(html: &str) -> Extraction {
        Self::from_html_document(&Html::parse_document(html))
    }

    pub fn iter(&self) -> Iter<MenuItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Menu {
    type Item = &'a MenuItem;
    type IntoIter = Iter<'a, MenuItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<MenuItem> for Menu {
    fn from_iter<T: IntoIterator<Item = MenuItem>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_html_document() {
        let html = fs::read_to_string("./src/parse/html_examples/menu_page.html").unwrap();
        let Extraction { menu, malformed } = Menu::from_html(&html);

        // the entry outside #menu-list is not part of the menu
        let numbers: Vec<_> = menu.iter().map(MenuItem::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        let categories: Vec<_> = menu.iter().map(MenuItem::category).collect();
        assert_eq!(categories, vec!["Juha", "Meso", "Juha", "", "Meso"]);

        assert_eq!(menu.iter().nth(1).unwrap().name(), "Piščančji paprikaš s polento");
        assert_eq!(menu.iter().nth(4).unwrap().additions(), ["mleko in mlečni izdelki"]);

        assert_eq!(malformed.len(), 1);
        assert!(matches!(
            &malformed[0],
            Error::MalformedItem { title, .. } if title == "Soup 1234"
        ));
    }

    #[test]
    fn test_empty_page_is_empty_menu() {
        let html = fs::read_to_string("./src/parse/html_examples/empty_page.html").unwrap();
        let extraction = Menu::from_html(&html);
        assert!(extraction.menu.is_empty());
        assert!(extraction.malformed.is_empty());

        let extraction = Menu::from_html("");
        assert!(extraction.menu.is_empty());
    }

    #[test]
    fn test_serde_is_a_plain_array() {
        let menu: Menu = [MenuItem::new(1, "Juha", vec![], "Juha")].into_iter().collect();
        let json = serde_json::to_string(&menu).unwrap();
        assert!(json.starts_with('['));
        assert_eq!(serde_json::from_str::<Menu>(&json).unwrap(), menu);
    }
}
