use std::collections::HashMap;

use crate::parse::{Menu, MenuItem};

/// A menu split by category. Categories keep the order they first appear in on the page and
/// items keep their page order inside a category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GroupedMenu<'a> {
    groups: Vec<MenuGroup<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGroup<'a> {
    /// Raw category label, empty for items the page left unlabeled.
    pub category: &'a str,
    pub items: Vec<&'a MenuItem>,
}

impl<'a> GroupedMenu<'a> {
    pub fn group(menu: &'a Menu) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut groups: Vec<MenuGroup<'a>> = Vec::new();
        for item in menu {
            let category = item.category();
            let i = *index.entry(category).or_insert_with(|| {
                groups.push(MenuGroup {
                    category,
                    items: Vec::new(),
                });
                groups.len() - 1
            });
            groups[i].items.push(item);
        }
        Self { groups }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MenuGroup<'a>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of items across every group.
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}
