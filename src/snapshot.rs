use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::parse::Menu;

/// Every restaurant's menu from one scrape, keyed by restaurant name.
/// Serialized as a json object whose keys keep the order the menus were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    menus: Vec<(String, Menu)>,
}

impl Snapshot {
    /// Adds `menu` under `restaurant`, replacing an earlier menu for the same restaurant in place.
    pub fn insert(&mut self, restaurant: &str, menu: Menu) {
        match self.menus.iter_mut().find(|(name, _)| name == restaurant) {
            Some((_, existing)) => *existing = menu,
            None => self.menus.push((restaurant.to_owned(), menu)),
        }
    }

    pub fn get(&self, restaurant: &str) -> Option<&Menu> {
        self.menus
            .iter()
            .find(|(name, _)| name == restaurant)
            .map(|(_, menu)| menu)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.menus.iter().map(|(name, menu)| (name, menu)))
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = Snapshot;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of restaurant names to menus")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Snapshot, A::Error> {
                let mut snapshot = Snapshot::default();
                while let Some((name, menu)) = map.next_entry::<String, Menu>()? {
                    snapshot.insert(&name, menu);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

impl FromIterator<(String, Menu)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, Menu)>>(iter: T) -> Self {
        let mut snapshot = Self::default();
        for (name, menu) in iter {
            snapshot.insert(&name, menu);
        }
        snapshot
    }
}
