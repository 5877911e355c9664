//! The frozen tables of §3, produced once by the index builder (Component
//! F) and treated as read-only for the rest of the session (§5).

use rl_parser::Tree;

use crate::collections::{FrozenMap, FrozenSet};

/// All names use `String` keys ordered by [`rl_parser::collate::compare`]
/// (§3 "Identifiers"); every map/set in this struct shares that ordering.
#[derive(Debug, Default)]
pub struct Tables {
    pub hidden_categories: FrozenSet<String>,
    pub locations_to_logic: FrozenMap<String, Tree<'static>>,
    pub category_to_locations: FrozenMap<String, FrozenSet<String>>,
    pub category_to_yaml_options: FrozenMap<String, FrozenSet<String>>,
    pub category_to_items: FrozenMap<String, FrozenSet<String>>,
    pub item_to_categories: FrozenMap<String, FrozenSet<String>>,
    pub item_count: FrozenMap<String, u32>,
    pub category_count: FrozenMap<String, u32>,
    pub item_to_phantoms: FrozenMap<String, Vec<(String, i64)>>,
    pub yaml: FrozenMap<String, i64>,
    pub victory_location: Option<String>,
}

impl Tables {
    pub fn item_count(&self, name: &str) -> u32 {
        self.item_count.get(name).copied().unwrap_or(0)
    }

    pub fn category_count(&self, name: &str) -> u32 {
        self.category_count.get(name).copied().unwrap_or(0)
    }

    pub fn yaml_value(&self, option: &str) -> i64 {
        self.yaml.get(option).copied().unwrap_or(0)
    }
}
