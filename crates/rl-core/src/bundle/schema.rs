//! Deserialisation types for the six JSON tables (§6.2, bit-exact).

use std::collections::HashMap;

use serde::Deserialize;

fn default_item_count() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GameTable {
    #[serde(default)]
    pub filler_item_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    pub name: String,
    #[serde(default = "default_item_count")]
    pub count: u32,
    #[serde(default)]
    pub category: Vec<String>,
    /// Phantom-name to contributed-amount, §3 `itemToPhantoms`.
    #[serde(default)]
    pub value: HashMap<String, i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    #[serde(default)]
    pub requires: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub victory: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CategoryEntry {
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub yaml_option: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionDefault {
    Bool(bool),
    Number(f64),
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OptionEntry {
    #[serde(default)]
    pub default: Option<OptionDefault>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RegionEntry {
    #[serde(default)]
    pub requires: Option<String>,
    #[serde(default)]
    pub connects_to: Vec<String>,
    #[serde(default)]
    pub exit_requires: HashMap<String, String>,
    #[serde(default)]
    pub starting: bool,
}

pub type CategoriesTable = HashMap<String, CategoryEntry>;
pub type OptionsTable = HashMap<String, OptionEntry>;
pub type RegionsTable = HashMap<String, RegionEntry>;

/// The six tables assembled together, whether read directly from the
/// archive's individual JSON entries or from the helper subprocess's single
/// combined JSON object (§6.2).
#[derive(Debug, Clone, Default)]
pub struct BundleTables {
    pub game: GameTable,
    pub items: Vec<ItemEntry>,
    pub locations: Vec<LocationEntry>,
    pub categories: CategoriesTable,
    pub options: OptionsTable,
    pub regions: Option<RegionsTable>,
}

/// Mirrors `BundleTables` field-for-field so the helper's single JSON
/// object deserialises directly. §6.2 keys that object by the six filenames
/// themselves, just without the `/data/` directory prefix (`"game.json"`,
/// `"items.json"`, ...), not by the bare table name.
#[derive(Debug, Deserialize, Default)]
pub struct HelperOutput {
    #[serde(default, rename = "game.json")]
    pub game: GameTable,
    #[serde(default, rename = "items.json")]
    pub items: Vec<ItemEntry>,
    #[serde(default, rename = "locations.json")]
    pub locations: Vec<LocationEntry>,
    #[serde(default, rename = "categories.json")]
    pub categories: CategoriesTable,
    #[serde(default, rename = "options.json")]
    pub options: OptionsTable,
    #[serde(default, rename = "regions.json")]
    pub regions: Option<RegionsTable>,
}

impl From<HelperOutput> for BundleTables {
    fn from(out: HelperOutput) -> Self {
        Self {
            game: out.game,
            items: out.items,
            locations: out.locations,
            categories: out.categories,
            options: out.options,
            regions: out.regions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_output_deserialises_filenames_with_json_suffix() {
        let json = r#"{
            "game.json": {"filler_item_name": "Nothing"},
            "items.json": [{"name": "Lamp"}],
            "locations.json": [{"name": "Chest", "requires": "|Lamp|"}],
            "categories.json": {},
            "options.json": {},
            "regions.json": null
        }"#;
        let parsed: HelperOutput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.game.filler_item_name.as_deref(), Some("Nothing"));
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.locations.len(), 1);
    }

    #[test]
    fn helper_output_defaults_every_field_when_absent() {
        let parsed: HelperOutput = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
        assert!(parsed.locations.is_empty());
    }
}
