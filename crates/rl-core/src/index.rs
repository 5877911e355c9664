//! Index builder (Component F, §4.6). Consumes the six deserialised JSON
//! tables and produces the frozen [`Tables`] of §3, in the unchanged order
//! of operations: categories, items (+ filler), locations (+ region
//! synthesis), transpose, derive.

use rl_parser::simplify;

use crate::bundle::schema::BundleTables;
use crate::bundle::{GoalLookup, ParseDiagnostic};
use crate::collections::{sort_map_by_key, sort_set, FrozenSet};
use crate::intern::intern;
use crate::region::Resolver;
use crate::tables::Tables;
use crate::world::WorldHandle;

const NO_CATEGORY: &str = "(No Category)";

pub fn build(
    tables: &BundleTables,
    goal_lookup: Option<&dyn GoalLookup>,
    diagnostic_sink: &dyn Fn(ParseDiagnostic),
) -> WorldHandle {
    let mut out = Tables::default();

    // 1. categories.json: hidden-set and category-to-options.
    for (name, entry) in &tables.categories {
        if entry.hidden {
            out.hidden_categories.insert(name.clone());
        }
        let options: FrozenSet<String> = entry.yaml_option.iter().cloned().collect();
        out.category_to_yaml_options.insert(name.clone(), options);
    }

    // 2. items.json: count, categories, phantom contributions. Filler item
    // from game.json, if present and not already declared.
    for item in &tables.items {
        out.item_count.insert(item.name.clone(), item.count);
        let categories: FrozenSet<String> = if item.category.is_empty() {
            std::iter::once(NO_CATEGORY.to_string()).collect()
        } else {
            item.category.iter().cloned().collect()
        };
        out.item_to_categories.insert(item.name.clone(), categories);
        if !item.value.is_empty() {
            let phantoms: Vec<(String, i64)> =
                item.value.iter().map(|(k, v)| (k.clone(), *v)).collect();
            out.item_to_phantoms.insert(item.name.clone(), phantoms);
        }
    }
    if let Some(filler) = &tables.game.filler_item_name {
        if !out.item_count.contains_key(filler) {
            out.item_count.insert(filler.clone(), 1);
            out.item_to_categories
                .insert(filler.clone(), std::iter::once(NO_CATEGORY.to_string()).collect());
        }
    }

    // 3. locations.json: parse requires, AND with Reach(region) if present,
    // index under categories unless hidden.
    let mut resolver = tables.regions.as_ref().map(Resolver::new);
    let mut victory_candidates: Vec<String> = Vec::new();
    for location in &tables.locations {
        let own_tree = match &location.requires {
            None => None,
            Some(source) => match rl_parser::parse(intern(source.clone())) {
                Ok(tree) => tree,
                Err(err) => {
                    diagnostic_sink(diagnostic_for(&location.name, source, &err));
                    None
                }
            },
        };

        let combined = match (&location.region, resolver.as_mut()) {
            (Some(region_name), Some(resolver)) => {
                let reach = resolver.reach(region_name);
                simplify::and(own_tree, reach)
            }
            _ => own_tree,
        };
        out.locations_to_logic.insert(location.name.clone(), combined);

        if !location.hidden {
            let categories = if location.category.is_empty() {
                vec![NO_CATEGORY.to_string()]
            } else {
                location.category.clone()
            };
            for category in categories {
                out.category_to_locations
                    .entry(category)
                    .or_default()
                    .insert(location.name.clone());
            }
        }

        if location.victory {
            victory_candidates.push(location.name.clone());
        }
    }

    out.victory_location = pick_victory_location(victory_candidates, goal_lookup);

    // 4. Transpose itemToCategories -> categoryToItems.
    for (item, categories) in &out.item_to_categories {
        for category in categories {
            out.category_to_items
                .entry(category.clone())
                .or_default()
                .insert(item.clone());
        }
    }

    // 5. Derive categoryCount = sum of itemCount over each category's items.
    for (category, items) in &out.category_to_items {
        let total: u32 = items.iter().map(|item| out.item_count(item)).sum();
        out.category_count.insert(category.clone(), total);
    }

    sort_everything(&mut out);

    WorldHandle::new(out)
}

/// When a bundle declares more than one `victory: true` location, the
/// collaborator's goal record picks among them by index into canonical
/// order (`goal` is clamped into range); with no `goal_lookup` supplied the
/// first candidate in canonical order wins. See DESIGN.md for the rationale
/// — the spec names the callback's purpose but not its exact arithmetic.
fn pick_victory_location(
    mut candidates: Vec<String>,
    goal_lookup: Option<&dyn GoalLookup>,
) -> Option<String> {
    candidates.sort_by(|a, b| rl_parser::collate::compare(a, b));
    match candidates.len() {
        0 => None,
        1 => candidates.into_iter().next(),
        _ => {
            let index = goal_lookup
                .map(|lookup| lookup.goal().goal)
                .unwrap_or(0)
                .clamp(0, candidates.len() as i64 - 1) as usize;
            Some(candidates.swap_remove(index))
        }
    }
}

fn diagnostic_for(location: &str, source: &str, err: &rl_parser::ParseError) -> ParseDiagnostic {
    let tokens = rl_parser::tokenize(source);
    let index = err.token_index.min(tokens.len().saturating_sub(1));
    let window = |range: std::ops::Range<usize>| {
        tokens
            .get(range)
            .into_iter()
            .flatten()
            .map(|t| t.text.to_string())
            .collect::<Vec<_>>()
    };
    let start = index.saturating_sub(3);
    let end = (index + 4).min(tokens.len());
    ParseDiagnostic {
        location: location.to_string(),
        token_index: index,
        context_before: window(start..index),
        context_after: window((index + 1).min(end)..end),
    }
}

fn sort_everything(tables: &mut Tables) {
    sort_set(&mut tables.hidden_categories);
    sort_map_by_key(&mut tables.locations_to_logic);
    sort_map_by_key(&mut tables.category_to_locations);
    sort_map_by_key(&mut tables.category_to_yaml_options);
    sort_map_by_key(&mut tables.category_to_items);
    sort_map_by_key(&mut tables.item_to_categories);
    sort_map_by_key(&mut tables.item_count);
    sort_map_by_key(&mut tables.category_count);
    sort_map_by_key(&mut tables.item_to_phantoms);
    for locations in tables.category_to_locations.values_mut() {
        sort_set(locations);
    }
    for options in tables.category_to_yaml_options.values_mut() {
        sort_set(options);
    }
    for items in tables.category_to_items.values_mut() {
        sort_set(items);
    }
    for categories in tables.item_to_categories.values_mut() {
        sort_set(categories);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::bundle::schema::{GameTable, ItemEntry, LocationEntry};

    fn item(name: &str, count: u32, categories: &[&str]) -> ItemEntry {
        ItemEntry {
            name: name.to_string(),
            count,
            category: categories.iter().map(|s| s.to_string()).collect(),
            value: HashMap::new(),
        }
    }

    fn location(name: &str, requires: Option<&str>, categories: &[&str]) -> LocationEntry {
        LocationEntry {
            name: name.to_string(),
            requires: requires.map(str::to_string),
            region: None,
            hidden: false,
            category: categories.iter().map(|s| s.to_string()).collect(),
            victory: false,
        }
    }

    #[test]
    fn derives_category_count_from_item_counts() {
        let mut bundle = BundleTables {
            game: GameTable::default(),
            items: vec![item("Sword", 2, &["Weapons"]), item("Shield", 1, &["Weapons"])],
            locations: vec![],
            categories: HashMap::new(),
            options: HashMap::new(),
            regions: None,
        };
        bundle.locations.push(location("Chest", Some("|Sword|"), &["Weapons"]));

        let handle = build(&bundle, None, &|_| {});
        assert_eq!(handle.tables().category_count("Weapons"), 3);
        assert!(handle.tables().category_to_locations.get("Weapons").unwrap().contains("Chest"));
    }

    #[test]
    fn items_without_category_fall_back_to_no_category() {
        let bundle = BundleTables {
            game: GameTable::default(),
            items: vec![item("Rupee", 99, &[])],
            locations: vec![],
            categories: HashMap::new(),
            options: HashMap::new(),
            regions: None,
        };
        let handle = build(&bundle, None, &|_| {});
        assert!(handle
            .tables()
            .item_to_categories
            .get("Rupee")
            .unwrap()
            .contains(NO_CATEGORY));
    }

    #[test]
    fn parse_failure_is_reported_and_location_has_no_tree() {
        let bundle = BundleTables {
            game: GameTable::default(),
            items: vec![],
            locations: vec![location("Broken", Some("|Unterminated"), &[])],
            categories: HashMap::new(),
            options: HashMap::new(),
            regions: None,
        };
        let diagnostics = std::cell::RefCell::new(Vec::new());
        let handle = build(&bundle, None, &|d| diagnostics.borrow_mut().push(d));
        let diagnostics = diagnostics.into_inner();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location, "Broken");
        assert!(handle.tables().locations_to_logic.get("Broken").unwrap().is_none());
    }

    #[test]
    fn multiple_victory_locations_are_disambiguated_by_goal_index() {
        struct FixedGoal(i64);
        impl GoalLookup for FixedGoal {
            fn goal(&self) -> crate::bundle::GoalRecord {
                crate::bundle::GoalRecord { goal: self.0 }
            }
        }
        let mut bundle = BundleTables {
            game: GameTable::default(),
            items: vec![],
            locations: vec![],
            categories: HashMap::new(),
            options: HashMap::new(),
            regions: None,
        };
        let mut first = location("Alpha End", None, &[]);
        first.victory = true;
        let mut second = location("Beta End", None, &[]);
        second.victory = true;
        bundle.locations.push(first);
        bundle.locations.push(second);

        let goal = FixedGoal(1);
        let handle = build(&bundle, Some(&goal), &|_| {});
        assert_eq!(handle.tables().victory_location.as_deref(), Some("Beta End"));
    }
}
