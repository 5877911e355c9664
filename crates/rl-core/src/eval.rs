//! Evaluator (Component G, §4.7): a recursive residual-computing walk.
//! ∅ (`None`) always means "satisfied"; a non-`None` residual is the part of
//! the tree still outstanding.

use std::collections::HashSet;

use rl_parser::{simplify, Kind, Tree};

use crate::collections::FrozenMap;
use crate::config::Config;
use crate::intern::intern;
use crate::tables::Tables;

pub type Inventory = FrozenMap<String, u32>;
pub type Yaml = FrozenMap<String, i64>;

struct Ctx<'t> {
    tables: &'t Tables,
    inventory: &'t Inventory,
    yaml: &'t Yaml,
}

/// Evaluates `tree` against `inventory`/`yaml` under `config`, returning the
/// residual (§4.7 contract). `None` (∅) means fully satisfied.
pub fn evaluate(
    tables: &Tables,
    tree: &Tree<'static>,
    inventory: &Inventory,
    yaml: &Yaml,
    config: Config,
) -> Tree<'static> {
    let ctx = Ctx { tables, inventory, yaml };
    let visited = HashSet::new();
    eval_node(&ctx, tree, config.is_opt_all, &visited)
}

fn eval_node(
    ctx: &Ctx<'_>,
    tree: &Tree<'static>,
    opt_all: bool,
    visited: &HashSet<String>,
) -> Tree<'static> {
    let Some(node) = tree else { return None };
    match &node.kind {
        Kind::Grouping(child) => eval_node(ctx, &Some(child.clone()), opt_all, visited),
        Kind::And(a, b) => {
            let ra = eval_node(ctx, &Some(a.clone()), opt_all, visited);
            let rb = eval_node(ctx, &Some(b.clone()), opt_all, visited);
            simplify::and(ra, rb)
        }
        Kind::Or(a, b) => {
            let ra = eval_node(ctx, &Some(a.clone()), opt_all, visited);
            let rb = eval_node(ctx, &Some(b.clone()), opt_all, visited);
            simplify::or(ra, rb)
        }
        Kind::Item(name) => {
            if item_satisfied(ctx, name, opt_all) {
                None
            } else {
                tree.clone()
            }
        }
        Kind::Category(name) => {
            if category_satisfied(ctx, name, opt_all) {
                None
            } else {
                tree.clone()
            }
        }
        Kind::ItemCount(name, k) => {
            let k = parse_u32(k);
            let received = received_count(ctx, name);
            if k == 0 || received >= k {
                None
            } else {
                tree.clone()
            }
        }
        Kind::CategoryCount(name, k) => {
            let k = parse_u32(k);
            let received = received_in_category(ctx, name);
            let threshold = k.min(opt_count(ctx, name, opt_all));
            if threshold == 0 || received >= threshold {
                None
            } else {
                tree.clone()
            }
        }
        Kind::ItemPercent(name, p) => {
            let received = received_count(ctx, name) as f64;
            let declared = ctx.tables.item_count(name) as f64;
            let ratio = if declared > 0.0 { received / declared } else { 0.0 };
            if ratio >= parse_percent(p) {
                None
            } else {
                tree.clone()
            }
        }
        Kind::CategoryPercent(name, p) => {
            let received = received_in_category(ctx, name) as f64;
            let declared = opt_count(ctx, name, opt_all) as f64;
            let ratio = if declared > 0.0 { received / declared } else { 0.0 };
            if ratio >= parse_percent(p) {
                None
            } else {
                tree.clone()
            }
        }
        Kind::Function(name, arg) => eval_function(ctx, name, arg, opt_all, visited, tree),
    }
}

fn parse_u32(s: &str) -> u32 {
    s.trim().parse().unwrap_or(0)
}

fn parse_percent(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0) / 100.0
}

fn received_count(ctx: &Ctx<'_>, name: &str) -> u32 {
    ctx.inventory.get(name).copied().unwrap_or(0)
}

fn received_in_category(ctx: &Ctx<'_>, category: &str) -> u32 {
    ctx.tables
        .category_to_items
        .get(category)
        .map(|items| items.iter().map(|item| received_count(ctx, item)).sum())
        .unwrap_or(0)
}

fn item_satisfied(ctx: &Ctx<'_>, name: &str, opt_all: bool) -> bool {
    received_count(ctx, name) > 0 || (opt_all && is_item_disabled(ctx.tables, ctx.yaml, name))
}

fn category_satisfied(ctx: &Ctx<'_>, name: &str, opt_all: bool) -> bool {
    received_in_category(ctx, name) > 0 || (opt_all && is_category_disabled(ctx.tables, ctx.yaml, name))
}

/// `OptCount(c)`: the declared category count, clamped under `isOptAll` to
/// the sum of item counts belonging to categories that are not disabled.
fn opt_count(ctx: &Ctx<'_>, category: &str, opt_all: bool) -> u32 {
    if !opt_all {
        return ctx.tables.category_count(category);
    }
    ctx.tables
        .category_to_items
        .get(category)
        .map(|items| {
            items
                .iter()
                .filter(|item| !is_item_disabled(ctx.tables, ctx.yaml, item))
                .map(|item| ctx.tables.item_count(item))
                .sum()
        })
        .unwrap_or(0)
}

/// A category is disabled iff it lists at least one gating option and every
/// one of them is at or below zero (§4.7 "Disabled-item / disabled-category
/// rule"). A category with no listed options is implicitly enabled.
fn is_category_disabled(tables: &Tables, yaml: &Yaml, category: &str) -> bool {
    match tables.category_to_yaml_options.get(category) {
        None => false,
        Some(options) if options.is_empty() => false,
        Some(options) => options
            .iter()
            .all(|opt| yaml.get(opt).copied().unwrap_or(0) <= 0),
    }
}

/// An item is disabled iff it belongs to at least one category and every
/// category it belongs to is disabled.
fn is_item_disabled(tables: &Tables, yaml: &Yaml, item: &str) -> bool {
    match tables.item_to_categories.get(item) {
        None => false,
        Some(categories) if categories.is_empty() => false,
        Some(categories) => categories
            .iter()
            .all(|category| is_category_disabled(tables, yaml, category)),
    }
}

fn eval_function(
    ctx: &Ctx<'_>,
    name: &str,
    arg: &str,
    opt_all: bool,
    visited: &HashSet<String>,
    original: &Tree<'static>,
) -> Tree<'static> {
    match name {
        "YamlEnabled" => {
            if ctx.yaml.get(arg.trim()).copied().unwrap_or(0) != 0 {
                None
            } else {
                original.clone()
            }
        }
        "YamlDisabled" => {
            if ctx.yaml.get(arg.trim()).copied().unwrap_or(0) == 0 {
                None
            } else {
                original.clone()
            }
        }
        "YamlCompare" => {
            if eval_yaml_compare(ctx, arg) {
                None
            } else {
                original.clone()
            }
        }
        "OptOne" => {
            let (item, count) = split_item_count(arg);
            if is_item_disabled(ctx.tables, ctx.yaml, item) {
                return None;
            }
            let satisfied = match count {
                Some(k) => received_count(ctx, item) >= k,
                None => received_count(ctx, item) > 0,
            };
            if satisfied {
                None
            } else {
                original.clone()
            }
        }
        "OptAll" => match rl_parser::parse(intern(arg.to_string())) {
            Ok(sub_tree) => eval_node(ctx, &sub_tree, true, visited),
            Err(_) => original.clone(),
        },
        "ItemValue" => {
            let (phantom, k) = split_item_count(arg);
            let Some(k) = k else { return original.clone() };
            let sum: i64 = ctx
                .inventory
                .iter()
                .filter(|(_, count)| **count > 0)
                .filter_map(|(item, count)| {
                    ctx.tables.item_to_phantoms.get(item).map(|entries| {
                        entries
                            .iter()
                            .filter(|(name, _)| name == phantom)
                            .map(|(_, value)| value * i64::from(*count))
                            .sum::<i64>()
                    })
                })
                .sum();
            if sum >= i64::from(k) {
                None
            } else {
                original.clone()
            }
        }
        "canReachLocation" => {
            let loc = arg.trim();
            if visited.contains(loc) {
                return None;
            }
            let mut next_visited = visited.clone();
            next_visited.insert(loc.to_string());
            let target = ctx.tables.locations_to_logic.get(loc).cloned().unwrap_or(None);
            eval_node(ctx, &target, opt_all, &next_visited)
        }
        _ => None,
    }
}

/// Splits `name[:k]` into the name and an optional trailing count.
fn split_item_count(arg: &str) -> (&str, Option<u32>) {
    match arg.rsplit_once(':') {
        Some((name, count)) => match count.trim().parse() {
            Ok(k) => (name.trim(), Some(k)),
            Err(_) => (arg.trim(), None),
        },
        None => (arg.trim(), None),
    }
}

const COMPARE_OPS: [&str; 7] = ["==", "!=", ">=", "<=", "=", "<", ">"];

fn eval_yaml_compare(ctx: &Ctx<'_>, expr: &str) -> bool {
    let expr = expr.trim();
    for op in COMPARE_OPS {
        if let Some(idx) = expr.find(op) {
            let (mut opt, rest) = expr.split_at(idx);
            let literal = rest[op.len()..].trim();
            opt = opt.trim();
            let mut invert = false;
            if let Some(stripped) = opt.strip_prefix('!') {
                invert = true;
                opt = stripped.trim();
            }
            let Ok(literal) = literal.parse::<i64>() else { return false };
            let value = ctx.yaml.get(opt).copied().unwrap_or(0);
            let result = match op {
                "==" | "=" => value == literal,
                "!=" => value != literal,
                ">=" => value >= literal,
                "<=" => value <= literal,
                "<" => value < literal,
                ">" => value > literal,
                _ => unreachable!("COMPARE_OPS only lists the handled operators"),
            };
            return if invert { !result } else { result };
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::schema::{CategoryEntry, ItemEntry, LocationEntry};
    use crate::index;

    fn bundle_with(
        items: Vec<ItemEntry>,
        locations: Vec<LocationEntry>,
        categories: std::collections::HashMap<String, CategoryEntry>,
    ) -> crate::bundle::schema::BundleTables {
        crate::bundle::schema::BundleTables {
            game: Default::default(),
            items,
            locations,
            categories,
            options: Default::default(),
            regions: None,
        }
    }

    fn item(name: &str, count: u32, categories: &[&str]) -> ItemEntry {
        ItemEntry {
            name: name.to_string(),
            count,
            category: categories.iter().map(|s| s.to_string()).collect(),
            value: Default::default(),
        }
    }

    fn location(name: &str, requires: Option<&str>) -> LocationEntry {
        LocationEntry {
            name: name.to_string(),
            requires: requires.map(str::to_string),
            region: None,
            hidden: false,
            category: vec![],
            victory: false,
        }
    }

    #[test]
    fn simple_item_scenario() {
        let bundle = bundle_with(vec![], vec![location("Chest", Some("|Lamp|"))], Default::default());
        let tables = index::build(&bundle, None, &|_| {});
        let tree = tables.tables().locations_to_logic.get("Chest").unwrap().clone();

        let mut inventory = Inventory::default();
        inventory.insert("Lamp".to_string(), 1);
        let residual = evaluate(tables.tables(), &tree, &inventory, &Yaml::default(), Config::default());
        assert!(residual.is_none());

        let empty_inventory = Inventory::default();
        let residual = evaluate(tables.tables(), &tree, &empty_inventory, &Yaml::default(), Config::default());
        assert!(rl_parser::tree_eq(&residual, &rl_parser::parse("|Lamp|").unwrap()));
    }

    #[test]
    fn percent_quantity_scenario() {
        let bundle = bundle_with(
            vec![item("Key 1", 1, &["Keys"]), item("Key 2", 1, &["Keys"]), item("Key 3", 1, &["Keys"]), item("Key 4", 1, &["Keys"])],
            vec![location("Vault", Some("|@Keys:ALL|"))],
            Default::default(),
        );
        let tables = index::build(&bundle, None, &|_| {});
        let tree = tables.tables().locations_to_logic.get("Vault").unwrap().clone();

        let mut inventory = Inventory::default();
        inventory.insert("Key 1".to_string(), 1);
        inventory.insert("Key 2".to_string(), 1);
        let residual = evaluate(tables.tables(), &tree, &inventory, &Yaml::default(), Config::default());
        assert!(matches!(
            residual.as_ref().map(|n| &n.kind),
            Some(Kind::CategoryPercent("Keys", "100"))
        ));

        inventory.insert("Key 3".to_string(), 1);
        inventory.insert("Key 4".to_string(), 1);
        let residual = evaluate(tables.tables(), &tree, &inventory, &Yaml::default(), Config::default());
        assert!(residual.is_none());
    }

    #[test]
    fn yaml_gating_scenario() {
        let tree = rl_parser::parse("{YamlEnabled(hard_mode)}").unwrap();
        let tables = Tables::default();

        let mut yaml = Yaml::default();
        yaml.insert("hard_mode".to_string(), 0);
        let residual = evaluate(&tables, &tree, &Inventory::default(), &yaml, Config::default());
        assert!(matches!(
            residual.as_ref().map(|n| &n.kind),
            Some(Kind::Function("YamlEnabled", "hard_mode"))
        ));

        yaml.insert("hard_mode".to_string(), 1);
        let residual = evaluate(&tables, &tree, &Inventory::default(), &yaml, Config::default());
        assert!(residual.is_none());
    }

    #[test]
    fn can_reach_location_cycle_terminates() {
        let bundle = bundle_with(
            vec![],
            vec![
                location("L1", Some("{canReachLocation(L2)}")),
                location("L2", Some("{canReachLocation(L1)}")),
            ],
            Default::default(),
        );
        let tables = index::build(&bundle, None, &|_| {});
        let tree = tables.tables().locations_to_logic.get("L1").unwrap().clone();
        let residual = evaluate(tables.tables(), &tree, &Inventory::default(), &Yaml::default(), Config::default());
        assert!(residual.is_none());
    }
}
