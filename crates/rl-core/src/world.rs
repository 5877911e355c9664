//! The public world handle (§6.3): the output of a bundle load, immutable
//! for the rest of the session.

use rl_parser::Tree;

use crate::config::Config;
use crate::eval::{self, Inventory, Yaml};
use crate::tables::Tables;

/// All frozen tables from §3, plus the evaluation entry points built on top
/// of them. Constructed once by [`crate::index::build`]; every method here
/// takes `&self`, matching §5's "read-only post-load" guarantee.
pub struct WorldHandle {
    tables: Tables,
}

impl WorldHandle {
    pub(crate) fn new(tables: Tables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// `None` iff `location` is satisfied by `inventory`/`yaml` under
    /// `config`; an unknown location is treated as having no requirement at
    /// all, i.e. satisfied.
    pub fn in_logic(
        &self,
        location: &str,
        inventory: &Inventory,
        yaml: &Yaml,
        config: Config,
    ) -> Tree<'static> {
        let tree = self
            .tables
            .locations_to_logic
            .get(location)
            .cloned()
            .unwrap_or(None);
        self.evaluate(&tree, inventory, yaml, config)
    }

    pub fn evaluate(
        &self,
        tree: &Tree<'static>,
        inventory: &Inventory,
        yaml: &Yaml,
        config: Config,
    ) -> Tree<'static> {
        eval::evaluate(&self.tables, tree, inventory, yaml, config)
    }

    /// Faithful re-print, reproducing the original source form (§4.8).
    pub fn reprint(&self, tree: &Tree<'static>) -> String {
        rl_printer::reprint(tree)
    }

    /// Normalised boolean-algebra form with one letter per distinct
    /// structural sub-term (§4.8, §6.3).
    pub fn boolean_algebra(&self, tree: &Tree<'static>) -> String {
        rl_printer::boolean_algebra(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::schema::{BundleTables, LocationEntry};

    #[test]
    fn unknown_location_is_treated_as_satisfied() {
        let bundle = BundleTables::default();
        let world = crate::index::build(&bundle, None, &|_| {});
        let residual = world.in_logic("Nowhere", &Inventory::default(), &Yaml::default(), Config::default());
        assert!(residual.is_none());
    }

    #[test]
    fn in_logic_round_trips_through_reprint() {
        let mut bundle = BundleTables::default();
        bundle.locations.push(LocationEntry {
            name: "Chest".to_string(),
            requires: Some("|Lamp|".to_string()),
            region: None,
            hidden: false,
            category: vec![],
            victory: false,
        });
        let world = crate::index::build(&bundle, None, &|_| {});
        let residual = world.in_logic("Chest", &Inventory::default(), &Yaml::default(), Config::default());
        assert_eq!(world.reprint(&residual), "|Lamp|");
    }
}
