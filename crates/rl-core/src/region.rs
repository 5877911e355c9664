//! Region-graph resolver (Component E, §4.5).

use std::collections::{HashMap, HashSet};

use rl_parser::{simplify, Tree};

use crate::bundle::schema::RegionsTable;
use crate::intern::intern;

/// Synthesises `Reach(region)` for every region a location might name,
/// caching each region's own parsed `requires` across the whole call so a
/// region visited along many DFS paths is only ever parsed once (§4.5 step
/// 2, §9 "Region resolver re-entrancy"). The cache is local to one
/// `Resolver` and must never be promoted into the frozen tables.
pub struct Resolver<'a> {
    regions: &'a RegionsTable,
    own_requires_cache: HashMap<String, Tree<'static>>,
    starting: Vec<String>,
}

enum Reached {
    No,
    Yes(Tree<'static>),
}

impl<'a> Resolver<'a> {
    pub fn new(regions: &'a RegionsTable) -> Self {
        let starting = regions
            .iter()
            .filter(|(_, region)| region.starting)
            .map(|(name, _)| name.clone())
            .collect();
        Self {
            regions,
            own_requires_cache: HashMap::new(),
            starting,
        }
    }

    fn own_requires(&mut self, region: &str) -> Tree<'static> {
        if let Some(cached) = self.own_requires_cache.get(region) {
            return cached.clone();
        }
        let tree = self
            .regions
            .get(region)
            .and_then(|entry| entry.requires.as_deref())
            .and_then(|source| rl_parser::parse(intern(source.to_string())).ok())
            .flatten();
        self.own_requires_cache.insert(region.to_string(), tree.clone());
        tree
    }

    fn exit_requires(&mut self, from: &str, to: &str) -> Tree<'static> {
        let Some(source) = self
            .regions
            .get(from)
            .and_then(|entry| entry.exit_requires.get(to))
        else {
            return None;
        };
        rl_parser::parse(intern(source.clone())).ok().flatten()
    }

    /// `Reach(target)`: the disjunction over every starting region `S !=
    /// target` with a path to `target`, of the requirements encountered
    /// along any such path (§4.5).
    pub fn reach(&mut self, target: &str) -> Tree<'static> {
        let starting = self.starting.clone();
        let mut disjunction: Tree<'static> = None;
        for start in &starting {
            if rl_parser::collate::eq(start, target) {
                continue;
            }
            let mut visited: HashSet<String> = starting
                .iter()
                .filter(|s| !rl_parser::collate::eq(s, start))
                .cloned()
                .collect();
            if let Reached::Yes(contribution) = self.dfs(start, target, &mut visited) {
                disjunction = simplify::or(disjunction, contribution);
            }
        }
        disjunction
    }

    /// `target` reachable from `node`? If so, the contribution already
    /// includes `node`'s own requires AND-ed with whatever is needed from
    /// `node` onward (§4.5 steps 2-5); an unreachable node contributes
    /// nothing rather than bloating a sibling branch (step 4).
    fn dfs(&mut self, node: &str, target: &str, visited: &mut HashSet<String>) -> Reached {
        if rl_parser::collate::eq(node, target) {
            return Reached::Yes(self.own_requires(node));
        }
        if visited.iter().any(|v| rl_parser::collate::eq(v, node)) {
            return Reached::No;
        }
        visited.insert(node.to_string());

        let own = self.own_requires(node);
        let neighbours = self
            .regions
            .get(node)
            .map(|entry| entry.connects_to.clone())
            .unwrap_or_default();

        let mut disjunction: Tree<'static> = None;
        let mut any_reached = false;
        for neighbour in &neighbours {
            let mut branch_visited = visited.clone();
            if let Reached::Yes(sub_tree) = self.dfs(neighbour, target, &mut branch_visited) {
                any_reached = true;
                let exit = self.exit_requires(node, neighbour);
                let branch = simplify::and(sub_tree, exit);
                disjunction = simplify::or(disjunction, branch);
            }
        }

        if any_reached {
            Reached::Yes(simplify::and(own, disjunction))
        } else {
            Reached::No
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::schema::RegionEntry;

    fn region(requires: Option<&str>, connects_to: &[&str], starting: bool) -> RegionEntry {
        RegionEntry {
            requires: requires.map(str::to_string),
            connects_to: connects_to.iter().map(|s| s.to_string()).collect(),
            exit_requires: HashMap::new(),
            starting,
        }
    }

    #[test]
    fn chained_regions_synthesise_conjunction() {
        let mut regions: RegionsTable = HashMap::new();
        regions.insert("Start".to_string(), region(None, &["Mid"], true));
        regions.insert("Mid".to_string(), region(Some("|Key|"), &["End"], false));
        regions.insert("End".to_string(), region(Some("|Gem|"), &[], false));

        let mut resolver = Resolver::new(&regions);
        let reach_end = resolver.reach("End");

        let expected = rl_parser::parse("|Key| AND |Gem|").unwrap();
        assert!(rl_parser::tree_eq(&reach_end, &expected));
    }

    #[test]
    fn unreachable_target_synthesises_empty() {
        let mut regions: RegionsTable = HashMap::new();
        regions.insert("Start".to_string(), region(None, &[], true));
        regions.insert("Island".to_string(), region(Some("|Boat|"), &[], false));

        let mut resolver = Resolver::new(&regions);
        assert!(resolver.reach("Island").is_none());
    }

    #[test]
    fn branching_regions_synthesise_disjunction() {
        let mut regions: RegionsTable = HashMap::new();
        regions.insert("Start".to_string(), region(None, &["Left", "Right"], true));
        regions.insert("Left".to_string(), region(Some("|A|"), &["End"], false));
        regions.insert("Right".to_string(), region(Some("|B|"), &["End"], false));
        regions.insert("End".to_string(), region(None, &[], false));

        let mut resolver = Resolver::new(&regions);
        let reach_end = resolver.reach("End");
        let expected = rl_parser::parse("|A| OR |B|").unwrap();
        assert!(rl_parser::tree_eq(&reach_end, &expected));
    }
}

#[cfg(test)]
mod properties {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rl_parser::{Kind, Node};

    use super::*;
    use crate::bundle::schema::RegionEntry;

    /// Converts a generated graph into a `RegionsTable`, replacing each
    /// region's own `requires` with a marker item named after the region
    /// itself (`|RegionName|`) and dropping exit gates, so the synthesised
    /// tree's leaves are exactly the regions visited along the way — which
    /// is what lets the property below read "region visited twice" directly
    /// off the tree.
    fn marked_regions_table(generated: Vec<rl_fuzzgen::GeneratedRegion>) -> RegionsTable {
        generated
            .into_iter()
            .map(|region| {
                let entry = RegionEntry {
                    requires: Some(format!("|{}|", region.name)),
                    connects_to: region.connects_to,
                    exit_requires: HashMap::new(),
                    starting: region.starting,
                };
                (region.name, entry)
            })
            .collect()
    }

    /// The set of region-marker names seen along each root-to-leaf path
    /// through `node`. Panics on the first path that names the same region
    /// twice (§8 "Region resolver acyclicity").
    fn paths<'a>(node: &Node<'a>) -> Vec<HashSet<&'a str>> {
        match &node.kind {
            Kind::Grouping(inner) => paths(inner),
            Kind::And(a, b) => {
                let left = paths(a);
                let right = paths(b);
                let mut out = Vec::with_capacity(left.len() * right.len());
                for l in &left {
                    for r in &right {
                        assert!(
                            l.is_disjoint(r),
                            "a region was visited twice along one root-to-leaf path"
                        );
                        let mut combined = l.clone();
                        combined.extend(r.iter().copied());
                        out.push(combined);
                    }
                }
                out
            }
            Kind::Or(a, b) => {
                let mut out = paths(a);
                out.extend(paths(b));
                out
            }
            Kind::Item(name) => vec![HashSet::from([*name])],
            _ => vec![HashSet::new()],
        }
    }

    proptest! {
        #[test]
        fn reach_never_visits_a_region_twice_on_one_path(
            bytes in prop::collection::vec(any::<u8>(), 0..1024),
        ) {
            let mut u = arbitrary::Unstructured::new(&bytes);
            let Ok(generated) = rl_fuzzgen::RegionGraphBuilder::new(&mut u).regions() else {
                return Ok(());
            };
            let names: Vec<String> = generated.iter().map(|r| r.name.clone()).collect();
            let regions = marked_regions_table(generated);
            let mut resolver = Resolver::new(&regions);

            for target in &names {
                if let Some(node) = resolver.reach(target) {
                    paths(&node);
                }
            }
        }
    }
}
