//! An `arbitrary`-based generator of requirement-tree source text and small
//! region graphs, consumed by the property tests of `rl-core` and by the
//! `fuzz/` targets. Analogous to `apollo-smith`'s document generator, scaled
//! down to this grammar.

mod region;
mod requirement;

pub use region::{GeneratedRegion, RegionGraphBuilder};
pub use requirement::{requirement_source, RequirementBuilder};
