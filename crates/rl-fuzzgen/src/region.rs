//! Generates small region graphs for the property tests of §8 ("Region
//! resolver acyclicity") without depending on `rl-core`'s schema types —
//! callers convert [`GeneratedRegion`] into whatever shape they need.

use arbitrary::{Result, Unstructured};

use crate::requirement::RequirementBuilder;

const REGION_NAMES: &[&str] = &["Start", "Mid", "Deep", "Side", "End", "Vault"];

#[derive(Debug, Clone)]
pub struct GeneratedRegion {
    pub name: String,
    pub requires: Option<String>,
    pub connects_to: Vec<String>,
    pub exit_requires: Vec<(String, String)>,
    pub starting: bool,
}

/// Builds a graph over a fixed name pool (`REGION_NAMES`), guaranteeing at
/// least one starting region so `Reach` is never vacuous over an empty set.
pub struct RegionGraphBuilder<'a, 'b> {
    u: &'a mut Unstructured<'b>,
}

impl<'a, 'b> RegionGraphBuilder<'a, 'b> {
    pub fn new(u: &'a mut Unstructured<'b>) -> Self {
        Self { u }
    }

    pub fn regions(&mut self) -> Result<Vec<GeneratedRegion>> {
        let count = self.u.int_in_range(1..=REGION_NAMES.len())?;
        let names = &REGION_NAMES[..count];

        let mut generated = Vec::with_capacity(count);
        let mut any_starting = false;
        for (index, &name) in names.iter().enumerate() {
            let starting = self.u.arbitrary::<bool>()?;
            any_starting |= starting;

            let requires = if self.u.arbitrary::<bool>()? {
                Some(RequirementBuilder::new(&mut *self.u).expr()?)
            } else {
                None
            };

            let mut connects_to = Vec::new();
            let mut exit_requires = Vec::new();
            for (other_index, &other) in names.iter().enumerate() {
                if other_index == index {
                    continue;
                }
                if self.u.ratio(1, 3)? {
                    connects_to.push(other.to_string());
                    if self.u.ratio(1, 4)? {
                        let gate = RequirementBuilder::new(&mut *self.u).expr()?;
                        exit_requires.push((other.to_string(), gate));
                    }
                }
            }

            generated.push(GeneratedRegion {
                name: name.to_string(),
                requires,
                connects_to,
                exit_requires,
                starting,
            });
        }

        if !any_starting {
            generated[0].starting = true;
        }
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_has_at_least_one_starting_region() {
        let data = vec![0x5au8; 512];
        let mut u = Unstructured::new(&data);
        let regions = RegionGraphBuilder::new(&mut u).regions().unwrap();
        assert!(regions.iter().any(|r| r.starting));
    }

    #[test]
    fn edges_never_self_loop() {
        let data = vec![0xa5u8; 512];
        let mut u = Unstructured::new(&data);
        let regions = RegionGraphBuilder::new(&mut u).regions().unwrap();
        for region in &regions {
            assert!(!region.connects_to.contains(&region.name));
        }
    }
}
