//! Particle-name tallies.
//!
//! [`particle_frequency`] counts one part; [`ParticleFrequency::from_graphs`]
//! counts a whole structure. Iteration is sorted by name.

use std::collections::BTreeMap;
use std::fmt;

use crate::graph::ParticleGraph;
use crate::traits::HasName;

/// Snapshot of how often each particle name occurs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleFrequency {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl ParticleFrequency {
    pub fn from_graphs<P: HasName, B>(graphs: &[ParticleGraph<P, B>]) -> Self {
        let mut frequency = Self::default();
        for graph in graphs {
            frequency.extend(graph);
        }
        frequency
    }

    fn extend<P: HasName, B>(&mut self, graph: &ParticleGraph<P, B>) {
        for idx in graph.particles() {
            *self
                .counts
                .entry(graph.particle(idx).name().to_string())
                .or_default() += 1;
            self.total += 1;
        }
    }

    /// Number of particles counted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of different names.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(name, &count)| (name.as_str(), count))
    }

    pub fn as_map(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }
}

/// Writes `name:count` pairs separated by spaces, e.g. `A:3 B:1`.
impl fmt::Display for ParticleFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}:{count}")?;
        }
        Ok(())
    }
}

/// Tally of the particles of one part.
pub fn particle_frequency<P: HasName, B>(graph: &ParticleGraph<P, B>) -> ParticleFrequency {
    let mut frequency = ParticleFrequency::default();
    frequency.extend(graph);
    frequency
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;
    use crate::spices::parse_spices;

    fn graphs(s: &str) -> Vec<ParticleGraph> {
        parse_spices(s, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn repeated_particle() {
        let frequency = particle_frequency(&graphs("3A")[0]);
        assert_eq!(frequency.count("A"), 3);
        assert_eq!(frequency.total(), 3);
        assert_eq!(frequency.distinct(), 1);
        assert_eq!(frequency.to_string(), "A:3");
    }

    #[test]
    fn sorted_by_name() {
        let frequency = particle_frequency(&graphs("C-A(B)-2{A[HEAD]-C[TAIL]}")[0]);
        let entries: Vec<(&str, usize)> = frequency.iter().collect();
        assert_eq!(entries, [("A", 3), ("B", 1), ("C", 3)]);
        assert_eq!(frequency.count("D"), 0);
    }

    #[test]
    fn whole_structure() {
        let frequency = ParticleFrequency::from_graphs(&graphs("2<A-B><B>"));
        assert_eq!(frequency.to_string(), "A:2 B:3");
        assert_eq!(frequency.iter().map(|(_, c)| c).sum::<usize>(), frequency.total());
    }

    #[test]
    fn empty() {
        let frequency = ParticleFrequency::from_graphs::<crate::Particle, crate::Bond>(&[]);
        assert!(frequency.is_empty());
        assert_eq!(frequency.to_string(), "");
    }
}
