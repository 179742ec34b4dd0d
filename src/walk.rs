use std::collections::BTreeSet;

use petgraph::graph::NodeIndex;
use tracing::instrument;

use crate::graph::ParticleGraph;
use crate::traits::HasName;

/// Enumerates the particle-name walks ("N-mers") of every length from 2 to `depth`.
///
/// Entry `k - 2` of the result holds the sorted, de-duplicated walks of `k`
/// particles written as `N1-N2-...-Nk`, or `None` when there is none. Walks
/// may revisit particles. Without reflections a walk and its reversal are
/// reported once, as the lexically smaller of the two.
///
/// Returns `None` for `depth < 2` or when no graph has particles. The number
/// of walks grows with `degree^depth`, so callers bound `depth` themselves.
#[instrument(skip_all, fields(depth = depth, include_reflections = include_reflections))]
pub fn neighbor_walks<P: HasName, B>(
    graphs: &[ParticleGraph<P, B>],
    depth: usize,
    include_reflections: bool,
) -> Option<Vec<Option<Vec<String>>>> {
    if depth < 2 || graphs.iter().all(|g| g.is_empty()) {
        return None;
    }

    let mut walker = Walker {
        depth,
        include_reflections,
        found: vec![BTreeSet::new(); depth - 1],
    };
    for graph in graphs {
        for start in graph.particles() {
            walker.extend(graph, &mut vec![start]);
        }
    }

    Some(
        walker
            .found
            .into_iter()
            .map(|set| (!set.is_empty()).then(|| set.into_iter().collect()))
            .collect(),
    )
}

struct Walker {
    depth: usize,
    include_reflections: bool,
    found: Vec<BTreeSet<String>>,
}

impl Walker {
    fn extend<P: HasName, B>(&mut self, graph: &ParticleGraph<P, B>, walk: &mut Vec<NodeIndex>) {
        if walk.len() >= 2 {
            self.record(graph, walk);
        }
        if walk.len() == self.depth {
            return;
        }
        let Some(&last) = walk.last() else {
            return;
        };
        for next in graph.sorted_neighbors(last) {
            walk.push(next);
            self.extend(graph, walk);
            walk.pop();
        }
    }

    fn record<P: HasName, B>(&mut self, graph: &ParticleGraph<P, B>, walk: &[NodeIndex]) {
        let names: Vec<&str> = walk.iter().map(|&idx| graph.particle(idx).name()).collect();
        let forward = names.join("-");
        let text = if self.include_reflections {
            forward
        } else {
            let reversed: Vec<&str> = names.iter().rev().copied().collect();
            forward.min(reversed.join("-"))
        };
        self.found[walk.len() - 2].insert(text);
    }
}
