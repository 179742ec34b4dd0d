//! Longest-path search over a part's particle graph.
//!
//! [`farthest_path`] runs a depth-first traversal from a start particle,
//! visiting neighbours in ascending index order, and returns the tree path to
//! the first particle reached with the greatest depth. On trees this is an
//! exact farthest point; on graphs with ring closures it is a heuristic whose
//! tie-break order placement relies on. [`start_end_path`] returns the path
//! between the `[START]` and `[END]` particles when both are present.

use petgraph::graph::NodeIndex;

use crate::graph::ParticleGraph;

struct DfsTree {
    order: Vec<NodeIndex>,
    parent: Vec<Option<NodeIndex>>,
    depth: Vec<usize>,
    visited: Vec<bool>,
}

struct Frame {
    node: NodeIndex,
    neighbors: Vec<NodeIndex>,
    cursor: usize,
}

impl DfsTree {
    fn path_to(&self, target: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![target];
        let mut current = target;
        while let Some(parent) = self.parent[current.index()] {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}

fn dfs_tree<P, B>(graph: &ParticleGraph<P, B>, start: NodeIndex) -> DfsTree {
    let n = graph.particle_count();
    let mut tree = DfsTree {
        order: vec![start],
        parent: vec![None; n],
        depth: vec![0; n],
        visited: vec![false; n],
    };
    tree.visited[start.index()] = true;

    let mut stack = vec![Frame {
        node: start,
        neighbors: graph.sorted_neighbors(start),
        cursor: 0,
    }];
    while let Some(frame) = stack.last_mut() {
        let Some(&next) = frame.neighbors.get(frame.cursor) else {
            stack.pop();
            continue;
        };
        frame.cursor += 1;
        let node = frame.node;
        if tree.visited[next.index()] {
            continue;
        }
        tree.visited[next.index()] = true;
        tree.parent[next.index()] = Some(node);
        tree.depth[next.index()] = tree.depth[node.index()] + 1;
        tree.order.push(next);
        stack.push(Frame {
            node: next,
            neighbors: graph.sorted_neighbors(next),
            cursor: 0,
        });
    }
    tree
}

/// Path from `start` to the first particle reached at maximum DFS depth.
///
/// Returns an empty path when `start` is not a particle of the graph.
pub fn farthest_path<P, B>(graph: &ParticleGraph<P, B>, start: NodeIndex) -> Vec<NodeIndex> {
    if start.index() >= graph.particle_count() {
        return Vec::new();
    }
    let tree = dfs_tree(graph, start);
    let mut best = start;
    for &node in &tree.order {
        if tree.depth[node.index()] > tree.depth[best.index()] {
            best = node;
        }
    }
    tree.path_to(best)
}

/// The farthest path from the first particle of the part.
pub fn diameter_path<P, B>(graph: &ParticleGraph<P, B>) -> Vec<NodeIndex> {
    farthest_path(graph, NodeIndex::new(0))
}

/// The DFS path from the `[START]` particle to the `[END]` particle.
pub fn start_end_path<P, B>(graph: &ParticleGraph<P, B>) -> Option<Vec<NodeIndex>> {
    let (start, end) = (graph.start()?, graph.end()?);
    let tree = dfs_tree(graph, start);
    if !tree.visited[end.index()] {
        return None;
    }
    Some(tree.path_to(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;
    use crate::spices::parse_spices;

    fn graph(s: &str) -> ParticleGraph {
        parse_spices(s, &ParseOptions::default())
            .unwrap()
            .remove(0)
    }

    fn indices(path: &[NodeIndex]) -> Vec<usize> {
        path.iter().map(|n| n.index()).collect()
    }

    #[test]
    fn linear_chain() {
        assert_eq!(indices(&diameter_path(&graph("A-B-C"))), [0, 1, 2]);
    }

    #[test]
    fn branch_shorter_than_main_chain() {
        assert_eq!(
            indices(&diameter_path(&graph("A-B-C(D)-E-F"))),
            [0, 1, 2, 4, 5]
        );
    }

    #[test]
    fn longer_branch_wins() {
        assert_eq!(indices(&diameter_path(&graph("A(B-C-D)-E"))), [0, 1, 2, 3]);
    }

    #[test]
    fn equal_depths_keep_first_found() {
        assert_eq!(indices(&diameter_path(&graph("A(B)-C"))), [0, 1]);
        assert_eq!(indices(&diameter_path(&graph("A(B-C)-D-E"))), [0, 1, 2]);
    }

    #[test]
    fn ring_is_walked_in_ascending_order() {
        assert_eq!(
            indices(&diameter_path(&graph("A[1]-B-C-D[1]"))),
            [0, 1, 2, 3]
        );
    }

    #[test]
    fn farthest_from_other_start() {
        let g = graph("A-B-C(D)-E");
        assert_eq!(indices(&farthest_path(&g, NodeIndex::new(3))), [3, 2, 1, 0]);
        assert!(farthest_path(&g, NodeIndex::new(9)).is_empty());
    }

    #[test]
    fn single_particle() {
        assert_eq!(indices(&diameter_path(&graph("A"))), [0]);
        assert!(diameter_path(&ParticleGraph::<(), ()>::new()).is_empty());
    }

    #[test]
    fn start_end() {
        let g = graph("A-B[START]-C(D[END])-E");
        assert_eq!(start_end_path(&g).map(|p| indices(&p)), Some(vec![1, 2, 3]));
        assert_eq!(start_end_path(&graph("A-B-C")), None);
    }
}
