use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;
use tracing::trace;

use crate::bond::{Bond, BondKind};
use crate::graph::{MonomerSpan, ParticleGraph, RingClosure};
use crate::particle::Particle;
use crate::spices::parse_tree::{Chain, ParseParticle, ParseTree, Unit, UnitBody};

/// First and last particle of a built unit or chain.
#[derive(Debug, Clone, Copy)]
struct Ends {
    entry: NodeIndex,
    exit: NodeIndex,
}

struct GraphBuilder {
    graph: ParticleGraph,
    /// Open ring labels; a scope is pushed for each copy of a repeated monomer.
    ring_scopes: Vec<BTreeMap<u32, NodeIndex>>,
    head: Option<NodeIndex>,
    tail: Option<NodeIndex>,
}

pub fn build_graph(tree: &ParseTree) -> ParticleGraph {
    let mut builder = GraphBuilder {
        graph: ParticleGraph::new(),
        ring_scopes: vec![BTreeMap::new()],
        head: None,
        tail: None,
    };
    builder.chain(&tree.root);
    trace!(
        particles = builder.graph.particle_count(),
        bonds = builder.graph.bond_count(),
        "built part"
    );
    builder.graph
}

impl GraphBuilder {
    fn chain(&mut self, chain: &Chain) -> Option<Ends> {
        let mut ends: Option<Ends> = None;
        let mut prev_monomer = false;
        for unit in &chain.units {
            let is_monomer = matches!(unit.body, UnitBody::Monomer { .. });
            let Some(built) = self.unit(unit) else {
                continue;
            };
            match ends.as_mut() {
                Some(ends) => {
                    let kind = if prev_monomer || is_monomer {
                        BondKind::Monomer
                    } else {
                        BondKind::Chain
                    };
                    self.graph.connect(ends.exit, built.entry, Bond::new(kind));
                    ends.exit = built.exit;
                }
                None => ends = Some(built),
            }
            prev_monomer = is_monomer;
        }
        ends
    }

    fn unit(&mut self, unit: &Unit) -> Option<Ends> {
        let ends = match &unit.body {
            UnitBody::Particle(particle) => self.repeated_particle(particle, unit.repeat),
            UnitBody::Monomer { chain, name } => self.monomer(chain, name.as_ref(), unit.repeat),
        }?;
        for branch in &unit.branches {
            if let Some(branch) = self.chain(branch) {
                self.graph
                    .connect(ends.exit, branch.entry, Bond::new(BondKind::Branch));
            }
        }
        Some(ends)
    }

    fn repeated_particle(&mut self, particle: &ParseParticle, repeat: u32) -> Option<Ends> {
        let mut ends: Option<Ends> = None;
        for _ in 0..repeat {
            let idx = self.particle(particle);
            match ends.as_mut() {
                Some(ends) => {
                    self.graph
                        .connect(ends.exit, idx, Bond::new(BondKind::Chain));
                    ends.exit = idx;
                }
                None => {
                    ends = Some(Ends {
                        entry: idx,
                        exit: idx,
                    })
                }
            }
        }
        ends
    }

    /// Builds `repeat` copies of a monomer block chained TAIL to HEAD.
    fn monomer(&mut self, chain: &Chain, name: Option<&String>, repeat: u32) -> Option<Ends> {
        let scoped = repeat > 1;
        let mut ends: Option<Ends> = None;
        for _ in 0..repeat {
            let first = self.graph.particle_count();
            self.head = None;
            self.tail = None;
            if scoped {
                self.ring_scopes.push(BTreeMap::new());
            }
            let body = self.chain(chain);
            if scoped {
                self.ring_scopes.pop();
            }

            let (Some(head), Some(tail)) = (
                self.head.or(body.map(|b| b.entry)),
                self.tail.or(body.map(|b| b.exit)),
            ) else {
                continue;
            };
            self.graph.add_monomer_span(MonomerSpan {
                range: first..self.graph.particle_count(),
                head,
                tail,
                name: name.cloned(),
            });

            match ends.as_mut() {
                Some(ends) => {
                    self.graph
                        .connect(ends.exit, head, Bond::new(BondKind::Monomer));
                    ends.exit = tail;
                }
                None => {
                    ends = Some(Ends {
                        entry: head,
                        exit: tail,
                    })
                }
            }
        }
        if let Some(name) = name {
            self.graph.add_monomer_name(name.clone());
        }
        ends
    }

    fn particle(&mut self, parsed: &ParseParticle) -> NodeIndex {
        let idx = self.graph.add_particle(Particle {
            name: parsed.name.clone(),
            backbone_index: parsed.backbone.unwrap_or(0),
            ring_labels: parsed.ring_labels.clone(),
            is_head: parsed.head,
            is_tail: parsed.tail,
        });
        if parsed.head {
            self.head = Some(idx);
        }
        if parsed.tail {
            self.tail = Some(idx);
        }
        if parsed.start {
            self.graph.set_start(idx);
        }
        if parsed.end {
            self.graph.set_end(idx);
        }
        for &label in &parsed.ring_labels {
            self.ring(label, idx);
        }
        idx
    }

    fn ring(&mut self, label: u32, idx: NodeIndex) {
        let Some(scope) = self.ring_scopes.last_mut() else {
            return;
        };
        let Some(partner) = scope.remove(&label) else {
            scope.insert(label, idx);
            return;
        };
        self.graph
            .connect(partner, idx, Bond::new(BondKind::RingClosure));
        self.graph.add_ring_closure(RingClosure {
            label,
            a: partner,
            b: idx,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spices::parse_tree::build_parse_tree;
    use crate::spices::tokenizer::tokenize;

    fn build(s: &str) -> ParticleGraph {
        build_graph(&build_parse_tree(&tokenize(s).unwrap()))
    }

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn names(graph: &ParticleGraph) -> Vec<&str> {
        graph
            .particles()
            .map(|idx| graph.particle(idx).name.as_str())
            .collect()
    }

    fn kind(graph: &ParticleGraph, a: usize, b: usize) -> Option<BondKind> {
        graph.bond_between(n(a), n(b)).map(|e| graph.bond(e).kind)
    }

    #[test]
    fn linear_chain() {
        let graph = build("A-B-C");
        assert_eq!(names(&graph), ["A", "B", "C"]);
        assert_eq!(graph.bond_count(), 2);
        assert_eq!(kind(&graph, 0, 1), Some(BondKind::Chain));
        assert_eq!(kind(&graph, 1, 2), Some(BondKind::Chain));
        assert_eq!(kind(&graph, 0, 2), None);
    }

    #[test]
    fn branches_bond_to_their_parent() {
        let graph = build("A-B(C(D)-E)-F");
        assert_eq!(names(&graph), ["A", "B", "C", "D", "E", "F"]);
        assert_eq!(kind(&graph, 1, 2), Some(BondKind::Branch));
        assert_eq!(kind(&graph, 2, 3), Some(BondKind::Branch));
        assert_eq!(kind(&graph, 2, 4), Some(BondKind::Chain));
        assert_eq!(kind(&graph, 1, 5), Some(BondKind::Chain));
        assert_eq!(graph.bond_count(), 5);
    }

    #[test]
    fn repeated_particles_chain() {
        let graph = build("3A-B");
        assert_eq!(names(&graph), ["A", "A", "A", "B"]);
        assert_eq!(kind(&graph, 0, 1), Some(BondKind::Chain));
        assert_eq!(kind(&graph, 1, 2), Some(BondKind::Chain));
        assert_eq!(kind(&graph, 2, 3), Some(BondKind::Chain));
        assert_eq!(graph.bond_count(), 3);
    }

    #[test]
    fn ring_closure() {
        let graph = build("A[1]-B-C-D[1]");
        assert_eq!(kind(&graph, 0, 3), Some(BondKind::RingClosure));
        assert_eq!(
            graph.ring_closures(),
            &[RingClosure {
                label: 1,
                a: n(0),
                b: n(3)
            }]
        );
        assert_eq!(graph.particle(n(0)).ring_labels, vec![1]);
    }

    #[test]
    fn ring_closure_between_neighbours_adds_no_edge() {
        let graph = build("A[1]-B[1]");
        assert_eq!(graph.bond_count(), 1);
        assert_eq!(graph.ring_closures().len(), 1);
    }

    #[test]
    fn monomer_attaches_through_head_and_tail() {
        // X - {A B[TAIL] C[HEAD]} - Y
        let graph = build("X-{A-B[TAIL]-C[HEAD]}#PE-Y");
        assert_eq!(names(&graph), ["X", "A", "B", "C", "Y"]);
        assert_eq!(kind(&graph, 0, 3), Some(BondKind::Monomer));
        assert_eq!(kind(&graph, 2, 4), Some(BondKind::Monomer));
        assert_eq!(kind(&graph, 0, 1), None);
        assert_eq!(graph.monomer_names(), ["PE"]);
        let span = &graph.monomer_spans()[0];
        assert_eq!(span.range, 1..4);
        assert_eq!((span.head, span.tail), (n(3), n(2)));
        assert_eq!(span.name.as_deref(), Some("PE"));
    }

    #[test]
    fn repeated_monomer_copies_chain_tail_to_head() {
        let graph = build("3{A[HEAD]-B[TAIL]}");
        assert_eq!(names(&graph), ["A", "B", "A", "B", "A", "B"]);
        assert_eq!(graph.monomer_spans().len(), 3);
        assert_eq!(kind(&graph, 1, 2), Some(BondKind::Monomer));
        assert_eq!(kind(&graph, 3, 4), Some(BondKind::Monomer));
        assert_eq!(graph.bond_count(), 5);
    }

    #[test]
    fn ring_labels_pair_within_each_copy() {
        let graph = build("2{A[HEAD][1]-B-C[TAIL][1]}");
        assert_eq!(graph.ring_closures().len(), 2);
        assert_eq!(kind(&graph, 0, 2), Some(BondKind::RingClosure));
        assert_eq!(kind(&graph, 3, 5), Some(BondKind::RingClosure));
        assert_eq!(kind(&graph, 0, 5), None);
    }

    #[test]
    fn branch_on_monomer_leaves_its_tail() {
        let graph = build("{A[HEAD]-B[TAIL]}(C)");
        assert_eq!(kind(&graph, 1, 2), Some(BondKind::Branch));
    }

    #[test]
    fn start_end_and_backbone() {
        let graph = build("A-B[START]'1'-C'2'-D[END]'3'");
        assert_eq!(graph.start(), Some(n(1)));
        assert_eq!(graph.end(), Some(n(3)));
        let backbone: Vec<u32> = graph
            .particles()
            .map(|idx| graph.particle(idx).backbone_index)
            .collect();
        assert_eq!(backbone, [0, 1, 2, 3]);
    }
}
