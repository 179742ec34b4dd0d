use std::ops::Range;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::bond::Bond;
use crate::particle::Particle;

/// Pair of particles joined through a shared `[n]` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingClosure {
    pub label: u32,
    pub a: NodeIndex,
    pub b: NodeIndex,
}

/// The particles of one physical copy of a `{ }` block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonomerSpan {
    /// Internal indices covered by the copy.
    pub range: Range<usize>,
    pub head: NodeIndex,
    pub tail: NodeIndex,
    pub name: Option<String>,
}

/// Undirected particle graph of one part.
pub struct ParticleGraph<P = Particle, B = Bond> {
    graph: UnGraph<P, B>,
    start: Option<NodeIndex>,
    end: Option<NodeIndex>,
    ring_closures: Vec<RingClosure>,
    monomer_spans: Vec<MonomerSpan>,
    monomer_names: Vec<String>,
}

impl<P, B> ParticleGraph<P, B> {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            start: None,
            end: None,
            ring_closures: Vec::new(),
            monomer_spans: Vec::new(),
            monomer_names: Vec::new(),
        }
    }

    pub fn graph(&self) -> &UnGraph<P, B> {
        &self.graph
    }

    pub fn particle(&self, idx: NodeIndex) -> &P {
        &self.graph[idx]
    }

    pub fn particle_mut(&mut self, idx: NodeIndex) -> &mut P {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn add_particle(&mut self, particle: P) -> NodeIndex {
        self.graph.add_node(particle)
    }

    /// Adds a bond unless `a` and `b` are already bonded or identical.
    pub fn connect(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> Option<EdgeIndex> {
        if a == b || self.graph.find_edge(a, b).is_some() {
            return None;
        }
        Some(self.graph.add_edge(a, b, bond))
    }

    pub fn particle_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    /// Neighbours of `idx` in ascending index order.
    pub fn sorted_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        neighbors.sort_unstable();
        neighbors
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }

    pub fn max_degree(&self) -> usize {
        self.particles().map(|idx| self.degree(idx)).max().unwrap_or(0)
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn particles(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    pub fn start(&self) -> Option<NodeIndex> {
        self.start
    }

    pub fn set_start(&mut self, idx: NodeIndex) {
        self.start = Some(idx);
    }

    pub fn end(&self) -> Option<NodeIndex> {
        self.end
    }

    pub fn set_end(&mut self, idx: NodeIndex) {
        self.end = Some(idx);
    }

    pub fn ring_closures(&self) -> &[RingClosure] {
        &self.ring_closures
    }

    pub fn add_ring_closure(&mut self, closure: RingClosure) {
        self.ring_closures.push(closure);
    }

    pub fn monomer_spans(&self) -> &[MonomerSpan] {
        &self.monomer_spans
    }

    pub fn add_monomer_span(&mut self, span: MonomerSpan) {
        self.monomer_spans.push(span);
    }

    pub fn monomer_names(&self) -> &[String] {
        &self.monomer_names
    }

    pub fn add_monomer_name(&mut self, name: String) {
        self.monomer_names.push(name);
    }

    /// Replaces every particle with `f(idx, particle)`, keeping bonds and metadata.
    pub fn map_particles<Q, F>(&self, mut f: F) -> ParticleGraph<Q, B>
    where
        B: Clone,
        F: FnMut(NodeIndex, &P) -> Q,
    {
        ParticleGraph {
            graph: self.graph.map(|idx, p| f(idx, p), |_, b| b.clone()),
            start: self.start,
            end: self.end,
            ring_closures: self.ring_closures.clone(),
            monomer_spans: self.monomer_spans.clone(),
            monomer_names: self.monomer_names.clone(),
        }
    }
}

impl<P: Clone, B: Clone> Clone for ParticleGraph<P, B> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            start: self.start,
            end: self.end,
            ring_closures: self.ring_closures.clone(),
            monomer_spans: self.monomer_spans.clone(),
            monomer_names: self.monomer_names.clone(),
        }
    }
}

impl<P, B> Default for ParticleGraph<P, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PartialEq, B: PartialEq> PartialEq for ParticleGraph<P, B> {
    fn eq(&self, other: &Self) -> bool {
        if self.particle_count() != other.particle_count()
            || self.bond_count() != other.bond_count()
        {
            return false;
        }
        if self.particles().any(|idx| self.particle(idx) != other.particle(idx)) {
            return false;
        }
        for idx in self.bonds() {
            if self.bond(idx) != other.bond(idx)
                || self.bond_endpoints(idx) != other.bond_endpoints(idx)
            {
                return false;
            }
        }
        self.start == other.start
            && self.end == other.end
            && self.ring_closures == other.ring_closures
            && self.monomer_spans == other.monomer_spans
            && self.monomer_names == other.monomer_names
    }
}

impl<P: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for ParticleGraph<P, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleGraph")
            .field("particle_count", &self.particle_count())
            .field("bond_count", &self.bond_count())
            .field("start", &self.start)
            .field("end", &self.end)
            .field("ring_closures", &self.ring_closures)
            .field("monomer_names", &self.monomer_names)
            .finish()
    }
}
