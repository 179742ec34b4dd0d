//! Schematic 3D placement of a part along the line between two anchors.
//!
//! The backbone (the START→END path when both tags are present, otherwise the
//! diameter path) is laid out at `first + n · bond_length · direction`. A
//! particle branching directly off the backbone shares its parent's
//! coordinate; each further level of a branch steps one bond along the same
//! direction. Nothing is embedded physically and parts may overlap.

use std::collections::VecDeque;

use nalgebra::Vector3;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::config::{AnchorSet, Anchors, PlacementConfig};
use crate::graph::ParticleGraph;
use crate::paths::{diameter_path, start_end_path};
use crate::wrappers::WithPosition3D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected} anchor pairs, one per part, got {found}")]
pub struct AnchorCountMismatch {
    pub expected: usize,
    pub found: usize,
}

/// Unit vector from `first` to `last`, or zero when the anchors coincide.
pub fn direction(anchors: &Anchors) -> Vector3<f64> {
    (anchors.last - anchors.first)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(|| {
            warn!("placement anchors coincide; every particle is placed at the first anchor");
            Vector3::zeros()
        })
}

/// Number of bond steps from the first anchor for every particle.
///
/// Particles not connected to the backbone stay at step 0.
pub fn backbone_steps<P, B>(graph: &ParticleGraph<P, B>) -> Vec<usize> {
    let n = graph.particle_count();
    let backbone = start_end_path(graph).unwrap_or_else(|| diameter_path(graph));

    let mut steps: Vec<Option<usize>> = vec![None; n];
    let mut on_backbone = vec![false; n];
    let mut queue = VecDeque::new();
    for (step, &idx) in backbone.iter().enumerate() {
        steps[idx.index()] = Some(step);
        on_backbone[idx.index()] = true;
        queue.push_back(idx);
    }

    while let Some(node) = queue.pop_front() {
        let Some(step) = steps[node.index()] else {
            continue;
        };
        let branch_step = if on_backbone[node.index()] { step } else { step + 1 };
        for next in graph.sorted_neighbors(node) {
            if steps[next.index()].is_none() {
                steps[next.index()] = Some(branch_step);
                queue.push_back(next);
            }
        }
    }

    steps.into_iter().map(|s| s.unwrap_or(0)).collect()
}

/// Places every particle of one part.
pub fn place_particles<P: Clone, B: Clone>(
    graph: &ParticleGraph<P, B>,
    anchors: &Anchors,
    bond_length: f64,
) -> ParticleGraph<WithPosition3D<P>, B> {
    let dir = direction(anchors);
    let steps = backbone_steps(graph);
    graph.map_particles(|idx, particle| {
        let pos = anchors.first + dir * (steps[idx.index()] as f64 * bond_length);
        WithPosition3D::new(particle.clone(), Some([pos.x, pos.y, pos.z]))
    })
}

/// Places each part with its own anchor pair from `config`.
#[instrument(skip_all, fields(parts = graphs.len()))]
pub fn place_parts<P: Clone, B: Clone>(
    graphs: &[ParticleGraph<P, B>],
    config: &PlacementConfig,
) -> Result<Vec<ParticleGraph<WithPosition3D<P>, B>>, AnchorCountMismatch> {
    let anchors: Vec<&Anchors> = match &config.anchors {
        AnchorSet::Shared(anchors) => vec![anchors; graphs.len()],
        AnchorSet::PerPart(list) => {
            if list.len() != graphs.len() {
                return Err(AnchorCountMismatch {
                    expected: graphs.len(),
                    found: list.len(),
                });
            }
            list.iter().collect()
        }
    };
    Ok(graphs
        .iter()
        .zip(anchors)
        .map(|(graph, anchors)| place_particles(graph, anchors, config.bond_length))
        .collect())
}
