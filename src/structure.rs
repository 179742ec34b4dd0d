use petgraph::graph::NodeIndex;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::{ParseOptions, PlacementConfig};
use crate::frequency::ParticleFrequency;
use crate::graph::ParticleGraph;
use crate::matrix::{positions_and_connections, positions_and_connections_placed};
use crate::particle::Particle;
use crate::paths::{diameter_path, start_end_path};
use crate::placement::{place_parts, AnchorCountMismatch};
use crate::spices::{build_part, split_parts, tokenize, validate, SpicesError, Token};
use crate::traits::HasPosition3D;
use crate::walk::neighbor_walks;
use crate::wrappers::WithPosition3D;

/// Misuse of the query surface, as opposed to an invalid structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("part index {index} is out of range for {count} parts")]
    PartOutOfRange { index: usize, count: usize },
    #[error(transparent)]
    AnchorCountMismatch(#[from] AnchorCountMismatch),
    #[error("structure failed validation: {0}")]
    InvalidStructure(SpicesError),
}

/// Borrowed view of one part of a [`Spices`] structure.
#[derive(Debug, Clone, Copy)]
pub struct Part<'a> {
    pub index: usize,
    pub tokens: &'a [Token],
    pub graph: &'a ParticleGraph,
}

impl Part<'_> {
    pub fn particle_names(&self) -> Vec<&str> {
        self.graph
            .particles()
            .map(|idx| self.graph.particle(idx).name.as_str())
            .collect()
    }
}

/// A parsed SPICES string and everything derived from it.
///
/// Construction runs the whole pipeline. When validation fails [`error`]
/// holds the first violation and every graph query returns an empty result.
///
/// [`error`]: Spices::error
#[derive(Debug, Clone)]
pub struct Spices {
    input: String,
    options: ParseOptions,
    tokens: Vec<Token>,
    error: Option<SpicesError>,
    part_tokens: Vec<Vec<Token>>,
    graphs: Vec<ParticleGraph>,
}

impl Spices {
    pub fn new(input: &str, options: ParseOptions) -> Self {
        let mut spices = Self {
            input: String::new(),
            options,
            tokens: Vec::new(),
            error: None,
            part_tokens: Vec::new(),
            graphs: Vec::new(),
        };
        spices.set_input(input);
        spices
    }

    /// Parses with [`ParseOptions::default`].
    pub fn parse(input: &str) -> Self {
        Self::new(input, ParseOptions::default())
    }

    /// Replaces the input and rebuilds all derived state.
    #[instrument(skip_all, fields(len = input.len()))]
    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
        self.tokens.clear();
        self.error = None;
        self.part_tokens.clear();
        self.graphs.clear();

        self.tokens = match tokenize(input) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.reject(e);
                return;
            }
        };
        if let Err(e) = validate(&self.tokens, &self.options) {
            self.reject(e);
            return;
        }
        for part in split_parts(&self.tokens) {
            self.graphs.push(build_part(part));
            self.part_tokens.push(part.to_vec());
        }
        debug!(
            parts = self.graphs.len(),
            particles = self.total_particles(),
            "parsed structure"
        );
    }

    fn reject(&mut self, error: SpicesError) {
        debug!(key = error.message_key(), pos = error.pos, "rejected structure");
        self.error = Some(error);
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The input, if it passed validation.
    pub fn validated_input(&self) -> Option<&str> {
        self.is_valid().then_some(self.input.as_str())
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn error(&self) -> Option<&SpicesError> {
        self.error.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Tokens of the whole input; empty when tokenizing failed.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_texts(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.to_string()).collect()
    }

    pub fn graphs(&self) -> &[ParticleGraph] {
        &self.graphs
    }

    pub fn parts(&self) -> Vec<Part<'_>> {
        (0..self.part_count()).filter_map(|i| self.part(i).ok()).collect()
    }

    pub fn part(&self, index: usize) -> Result<Part<'_>, QueryError> {
        match (self.part_tokens.get(index), self.graphs.get(index)) {
            (Some(tokens), Some(graph)) => Ok(Part {
                index,
                tokens,
                graph,
            }),
            _ => Err(QueryError::PartOutOfRange {
                index,
                count: self.part_count(),
            }),
        }
    }

    pub fn part_count(&self) -> usize {
        self.graphs.len()
    }

    pub fn has_multiple_parts(&self) -> bool {
        self.part_count() > 1
    }

    fn all_particles(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.graphs
            .iter()
            .flat_map(|g| g.particles().map(move |idx| g.particle(idx)))
    }

    /// External index of every particle across all parts.
    pub fn particle_indices(&self) -> Vec<usize> {
        let start = self.options.start_index;
        (start..start + self.total_particles()).collect()
    }

    pub fn particle_names(&self) -> Vec<&str> {
        self.all_particles().map(|p| p.name.as_str()).collect()
    }

    pub fn monomer_names(&self) -> Vec<&str> {
        self.graphs
            .iter()
            .flat_map(|g| g.monomer_names().iter().map(String::as_str))
            .collect()
    }

    pub fn backbone_indices(&self) -> Vec<u32> {
        self.all_particles().map(|p| p.backbone_index).collect()
    }

    pub fn has_backbone(&self) -> bool {
        self.all_particles().any(Particle::is_backbone)
    }

    pub fn max_degree(&self) -> usize {
        self.graphs.iter().map(|g| g.max_degree()).max().unwrap_or(0)
    }

    pub fn neighbor_walks(
        &self,
        depth: usize,
        include_reflections: bool,
    ) -> Option<Vec<Option<Vec<String>>>> {
        neighbor_walks(&self.graphs, depth, include_reflections)
    }

    pub fn particle_frequency(&self) -> ParticleFrequency {
        ParticleFrequency::from_graphs(&self.graphs)
    }

    pub fn total_particles(&self) -> usize {
        self.graphs.iter().map(|g| g.particle_count()).sum()
    }

    pub fn distinct_particles(&self) -> usize {
        self.particle_frequency().distinct()
    }

    /// Diameter path of each part, as part-local indices.
    pub fn diameter_paths(&self) -> Vec<Vec<NodeIndex>> {
        self.graphs.iter().map(diameter_path).collect()
    }

    /// START→END path of each part, `None` where a part lacks either tag.
    pub fn start_end_paths(&self) -> Vec<Option<Vec<NodeIndex>>> {
        self.graphs.iter().map(start_end_path).collect()
    }

    pub fn placed_parts(
        &self,
        config: &PlacementConfig,
    ) -> Result<Vec<ParticleGraph<WithPosition3D<Particle>>>, QueryError> {
        if !self.is_valid() {
            return Ok(Vec::new());
        }
        Ok(place_parts(&self.graphs, config)?)
    }

    /// Coordinates of every particle across all parts, in row order.
    pub fn coordinates(&self, config: &PlacementConfig) -> Result<Vec<[f64; 3]>, QueryError> {
        let placed = self.placed_parts(config)?;
        Ok(placed
            .iter()
            .flat_map(|g| {
                g.particles()
                    .filter_map(move |idx| g.particle(idx).position_3d())
            })
            .collect())
    }

    /// The matrix without coordinates, numbered from the configured start index.
    pub fn positions_and_connections(&self) -> Vec<Vec<String>> {
        positions_and_connections(&self.graphs, self.options.start_index)
    }

    pub fn positions_and_connections_placed(
        &self,
        config: &PlacementConfig,
    ) -> Result<Vec<Vec<String>>, QueryError> {
        self.positions_and_connections_at(self.options.start_index, Some(config))
    }

    pub fn positions_and_connections_at(
        &self,
        start_index: usize,
        placement: Option<&PlacementConfig>,
    ) -> Result<Vec<Vec<String>>, QueryError> {
        match placement {
            Some(config) => Ok(positions_and_connections_placed(
                &self.placed_parts(config)?,
                start_index,
            )),
            None => Ok(positions_and_connections(&self.graphs, start_index)),
        }
    }

    /// Fails with [`QueryError::InvalidStructure`] unless the input is valid.
    pub fn require_valid(&self) -> Result<&Self, QueryError> {
        match &self.error {
            Some(e) => Err(QueryError::InvalidStructure(*e)),
            None => Ok(self),
        }
    }
}
