pub mod bond;
pub mod config;
pub mod frequency;
pub mod graph;
pub mod matrix;
pub mod particle;
pub mod paths;
pub mod placement;
pub mod spices;
pub mod structure;
pub mod traits;
pub mod walk;
pub mod wrappers;

pub use bond::{Bond, BondKind};
pub use config::{
    AnchorSet, Anchors, ConfigError, ParseOptions, PlacementConfig, PlacementConfigBuilder,
};
pub use frequency::{particle_frequency, ParticleFrequency};
pub use graph::{MonomerSpan, ParticleGraph, RingClosure};
pub use matrix::{positions_and_connections, positions_and_connections_placed};
pub use particle::Particle;
pub use paths::{diameter_path, farthest_path, start_end_path};
pub use placement::{place_particles, place_parts, AnchorCountMismatch};
pub use spices::{
    parse_spices, tokenize, validate, ErrorCategory, ErrorKind, SpicesError, Token, TokenKind,
};
pub use structure::{Part, QueryError, Spices};
pub use traits::{HasAttachment, HasBackboneIndex, HasBondKind, HasName, HasPosition3D};
pub use walk::neighbor_walks;
pub use wrappers::WithPosition3D;
