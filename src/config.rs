use std::collections::BTreeSet;

use nalgebra::Point3;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Bond length must be a positive finite number, got {0}")]
    InvalidBondLength(f64),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Options that change how a structure is validated and numbered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Every part must contain at least one `{ }` block.
    pub expect_monomer: bool,
    /// When set, every particle name must be a member.
    pub particle_dictionary: Option<BTreeSet<String>>,
    /// External index of the first particle.
    pub start_index: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            expect_monomer: false,
            particle_dictionary: None,
            start_index: 1,
        }
    }
}

impl ParseOptions {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// The two points a part is laid out between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    pub first: Point3<f64>,
    pub last: Point3<f64>,
}

impl Anchors {
    pub fn new(first: Point3<f64>, last: Point3<f64>) -> Self {
        Self { first, last }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnchorSet {
    /// One pair used for every part.
    Shared(Anchors),
    /// One pair per part, in part order.
    PerPart(Vec<Anchors>),
}

impl AnchorSet {
    pub fn for_part(&self, index: usize) -> Option<&Anchors> {
        match self {
            AnchorSet::Shared(anchors) => Some(anchors),
            AnchorSet::PerPart(list) => list.get(index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    pub anchors: AnchorSet,
    pub bond_length: f64,
}

impl PlacementConfig {
    /// Reads `first`/`last` (or a `[[parts]]` list of them) and `bond_length`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawPlacementConfig = toml::from_str(content)?;
        let mut builder = PlacementConfigBuilder::new();
        if let Some(first) = raw.first {
            builder = builder.first(Point3::from(first));
        }
        if let Some(last) = raw.last {
            builder = builder.last(Point3::from(last));
        }
        if !raw.parts.is_empty() {
            builder = builder.per_part(
                raw.parts
                    .into_iter()
                    .map(|p| Anchors::new(Point3::from(p.first), Point3::from(p.last)))
                    .collect(),
            );
        }
        if let Some(bond_length) = raw.bond_length {
            builder = builder.bond_length(bond_length);
        }
        builder.build()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlacementConfig {
    first: Option<[f64; 3]>,
    last: Option<[f64; 3]>,
    #[serde(default)]
    parts: Vec<RawAnchors>,
    bond_length: Option<f64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnchors {
    first: [f64; 3],
    last: [f64; 3],
}

#[derive(Default)]
pub struct PlacementConfigBuilder {
    first: Option<Point3<f64>>,
    last: Option<Point3<f64>>,
    per_part: Option<Vec<Anchors>>,
    bond_length: Option<f64>,
}

impl PlacementConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(mut self, point: Point3<f64>) -> Self {
        self.first = Some(point);
        self
    }

    pub fn last(mut self, point: Point3<f64>) -> Self {
        self.last = Some(point);
        self
    }

    pub fn per_part(mut self, anchors: Vec<Anchors>) -> Self {
        self.per_part = Some(anchors);
        self
    }

    pub fn bond_length(mut self, length: f64) -> Self {
        self.bond_length = Some(length);
        self
    }

    pub fn build(self) -> Result<PlacementConfig, ConfigError> {
        let bond_length = self
            .bond_length
            .ok_or(ConfigError::MissingParameter("bond_length"))?;
        if !(bond_length.is_finite() && bond_length > 0.0) {
            return Err(ConfigError::InvalidBondLength(bond_length));
        }
        let anchors = match self.per_part {
            Some(list) => AnchorSet::PerPart(list),
            None => AnchorSet::Shared(Anchors::new(
                self.first.ok_or(ConfigError::MissingParameter("first"))?,
                self.last.ok_or(ConfigError::MissingParameter("last"))?,
            )),
        };
        Ok(PlacementConfig {
            anchors,
            bond_length,
        })
    }
}
