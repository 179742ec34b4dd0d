/// Default particle type for a [`ParticleGraph`](crate::ParticleGraph) node.
///
/// `Particle` stores what can be read directly off the notation. Coordinates
/// are not part of it; placement wraps particles in
/// [`WithPosition3D`](crate::WithPosition3D) instead.
///
/// # Examples
///
/// ```
/// use spicecrab::Particle;
///
/// let bead = Particle {
///     name: "PE".to_string(),
///     backbone_index: 2,
///     ..Particle::default()
/// };
/// assert!(bead.is_backbone());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Particle {
    /// Particle name as written, e.g. `C` or `Aa1`.
    pub name: String,
    /// Value of the `'n'` tag. `0` means the particle is not on the backbone.
    pub backbone_index: u32,
    /// Ring-closure labels in the order they were written.
    pub ring_labels: Vec<u32>,
    pub is_head: bool,
    pub is_tail: bool,
}

impl Particle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_backbone(&self) -> bool {
        self.backbone_index > 0
    }
}

impl crate::traits::HasName for Particle {
    fn name(&self) -> &str {
        &self.name
    }
}

impl crate::traits::HasBackboneIndex for Particle {
    fn backbone_index(&self) -> u32 {
        self.backbone_index
    }
}

impl crate::traits::HasAttachment for Particle {
    fn is_head(&self) -> bool {
        self.is_head
    }

    fn is_tail(&self) -> bool {
        self.is_tail
    }
}
