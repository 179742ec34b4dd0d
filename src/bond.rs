/// How a bond arose in the notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondKind {
    /// Consecutive units joined by `-`, or copies of a repeated particle.
    #[default]
    Chain,
    /// A `( )` branch joined to the unit it follows.
    Branch,
    /// The pair of particles sharing a `[n]` label.
    RingClosure,
    /// A HEAD or TAIL of a monomer copy joined to its neighbour.
    Monomer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bond {
    pub kind: BondKind,
}

impl Bond {
    pub fn new(kind: BondKind) -> Self {
        Self { kind }
    }
}

impl crate::traits::HasBondKind for Bond {
    fn bond_kind(&self) -> BondKind {
        self.kind
    }
}
