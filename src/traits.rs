use crate::bond::BondKind;

pub trait HasName {
    fn name(&self) -> &str;
}

/// Backbone index of a particle, `0` when it carries none.
pub trait HasBackboneIndex {
    fn backbone_index(&self) -> u32;
}

/// HEAD/TAIL attachment flags inside a monomer block.
pub trait HasAttachment {
    fn is_head(&self) -> bool;
    fn is_tail(&self) -> bool;
}

pub trait HasPosition3D {
    fn position_3d(&self) -> Option<[f64; 3]>;
    fn set_position_3d(&mut self, pos: Option<[f64; 3]>);
}

pub trait HasBondKind {
    fn bond_kind(&self) -> BondKind;
}
