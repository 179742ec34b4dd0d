use crate::traits::*;

/// A particle (or any node type) paired with schematic 3D coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct WithPosition3D<T> {
    pub inner: T,
    pub position_3d: Option<[f64; 3]>,
}

impl<T> WithPosition3D<T> {
    pub fn new(inner: T, position_3d: Option<[f64; 3]>) -> Self {
        Self { inner, position_3d }
    }
}

impl<T> HasPosition3D for WithPosition3D<T> {
    fn position_3d(&self) -> Option<[f64; 3]> {
        self.position_3d
    }
    fn set_position_3d(&mut self, pos: Option<[f64; 3]>) {
        self.position_3d = pos;
    }
}

macro_rules! delegate_trait {
    ($wrapper:ident, $trait:ident, $method:ident, $ret:ty) => {
        impl<T: $trait> $trait for $wrapper<T> {
            fn $method(&self) -> $ret {
                self.inner.$method()
            }
        }
    };
}

delegate_trait!(WithPosition3D, HasName, name, &str);
delegate_trait!(WithPosition3D, HasBackboneIndex, backbone_index, u32);

impl<T: HasAttachment> HasAttachment for WithPosition3D<T> {
    fn is_head(&self) -> bool {
        self.inner.is_head()
    }
    fn is_tail(&self) -> bool {
        self.inner.is_tail()
    }
}
