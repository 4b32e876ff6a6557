//! Low-level connection operations handed to the emission boundary.
//!
//! References are stable identifiers assigned to every element leaf during
//! elaboration; aggregate connections expand into per-leaf operations in
//! sink-field/vector-index order, in the order the user-level statements
//! were issued.

/// Stable reference to one element leaf, assigned at signal construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct IrSignalRef(u32);

impl IrSignalRef {
    pub(crate) fn new(index: u32) -> Self {
        IrSignalRef(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IrOp {
    /// Drive `target` with the value of `source`.
    Connect { target: IrSignalRef, source: IrSignalRef },
    /// Mark `target` as intentionally undefined, no value flows.
    Invalidate { target: IrSignalRef },
}
