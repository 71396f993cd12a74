use ir::{InstrId, InstructionBuffer};

/// A backpatching list: references to instructions whose jump target is
/// still unknown.
///
/// Systems that link list cells out of a shared freelist have to worry
/// about leaking a cell on some merge path. A `PatchList` here is just an
/// owned `Vec<InstrId>`: merging moves both inputs into the result, there
/// is no shared pool to leak from, and the list's memory goes away on
/// drop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchList(Vec<InstrId>);

impl PatchList {
    /// The empty list: no pending jumps.
    pub fn empty() -> Self {
        PatchList(Vec::new())
    }

    /// `make(instr)`: a single-element list containing `instr`.
    pub fn make(instr: InstrId) -> Self {
        PatchList(vec![instr])
    }

    /// `merge(a, b)`: concatenation. Order doesn't matter for correctness
    /// (every entry eventually gets the same target); merging with an
    /// empty list returns the other side unchanged.
    pub fn merge(mut self, other: PatchList) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `backpatch(list, target)`: write `target`'s offset into every
    /// instruction on this list, then discard the list.
    pub fn backpatch(self, code: &mut InstructionBuffer, target: InstrId) {
        code.backpatch(&self.0, target);
    }
}
