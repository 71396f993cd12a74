use ir::InstrId;

use crate::patchlist::PatchList;

/// Per-reduction record carrying a first-instruction pointer plus the
/// three patch lists.
///
/// A `ParseNode` owns its patch lists outright (plain `Vec`s inside
/// `PatchList`), so there is no arena to allocate from or release: the
/// node and everything it owns is freed the moment it's dropped, which
/// for the nodes belonging to one function happens as soon as `FUNC`'s
/// semantic action returns.
#[derive(Clone, Debug, Default)]
pub struct ParseNode {
    /// Set only by leaf productions (identifiers, string literals, field
    /// dereferences), propagated unchanged by unary reductions that don't
    /// touch it.
    pub lexeme: Option<String>,
    /// The first instruction generated by this subtree, i.e. its entry
    /// point. `None` only for terminal-value nodes that emit no code
    /// (leaf lexemes, field dereferences).
    pub code: Option<InstrId>,
    pub truelist: PatchList,
    pub falselist: PatchList,
    pub nextlist: PatchList,
}

impl ParseNode {
    pub fn leaf(lexeme: impl Into<String>) -> Self {
        ParseNode {
            lexeme: Some(lexeme.into()),
            ..Default::default()
        }
    }

    /// Asserts the "Boolean" state: non-empty truelist and falselist,
    /// empty nextlist.
    #[cfg(debug_assertions)]
    pub fn assert_boolean(&self) {
        debug_assert!(!self.truelist.is_empty());
        debug_assert!(!self.falselist.is_empty());
        debug_assert!(self.nextlist.is_empty());
    }

    /// Asserts the "Statement" state: empty truelist/falselist.
    #[cfg(debug_assertions)]
    pub fn assert_statement(&self) {
        debug_assert!(self.truelist.is_empty());
        debug_assert!(self.falselist.is_empty());
    }
}
