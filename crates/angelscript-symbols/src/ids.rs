//! Identifier for symbols stored in a [`SymbolTable`](crate::SymbolTable).

use std::fmt;

/// Index of a symbol inside its table.
///
/// Parent links are stored as `SymbolId`s, so a child never owns its parent.
///
/// # Example
///
/// ```
/// use angelscript_symbols::SymbolId;
///
/// let id = SymbolId::new(3);
/// assert_eq!(id.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Create a new symbol ID with the given index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the underlying index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol_{}", self.0)
    }
}
