//! Symbol graph of a native C++ API.
//!
//! The binding generator consumes a read-only graph of aggregates, enums,
//! typedefs and their members. This crate defines that graph
//! ([`Symbol`], [`Parameter`], [`SymbolTable`]), the single-use
//! [`SymbolTableBuilder`] that populates it, and a loader for Doxygen XML
//! output in [`doxygen`].
//!
//! Once [`SymbolTableBuilder::build`] returns, the table is frozen: it exposes
//! lookups only.

pub mod doxygen;
mod error;
mod ids;
mod symbol;
mod table;

pub use error::SymbolError;
pub use ids::SymbolId;
pub use symbol::{Enumerator, Parameter, Symbol, SymbolFlags, SymbolKind, basic_type};
pub use table::{SymbolTable, SymbolTableBuilder};

/// Attribute tag that opts a member out of binding.
pub const OPT_OUT_TAG: &str = "noascript";

/// Prefix of the attribute tag carrying an explicit registration directive,
/// e.g. `ascript: asOBJ_VALUE | asOBJ_POD`.
pub const DIRECTIVE_PREFIX: &str = "ascript";
