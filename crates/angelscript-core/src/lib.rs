//! AngelScript registration vocabulary.
//!
//! The binding generator never links against AngelScript. It only writes C++
//! source that calls into the engine's registration API, so this crate holds
//! the names that API understands: primitive type names, operator method
//! names, object type flags, behaviours, parameter reference modifiers and the
//! calling-convention macros used by the generated header.

mod behaviour;
mod convention;
mod error;
mod object_flags;
mod operator;
mod primitive;
mod ref_modifier;
mod visibility;

pub use behaviour::Behaviour;
pub use convention::{CallConvention, GENERIC_CONVENTION_SWITCH};
pub use error::FlagParseError;
pub use object_flags::ObjectTypeFlags;
pub use operator::Operator;
pub use primitive::PrimitiveKind;
pub use ref_modifier::RefModifier;
pub use visibility::Visibility;

/// AngelScript's built-in string type name.
pub const STRING_TYPE: &str = "string";

/// Suffix marking an object handle in a declaration (`Foo@`).
pub const HANDLE_SUFFIX: char = '@';
