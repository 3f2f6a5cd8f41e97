//! Primitive type kinds for AngelScript's built-in numeric and boolean types.

use std::fmt;

/// Primitive type kinds.
///
/// These are the built-in numeric and boolean types in AngelScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Every primitive, in declaration order.
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Void,
        PrimitiveKind::Bool,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint8,
        PrimitiveKind::Uint16,
        PrimitiveKind::Uint32,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Get the name of this primitive type as scripts spell it.
    ///
    /// 32-bit integers use the engine's default `int`/`uint` names.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Uint32 => "uint",
            other => other.fixed_width_name(),
        }
    }

    /// Get the width-suffixed name of this primitive type.
    ///
    /// Identical to [`name`](Self::name) except for 32-bit integers, which are
    /// spelled `int32`/`uint32`.
    pub const fn fixed_width_name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Look up a primitive by either of its script names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.fixed_width_name() == name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
