//! Reference direction for parameters.

use std::fmt::{self, Display, Formatter};

/// Reference modifier for parameters.
///
/// In AngelScript, parameters can be passed by reference with different access modes:
/// - `&in`: Read-only reference, accepts any value (can create temps)
/// - `&out`: Write-only reference, requires mutable lvalue, uninitialized on entry
///
/// The binding generator only ever emits `&in` and `&out`; native `T&`
/// parameters without a known direction are not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefModifier {
    /// No reference modifier
    #[default]
    None,
    /// &in - Read-only reference, accepts any value
    In,
    /// &out - Write-only reference, requires mutable lvalue
    Out,
}

impl RefModifier {
    /// The keyword appended after `&`, if any.
    pub const fn keyword(self) -> &'static str {
        match self {
            RefModifier::None => "",
            RefModifier::In => "in",
            RefModifier::Out => "out",
        }
    }
}

impl Display for RefModifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RefModifier::None => Ok(()),
            other => write!(f, "&{}", other.keyword()),
        }
    }
}
