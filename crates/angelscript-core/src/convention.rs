//! Calling-convention macros used by the generated header.
//!
//! The header does not hard-code a calling convention. It defines a small set
//! of macros in its preamble and switches them between the native and the
//! generic convention with `USE_ANGELSCRIPT_GENERIC_CALL_CONVENTION`. Each
//! registration call names the macro matching the kind of function it binds.

use std::fmt;

/// Preprocessor switch that selects the generic calling convention.
pub const GENERIC_CONVENTION_SWITCH: &str = "USE_ANGELSCRIPT_GENERIC_CALL_CONVENTION";

/// Which calling-convention macro a registration call uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallConvention {
    /// Free functions and factories (`asCALL_CDECL` / `asCALL_GENERIC`).
    Function,
    /// Construct/destruct trampolines taking the object last
    /// (`asCALL_CDECL_OBJLAST` / `asCALL_GENERIC`).
    Constructor,
    /// Member functions (`asCALL_THISCALL` / `asCALL_GENERIC`).
    Member,
}

impl CallConvention {
    /// Macro name referenced by registration calls.
    pub const fn macro_name(self) -> &'static str {
        match self {
            CallConvention::Function => "AS_CALL_CONVENTION",
            CallConvention::Constructor => "AS_CTOR_CONVENTION",
            CallConvention::Member => "AS_MEMBER_CALL_CONVENTION",
        }
    }

    /// Engine constant used when the native convention is selected.
    pub const fn native(self) -> &'static str {
        match self {
            CallConvention::Function => "asCALL_CDECL",
            CallConvention::Constructor => "asCALL_CDECL_OBJLAST",
            CallConvention::Member => "asCALL_THISCALL",
        }
    }

    /// Engine constant used when the generic convention is selected.
    pub const fn generic(self) -> &'static str {
        "asCALL_GENERIC"
    }

    /// All conventions, in the order the preamble defines them.
    pub const ALL: [CallConvention; 3] = [
        CallConvention::Function,
        CallConvention::Constructor,
        CallConvention::Member,
    ];
}

impl fmt::Display for CallConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.macro_name())
    }
}
