//! Object behaviours registered through `RegisterObjectBehaviour`.

use std::fmt;

/// Object behaviours the generated header can register.
///
/// Value types are constructed into engine-provided memory (`Construct`) and
/// destroyed in place (`Destruct`). Reference types are created by a
/// `Factory` that returns a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behaviour {
    /// Object constructor.
    Construct,
    /// Object destructor.
    Destruct,
    /// Object factory function.
    Factory,
}

impl Behaviour {
    /// Name of the C++ enum constant.
    pub const fn constant(self) -> &'static str {
        match self {
            Behaviour::Construct => "asBEHAVE_CONSTRUCT",
            Behaviour::Destruct => "asBEHAVE_DESTRUCT",
            Behaviour::Factory => "asBEHAVE_FACTORY",
        }
    }
}

impl fmt::Display for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant())
    }
}
