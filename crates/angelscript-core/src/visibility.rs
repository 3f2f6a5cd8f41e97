//! Visibility modifiers for class members.

use std::fmt;

/// Visibility modifier for class members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Parse the `prot` spelling used by documentation tools.
    ///
    /// Anything that is not `public` or `protected` is treated as private.
    pub fn from_prot(prot: &str) -> Self {
        match prot {
            "public" => Visibility::Public,
            "protected" => Visibility::Protected,
            _ => Visibility::Private,
        }
    }

    /// Check if this is public visibility.
    pub const fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}
