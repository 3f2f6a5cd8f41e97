//! The set of base type names a registration program may reference.
//!
//! The set only grows through [`KnownTypeSetBuilder`]. Freezing it yields a
//! [`KnownTypeSet`] with membership queries only, which is what the
//! synthesizer sees.

use angelscript_core::{PrimitiveKind, STRING_TYPE};
use rustc_hash::FxHashSet;

use crate::IntNaming;
use crate::normalize::TypeSpelling;

/// Collects known base names during startup.
#[derive(Debug, Default)]
pub struct KnownTypeSetBuilder {
    names: FxHashSet<String>,
}

impl KnownTypeSetBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder seeded with the typeless spelling, every primitive
    /// under `naming`, and the string type.
    pub fn with_primitives(naming: IntNaming) -> Self {
        let mut builder = Self::new();
        builder.insert("");
        for kind in PrimitiveKind::ALL {
            builder.insert(match naming {
                IntNaming::Runtime => kind.name(),
                IntNaming::FixedWidth => kind.fixed_width_name(),
            });
        }
        builder.insert(STRING_TYPE);
        builder
    }

    /// Add a base name. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Freeze the set.
    pub fn freeze(self) -> KnownTypeSet {
        KnownTypeSet { names: self.names }
    }
}

/// Frozen set of known base names.
#[derive(Debug, Default)]
pub struct KnownTypeSet {
    names: FxHashSet<String>,
}

impl KnownTypeSet {
    /// Check if a base name is known.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Check if a normalized type can appear in a script declaration.
    ///
    /// Raw pointers never can. Handles and references can when their base is
    /// known.
    pub fn is_representable(&self, ty: &TypeSpelling) -> bool {
        !ty.is_pointer() && self.contains(&ty.base)
    }

    /// Number of known names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Indirection;

    #[test]
    fn primitives_follow_naming() {
        let runtime = KnownTypeSetBuilder::with_primitives(IntNaming::Runtime).freeze();
        assert!(runtime.contains("int"));
        assert!(runtime.contains("uint64"));
        assert!(!runtime.contains("int32"));
        assert!(runtime.contains("string"));
        assert!(runtime.contains(""));

        let fixed = KnownTypeSetBuilder::with_primitives(IntNaming::FixedWidth).freeze();
        assert!(fixed.contains("int32"));
        assert!(!fixed.contains("int"));
    }

    #[test]
    fn requested_names_are_added() {
        let mut builder = KnownTypeSetBuilder::with_primitives(IntNaming::Runtime);
        assert!(builder.insert("Vec2"));
        assert!(!builder.insert("Vec2"));
        let known = builder.freeze();
        assert!(known.contains("Vec2"));
        assert!(!known.contains("Mat3"));
    }

    #[test]
    fn raw_pointers_are_not_representable() {
        let mut builder = KnownTypeSetBuilder::with_primitives(IntNaming::Runtime);
        builder.insert("Widget");
        let known = builder.freeze();

        let mut ty = TypeSpelling::simple("Widget");
        assert!(known.is_representable(&ty));
        ty.indirection = Indirection::Handle;
        assert!(known.is_representable(&ty));
        ty.indirection = Indirection::Pointer;
        assert!(!known.is_representable(&ty));
        assert!(!known.is_representable(&TypeSpelling::simple("Gadget")));
    }
}
