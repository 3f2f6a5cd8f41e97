//! Value/reference classification of aggregates.
//!
//! AngelScript needs to know up front whether a registered class lives in
//! script-owned storage (value type) or on the native heap behind a handle
//! (reference type). The decision comes from an ordered list of pure
//! predicates over the aggregate's own members, [`RULES`]; the first rule that
//! answers wins. Ambiguous shapes fall to [`Semantics::Reference`].

use std::fmt;

use angelscript_core::ObjectTypeFlags;
use angelscript_symbols::{SymbolId, SymbolKind, SymbolTable};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::normalize::HandleLookup;

/// How instances of an aggregate are managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantics {
    /// Constructed in place into caller-provided storage.
    Value,
    /// Heap-allocated by a factory and referred to by handle.
    Reference,
}

impl fmt::Display for Semantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semantics::Value => write!(f, "value"),
            Semantics::Reference => write!(f, "reference"),
        }
    }
}

/// The rule that decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Directive,
    PureVirtual,
    NoPublicConstructor,
    NonPublicCopyConstructor,
    NonPublicAssignment,
    NonPublicDestructor,
    SignalSlot,
    VirtualMember,
    Default,
}

impl Rule {
    /// Short description for logs.
    pub const fn description(self) -> &'static str {
        match self {
            Rule::Directive => "explicit directive",
            Rule::PureVirtual => "has a pure virtual member",
            Rule::NoPublicConstructor => "no public constructor",
            Rule::NonPublicCopyConstructor => "non-public copy constructor",
            Rule::NonPublicAssignment => "non-public assignment operator",
            Rule::NonPublicDestructor => "non-public destructor",
            Rule::SignalSlot => "has signals or slots",
            Rule::VirtualMember => "has a virtual member",
            Rule::Default => "default",
        }
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    pub semantics: Semantics,
    pub rule: Rule,
}

type Predicate = fn(&SymbolTable, SymbolId) -> Option<Semantics>;

/// Classification rules in priority order.
///
/// The virtual-member rule is a heuristic and can misclassify classes that
/// are safe to copy. Only an explicit directive overrides it.
pub const RULES: &[(Rule, Predicate)] = &[
    (Rule::Directive, directive),
    (Rule::PureVirtual, pure_virtual),
    (Rule::NoPublicConstructor, no_public_constructor),
    (Rule::NonPublicCopyConstructor, non_public_copy_constructor),
    (Rule::NonPublicAssignment, non_public_assignment),
    (Rule::NonPublicDestructor, non_public_destructor),
    (Rule::SignalSlot, signal_slot),
    (Rule::VirtualMember, virtual_member),
    (Rule::Default, default_value),
];

/// Classify one aggregate.
///
/// Pure: the result depends only on the aggregate's own members and
/// attributes.
pub fn classify(table: &SymbolTable, aggregate: SymbolId) -> Classification {
    RULES
        .iter()
        .find_map(|(rule, predicate)| {
            predicate(table, aggregate).map(|semantics| Classification {
                semantics,
                rule: *rule,
            })
        })
        .unwrap_or(Classification {
            semantics: Semantics::Value,
            rule: Rule::Default,
        })
}

/// Semantics named by a directive's flags, if it names any.
///
/// Each `|`-separated term is read on its own, so a term this crate does not
/// know does not hide `asOBJ_REF` or `asOBJ_VALUE` next to it. `asOBJ_REF`
/// takes priority over `asOBJ_VALUE`.
pub fn directive_semantics(directive: &str) -> Option<Semantics> {
    let flags = ObjectTypeFlags::parse_known(directive);
    if flags.is_ref() {
        Some(Semantics::Reference)
    } else if flags.is_value() {
        Some(Semantics::Value)
    } else {
        tracing::debug!(directive, "directive does not name semantics");
        None
    }
}

fn reference_if(condition: bool) -> Option<Semantics> {
    condition.then_some(Semantics::Reference)
}

fn directive(table: &SymbolTable, id: SymbolId) -> Option<Semantics> {
    directive_semantics(table.get(id).directive()?)
}

fn pure_virtual(table: &SymbolTable, id: SymbolId) -> Option<Semantics> {
    reference_if(table.members(id).any(|member| member.is_pure_virtual()))
}

fn no_public_constructor(table: &SymbolTable, id: SymbolId) -> Option<Semantics> {
    let mut constructors = table.constructors(id).peekable();
    let declared = constructors.peek().is_some();
    reference_if(declared && !constructors.any(|ctor| ctor.is_public()))
}

fn non_public_copy_constructor(table: &SymbolTable, id: SymbolId) -> Option<Semantics> {
    reference_if(table.copy_constructor(id).is_some_and(|ctor| !ctor.is_public()))
}

fn non_public_assignment(table: &SymbolTable, id: SymbolId) -> Option<Semantics> {
    reference_if(table.assignment_operator(id).is_some_and(|op| !op.is_public()))
}

fn non_public_destructor(table: &SymbolTable, id: SymbolId) -> Option<Semantics> {
    reference_if(table.destructor(id).is_some_and(|dtor| !dtor.is_public()))
}

fn signal_slot(table: &SymbolTable, id: SymbolId) -> Option<Semantics> {
    reference_if(
        table
            .members(id)
            .any(|member| matches!(member.kind, SymbolKind::Signal | SymbolKind::Slot)),
    )
}

fn virtual_member(table: &SymbolTable, id: SymbolId) -> Option<Semantics> {
    reference_if(table.members(id).any(|member| member.is_virtual()))
}

fn default_value(_: &SymbolTable, _: SymbolId) -> Option<Semantics> {
    Some(Semantics::Value)
}

/// Classification of every aggregate in a table, computed once per run.
///
/// Every component that needs an aggregate's semantics reads it from here,
/// so they all agree.
#[derive(Debug, Default)]
pub struct Classifications {
    by_id: FxHashMap<SymbolId, Classification>,
    reference_names: FxHashSet<String>,
}

impl Classifications {
    /// Classify all aggregates of `table`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compute(table: &SymbolTable) -> Self {
        let mut snapshot = Self::default();
        for (id, symbol) in table.iter() {
            if symbol.kind != SymbolKind::Aggregate {
                continue;
            }
            let classification = classify(table, id);
            tracing::trace!(
                aggregate = %symbol.qualified_name,
                semantics = %classification.semantics,
                rule = classification.rule.description(),
                "classified"
            );
            if classification.semantics == Semantics::Reference {
                snapshot.reference_names.insert(symbol.qualified_name.clone());
            }
            snapshot.by_id.insert(id, classification);
        }
        snapshot
    }

    /// Classification of an aggregate.
    pub fn get(&self, id: SymbolId) -> Option<Classification> {
        self.by_id.get(&id).copied()
    }

    /// Semantics of an aggregate.
    pub fn semantics(&self, id: SymbolId) -> Option<Semantics> {
        self.get(id).map(|c| c.semantics)
    }

    /// Check if an aggregate is reference-managed.
    pub fn is_reference(&self, id: SymbolId) -> bool {
        self.semantics(id) == Some(Semantics::Reference)
    }

    /// Number of classified aggregates.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if no aggregate was classified.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl HandleLookup for Classifications {
    fn is_reference_managed(&self, cpp_name: &str) -> bool {
        self.reference_names.contains(cpp_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angelscript_core::Visibility;
    use angelscript_symbols::{Parameter, Symbol, SymbolFlags, SymbolTableBuilder};

    fn single(build: impl FnOnce(&mut SymbolTableBuilder, SymbolId)) -> (SymbolTable, SymbolId) {
        let mut builder = SymbolTableBuilder::new();
        let id = builder.add_root(Symbol::aggregate("Foo"));
        build(&mut builder, id);
        (builder.build(), id)
    }

    fn check(build: impl FnOnce(&mut SymbolTableBuilder, SymbolId)) -> Classification {
        let (table, id) = single(build);
        classify(&table, id)
    }

    #[test]
    fn plain_struct_is_value() {
        let c = check(|b, id| {
            b.add_child(id, Symbol::variable("x", "float"));
        });
        assert_eq!(c.semantics, Semantics::Value);
        assert_eq!(c.rule, Rule::Default);
    }

    #[test]
    fn pure_virtual_is_reference() {
        let c = check(|b, id| {
            b.add_child(id, Symbol::function("draw", "void").with_flags(SymbolFlags::PURE_VIRTUAL));
        });
        assert_eq!(c.semantics, Semantics::Reference);
        assert_eq!(c.rule, Rule::PureVirtual);
    }

    #[test]
    fn directive_overrides_pure_virtual() {
        let mut builder = SymbolTableBuilder::new();
        let id = builder.add_root(
            Symbol::aggregate("Foo").with_attribute("ascript: asOBJ_VALUE | asOBJ_POD"),
        );
        builder.add_child(
            id,
            Symbol::function("draw", "void").with_flags(SymbolFlags::PURE_VIRTUAL),
        );
        let table = builder.build();

        let c = classify(&table, id);
        assert_eq!(c.semantics, Semantics::Value);
        assert_eq!(c.rule, Rule::Directive);
    }

    #[test]
    fn reference_directive_overrides_plain_shape() {
        let mut builder = SymbolTableBuilder::new();
        let id = builder.add_root(
            Symbol::aggregate("Foo").with_attribute("ascript: asOBJ_REF | asOBJ_NOCOUNT"),
        );
        builder.add_child(id, Symbol::variable("x", "int"));
        let table = builder.build();

        assert_eq!(classify(&table, id).semantics, Semantics::Reference);
    }

    #[test]
    fn unparsable_directive_falls_through() {
        let mut builder = SymbolTableBuilder::new();
        let id = builder.add_root(Symbol::aggregate("Foo").with_attribute("ascript: whatever"));
        let table = builder.build();

        assert_eq!(classify(&table, id).rule, Rule::Default);
    }

    #[test]
    fn directive_with_shorthand_flags() {
        let mut builder = SymbolTableBuilder::new();
        let shape = builder.add_root(
            Symbol::aggregate("Shape")
                .with_attribute("ascript: asOBJ_VALUE | asOBJ_APP_CLASS_CDAK"),
        );
        builder.add_child(
            shape,
            Symbol::function("area", "double").with_flags(SymbolFlags::PURE_VIRTUAL),
        );
        let node = builder.add_root(
            Symbol::aggregate("Node").with_attribute("ascript: asOBJ_REF | asOBJ_NOINHERIT"),
        );
        let table = builder.build();

        let c = classify(&table, shape);
        assert_eq!(c.semantics, Semantics::Value);
        assert_eq!(c.rule, Rule::Directive);

        let c = classify(&table, node);
        assert_eq!(c.semantics, Semantics::Reference);
        assert_eq!(c.rule, Rule::Directive);
    }

    #[test]
    fn unknown_directive_terms_are_ignored() {
        assert_eq!(directive_semantics("asOBJ_VALUE | asOBJ_BOGUS"), Some(Semantics::Value));
        assert_eq!(directive_semantics("asOBJ_CUSTOM | REF"), Some(Semantics::Reference));
        assert_eq!(directive_semantics("asOBJ_APP_CLASS_CD"), None);
    }

    #[test]
    fn hidden_special_members_are_reference() {
        let no_public_ctor = check(|b, id| {
            b.add_child(id, Symbol::constructor("Foo").with_visibility(Visibility::Private));
        });
        assert_eq!(no_public_ctor.rule, Rule::NoPublicConstructor);

        let hidden_copy = check(|b, id| {
            b.add_child(id, Symbol::constructor("Foo"));
            b.add_child(
                id,
                Symbol::constructor("Foo")
                    .with_param(Parameter::new("const Foo &"))
                    .with_visibility(Visibility::Private),
            );
        });
        assert_eq!(hidden_copy.rule, Rule::NonPublicCopyConstructor);

        let hidden_assign = check(|b, id| {
            b.add_child(
                id,
                Symbol::function("operator=", "Foo &")
                    .with_param(Parameter::new("const Foo &"))
                    .with_visibility(Visibility::Protected),
            );
        });
        assert_eq!(hidden_assign.rule, Rule::NonPublicAssignment);

        let hidden_dtor = check(|b, id| {
            b.add_child(id, Symbol::destructor("Foo").with_visibility(Visibility::Protected));
        });
        assert_eq!(hidden_dtor.rule, Rule::NonPublicDestructor);
    }

    #[test]
    fn public_constructor_among_private_ones_is_enough() {
        let c = check(|b, id| {
            b.add_child(id, Symbol::constructor("Foo").with_visibility(Visibility::Private));
            b.add_child(id, Symbol::constructor("Foo").with_param(Parameter::new("int")));
        });
        assert_eq!(c.semantics, Semantics::Value);
    }

    #[test]
    fn signals_and_virtuals_are_reference() {
        let signal = check(|b, id| {
            b.add_child(id, Symbol::new(SymbolKind::Signal, "changed"));
        });
        assert_eq!(signal.rule, Rule::SignalSlot);

        let virt = check(|b, id| {
            b.add_child(id, Symbol::function("update", "void").with_flags(SymbolFlags::VIRTUAL));
        });
        assert_eq!(virt.rule, Rule::VirtualMember);
    }

    #[test]
    fn classification_is_pure() {
        let (table, id) = single(|b, id| {
            b.add_child(id, Symbol::destructor("Foo").with_visibility(Visibility::Private));
        });
        let first = classify(&table, id);
        for _ in 0..4 {
            assert_eq!(classify(&table, id), first);
        }
        assert_eq!(Classifications::compute(&table).get(id), Some(first));
    }

    #[test]
    fn snapshot_answers_handle_lookups() {
        let mut builder = SymbolTableBuilder::new();
        let widget =
            builder.add_root(Symbol::aggregate("Widget").with_qualified_name("ui::Widget"));
        builder.add_child(
            widget,
            Symbol::function("paint", "void").with_flags(SymbolFlags::PURE_VIRTUAL),
        );
        let point = builder.add_root(Symbol::aggregate("Point"));
        let table = builder.build();

        let snapshot = Classifications::compute(&table);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.is_reference(widget));
        assert!(!snapshot.is_reference(point));
        assert!(snapshot.is_reference_managed("ui::Widget"));
        assert!(!snapshot.is_reference_managed("Point"));
    }
}
