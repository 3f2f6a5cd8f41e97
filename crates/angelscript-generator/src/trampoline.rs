//! Construct, factory and destruct trampolines.
//!
//! AngelScript cannot call a C++ constructor directly. Each public
//! constructor of a non-abstract aggregate gets a free function the engine
//! can call instead:
//!
//! ```text
//! // value type: construct in place into engine-provided memory
//! static void Vec2_ctor_float_0sfloat(float a0, float a1, Vec2 *self)
//! {
//!     new(self) Vec2(a0, a1);
//! }
//!
//! // reference type: allocate and hand back ownership
//! static Widget *Widget_Factory_int(int a0)
//! {
//!     return new Widget(a0);
//! }
//! ```
//!
//! Value types with a public destructor also get `T_dtor`. Reference types
//! never do; the engine owns their lifetime.
//!
//! # Fingerprints
//!
//! Overloads are told apart by a fingerprint of their parameter-type tuple.
//! Spellings are canonicalized (whitespace collapsed, spaces around
//! punctuation dropped) and mangled one character at a time:
//!
//! | Input         | Output     |
//! |---------------|------------|
//! | letter/digit  | itself     |
//! | `_`           | `__`       |
//! | space         | `_0w`      |
//! | `&` `*` `@`   | `_0ref` `_0ptr` `_0handle` |
//! | `::`          | `_0ns`     |
//! | `<` `>`       | `_0lt` `_0gt` |
//! | `[` `]`       | `_0lb` `_0rb` |
//! | `(` `)`       | `_0lp` `_0rp` |
//! | `,`           | `_0cm`     |
//! | other         | `_0u<hex>_` |
//!
//! Parameters are joined with `_0s`. A literal `_` is always doubled, so a
//! single `_` always opens a `_0` escape, and no escape tag is a prefix of
//! another. Reading left to right therefore decodes every fingerprint one
//! way only, and distinct tuples never share a fingerprint.

use std::fmt::Write as _;

use angelscript_symbols::{SymbolFlags, SymbolId};

use crate::classify::Semantics;
use crate::context::BindingContext;

const PARAM_SEPARATOR: &str = "_0s";

/// Which bridging function a trampoline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrampolineKind {
    /// Placement-new into caller storage.
    Constructor,
    /// Heap allocation returning an owning pointer.
    Factory,
    /// Explicit destructor call on caller storage.
    Destructor,
}

/// A bridging function definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trampoline {
    pub kind: TrampolineKind,
    /// Function name.
    pub name: String,
    /// Class name as written at global scope, e.g. `math::Vec2`.
    pub class: String,
    /// Unqualified class name, used for the destructor call.
    pub simple_name: String,
    /// Parameter spellings, in order.
    pub params: Vec<String>,
}

impl Trampoline {
    /// Render the C++ definition, followed by a blank line.
    pub fn render(&self) -> String {
        let args: Vec<String> = (0..self.params.len()).map(|i| format!("a{i}")).collect();
        let mut decls: Vec<String> = self
            .params
            .iter()
            .zip(&args)
            .map(|(ty, arg)| format!("{ty} {arg}"))
            .collect();
        let args = args.join(", ");

        let mut out = String::new();
        match self.kind {
            TrampolineKind::Constructor => {
                decls.push(format!("{} *self", self.class));
                let _ = writeln!(out, "static void {}({})", self.name, decls.join(", "));
                let _ = writeln!(out, "{{\n\tnew(self) {}({args});\n}}", self.class);
            }
            TrampolineKind::Factory => {
                let _ = writeln!(out, "static {} *{}({})", self.class, self.name, decls.join(", "));
                let _ = writeln!(out, "{{\n\treturn new {}({args});\n}}", self.class);
            }
            TrampolineKind::Destructor => {
                let _ = writeln!(out, "static void {}(void *memory)", self.name);
                let (class, simple_name) = (&self.class, &self.simple_name);
                let _ = writeln!(out, "{{\n\t(({class}*)memory)->~{simple_name}();\n}}");
            }
        }
        out.push('\n');
        out
    }
}

/// Fingerprint of a parameter-type tuple. Empty for no parameters.
///
/// ```
/// use angelscript_generator::trampoline::fingerprint;
///
/// assert_eq!(fingerprint(&["float", "float"]), "float_0sfloat");
/// assert_eq!(fingerprint(&["const Vec2 &"]), "const_0wVec2_0ref");
/// assert_eq!(fingerprint::<&str>(&[]), "");
/// ```
pub fn fingerprint<S: AsRef<str>>(params: &[S]) -> String {
    let mut out = String::new();
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(PARAM_SEPARATOR);
        }
        mangle_into(&canonical_spelling(param.as_ref()), &mut out);
    }
    out
}

/// Collapse whitespace and keep spaces only between two words.
fn canonical_spelling(spelling: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut out = String::new();
    let mut pending_space = false;
    for c in spelling.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && is_word(c) && out.chars().next_back().is_some_and(is_word) {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

fn mangle_into(spelling: &str, out: &mut String) {
    let mut chars = spelling.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_ascii_alphanumeric() => out.push(c),
            '_' => out.push_str("__"),
            ' ' => out.push_str("_0w"),
            '&' => out.push_str("_0ref"),
            '*' => out.push_str("_0ptr"),
            '@' => out.push_str("_0handle"),
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.push_str("_0ns");
            }
            '<' => out.push_str("_0lt"),
            '>' => out.push_str("_0gt"),
            '[' => out.push_str("_0lb"),
            ']' => out.push_str("_0rb"),
            '(' => out.push_str("_0lp"),
            ')' => out.push_str("_0rp"),
            ',' => out.push_str("_0cm"),
            other => {
                let _ = write!(out, "_0u{:x}_", other as u32);
            }
        }
    }
}

/// Name of the construct or factory trampoline for a constructor with the
/// given declared parameter spellings.
pub fn constructor_name<S: AsRef<str>>(ident: &str, semantics: Semantics, params: &[S]) -> String {
    let stem = match semantics {
        Semantics::Value => "ctor",
        Semantics::Reference => "Factory",
    };
    let fp = fingerprint(params);
    if fp.is_empty() {
        format!("{ident}_{stem}")
    } else {
        format!("{ident}_{stem}_{fp}")
    }
}

/// Name of the destruct trampoline.
pub fn destructor_name(ident: &str) -> String {
    format!("{ident}_dtor")
}

/// Trampolines for one aggregate, in member declaration order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn trampolines_for(ctx: &BindingContext<'_>, id: SymbolId) -> Vec<Trampoline> {
    let table = ctx.table();
    let aggregate = table.get(id);
    let semantics = ctx
        .classifications()
        .semantics(id)
        .unwrap_or(Semantics::Reference);
    let ident = ctx.script_name(&aggregate.qualified_name);
    let is_abstract = aggregate.flags.contains(SymbolFlags::ABSTRACT);

    let mut trampolines = Vec::new();
    for member in table.members(id) {
        if !member.is_public() || member.is_opted_out() {
            continue;
        }
        if member.is_constructor_of(aggregate) && !is_abstract {
            let declared: Vec<&str> = member.params.iter().map(|p| p.ty.as_str()).collect();
            let params = declared
                .iter()
                .map(|ty| {
                    ctx.respell(ty, &aggregate.qualified_name, false)
                        .unwrap_or_else(|| (*ty).to_string())
                })
                .collect();
            let kind = match semantics {
                Semantics::Value => TrampolineKind::Constructor,
                Semantics::Reference => TrampolineKind::Factory,
            };
            trampolines.push(Trampoline {
                kind,
                name: constructor_name(&ident, semantics, &declared),
                class: aggregate.qualified_name.clone(),
                simple_name: aggregate.name.clone(),
                params,
            });
        } else if member.is_destructor_of(aggregate) && semantics == Semantics::Value {
            trampolines.push(Trampoline {
                kind: TrampolineKind::Destructor,
                name: destructor_name(&ident),
                class: aggregate.qualified_name.clone(),
                simple_name: aggregate.name.clone(),
                params: Vec::new(),
            });
        }
    }
    trampolines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeneratorOptions;
    use angelscript_core::Visibility;
    use angelscript_symbols::{Parameter, Symbol, SymbolTableBuilder};

    #[test]
    fn fingerprints_distinguish_equal_arity_overloads() {
        let a = fingerprint(&["int", "float"]);
        let b = fingerprint(&["float", "int"]);
        let c = fingerprint(&["const Vec2 &"]);
        let d = fingerprint(&["const Vec2 *"]);
        assert_ne!(a, b);
        assert_ne!(c, d);
    }

    #[test]
    fn fingerprints_ignore_whitespace_noise() {
        assert_eq!(fingerprint(&["const Vec2&"]), fingerprint(&["const  Vec2 &"]));
        assert_eq!(
            fingerprint(&["std::map<int, float>"]),
            fingerprint(&["std::map<int,float>"])
        );
    }

    #[test]
    fn fingerprints_are_identifier_safe() {
        for fp in [
            fingerprint(&["const std::vector<ns::Foo*> &", "unsigned int"]),
            fingerprint(&["float[3]", "void (*)(int)"]),
            fingerprint(&["Üml"]),
        ] {
            assert!(fp.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'), "{fp}");
        }
    }

    #[test]
    fn fingerprints_do_not_collide_on_underscores_or_separators() {
        assert_ne!(fingerprint(&["a_b"]), fingerprint(&["a b"]));
        assert_ne!(fingerprint(&["a", "b"]), fingerprint(&["a,b"]));
        assert_ne!(fingerprint(&["ns::T"]), fingerprint(&["ns_T"]));
        assert_ne!(fingerprint(&["a", "sb"]), fingerprint(&["a_0ssb"]));
        assert_ne!(fingerprint(&["Foo _Bar"]), fingerprint(&["Foo_ Bar"]));
        assert_ne!(fingerprint(&["a b"]), fingerprint(&["a_0wb"]));
    }

    #[test]
    fn trampoline_names() {
        assert_eq!(constructor_name::<&str>("Vec2", Semantics::Value, &[]), "Vec2_ctor");
        assert_eq!(
            constructor_name("Vec2", Semantics::Value, &["float", "float"]),
            "Vec2_ctor_float_0sfloat"
        );
        assert_eq!(
            constructor_name("Widget", Semantics::Reference, &["int"]),
            "Widget_Factory_int"
        );
        assert_eq!(destructor_name("math_Vec2"), "math_Vec2_dtor");
    }

    #[test]
    fn rendering() {
        let ctor = Trampoline {
            kind: TrampolineKind::Constructor,
            name: "Vec2_ctor_float_0sfloat".into(),
            class: "Vec2".into(),
            simple_name: "Vec2".into(),
            params: vec!["float".into(), "float".into()],
        };
        assert_eq!(
            ctor.render(),
            "static void Vec2_ctor_float_0sfloat(float a0, float a1, Vec2 *self)\n\
             {\n\tnew(self) Vec2(a0, a1);\n}\n\n"
        );

        let factory = Trampoline {
            kind: TrampolineKind::Factory,
            name: "Widget_Factory".into(),
            class: "ui::Widget".into(),
            simple_name: "Widget".into(),
            params: vec![],
        };
        assert_eq!(
            factory.render(),
            "static ui::Widget *Widget_Factory()\n{\n\treturn new ui::Widget();\n}\n\n"
        );

        let dtor = Trampoline {
            kind: TrampolineKind::Destructor,
            name: "ui_Box_dtor".into(),
            class: "ui::Box".into(),
            simple_name: "Box".into(),
            params: vec![],
        };
        assert_eq!(
            dtor.render(),
            "static void ui_Box_dtor(void *memory)\n{\n\t((ui::Box*)memory)->~Box();\n}\n\n"
        );
    }

    #[test]
    fn reference_aggregates_get_factories_and_no_destructor() {
        let mut builder = SymbolTableBuilder::new();
        let widget = builder.add_root(Symbol::aggregate("Widget"));
        builder.add_child(
            widget,
            Symbol::function("draw", "void").with_flags(SymbolFlags::PURE_VIRTUAL),
        );
        builder.add_child(widget, Symbol::constructor("Widget").with_param(Parameter::new("int")));
        builder.add_child(
            widget,
            Symbol::destructor("Widget").with_visibility(Visibility::Protected),
        );
        let table = builder.build();
        let options = GeneratorOptions::default();
        let ctx = BindingContext::new(&table, &["Widget"], &options);

        let trampolines = trampolines_for(&ctx, widget);
        assert_eq!(trampolines.len(), 1);
        assert_eq!(trampolines[0].kind, TrampolineKind::Factory);
        assert_eq!(trampolines[0].name, "Widget_Factory_int");
    }

    #[test]
    fn abstract_aggregates_get_no_constructors() {
        let mut builder = SymbolTableBuilder::new();
        let shape = builder.add_root(Symbol::aggregate("Shape").with_flags(SymbolFlags::ABSTRACT));
        builder.add_child(shape, Symbol::constructor("Shape"));
        builder.add_child(shape, Symbol::destructor("Shape"));
        let table = builder.build();
        let options = GeneratorOptions::default();
        let ctx = BindingContext::new(&table, &["Shape"], &options);

        let trampolines = trampolines_for(&ctx, shape);
        assert_eq!(trampolines.len(), 1);
        assert_eq!(trampolines[0].kind, TrampolineKind::Destructor);
    }

    #[test]
    fn value_aggregates_get_one_per_public_constructor() {
        let mut builder = SymbolTableBuilder::new();
        let vec2 = builder.add_root(Symbol::aggregate("Vec2").with_qualified_name("math::Vec2"));
        builder.add_child(vec2, Symbol::constructor("Vec2"));
        builder.add_child(
            vec2,
            Symbol::constructor("Vec2").with_param(Parameter::new("const Vec2 &")),
        );
        builder.add_child(
            vec2,
            Symbol::constructor("Vec2")
                .with_param(Parameter::new("float"))
                .with_visibility(Visibility::Private),
        );
        builder.add_child(vec2, Symbol::destructor("Vec2"));
        let table = builder.build();
        let options = GeneratorOptions::default();
        let ctx = BindingContext::new(&table, &["math::Vec2"], &options);

        let trampolines = trampolines_for(&ctx, vec2);
        let names: Vec<&str> = trampolines.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            ["math_Vec2_ctor", "math_Vec2_ctor_const_0wVec2_0ref", "math_Vec2_dtor"]
        );
        assert_eq!(trampolines[1].params, ["const math::Vec2 &"]);
    }
}
