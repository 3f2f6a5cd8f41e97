//! Type normalization from C++ spellings to AngelScript declarations.
//!
//! A spelling is tokenized into words and indirection sigils, then the base
//! name goes through an ordered substitution:
//!
//! 1. integer family spellings (`unsigned short`, `int64_t`, `size_t`, ...)
//!    collapse onto one primitive, named per [`IntNaming`];
//! 2. `std::string` becomes `string`;
//! 3. remaining scope separators are flattened (`ns::Foo` → `ns_Foo`).
//!
//! Structural fixups follow: a raw pointer to a reference-managed class
//! becomes a handle (`Widget*` → `Widget@`), and any spelling with more than
//! one level of indirection (`T**`, `T*&`, `T&&`) is rejected.
//!
//! Rendering a [`TypeSpelling`] and normalizing it again yields the same
//! value.

use std::fmt;

use angelscript_core::{HANDLE_SUFFIX, PrimitiveKind, RefModifier, STRING_TYPE};
use thiserror::Error;

use crate::IntNaming;

/// C++ spellings of each integer family, without `const`/`volatile`.
const INTEGER_SPELLINGS: &[(&str, PrimitiveKind)] = &[
    ("char", PrimitiveKind::Int8),
    ("signed char", PrimitiveKind::Int8),
    ("int8_t", PrimitiveKind::Int8),
    ("std::int8_t", PrimitiveKind::Int8),
    ("unsigned char", PrimitiveKind::Uint8),
    ("uint8_t", PrimitiveKind::Uint8),
    ("std::uint8_t", PrimitiveKind::Uint8),
    ("short", PrimitiveKind::Int16),
    ("short int", PrimitiveKind::Int16),
    ("signed short", PrimitiveKind::Int16),
    ("signed short int", PrimitiveKind::Int16),
    ("int16_t", PrimitiveKind::Int16),
    ("std::int16_t", PrimitiveKind::Int16),
    ("unsigned short", PrimitiveKind::Uint16),
    ("unsigned short int", PrimitiveKind::Uint16),
    ("uint16_t", PrimitiveKind::Uint16),
    ("std::uint16_t", PrimitiveKind::Uint16),
    ("signed", PrimitiveKind::Int32),
    ("signed int", PrimitiveKind::Int32),
    ("int32_t", PrimitiveKind::Int32),
    ("std::int32_t", PrimitiveKind::Int32),
    ("unsigned", PrimitiveKind::Uint32),
    ("unsigned int", PrimitiveKind::Uint32),
    ("uint32_t", PrimitiveKind::Uint32),
    ("std::uint32_t", PrimitiveKind::Uint32),
    ("long", PrimitiveKind::Int64),
    ("long int", PrimitiveKind::Int64),
    ("signed long", PrimitiveKind::Int64),
    ("signed long int", PrimitiveKind::Int64),
    ("long long", PrimitiveKind::Int64),
    ("long long int", PrimitiveKind::Int64),
    ("signed long long", PrimitiveKind::Int64),
    ("signed long long int", PrimitiveKind::Int64),
    ("int64_t", PrimitiveKind::Int64),
    ("std::int64_t", PrimitiveKind::Int64),
    ("ssize_t", PrimitiveKind::Int64),
    ("ptrdiff_t", PrimitiveKind::Int64),
    ("std::ptrdiff_t", PrimitiveKind::Int64),
    ("unsigned long", PrimitiveKind::Uint64),
    ("unsigned long int", PrimitiveKind::Uint64),
    ("unsigned long long", PrimitiveKind::Uint64),
    ("unsigned long long int", PrimitiveKind::Uint64),
    ("uint64_t", PrimitiveKind::Uint64),
    ("std::uint64_t", PrimitiveKind::Uint64),
    ("size_t", PrimitiveKind::Uint64),
    ("std::size_t", PrimitiveKind::Uint64),
];

/// C++ spellings of the string type.
const STRING_SPELLINGS: &[&str] = &["std::string", "string"];

/// Errors for spellings that have no AngelScript form at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// More than one pointer/reference level.
    #[error("'{0}' has more than one level of indirection")]
    DoubleIndirection(String),

    /// Sigils without a base type, or words after a sigil.
    #[error("'{0}' is not a type spelling")]
    Malformed(String),
}

/// Answers whether a native class is reference-managed.
///
/// The normalizer asks this for the base of every raw pointer spelling.
pub trait HandleLookup {
    /// Check if `cpp_name` names a reference-managed class.
    fn is_reference_managed(&self, cpp_name: &str) -> bool;
}

impl HandleLookup for () {
    fn is_reference_managed(&self, _cpp_name: &str) -> bool {
        false
    }
}

/// Pointer-like suffix on a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indirection {
    #[default]
    None,
    /// Raw pointer (`T*`). Never representable in a script declaration.
    Pointer,
    /// Object handle (`T@`).
    Handle,
}

/// A normalized type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeSpelling {
    /// Leading `const`.
    pub is_const: bool,
    /// Base type name in AngelScript's vocabulary. Empty for constructors,
    /// which have no return type.
    pub base: String,
    /// Pointer or handle suffix.
    pub indirection: Indirection,
    /// Trailing `&`.
    pub is_reference: bool,
}

impl TypeSpelling {
    /// A plain, unqualified type.
    pub fn simple(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    /// Check if this is the empty spelling of a constructor's return type.
    pub fn is_typeless(&self) -> bool {
        self.base.is_empty() && !self.is_reference && self.indirection == Indirection::None
    }

    /// Check if this is a raw pointer.
    pub fn is_pointer(&self) -> bool {
        self.indirection == Indirection::Pointer
    }

    /// Check if this is a handle.
    pub fn is_handle(&self) -> bool {
        self.indirection == Indirection::Handle
    }

    /// Render with a reference direction, e.g. `const Vec2 &in`.
    ///
    /// The direction is ignored for non-reference types.
    pub fn declaration(&self, direction: RefModifier) -> String {
        let mut out = String::new();
        self.write_value_part(&mut out);
        if self.is_reference {
            out.push_str(" &");
            out.push_str(direction.keyword());
        }
        out
    }

    fn write_value_part(&self, out: &mut String) {
        if self.is_const {
            out.push_str("const ");
        }
        out.push_str(&self.base);
        match self.indirection {
            Indirection::None => {}
            Indirection::Pointer => out.push('*'),
            Indirection::Handle => out.push(HANDLE_SUFFIX),
        }
    }
}

impl fmt::Display for TypeSpelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.declaration(RefModifier::None))
    }
}

/// Maps C++ type spellings to [`TypeSpelling`]s.
pub struct Normalizer<'a> {
    naming: IntNaming,
    handles: &'a dyn HandleLookup,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer with a handle lookup.
    pub fn new(naming: IntNaming, handles: &'a dyn HandleLookup) -> Self {
        Self { naming, handles }
    }

    /// Normalize a full type spelling.
    ///
    /// # Examples
    ///
    /// ```
    /// use angelscript_generator::{IntNaming, Normalizer};
    ///
    /// let normalizer = Normalizer::new(IntNaming::Runtime, &());
    /// let ty = normalizer.normalize("const std::string &").unwrap();
    /// assert_eq!(ty.to_string(), "const string &");
    /// assert!(normalizer.normalize("char **").is_err());
    /// ```
    pub fn normalize(&self, spelling: &str) -> Result<TypeSpelling, NormalizeError> {
        let mut is_const = false;
        let mut words: Vec<String> = Vec::new();
        let mut sigils: Vec<char> = Vec::new();

        for token in tokenize(spelling) {
            match token {
                Token::Sigil(sigil) => sigils.push(sigil),
                // `const` after a sigil qualifies the pointer, not the pointee.
                Token::Word(word) if word == "const" => is_const |= sigils.is_empty(),
                Token::Word(word) if word == "volatile" => {}
                Token::Word(word) => {
                    if !sigils.is_empty() {
                        return Err(NormalizeError::Malformed(spelling.to_string()));
                    }
                    words.push(word);
                }
            }
        }

        if sigils.len() > 1 {
            return Err(NormalizeError::DoubleIndirection(spelling.to_string()));
        }
        if words.is_empty() && !sigils.is_empty() {
            return Err(NormalizeError::Malformed(spelling.to_string()));
        }

        let cpp_base = words.join(" ");
        let base = self.map_base(&cpp_base);
        let (indirection, is_reference) = match sigils.first() {
            None => (Indirection::None, false),
            Some('&') => (Indirection::None, true),
            Some('*')
                if self.handles.is_reference_managed(&cpp_base)
                    || self.handles.is_reference_managed(&base) =>
            {
                (Indirection::Handle, false)
            }
            Some('*') => (Indirection::Pointer, false),
            Some(_) => (Indirection::Handle, false),
        };

        Ok(TypeSpelling {
            is_const,
            base,
            indirection,
            is_reference,
        })
    }

    /// Map a bare C++ type name (no qualifiers or sigils) to its script name.
    ///
    /// ```
    /// use angelscript_generator::{IntNaming, Normalizer};
    ///
    /// let normalizer = Normalizer::new(IntNaming::FixedWidth, &());
    /// assert_eq!(normalizer.map_base("unsigned int"), "uint32");
    /// assert_eq!(normalizer.map_base("game::Player"), "game_Player");
    /// ```
    pub fn map_base(&self, cpp_name: &str) -> String {
        let name = cpp_name.strip_prefix("::").unwrap_or(cpp_name);
        if let Some(kind) = primitive_for(name) {
            return self.primitive_name(kind).to_string();
        }
        if STRING_SPELLINGS.contains(&name) {
            return STRING_TYPE.to_string();
        }
        name.replace("::", "_")
    }

    /// Script name of a primitive under this normalizer's convention.
    pub fn primitive_name(&self, kind: PrimitiveKind) -> &'static str {
        match self.naming {
            IntNaming::Runtime => kind.name(),
            IntNaming::FixedWidth => kind.fixed_width_name(),
        }
    }
}

fn primitive_for(name: &str) -> Option<PrimitiveKind> {
    INTEGER_SPELLINGS
        .iter()
        .find(|(spelling, _)| *spelling == name)
        .map(|(_, kind)| *kind)
        .or_else(|| PrimitiveKind::from_name(name))
}

enum Token {
    Word(String),
    Sigil(char),
}

/// Split a spelling into words and top-level sigils. Template arguments and
/// array extents stay inside their word.
fn tokenize(spelling: &str) -> Vec<Token> {
    fn flush(word: &mut String, tokens: &mut Vec<Token>) {
        let trimmed = word.trim();
        if !trimmed.is_empty() {
            tokens.push(Token::Word(trimmed.to_string()));
        }
        word.clear();
    }

    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut depth = 0usize;

    for c in spelling.chars() {
        match c {
            '<' | '(' | '[' => {
                depth += 1;
                word.push(c);
            }
            '>' | ')' | ']' => {
                depth = depth.saturating_sub(1);
                word.push(c);
            }
            '&' | '*' | '@' if depth == 0 => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::Sigil(c));
            }
            c if c.is_whitespace() => {
                if depth == 0 {
                    flush(&mut word, &mut tokens);
                } else if !word.ends_with(' ') {
                    word.push(' ');
                }
            }
            c => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    impl HandleLookup for FxHashSet<String> {
        fn is_reference_managed(&self, cpp_name: &str) -> bool {
            self.contains(cpp_name)
        }
    }

    fn runtime() -> Normalizer<'static> {
        Normalizer::new(IntNaming::Runtime, &())
    }

    fn norm(spelling: &str) -> String {
        runtime().normalize(spelling).unwrap().to_string()
    }

    #[test]
    fn integer_families_collapse() {
        assert_eq!(norm("signed char"), "int8");
        assert_eq!(norm("unsigned short int"), "uint16");
        assert_eq!(norm("int"), "int");
        assert_eq!(norm("int32_t"), "int");
        assert_eq!(norm("unsigned"), "uint");
        assert_eq!(norm("long long"), "int64");
        assert_eq!(norm("std::uint64_t"), "uint64");
        assert_eq!(norm("size_t"), "uint64");
    }

    #[test]
    fn fixed_width_keeps_32_bit_suffix() {
        let normalizer = Normalizer::new(IntNaming::FixedWidth, &());
        assert_eq!(normalizer.normalize("int").unwrap().base, "int32");
        assert_eq!(normalizer.normalize("unsigned int").unwrap().base, "uint32");
        assert_eq!(normalizer.normalize("int32").unwrap().base, "int32");
    }

    #[test]
    fn string_and_namespaces() {
        assert_eq!(norm("std::string"), "string");
        assert_eq!(norm("const std::string &"), "const string &");
        assert_eq!(norm("math::Vec2"), "math_Vec2");
        assert_eq!(norm("::math::Vec2"), "math_Vec2");
    }

    #[test]
    fn qualifiers_and_references() {
        let ty = runtime().normalize("Vec2 const &").unwrap();
        assert!(ty.is_const);
        assert!(ty.is_reference);
        assert_eq!(ty.declaration(RefModifier::In), "const Vec2 &in");

        let ptr = runtime().normalize("int * const").unwrap();
        assert!(!ptr.is_const);
        assert!(ptr.is_pointer());
        assert_eq!(ptr.to_string(), "int*");
    }

    #[test]
    fn pointer_to_reference_class_becomes_handle() {
        let mut handles = FxHashSet::default();
        handles.insert("ui::Widget".to_string());
        let normalizer = Normalizer::new(IntNaming::Runtime, &handles);

        let ty = normalizer.normalize("ui::Widget *").unwrap();
        assert!(ty.is_handle());
        assert_eq!(ty.to_string(), "ui_Widget@");

        let plain = normalizer.normalize("float *").unwrap();
        assert!(plain.is_pointer());
    }

    #[test]
    fn double_indirection_is_rejected() {
        for spelling in ["char **", "Foo *&", "Foo &&", "int&*"] {
            assert_eq!(
                runtime().normalize(spelling),
                Err(NormalizeError::DoubleIndirection(spelling.to_string())),
                "{spelling}"
            );
        }
    }

    #[test]
    fn malformed_spellings() {
        assert!(matches!(
            runtime().normalize("&"),
            Err(NormalizeError::Malformed(_))
        ));
        assert!(matches!(
            runtime().normalize("int * x"),
            Err(NormalizeError::Malformed(_))
        ));
    }

    #[test]
    fn template_arguments_stay_opaque() {
        let ty = runtime().normalize("const std::vector<Foo*> &").unwrap();
        assert_eq!(ty.base, "std_vector<Foo*>");
        assert!(ty.is_reference);
    }

    #[test]
    fn typeless_constructor_return() {
        let ty = runtime().normalize("").unwrap();
        assert!(ty.is_typeless());
        assert_eq!(ty.to_string(), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut handles = FxHashSet::default();
        handles.insert("Widget".to_string());
        for naming in [IntNaming::Runtime, IntNaming::FixedWidth] {
            let normalizer = Normalizer::new(naming, &handles);
            for spelling in [
                "",
                "void",
                "const unsigned int &",
                "long long",
                "std::string",
                "const std::string &",
                "ns::inner::Thing",
                "Widget *",
                "const Widget *",
                "float *",
                "Vec2 const &",
                "uint8_t",
                "std::map<int, float>",
            ] {
                let once = normalizer.normalize(spelling).unwrap();
                let twice = normalizer.normalize(&once.to_string()).unwrap();
                assert_eq!(once, twice, "{spelling} under {naming:?}");
            }
        }
    }
}
