//! Symbol and parameter model.

use std::fmt;

use angelscript_core::Visibility;
use bitflags::bitflags;

use crate::{DIRECTIVE_PREFIX, OPT_OUT_TAG, SymbolId};

/// What kind of declaration a symbol describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A class, struct or union.
    Aggregate,
    /// An enumeration.
    Enum,
    /// A type alias.
    Typedef,
    /// A function or member function.
    Function,
    /// A data member or variable.
    Variable,
    /// A Qt-style slot. Callable like a function.
    Slot,
    /// A Qt-style signal.
    Signal,
}

impl SymbolKind {
    /// Parse the `kind` attribute used by Doxygen for compounds and members.
    pub fn from_doxygen(kind: &str) -> Option<Self> {
        match kind {
            "class" | "struct" | "union" => Some(SymbolKind::Aggregate),
            "enum" => Some(SymbolKind::Enum),
            "typedef" => Some(SymbolKind::Typedef),
            "function" => Some(SymbolKind::Function),
            "variable" => Some(SymbolKind::Variable),
            "slot" => Some(SymbolKind::Slot),
            "signal" => Some(SymbolKind::Signal),
            _ => None,
        }
    }

    /// Check if symbols of this kind can be called.
    pub const fn is_callable(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Slot | SymbolKind::Signal)
    }

    /// Check if symbols of this kind name a type.
    pub const fn is_type(self) -> bool {
        matches!(self, SymbolKind::Aggregate | SymbolKind::Enum | SymbolKind::Typedef)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Aggregate => "aggregate",
            SymbolKind::Enum => "enum",
            SymbolKind::Typedef => "typedef",
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Slot => "slot",
            SymbolKind::Signal => "signal",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SymbolFlags: u8 {
        /// `const` member function.
        const CONST = 1 << 0;
        /// `static` member.
        const STATIC = 1 << 1;
        /// `virtual` member function.
        const VIRTUAL = 1 << 2;
        /// Pure virtual (`= 0`) member function.
        const PURE_VIRTUAL = 1 << 3;
        /// Aggregate explicitly documented as abstract.
        const ABSTRACT = 1 << 4;
    }
}

/// A single enumerator of an enum symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    /// Enumerator name.
    pub name: String,
    /// Explicit integer value, when the initializer is a plain literal.
    pub value: Option<i64>,
}

impl Enumerator {
    /// Create an enumerator.
    pub fn new(name: impl Into<String>, value: Option<i64>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameter {
    /// Type as spelled in the declaration, e.g. `const std::string &`.
    pub ty: String,
    /// Declared name, if any.
    pub name: Option<String>,
    /// Documentation fragment for this parameter. Only scanned for the
    /// `[in]` and `[out]` direction markers.
    pub doc: String,
}

impl Parameter {
    /// Create an undocumented, unnamed parameter.
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: None,
            doc: String::new(),
        }
    }

    /// Set the declared name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the documentation fragment.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// The type stripped of `const`, `volatile`, `&` and `*`.
    ///
    /// ```
    /// use angelscript_symbols::Parameter;
    ///
    /// assert_eq!(Parameter::new("const std::string &").basic_type(), "std::string");
    /// assert_eq!(Parameter::new("unsigned  int*").basic_type(), "unsigned int");
    /// ```
    pub fn basic_type(&self) -> String {
        basic_type(&self.ty)
    }

    /// Check if the documentation marks this parameter as input.
    pub fn documented_in(&self) -> bool {
        self.doc.contains("[in]")
    }

    /// Check if the documentation marks this parameter as output.
    pub fn documented_out(&self) -> bool {
        self.doc.contains("[out]")
    }
}

/// Strip `const`, `volatile`, `&` and `*` from a type spelling.
pub fn basic_type(spelling: &str) -> String {
    spelling
        .replace(['&', '*'], " ")
        .split_whitespace()
        .filter(|word| !matches!(*word, "const" | "volatile"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A declaration in the symbol graph.
///
/// The fields that apply depend on [`kind`](Self::kind); the others stay
/// empty. `ty` holds the return type of a function, the declared type of a
/// variable and the aliased type of a typedef.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Declaration kind.
    pub kind: SymbolKind,
    /// Unqualified name.
    pub name: String,
    /// Fully qualified name (with namespace and enclosing classes).
    pub qualified_name: String,
    /// Member visibility.
    pub visibility: Visibility,
    /// Free-form attribute tags taken from the documentation.
    pub attributes: Vec<String>,
    /// Enclosing symbol. Set by the table builder.
    pub parent: Option<SymbolId>,
    /// Owned members, in declaration order. Set by the table builder.
    pub children: Vec<SymbolId>,
    /// Parameters of a callable symbol, in order.
    pub params: Vec<Parameter>,
    /// Return, declared or aliased type spelling.
    pub ty: String,
    /// Declaration modifiers.
    pub flags: SymbolFlags,
    /// Enumerators of an enum, in order.
    pub enumerators: Vec<Enumerator>,
    /// Array extent of a variable, e.g. `[3]`.
    pub array_extent: Option<String>,
}

impl Symbol {
    /// Create a symbol of the given kind. The qualified name is filled in
    /// by the table builder when left empty.
    pub fn new(kind: SymbolKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            qualified_name: String::new(),
            visibility: Visibility::Public,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            params: Vec::new(),
            ty: String::new(),
            flags: SymbolFlags::empty(),
            enumerators: Vec::new(),
            array_extent: None,
        }
    }

    /// Create an aggregate (class/struct) symbol.
    pub fn aggregate(name: impl Into<String>) -> Self {
        Self::new(SymbolKind::Aggregate, name)
    }

    /// Create a function symbol with a return type.
    pub fn function(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self::new(SymbolKind::Function, name).with_type(return_type)
    }

    /// Create a constructor for the named class. Constructors have no
    /// return type.
    pub fn constructor(class_name: &str) -> Self {
        Self::new(SymbolKind::Function, class_name)
    }

    /// Create a destructor for the named class.
    pub fn destructor(class_name: &str) -> Self {
        Self::new(SymbolKind::Function, format!("~{class_name}"))
    }

    /// Create a variable (data member) symbol.
    pub fn variable(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(SymbolKind::Variable, name).with_type(ty)
    }

    /// Create an enum symbol.
    pub fn enumeration(name: impl Into<String>, enumerators: Vec<Enumerator>) -> Self {
        let mut symbol = Self::new(SymbolKind::Enum, name);
        symbol.enumerators = enumerators;
        symbol
    }

    /// Create a typedef symbol.
    pub fn typedef(name: impl Into<String>, aliased: impl Into<String>) -> Self {
        Self::new(SymbolKind::Typedef, name).with_type(aliased)
    }

    // === Builder Methods ===

    /// Set the qualified name explicitly.
    pub fn with_qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.qualified_name = qualified_name.into();
        self
    }

    /// Set the type spelling.
    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = ty.into();
        self
    }

    /// Append a parameter.
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Set the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Add declaration flags.
    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Add an attribute tag.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Set the array extent.
    pub fn with_array_extent(mut self, extent: impl Into<String>) -> Self {
        self.array_extent = Some(extent.into());
        self
    }

    // === Queries ===

    /// Check if this symbol is public.
    pub fn is_public(&self) -> bool {
        self.visibility.is_public()
    }

    /// Check if this symbol is a `const` member function.
    pub fn is_const(&self) -> bool {
        self.flags.contains(SymbolFlags::CONST)
    }

    /// Check if this symbol is `static`.
    pub fn is_static(&self) -> bool {
        self.flags.contains(SymbolFlags::STATIC)
    }

    /// Check if this symbol is virtual (including pure virtual).
    pub fn is_virtual(&self) -> bool {
        self.flags
            .intersects(SymbolFlags::VIRTUAL | SymbolFlags::PURE_VIRTUAL)
    }

    /// Check if this symbol is pure virtual.
    pub fn is_pure_virtual(&self) -> bool {
        self.flags.contains(SymbolFlags::PURE_VIRTUAL)
    }

    /// Check if this symbol is a variable with an array extent.
    pub fn is_array(&self) -> bool {
        self.array_extent.is_some()
    }

    /// Check if the attribute tags opt this symbol out of binding.
    pub fn is_opted_out(&self) -> bool {
        self.attributes.iter().any(|a| a == OPT_OUT_TAG)
    }

    /// The explicit registration directive, if present.
    ///
    /// A tag of the form `ascript: asOBJ_REF | asOBJ_NOCOUNT` yields
    /// `asOBJ_REF | asOBJ_NOCOUNT`.
    pub fn directive(&self) -> Option<&str> {
        self.attributes.iter().find_map(|attribute| {
            let rest = attribute.trim().strip_prefix(DIRECTIVE_PREFIX)?;
            let value = rest.trim_start().strip_prefix(':')?.trim();
            (!value.is_empty()).then_some(value)
        })
    }

    /// Check if this member is a constructor of `aggregate`.
    pub fn is_constructor_of(&self, aggregate: &Symbol) -> bool {
        self.kind.is_callable() && self.name == aggregate.name
    }

    /// Check if this member is the destructor of `aggregate`.
    pub fn is_destructor_of(&self, aggregate: &Symbol) -> bool {
        self.kind.is_callable()
            && self
                .name
                .strip_prefix('~')
                .is_some_and(|rest| rest == aggregate.name)
    }

    /// Check if this member is the copy constructor of `aggregate`.
    ///
    /// A copy constructor takes exactly one reference to the aggregate itself.
    pub fn is_copy_constructor_of(&self, aggregate: &Symbol) -> bool {
        if !self.is_constructor_of(aggregate) || self.params.len() != 1 {
            return false;
        }
        let param = &self.params[0];
        let basic = param.basic_type();
        param.ty.contains('&')
            && !param.ty.contains('*')
            && (basic == aggregate.name || basic == aggregate.qualified_name)
    }

    /// Check if this member is the assignment operator.
    pub fn is_assignment_operator(&self) -> bool {
        self.kind.is_callable() && self.name.replace(' ', "") == "operator="
    }

    /// C++ declaration used in diagnostics and exclusion notes,
    /// e.g. `Vec2 Vec2::operator+(const Vec2 &) const`.
    pub fn declaration(&self) -> String {
        let mut out = String::new();
        if !self.ty.is_empty() {
            out.push_str(&self.ty);
            out.push(' ');
        }
        out.push_str(&self.qualified_name);
        if self.kind.is_callable() {
            out.push('(');
            let params: Vec<&str> = self.params.iter().map(|p| p.ty.as_str()).collect();
            out.push_str(&params.join(", "));
            out.push(')');
            if self.is_const() {
                out.push_str(" const");
            }
        } else if let Some(extent) = &self.array_extent {
            out.push_str(extent);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_type_strips_decoration() {
        assert_eq!(basic_type("const Vec2 &"), "Vec2");
        assert_eq!(basic_type("Widget*"), "Widget");
        assert_eq!(basic_type("const unsigned   int"), "unsigned int");
        assert_eq!(basic_type("volatile ns::Foo * const"), "ns::Foo");
    }

    #[test]
    fn direction_markers() {
        let param = Parameter::new("int &").with_doc("[out] receives the count");
        assert!(param.documented_out());
        assert!(!param.documented_in());
    }

    #[test]
    fn directive_parsing() {
        let symbol = Symbol::aggregate("Foo").with_attribute("ascript : asOBJ_REF | asOBJ_NOCOUNT");
        assert_eq!(symbol.directive(), Some("asOBJ_REF | asOBJ_NOCOUNT"));

        let without = Symbol::aggregate("Bar").with_attribute("noascript");
        assert_eq!(without.directive(), None);
        assert!(without.is_opted_out());
    }

    #[test]
    fn special_members() {
        let class = Symbol::aggregate("Vec2");
        let ctor = Symbol::constructor("Vec2");
        let copy = Symbol::constructor("Vec2").with_param(Parameter::new("const Vec2 &"));
        let from_ptr = Symbol::constructor("Vec2").with_param(Parameter::new("const Vec2 *"));
        let dtor = Symbol::destructor("Vec2");
        let assign =
            Symbol::function("operator=", "Vec2 &").with_param(Parameter::new("const Vec2 &"));

        assert!(ctor.is_constructor_of(&class));
        assert!(!ctor.is_copy_constructor_of(&class));
        assert!(copy.is_copy_constructor_of(&class));
        assert!(!from_ptr.is_copy_constructor_of(&class));
        assert!(dtor.is_destructor_of(&class));
        assert!(!dtor.is_constructor_of(&class));
        assert!(assign.is_assignment_operator());
    }

    #[test]
    fn virtual_flags() {
        let pure = Symbol::function("draw", "void").with_flags(SymbolFlags::PURE_VIRTUAL);
        assert!(pure.is_virtual());
        assert!(pure.is_pure_virtual());
        let plain = Symbol::function("draw", "void");
        assert!(!plain.is_virtual());
    }

    #[test]
    fn declaration_text() {
        let method = Symbol::function("length", "float")
            .with_qualified_name("Vec2::length")
            .with_flags(SymbolFlags::CONST);
        assert_eq!(method.declaration(), "float Vec2::length() const");

        let array = Symbol::variable("m", "float")
            .with_qualified_name("Mat::m")
            .with_array_extent("[9]");
        assert_eq!(array.declaration(), "float Mat::m[9]");
    }
}
