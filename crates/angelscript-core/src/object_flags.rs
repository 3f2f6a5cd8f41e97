//! Object type flags passed to `RegisterObjectType`.

use std::fmt;

use bitflags::bitflags;

use crate::FlagParseError;

/// Prefix shared by every flag constant in the C++ API.
const FLAG_PREFIX: &str = "asOBJ_";

bitflags! {
    /// Flags that control object type registration and behavior.
    ///
    /// These flags specify how AngelScript should handle objects of a particular type,
    /// including memory management and which native special members exist.
    ///
    /// Single-bit flags come first and the `APP_CLASS_*` shorthands after them,
    /// so rendering a set back to C++ spells out each single flag once, in bit
    /// order. Bit positions are local to this crate; the generated header only
    /// ever names the constants.
    ///
    /// # Common Combinations
    ///
    /// ```
    /// use angelscript_core::ObjectTypeFlags;
    ///
    /// // Reference type whose lifetime the application manages
    /// let no_count = ObjectTypeFlags::REF | ObjectTypeFlags::NOCOUNT;
    /// assert_eq!(no_count.to_string(), "asOBJ_REF | asOBJ_NOCOUNT");
    ///
    /// // Value type (POD - Plain Old Data)
    /// let value_pod = ObjectTypeFlags::VALUE | ObjectTypeFlags::POD;
    /// assert!(value_pod.is_value());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ObjectTypeFlags: u64 {
        /// Reference type (allocated on heap).
        const REF = 1 << 0;
        /// Value type (allocated on stack or embedded).
        const VALUE = 1 << 1;
        /// Participates in garbage collection.
        const GC = 1 << 2;
        /// Plain Old Data (no constructor/destructor needed).
        const POD = 1 << 3;
        /// Cannot be used as handle type.
        const NOHANDLE = 1 << 4;
        /// Scoped reference (automatically released).
        const SCOPED = 1 << 5;
        /// Template type.
        const TEMPLATE = 1 << 6;
        /// Use as handle type.
        const ASHANDLE = 1 << 7;
        /// Application class.
        const APP_CLASS = 1 << 8;
        /// Has constructor.
        const APP_CLASS_CONSTRUCTOR = 1 << 9;
        /// Has destructor.
        const APP_CLASS_DESTRUCTOR = 1 << 10;
        /// Has assignment operator.
        const APP_CLASS_ASSIGNMENT = 1 << 11;
        /// Has copy constructor.
        const APP_CLASS_COPY_CONSTRUCTOR = 1 << 12;
        /// Application primitive type.
        const APP_PRIMITIVE = 1 << 13;
        /// Application floating point type.
        const APP_FLOAT = 1 << 14;
        /// Application array type.
        const APP_ARRAY = 1 << 15;
        /// All integer types.
        const APP_CLASS_ALLINTS = 1 << 16;
        /// All floating point types.
        const APP_CLASS_ALLFLOATS = 1 << 17;
        /// No reference counting.
        const NOCOUNT = 1 << 18;
        /// Requires 8-byte alignment.
        const APP_CLASS_ALIGN8 = 1 << 19;
        /// Implicit handle.
        const IMPLICIT_HANDLE = 1 << 20;
        /// Union type.
        const APP_CLASS_UNION = 1 << 21;
        /// Script object.
        const SCRIPT_OBJECT = 1 << 22;
        /// Shared between modules.
        const SHARED = 1 << 23;
        /// Cannot be inherited.
        const NOINHERIT = 1 << 24;
        /// Function definition.
        const FUNCDEF = 1 << 25;
        /// List pattern.
        const LIST_PATTERN = 1 << 26;
        /// Enumeration.
        const ENUM = 1 << 27;
        /// Template subtype.
        const TEMPLATE_SUBTYPE = 1 << 28;
        /// Type definition.
        const TYPEDEF = 1 << 29;
        /// Abstract class.
        const ABSTRACT = 1 << 30;
        /// Requires 16-byte alignment.
        const APP_ALIGN16 = 1 << 31;
        /// Has additional constructors.
        const APP_CLASS_MORE_CONSTRUCTORS = 1 << 32;

        /// Constructor only.
        const APP_CLASS_C = Self::APP_CLASS.bits() | Self::APP_CLASS_CONSTRUCTOR.bits();
        /// Constructor and destructor.
        const APP_CLASS_CD = Self::APP_CLASS_C.bits() | Self::APP_CLASS_DESTRUCTOR.bits();
        /// Constructor and assignment.
        const APP_CLASS_CA = Self::APP_CLASS_C.bits() | Self::APP_CLASS_ASSIGNMENT.bits();
        /// Constructor and copy constructor.
        const APP_CLASS_CK = Self::APP_CLASS_C.bits() | Self::APP_CLASS_COPY_CONSTRUCTOR.bits();
        /// Constructor, destructor, and assignment.
        const APP_CLASS_CDA = Self::APP_CLASS_CD.bits() | Self::APP_CLASS_ASSIGNMENT.bits();
        /// Constructor, destructor, and copy constructor.
        const APP_CLASS_CDK = Self::APP_CLASS_CD.bits() | Self::APP_CLASS_COPY_CONSTRUCTOR.bits();
        /// Constructor, assignment, and copy constructor.
        const APP_CLASS_CAK = Self::APP_CLASS_CA.bits() | Self::APP_CLASS_COPY_CONSTRUCTOR.bits();
        /// All: constructor, destructor, assignment, and copy constructor.
        const APP_CLASS_CDAK = Self::APP_CLASS_CDA.bits() | Self::APP_CLASS_COPY_CONSTRUCTOR.bits();
        /// Destructor only.
        const APP_CLASS_D = Self::APP_CLASS.bits() | Self::APP_CLASS_DESTRUCTOR.bits();
        /// Destructor and assignment.
        const APP_CLASS_DA = Self::APP_CLASS_D.bits() | Self::APP_CLASS_ASSIGNMENT.bits();
        /// Destructor and copy constructor.
        const APP_CLASS_DK = Self::APP_CLASS_D.bits() | Self::APP_CLASS_COPY_CONSTRUCTOR.bits();
        /// Destructor, assignment, and copy constructor.
        const APP_CLASS_DAK = Self::APP_CLASS_DA.bits() | Self::APP_CLASS_COPY_CONSTRUCTOR.bits();
        /// Assignment only.
        const APP_CLASS_A = Self::APP_CLASS.bits() | Self::APP_CLASS_ASSIGNMENT.bits();
        /// Assignment and copy constructor.
        const APP_CLASS_AK = Self::APP_CLASS_A.bits() | Self::APP_CLASS_COPY_CONSTRUCTOR.bits();
        /// Copy constructor only.
        const APP_CLASS_K = Self::APP_CLASS.bits() | Self::APP_CLASS_COPY_CONSTRUCTOR.bits();
    }
}

impl ObjectTypeFlags {
    /// Default flags for a value type without an explicit directive.
    pub const DEFAULT_VALUE: Self = Self::VALUE.union(Self::POD);

    /// Default flags for a reference type without an explicit directive.
    ///
    /// The generated header never registers reference counting behaviours, so
    /// reference types are registered as application-managed.
    pub const DEFAULT_REF: Self = Self::REF.union(Self::NOCOUNT);

    /// Parse a C++ flag expression such as `asOBJ_REF | asOBJ_NOCOUNT`.
    ///
    /// The `asOBJ_` prefix is optional on each term.
    pub fn parse(expr: &str) -> Result<Self, FlagParseError> {
        let mut flags = Self::empty();
        for term in terms(expr) {
            flags |= Self::from_term(term)
                .ok_or_else(|| FlagParseError::UnknownFlag(term.to_string()))?;
        }
        if flags.is_empty() {
            return Err(FlagParseError::Empty);
        }
        Ok(flags)
    }

    /// Union of the terms of `expr` that name a flag, ignoring the rest.
    ///
    /// ```
    /// use angelscript_core::ObjectTypeFlags;
    ///
    /// let flags = ObjectTypeFlags::parse_known("asOBJ_REF | asOBJ_CUSTOM");
    /// assert_eq!(flags, ObjectTypeFlags::REF);
    /// ```
    pub fn parse_known(expr: &str) -> Self {
        terms(expr)
            .filter_map(Self::from_term)
            .fold(Self::empty(), |flags, flag| flags | flag)
    }

    /// Look up one term such as `asOBJ_APP_CLASS_CDAK`. The `asOBJ_` prefix
    /// is optional.
    pub fn from_term(term: &str) -> Option<Self> {
        let term = term.trim();
        Self::from_name(term.strip_prefix(FLAG_PREFIX).unwrap_or(term))
    }

    /// Check if the value bit is set.
    pub const fn is_value(self) -> bool {
        self.contains(Self::VALUE)
    }

    /// Check if the reference bit is set.
    pub const fn is_ref(self) -> bool {
        self.contains(Self::REF)
    }
}

fn terms(expr: &str) -> impl Iterator<Item = &str> {
    expr.split('|').map(str::trim).filter(|t| !t.is_empty())
}

impl fmt::Display for ObjectTypeFlags {
    /// Render as a C++ expression, e.g. `asOBJ_VALUE | asOBJ_POD`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{FLAG_PREFIX}{name}")?;
        }
        Ok(())
    }
}
