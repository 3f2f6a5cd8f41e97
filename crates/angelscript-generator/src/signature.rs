//! Per-member registration signatures.
//!
//! Every public member of a requested aggregate ends up either as a
//! [`MemberRegistration`] or as an [`Exclusion`] carrying a readable reason.
//! Nothing is dropped silently. Checks run in a fixed order and the first
//! failing one names the reason:
//!
//! 1. `[noascript]` opt-out
//! 2. operator policy ([`OperatorClass`])
//! 3. static members, signals and nested types
//! 4. constructors of abstract aggregates, destructors of reference types
//! 5. return, property and parameter types
//! 6. reference parameter directions
//! 7. parameter count
//!
//! Types are normalized and looked up in the known type set. A type that
//! does not resolve gets one retry: its basic name is resolved from the
//! member's scope, a typedef is replaced by its aliased spelling and any
//! other type by its qualified name. The retried spelling is also what the
//! generated C++ uses, since the header lives at global scope.

use angelscript_core::{PrimitiveKind, RefModifier};
use angelscript_symbols::{Enumerator, Symbol, SymbolFlags, SymbolId, SymbolKind};
use thiserror::Error;

use crate::classify::Semantics;
use crate::context::BindingContext;
use crate::names::{OperatorClass, classify_operator, map_member_name};
use crate::normalize::{Indirection, NormalizeError, TypeSpelling};
use crate::trampoline::{self, Trampoline};

/// Why a member or type was not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExclusionReason {
    #[error("opted out with [noascript]")]
    OptedOut,

    #[error("operator != is re-derivable from opEquals")]
    Inequality,

    #[error("operators <, <=, > and >= are re-derivable from opCmp")]
    Relational,

    #[error("increment and decrement operators are not supported")]
    StepOperator,

    #[error("index operators are not supported")]
    IndexOperator,

    #[error("implicit conversion operators are not supported")]
    ImplicitConversion,

    #[error("'{0}' has no script operator name")]
    UnmappedOperator(String),

    #[error("static members are not supported")]
    Static,

    #[error("signals cannot be registered")]
    Signal,

    #[error("nested types are registered by requesting their qualified name")]
    NestedType,

    #[error("abstract classes cannot be constructed")]
    AbstractConstructor,

    #[error("reference types are destroyed by the engine")]
    ReferenceDestructor,

    #[error("array members cannot be registered as properties")]
    ArrayProperty,

    #[error(transparent)]
    Unrepresentable(#[from] NormalizeError),

    #[error("raw pointer '{0}' cannot be registered")]
    RawPointer(String),

    #[error("{0} is not known to angelscript")]
    UnknownType(String),

    #[error("ambiguous direction for parameter {index} ('{ty}'); document it [in] or [out]")]
    AmbiguousDirection { index: usize, ty: String },

    #[error("{count} parameters exceed the limit of {max}")]
    TooManyParameters { count: usize, max: usize },

    #[error("typedef of '{0}' is not a primitive type")]
    NonPrimitiveTypedef(String),
}

/// A member left out of the registration program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// C++ declaration of the member.
    pub declaration: String,
    pub reason: ExclusionReason,
}

/// A resolved type: its script form and the C++ spelling to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub script: TypeSpelling,
    pub cpp: String,
}

/// A parameter ready for registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSignature {
    pub ty: ResolvedType,
    pub direction: RefModifier,
}

impl ParamSignature {
    /// Script declaration, e.g. `const Vec2 &in`.
    pub fn declaration(&self) -> String {
        self.ty.script.declaration(self.direction)
    }
}

/// A method ready for registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    /// Script name, e.g. `opAdd`.
    pub name: String,
    /// Native name, e.g. `operator+`.
    pub cpp_name: String,
    pub return_type: ResolvedType,
    pub params: Vec<ParamSignature>,
    pub is_const: bool,
}

impl MethodSignature {
    /// Script declaration, e.g. `Vec2 opAdd(const Vec2 &in) const`.
    pub fn declaration(&self) -> String {
        let mut out = format!(
            "{} {}({})",
            self.return_type.script,
            self.name,
            script_params(&self.params)
        );
        if self.is_const {
            out.push_str(" const");
        }
        out
    }

    /// Native parameter list without parentheses, e.g. `const Vec2 &, float`.
    pub fn cpp_params(&self) -> String {
        cpp_params(&self.params)
    }
}

/// Script parameter list without parentheses.
pub fn script_params(params: &[ParamSignature]) -> String {
    params
        .iter()
        .map(ParamSignature::declaration)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Native parameter list without parentheses.
pub fn cpp_params(params: &[ParamSignature]) -> String {
    params
        .iter()
        .map(|p| p.ty.cpp.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A registration call for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRegistration {
    /// `asBEHAVE_CONSTRUCT` on a value type.
    Constructor {
        params: Vec<ParamSignature>,
        trampoline: String,
    },
    /// `asBEHAVE_FACTORY` on a reference type.
    Factory {
        params: Vec<ParamSignature>,
        trampoline: String,
    },
    /// `asBEHAVE_DESTRUCT` on a value type.
    Destructor { trampoline: String },
    Method(MethodSignature),
    Property { ty: ResolvedType, name: String },
}

/// Outcome for one public member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesizedMember {
    Registered(MemberRegistration),
    Excluded(Exclusion),
}

impl SynthesizedMember {
    /// Check if the member was excluded.
    pub fn is_excluded(&self) -> bool {
        matches!(self, SynthesizedMember::Excluded(_))
    }
}

/// Everything needed to bind one aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateBinding {
    pub id: SymbolId,
    /// Script type name, e.g. `math_Vec2`.
    pub script_name: String,
    /// Native type name, e.g. `math::Vec2`.
    pub cpp_name: String,
    pub semantics: Semantics,
    pub trampolines: Vec<Trampoline>,
    pub members: Vec<SynthesizedMember>,
}

/// Everything needed to bind one enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumBinding {
    pub script_name: String,
    pub cpp_name: String,
    pub enumerators: Vec<Enumerator>,
}

/// Everything needed to bind one typedef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefBinding {
    pub script_name: String,
    /// Aliased primitive, or why it cannot be registered.
    pub aliased: Result<String, Exclusion>,
}

/// Synthesis result for one requested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingPlan {
    Aggregate(AggregateBinding),
    Enum(EnumBinding),
    Typedef(TypedefBinding),
}

impl BindingPlan {
    /// Script type name this plan registers.
    pub fn script_name(&self) -> &str {
        match self {
            BindingPlan::Aggregate(binding) => &binding.script_name,
            BindingPlan::Enum(binding) => &binding.script_name,
            BindingPlan::Typedef(binding) => &binding.script_name,
        }
    }
}

/// Synthesizes bindings against a frozen [`BindingContext`].
pub struct Synthesizer<'c, 'a> {
    ctx: &'c BindingContext<'a>,
}

impl<'c, 'a> Synthesizer<'c, 'a> {
    pub fn new(ctx: &'c BindingContext<'a>) -> Self {
        Self { ctx }
    }

    /// Build the binding plan for a type symbol.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn plan(&self, id: SymbolId) -> BindingPlan {
        let symbol = self.ctx.table().get(id);
        let script_name = self.ctx.script_name(&symbol.qualified_name);
        match symbol.kind {
            SymbolKind::Enum => BindingPlan::Enum(EnumBinding {
                script_name,
                cpp_name: symbol.qualified_name.clone(),
                enumerators: symbol.enumerators.clone(),
            }),
            SymbolKind::Typedef => BindingPlan::Typedef(TypedefBinding {
                script_name,
                aliased: self.typedef_target(symbol),
            }),
            _ => BindingPlan::Aggregate(self.aggregate(id)),
        }
    }

    /// Bind an aggregate: trampolines plus one entry per public member, in
    /// declaration order.
    pub fn aggregate(&self, id: SymbolId) -> AggregateBinding {
        let table = self.ctx.table();
        let aggregate = table.get(id);
        let semantics = self
            .ctx
            .classifications()
            .semantics(id)
            .unwrap_or(Semantics::Reference);

        let members = table
            .members(id)
            .filter(|member| member.is_public())
            .map(|member| match self.member(aggregate, semantics, member) {
                Ok(registration) => SynthesizedMember::Registered(registration),
                Err(reason) => SynthesizedMember::Excluded(Exclusion {
                    declaration: member.declaration(),
                    reason,
                }),
            })
            .collect();

        AggregateBinding {
            id,
            script_name: self.ctx.script_name(&aggregate.qualified_name),
            cpp_name: aggregate.qualified_name.clone(),
            semantics,
            trampolines: trampoline::trampolines_for(self.ctx, id),
            members,
        }
    }

    fn member(
        &self,
        aggregate: &Symbol,
        semantics: Semantics,
        member: &Symbol,
    ) -> Result<MemberRegistration, ExclusionReason> {
        if member.is_opted_out() {
            return Err(ExclusionReason::OptedOut);
        }
        match member.kind {
            SymbolKind::Variable => self.property(aggregate, member),
            SymbolKind::Function | SymbolKind::Slot => self.callable(aggregate, semantics, member),
            SymbolKind::Signal => Err(ExclusionReason::Signal),
            SymbolKind::Aggregate | SymbolKind::Enum | SymbolKind::Typedef => {
                Err(ExclusionReason::NestedType)
            }
        }
    }

    fn property(
        &self,
        aggregate: &Symbol,
        member: &Symbol,
    ) -> Result<MemberRegistration, ExclusionReason> {
        if member.is_static() {
            return Err(ExclusionReason::Static);
        }
        if member.is_array() {
            return Err(ExclusionReason::ArrayProperty);
        }
        let ty = self.resolve(&member.ty, &aggregate.qualified_name)?;
        Ok(MemberRegistration::Property {
            ty,
            name: member.name.clone(),
        })
    }

    fn callable(
        &self,
        aggregate: &Symbol,
        semantics: Semantics,
        member: &Symbol,
    ) -> Result<MemberRegistration, ExclusionReason> {
        operator_policy(member)?;
        if member.is_static() {
            return Err(ExclusionReason::Static);
        }

        let scope = &aggregate.qualified_name;
        let ident = self.ctx.script_name(scope);

        if member.is_constructor_of(aggregate) {
            if aggregate.flags.contains(SymbolFlags::ABSTRACT) {
                return Err(ExclusionReason::AbstractConstructor);
            }
            let params = self.params(member, scope)?;
            let declared: Vec<&str> = member.params.iter().map(|p| p.ty.as_str()).collect();
            let trampoline = trampoline::constructor_name(&ident, semantics, &declared);
            return Ok(match semantics {
                Semantics::Value => MemberRegistration::Constructor { params, trampoline },
                Semantics::Reference => MemberRegistration::Factory { params, trampoline },
            });
        }

        if member.is_destructor_of(aggregate) {
            return match semantics {
                Semantics::Value => Ok(MemberRegistration::Destructor {
                    trampoline: trampoline::destructor_name(&ident),
                }),
                Semantics::Reference => Err(ExclusionReason::ReferenceDestructor),
            };
        }

        let return_type = self.resolve(&member.ty, scope)?;
        let params = self.params(member, scope)?;
        Ok(MemberRegistration::Method(MethodSignature {
            name: map_member_name(&member.name, member.params.len()).to_string(),
            cpp_name: member.name.clone(),
            return_type,
            params,
            is_const: member.is_const(),
        }))
    }

    /// Resolve parameter types, then directions, then the count limit.
    fn params(&self, member: &Symbol, scope: &str) -> Result<Vec<ParamSignature>, ExclusionReason> {
        let types = member
            .params
            .iter()
            .map(|param| self.resolve(&param.ty, scope))
            .collect::<Result<Vec<_>, _>>()?;

        let mut params = Vec::with_capacity(types.len());
        for (index, (ty, param)) in types.into_iter().zip(&member.params).enumerate() {
            let direction = if !ty.script.is_reference {
                RefModifier::None
            } else if ty.script.is_const || param.documented_in() {
                RefModifier::In
            } else if param.documented_out() {
                RefModifier::Out
            } else {
                return Err(ExclusionReason::AmbiguousDirection {
                    index: index + 1,
                    ty: param.ty.clone(),
                });
            };
            params.push(ParamSignature { ty, direction });
        }

        let max = self.ctx.options().max_params;
        if params.len() > max {
            return Err(ExclusionReason::TooManyParameters {
                count: params.len(),
                max,
            });
        }
        Ok(params)
    }

    /// Normalize a spelling and check it against the known type set, with
    /// one scope/typedef retry.
    pub fn resolve(&self, spelling: &str, scope: &str) -> Result<ResolvedType, ExclusionReason> {
        let normalizer = self.ctx.normalizer();
        let known = self.ctx.known_types();

        let first = normalizer.normalize(spelling)?;
        if known.is_representable(&first) {
            return Ok(ResolvedType {
                script: first,
                cpp: spelling.to_string(),
            });
        }

        let (script, cpp) = match self.ctx.respell(spelling, scope, true) {
            Some(respelled) => (normalizer.normalize(&respelled)?, respelled),
            None => (first, spelling.to_string()),
        };
        if known.is_representable(&script) {
            return Ok(ResolvedType { script, cpp });
        }
        if script.is_pointer() && known.contains(&script.base) {
            return Err(ExclusionReason::RawPointer(cpp));
        }
        Err(ExclusionReason::UnknownType(script.to_string()))
    }

    fn typedef_target(&self, typedef: &Symbol) -> Result<String, Exclusion> {
        let scope = typedef
            .qualified_name
            .rsplit_once("::")
            .map_or("", |(outer, _)| outer);
        let exclude = |reason: ExclusionReason| Exclusion {
            declaration: format!("typedef {} {}", typedef.ty, typedef.qualified_name),
            reason,
        };

        let normalizer = self.ctx.normalizer();
        let mut target = normalizer.normalize(&typedef.ty).map_err(|e| exclude(e.into()))?;
        if let Some(respelled) = self.ctx.respell(&typedef.ty, scope, true) {
            target = normalizer.normalize(&respelled).map_err(|e| exclude(e.into()))?;
        }

        let is_primitive = target.indirection == Indirection::None
            && !target.is_reference
            && target.base != "void"
            && PrimitiveKind::from_name(&target.base).is_some();
        if is_primitive {
            Ok(target.base)
        } else {
            Err(exclude(ExclusionReason::NonPrimitiveTypedef(target.to_string())))
        }
    }
}

/// Exclusions that follow from the operator alone.
fn operator_policy(member: &Symbol) -> Result<(), ExclusionReason> {
    match classify_operator(&member.name, member.params.len()) {
        None | Some(OperatorClass::Mapped(_)) => Ok(()),
        Some(OperatorClass::Inequality) => Err(ExclusionReason::Inequality),
        Some(OperatorClass::Relational) => Err(ExclusionReason::Relational),
        Some(OperatorClass::Step(_)) => Err(ExclusionReason::StepOperator),
        Some(OperatorClass::Index) => Err(ExclusionReason::IndexOperator),
        Some(OperatorClass::ImplicitConversion) => Err(ExclusionReason::ImplicitConversion),
        Some(OperatorClass::Unmapped) => {
            Err(ExclusionReason::UnmappedOperator(member.name.clone()))
        }
    }
}
