//! Registration program emission.
//!
//! The generated header has a fixed layout:
//!
//! 1. calling-convention preamble, switched by
//!    `USE_ANGELSCRIPT_GENERIC_CALL_CONVENTION`
//! 2. trampolines, grouped per requested name in request order
//! 3. the entry point, holding first every type registration in request
//!    order, then every member registration per requested name in member
//!    declaration order
//!
//! Each section is built in its own buffer by a separate pass over the plans
//! and the buffers are joined once at the end. Nothing is reordered or
//! deduplicated.

use std::fmt::Write as _;
use std::io;

use angelscript_core::{Behaviour, CallConvention, GENERIC_CONVENTION_SWITCH, ObjectTypeFlags};

use crate::classify::Semantics;
use crate::context::BindingContext;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::signature::{
    AggregateBinding, BindingPlan, EnumBinding, Exclusion, MemberRegistration, SynthesizedMember,
    TypedefBinding, cpp_params, script_params,
};

const GENERIC_WRAPPERS: &[&str] = &[
    "#define AS_FUNCTION WRAP_FN",
    "#define AS_CONSTRUCTOR(ctorFuncName, className, parameters) WRAP_CON(className, parameters)",
    "#define AS_DESTRUCTOR(className, dtorFunc) WRAP_DES(className)",
    "#define AS_METHOD_FUNCTION_PR WRAP_MFN_PR",
];

const NATIVE_WRAPPERS: &[&str] = &[
    "#define AS_FUNCTION asFUNCTION",
    "#define AS_CONSTRUCTOR(ctorFuncName, className, parameters) asFUNCTION(ctorFuncName)",
    "#define AS_DESTRUCTOR(className, dtorFunc) asFUNCTION(dtorFunc)",
    "#define AS_METHOD_FUNCTION_PR asMETHODPR",
];

/// The generated header, one buffer per section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationProgram {
    entry_point: String,
    preamble: String,
    trampolines: String,
    types: String,
    members: String,
}

impl RegistrationProgram {
    /// Calling-convention preamble.
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Trampoline definitions.
    pub fn trampolines(&self) -> &str {
        &self.trampolines
    }

    /// Type registration lines.
    pub fn type_registrations(&self) -> &str {
        &self.types
    }

    /// Member registration lines.
    pub fn member_registrations(&self) -> &str {
        &self.members
    }

    /// Join the sections into the final header text.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.preamble.len()
                + self.trampolines.len()
                + self.types.len()
                + self.members.len()
                + 128,
        );
        out.push_str(&self.preamble);
        out.push_str(&self.trampolines);
        let _ = write!(
            out,
            "void {}(asIScriptEngine *engine)\n{{\n\tint r;\n\n",
            self.entry_point
        );
        out.push_str(&self.types);
        if !self.members.is_empty() {
            out.push('\n');
            out.push_str(&self.members);
        }
        out.push_str("}\n");
        out
    }

    /// Write the header to `sink` in one call.
    pub fn write_to<W: io::Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(self.render().as_bytes())?;
        sink.flush()
    }
}

/// Builds a [`RegistrationProgram`] from binding plans.
pub struct Emitter<'c, 'a> {
    ctx: &'c BindingContext<'a>,
    program: RegistrationProgram,
}

impl<'c, 'a> Emitter<'c, 'a> {
    pub fn new(ctx: &'c BindingContext<'a>) -> Self {
        let program = RegistrationProgram {
            entry_point: ctx.options().entry_point.clone(),
            preamble: preamble(),
            ..RegistrationProgram::default()
        };
        Self { ctx, program }
    }

    /// Emit every plan. Plans must be in request order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn emit(
        mut self,
        plans: &[BindingPlan],
        diagnostics: &mut Diagnostics,
    ) -> RegistrationProgram {
        for plan in plans {
            if let BindingPlan::Aggregate(binding) = plan {
                for trampoline in &binding.trampolines {
                    self.program.trampolines.push_str(&trampoline.render());
                }
            }
        }
        for plan in plans {
            self.type_registration(plan, diagnostics);
        }
        for plan in plans {
            let block = match plan {
                BindingPlan::Aggregate(binding) => aggregate_members(binding),
                BindingPlan::Enum(binding) => enum_values(binding),
                BindingPlan::Typedef(_) => String::new(),
            };
            if block.is_empty() {
                continue;
            }
            if !self.program.members.is_empty() {
                self.program.members.push('\n');
            }
            self.program.members.push_str(&block);
        }
        self.program
    }

    fn type_registration(&mut self, plan: &BindingPlan, diagnostics: &mut Diagnostics) {
        let out = &mut self.program.types;
        match plan {
            BindingPlan::Aggregate(binding) => {
                let flags = object_flags(self.ctx, binding, diagnostics);
                let size = match binding.semantics {
                    Semantics::Value => format!("sizeof({})", binding.cpp_name),
                    Semantics::Reference => "0".to_string(),
                };
                let _ = writeln!(
                    out,
                    "\tr = engine->RegisterObjectType(\"{}\", {size}, {flags}); assert(r >= 0);",
                    binding.script_name
                );
            }
            BindingPlan::Enum(binding) => {
                let _ = writeln!(
                    out,
                    "\tr = engine->RegisterEnum(\"{}\"); assert(r >= 0);",
                    binding.script_name
                );
            }
            BindingPlan::Typedef(TypedefBinding {
                script_name,
                aliased,
            }) => match aliased {
                Ok(aliased) => {
                    let _ = writeln!(
                        out,
                        "\tr = engine->RegisterTypedef(\"{script_name}\", \"{aliased}\"); \
                         assert(r >= 0);"
                    );
                }
                Err(exclusion) => skipped(out, exclusion),
            },
        }
    }
}

/// `RegisterObjectType` flags for an aggregate.
///
/// An `ascript:` directive is used as written. Otherwise value types get
/// `asOBJ_VALUE | asOBJ_POD | asOBJ_APP_CLASS` plus one `APP_CLASS_*` flag per
/// special member they declare, and reference types get
/// `asOBJ_REF | asOBJ_NOCOUNT`.
pub fn object_flags(
    ctx: &BindingContext<'_>,
    binding: &AggregateBinding,
    diagnostics: &mut Diagnostics,
) -> String {
    let table = ctx.table();
    if let Some(directive) = table.get(binding.id).directive() {
        match ObjectTypeFlags::parse(directive) {
            Ok(flags) if !flags.is_ref() && !flags.is_value() => {
                diagnostics.push(Diagnostic::invalid_directive(
                    &binding.cpp_name,
                    directive,
                    "it names neither asOBJ_REF nor asOBJ_VALUE",
                ));
            }
            Ok(_) => {}
            Err(err) => {
                diagnostics.push(Diagnostic::invalid_directive(&binding.cpp_name, directive, err));
            }
        }
        return directive.to_string();
    }

    let flags = match binding.semantics {
        Semantics::Reference => ObjectTypeFlags::DEFAULT_REF,
        Semantics::Value => {
            let mut flags = ObjectTypeFlags::DEFAULT_VALUE | ObjectTypeFlags::APP_CLASS;
            flags.set(
                ObjectTypeFlags::APP_CLASS_CONSTRUCTOR,
                table.constructors(binding.id).next().is_some(),
            );
            flags.set(
                ObjectTypeFlags::APP_CLASS_DESTRUCTOR,
                table.destructor(binding.id).is_some(),
            );
            flags.set(
                ObjectTypeFlags::APP_CLASS_ASSIGNMENT,
                table.assignment_operator(binding.id).is_some(),
            );
            flags.set(
                ObjectTypeFlags::APP_CLASS_COPY_CONSTRUCTOR,
                table.copy_constructor(binding.id).is_some(),
            );
            flags
        }
    };
    flags.to_string()
}

fn aggregate_members(binding: &AggregateBinding) -> String {
    let class = &binding.script_name;
    let cpp = &binding.cpp_name;
    let mut out = String::new();

    for member in &binding.members {
        let registration = match member {
            SynthesizedMember::Excluded(exclusion) => {
                skipped(&mut out, exclusion);
                continue;
            }
            SynthesizedMember::Registered(registration) => registration,
        };
        let call = match registration {
            MemberRegistration::Constructor { params, trampoline } => format!(
                "RegisterObjectBehaviour(\"{class}\", {}, \"void f({})\", \
                 AS_CONSTRUCTOR({trampoline}, {cpp}, ({})), {})",
                Behaviour::Construct,
                script_params(params),
                cpp_params(params),
                CallConvention::Constructor,
            ),
            MemberRegistration::Factory { params, trampoline } => format!(
                "RegisterObjectBehaviour(\"{class}\", {}, \"{class}@ f({})\", \
                 AS_FUNCTION({trampoline}), {})",
                Behaviour::Factory,
                script_params(params),
                CallConvention::Function,
            ),
            MemberRegistration::Destructor { trampoline } => format!(
                "RegisterObjectBehaviour(\"{class}\", {}, \"void f()\", \
                 AS_DESTRUCTOR({cpp}, {trampoline}), {})",
                Behaviour::Destruct,
                CallConvention::Constructor,
            ),
            MemberRegistration::Method(method) => format!(
                "RegisterObjectMethod(\"{class}\", \"{}\", \
                 AS_METHOD_FUNCTION_PR({cpp}, {}, ({}){}, {}), {})",
                method.declaration(),
                method.cpp_name,
                method.cpp_params(),
                if method.is_const { " const" } else { "" },
                method.return_type.cpp,
                CallConvention::Member,
            ),
            MemberRegistration::Property { ty, name } => format!(
                "RegisterObjectProperty(\"{class}\", \"{} {name}\", asOFFSET({cpp}, {name}))",
                ty.script,
            ),
        };
        let _ = writeln!(out, "\tr = engine->{call}; assert(r >= 0);");
    }
    out
}

fn enum_values(binding: &EnumBinding) -> String {
    let mut out = String::new();
    for enumerator in &binding.enumerators {
        let value = match enumerator.value {
            Some(value) => value.to_string(),
            None => format!("(int){}::{}", binding.cpp_name, enumerator.name),
        };
        let _ = writeln!(
            out,
            "\tr = engine->RegisterEnumValue(\"{}\", \"{}\", {value}); assert(r >= 0);",
            binding.script_name, enumerator.name
        );
    }
    out
}

fn skipped(out: &mut String, exclusion: &Exclusion) {
    let _ = writeln!(out, "\t// skipped {}: {}", exclusion.declaration, exclusion.reason);
}

fn preamble() -> String {
    let mut out = String::from(
        "#pragma once\n\
         #include <angelscript.h>\n\
         #include <cassert>\n\
         #include <new>\n\n",
    );
    let _ = writeln!(
        out,
        "// Define {GENERIC_CONVENTION_SWITCH} before including this file to register\n\
         // everything through the generic calling convention. That path needs the\n\
         // wrappers from <autowrapper/aswrappedcall.h>.\n\
         #if defined({GENERIC_CONVENTION_SWITCH})\n"
    );
    for convention in CallConvention::ALL {
        let _ = writeln!(out, "#define {} {}", convention.macro_name(), convention.generic());
    }
    for line in GENERIC_WRAPPERS {
        let _ = writeln!(out, "{line}");
    }
    out.push_str("\n#else\n\n");
    for convention in CallConvention::ALL {
        let _ = writeln!(out, "#define {} {}", convention.macro_name(), convention.native());
    }
    for line in NATIVE_WRAPPERS {
        let _ = writeln!(out, "{line}");
    }
    out.push_str("\n#endif\n\n");
    out
}
