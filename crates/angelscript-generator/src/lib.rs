//! AngelScript binding synthesis.
//!
//! Turns a frozen [`SymbolTable`] and an ordered list of requested type names
//! into a C++ header that registers those types with an AngelScript engine.
//!
//! # Pipeline
//!
//! ```text
//! SymbolTable ─┐
//!              ├─> BindingContext ──> Synthesizer ──> Emitter ──> RegistrationProgram
//! requested  ──┘   (known types,       (plans per      (ordered
//!                   classifications)    requested name)  sections)
//! ```
//!
//! Each stage finishes before the next starts. The context is built once and
//! only read afterwards.
//!
//! # Example
//!
//! ```
//! use angelscript_generator::{GeneratorOptions, generate};
//! use angelscript_symbols::{Symbol, SymbolTableBuilder};
//!
//! let mut builder = SymbolTableBuilder::new();
//! let vec2 = builder.add_root(Symbol::aggregate("Vec2"));
//! builder.add_child(vec2, Symbol::variable("x", "float"));
//! let table = builder.build();
//!
//! let generated = generate(&table, &["Vec2", "Missing"], &GeneratorOptions::default());
//! let header = generated.program.render();
//! assert!(header.contains("RegisterObjectProperty(\"Vec2\", \"float x\", asOFFSET(Vec2, x))"));
//! assert_eq!(generated.diagnostics.len(), 1);
//! ```

pub mod classify;
pub mod context;
pub mod diagnostics;
pub mod emit;
pub mod known_types;
pub mod names;
pub mod normalize;
mod options;
pub mod signature;
pub mod trampoline;

use angelscript_symbols::SymbolTable;

pub use classify::{Classification, Classifications, Semantics, classify};
pub use context::BindingContext;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use emit::{Emitter, RegistrationProgram};
pub use known_types::{KnownTypeSet, KnownTypeSetBuilder};
pub use normalize::{HandleLookup, NormalizeError, Normalizer, TypeSpelling};
pub use options::{DEFAULT_ENTRY_POINT, DEFAULT_MAX_PARAMS, GeneratorOptions, IntNaming};
pub use signature::{BindingPlan, Exclusion, ExclusionReason, SynthesizedMember, Synthesizer};

/// Counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Names requested.
    pub requested: usize,
    /// Requested names found in the symbol table.
    pub bound: usize,
    /// Member and enum value registrations emitted.
    pub registered: usize,
    /// Members and typedefs left out, each with a placeholder comment.
    pub excluded: usize,
    /// Trampolines emitted.
    pub trampolines: usize,
}

/// Output of [`generate`].
#[derive(Debug)]
pub struct Generated {
    pub program: RegistrationProgram,
    pub diagnostics: Diagnostics,
    pub report: Report,
    /// Per-name plans, in request order, for callers that want the details.
    pub plans: Vec<BindingPlan>,
}

/// Generate the registration program for `requested` names.
///
/// Names that are not in the table produce a diagnostic and no output;
/// the remaining names are still processed.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn generate<S: AsRef<str>>(
    table: &SymbolTable,
    requested: &[S],
    options: &GeneratorOptions,
) -> Generated {
    let ctx = BindingContext::new(table, requested, options);
    let synthesizer = Synthesizer::new(&ctx);
    let mut diagnostics = Diagnostics::new();

    let mut plans = Vec::with_capacity(requested.len());
    for name in requested {
        let name = name.as_ref();
        match table.lookup(name) {
            Some(id) => plans.push(synthesizer.plan(id)),
            None => {
                tracing::warn!(name, "requested name not found");
                diagnostics.push(Diagnostic::missing_symbol(name));
            }
        }
    }

    let report = report(requested.len(), &plans);
    let program = Emitter::new(&ctx).emit(&plans, &mut diagnostics);
    tracing::info!(
        requested = report.requested,
        bound = report.bound,
        registered = report.registered,
        excluded = report.excluded,
        "generated registration program"
    );

    Generated {
        program,
        diagnostics,
        report,
        plans,
    }
}

fn report(requested: usize, plans: &[BindingPlan]) -> Report {
    let mut report = Report {
        requested,
        bound: plans.len(),
        ..Report::default()
    };
    for plan in plans {
        match plan {
            BindingPlan::Aggregate(binding) => {
                report.trampolines += binding.trampolines.len();
                let excluded = binding.members.iter().filter(|m| m.is_excluded()).count();
                report.excluded += excluded;
                report.registered += binding.members.len() - excluded;
            }
            BindingPlan::Enum(binding) => report.registered += binding.enumerators.len(),
            BindingPlan::Typedef(binding) => {
                if binding.aliased.is_err() {
                    report.excluded += 1;
                }
            }
        }
    }
    report
}
