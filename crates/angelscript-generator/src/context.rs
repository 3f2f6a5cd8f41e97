//! Immutable run context shared by every synthesis stage.

use angelscript_symbols::{Symbol, SymbolKind, SymbolTable, basic_type};

use crate::GeneratorOptions;
use crate::classify::Classifications;
use crate::known_types::{KnownTypeSet, KnownTypeSetBuilder};
use crate::normalize::Normalizer;

/// Frozen lookups for one generator run.
///
/// Construction runs the startup phase in order: the known type set is
/// filled from the requested names and frozen, then every aggregate is
/// classified. Nothing in the context changes afterwards.
pub struct BindingContext<'a> {
    table: &'a SymbolTable,
    options: &'a GeneratorOptions,
    known: KnownTypeSet,
    classifications: Classifications,
}

impl<'a> BindingContext<'a> {
    /// Build the context for binding `requested` names out of `table`.
    ///
    /// Requested names that do not resolve are left out of the known type
    /// set; the caller reports them.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn new<S: AsRef<str>>(
        table: &'a SymbolTable,
        requested: &[S],
        options: &'a GeneratorOptions,
    ) -> Self {
        let naming_only = Normalizer::new(options.int_naming, &());
        let mut builder = KnownTypeSetBuilder::with_primitives(options.int_naming);
        for name in requested {
            if let Some(symbol) = table.lookup_symbol(name.as_ref()) {
                builder.insert(naming_only.map_base(&symbol.qualified_name));
            }
        }
        let known = builder.freeze();
        tracing::debug!(known = known.len(), "known type set frozen");

        let classifications = Classifications::compute(table);
        tracing::debug!(aggregates = classifications.len(), "aggregates classified");

        Self {
            table,
            options,
            known,
            classifications,
        }
    }

    /// The symbol table.
    pub fn table(&self) -> &'a SymbolTable {
        self.table
    }

    /// Run options.
    pub fn options(&self) -> &'a GeneratorOptions {
        self.options
    }

    /// The frozen known type set.
    pub fn known_types(&self) -> &KnownTypeSet {
        &self.known
    }

    /// Classification of every aggregate.
    pub fn classifications(&self) -> &Classifications {
        &self.classifications
    }

    /// A normalizer that rewrites pointers to reference-managed classes as
    /// handles.
    pub fn normalizer(&self) -> Normalizer<'_> {
        Normalizer::new(self.options.int_naming, &self.classifications)
    }

    /// Script-side name of a native type name, e.g. `math_Vec2`.
    pub fn script_name(&self, cpp_name: &str) -> String {
        self.normalizer().map_base(cpp_name)
    }

    /// Resolve a type name as the compiler would from inside `scope`,
    /// searching enclosing scopes innermost first.
    ///
    /// ```text
    /// scope = "math::Vec2", name = "Real"
    ///   → math::Vec2::Real, math::Real, Real
    /// ```
    pub fn resolve_in_scope(&self, name: &str, scope: &str) -> Option<&'a Symbol> {
        let mut prefix = scope;
        loop {
            let candidate = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}::{name}")
            };
            if let Some(symbol) = self.table.lookup_symbol(&candidate) {
                return Some(symbol);
            }
            if prefix.is_empty() {
                return None;
            }
            prefix = prefix.rsplit_once("::").map_or("", |(outer, _)| outer);
        }
    }

    /// Rewrite the basic type of `spelling` to the form it needs at global
    /// scope, where the generated code lives.
    ///
    /// A name resolving to a typedef is replaced by the aliased spelling when
    /// `expand_typedefs` is set; other type names are fully qualified.
    /// Returns `None` when nothing resolves or nothing would change.
    pub fn respell(&self, spelling: &str, scope: &str, expand_typedefs: bool) -> Option<String> {
        let basic = basic_type(spelling);
        if basic.is_empty() {
            return None;
        }
        let symbol = self.resolve_in_scope(&basic, scope)?;
        let replacement = match symbol.kind {
            SymbolKind::Typedef if expand_typedefs => symbol.ty.as_str(),
            _ => symbol.qualified_name.as_str(),
        };
        if replacement == basic {
            return None;
        }
        let collapsed = spelling.split_whitespace().collect::<Vec<_>>().join(" ");
        replace_word(&collapsed, &basic, replacement)
    }
}

/// Replace the first occurrence of `word` that is not part of a longer
/// identifier or scoped name.
fn replace_word(haystack: &str, word: &str, replacement: &str) -> Option<String> {
    let is_name_char = |c: char| c.is_alphanumeric() || c == '_' || c == ':';
    let mut start = 0;
    while let Some(found) = haystack[start..].find(word) {
        let at = start + found;
        let end = at + word.len();
        let before_ok = !haystack[..at].chars().next_back().is_some_and(is_name_char);
        let after_ok = !haystack[end..].chars().next().is_some_and(is_name_char);
        if before_ok && after_ok {
            return Some(format!("{}{}{}", &haystack[..at], replacement, &haystack[end..]));
        }
        start = end;
    }
    None
}
