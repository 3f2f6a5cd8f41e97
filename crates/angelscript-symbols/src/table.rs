//! Frozen symbol table and its builder.
//!
//! # Storage Model
//!
//! - **Symbols**: one arena (`Vec<Symbol>`) indexed by [`SymbolId`]. Children
//!   are ids in declaration order; the parent link is an id as well.
//! - **Roots**: top-level symbols in the order they were added.
//! - **Name index**: qualified name → id for type-like symbols (aggregates,
//!   enums, typedefs). When two type symbols share a qualified name, the first
//!   one added wins.
//!
//! The builder is the only way to mutate a table. [`SymbolTableBuilder::build`]
//! consumes it and returns a [`SymbolTable`] with lookups only.

use rustc_hash::FxHashMap;

use crate::{Symbol, SymbolId};

/// Populates a [`SymbolTable`].
///
/// # Example
///
/// ```
/// use angelscript_symbols::{Parameter, Symbol, SymbolTableBuilder};
///
/// let mut builder = SymbolTableBuilder::new();
/// let vec2 = builder.add_root(Symbol::aggregate("Vec2"));
/// builder.add_child(vec2, Symbol::constructor("Vec2"));
/// builder.add_child(vec2, Symbol::variable("x", "float"));
///
/// let table = builder.build();
/// let class = table.lookup("Vec2").unwrap();
/// assert_eq!(table.members(class).count(), 2);
/// assert_eq!(table.get(table.get(class).children[1]).qualified_name, "Vec2::x");
/// ```
#[derive(Debug, Default)]
pub struct SymbolTableBuilder {
    symbols: Vec<Symbol>,
    roots: Vec<SymbolId>,
}

impl SymbolTableBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level symbol. An empty qualified name defaults to the
    /// simple name.
    pub fn add_root(&mut self, mut symbol: Symbol) -> SymbolId {
        if symbol.qualified_name.is_empty() {
            symbol.qualified_name = symbol.name.clone();
        }
        symbol.parent = None;
        let id = self.push(symbol);
        self.roots.push(id);
        id
    }

    /// Add a member to `parent`. An empty qualified name is derived from the
    /// parent's qualified name.
    pub fn add_child(&mut self, parent: SymbolId, mut symbol: Symbol) -> SymbolId {
        if symbol.qualified_name.is_empty() {
            symbol.qualified_name =
                format!("{}::{}", self.symbols[parent.index()].qualified_name, symbol.name);
        }
        symbol.parent = Some(parent);
        let id = self.push(symbol);
        self.symbols[parent.index()].children.push(id);
        id
    }

    /// Number of symbols added so far.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if no symbols were added.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Freeze the table and build the name index.
    pub fn build(self) -> SymbolTable {
        let mut by_name: FxHashMap<String, SymbolId> = FxHashMap::default();
        for (index, symbol) in self.symbols.iter().enumerate() {
            if !symbol.kind.is_type() {
                continue;
            }
            let id = SymbolId::new(index as u32);
            if let Some(existing) = by_name.get(&symbol.qualified_name) {
                tracing::debug!(
                    name = %symbol.qualified_name,
                    kept = %existing,
                    dropped = %id,
                    "duplicate type symbol, keeping the first"
                );
                continue;
            }
            by_name.insert(symbol.qualified_name.clone(), id);
        }
        SymbolTable {
            symbols: self.symbols,
            roots: self.roots,
            by_name,
        }
    }

    fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::new(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }
}

/// Read-only symbol graph.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    roots: Vec<SymbolId>,
    by_name: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    /// Get a symbol by id.
    ///
    /// Ids are only handed out by the builder of this table, so every id is
    /// in range.
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Look up a type-like symbol by qualified name.
    pub fn lookup(&self, qualified_name: &str) -> Option<SymbolId> {
        self.by_name.get(qualified_name).copied()
    }

    /// Look up a type-like symbol by qualified name and return it.
    pub fn lookup_symbol(&self, qualified_name: &str) -> Option<&Symbol> {
        self.lookup(qualified_name).map(|id| self.get(id))
    }

    /// Top-level symbols in insertion order.
    pub fn roots(&self) -> &[SymbolId] {
        &self.roots
    }

    /// All symbols with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId::new(index as u32), symbol))
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Members of `id`, in declaration order.
    pub fn members(&self, id: SymbolId) -> impl Iterator<Item = &Symbol> {
        self.get(id).children.iter().map(|child| self.get(*child))
    }

    /// Constructors declared by an aggregate, in declaration order.
    pub fn constructors(&self, id: SymbolId) -> impl Iterator<Item = &Symbol> {
        let aggregate = self.get(id);
        self.members(id)
            .filter(move |member| member.is_constructor_of(aggregate))
    }

    /// The destructor declared by an aggregate.
    pub fn destructor(&self, id: SymbolId) -> Option<&Symbol> {
        let aggregate = self.get(id);
        self.members(id).find(|member| member.is_destructor_of(aggregate))
    }

    /// The copy constructor declared by an aggregate.
    pub fn copy_constructor(&self, id: SymbolId) -> Option<&Symbol> {
        let aggregate = self.get(id);
        self.members(id)
            .find(|member| member.is_copy_constructor_of(aggregate))
    }

    /// The assignment operator declared by an aggregate.
    pub fn assignment_operator(&self, id: SymbolId) -> Option<&Symbol> {
        self.members(id).find(|member| member.is_assignment_operator())
    }
}
