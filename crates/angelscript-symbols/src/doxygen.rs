//! Doxygen XML loader.
//!
//! Builds a [`SymbolTable`] from the XML output directory Doxygen writes when
//! `GENERATE_XML = YES`. Every `*.xml` file whose root element is `<doxygen>`
//! is read in file-name order; `index.xml` and other files are skipped.
//!
//! - `compounddef` of kind `class`, `struct` or `union` becomes a root
//!   aggregate; its `memberdef`s become children in section order.
//! - `compounddef` of kind `namespace` or `file` contributes its enums and
//!   typedefs as roots, qualified by the namespace.
//! - Class templates are skipped; they cannot be bound without instantiation.
//!
//! Attribute tags come from the member's documentation: a bracketed word such
//! as `[noascript]`, or a paragraph starting with `ascript:`. Parameter
//! documentation (`\param[in]`, `\param[out]`) becomes the parameter's
//! documentation fragment, prefixed with its direction marker.

use std::fs;
use std::path::{Path, PathBuf};

use angelscript_core::Visibility;
use roxmltree::{Document, Node};
use rustc_hash::FxHashMap;

use crate::{
    DIRECTIVE_PREFIX, Enumerator, Parameter, Symbol, SymbolError, SymbolFlags, SymbolKind,
    SymbolTable, SymbolTableBuilder,
};

/// Keywords Doxygen sometimes leaves at the front of a `<type>`.
const TYPE_NOISE: [&str; 6] = ["virtual", "static", "inline", "explicit", "constexpr", "friend"];

/// Load every Doxygen XML document in `dir` into a frozen table.
pub fn load_directory(dir: &Path) -> Result<SymbolTable, SymbolError> {
    if !dir.is_dir() {
        return Err(SymbolError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|source| SymbolError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SymbolError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "xml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut builder = SymbolTableBuilder::new();
    for path in &paths {
        let text = fs::read_to_string(path).map_err(|source| SymbolError::Io {
            path: path.clone(),
            source,
        })?;
        load_str(&mut builder, &text).map_err(|source| SymbolError::Xml {
            path: path.clone(),
            source,
        })?;
    }

    tracing::debug!(
        files = paths.len(),
        symbols = builder.len(),
        dir = %dir.display(),
        "loaded doxygen xml"
    );
    Ok(builder.build())
}

/// Parse one XML document and add its symbols to `builder`.
///
/// Documents whose root is not `<doxygen>` are ignored.
pub fn load_str(builder: &mut SymbolTableBuilder, xml: &str) -> Result<(), roxmltree::Error> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "doxygen" {
        return Ok(());
    }
    for compound in elements(root, "compounddef") {
        load_compound(builder, compound);
    }
    Ok(())
}

fn load_compound(builder: &mut SymbolTableBuilder, compound: Node<'_, '_>) {
    let kind = compound.attribute("kind").unwrap_or_default();
    let Some(qualified) = child(compound, "compoundname").map(text_of) else {
        return;
    };

    match kind {
        "class" | "struct" | "union" => {
            if child(compound, "templateparamlist").is_some() {
                tracing::debug!(name = %qualified, "skipping class template");
                return;
            }
            let name = qualified.rsplit("::").next().unwrap_or(&qualified).to_string();
            let mut aggregate = Symbol::aggregate(name)
                .with_qualified_name(qualified.clone())
                .with_visibility(Visibility::from_prot(
                    compound.attribute("prot").unwrap_or("public"),
                ));
            aggregate.attributes = doc_attributes(compound);
            if compound.attribute("abstract") == Some("yes") {
                aggregate.flags |= SymbolFlags::ABSTRACT;
            }
            let id = builder.add_root(aggregate);
            for member in members(compound) {
                if let Some(symbol) = load_member(member) {
                    builder.add_child(id, symbol);
                }
            }
        }
        "namespace" | "file" => {
            let prefix = (kind == "namespace").then_some(qualified.as_str());
            for member in members(compound) {
                let Some(mut symbol) = load_member(member) else {
                    continue;
                };
                if !matches!(symbol.kind, SymbolKind::Enum | SymbolKind::Typedef) {
                    continue;
                }
                symbol.qualified_name = match prefix {
                    Some(prefix) => format!("{prefix}::{}", symbol.name),
                    None => symbol.name.clone(),
                };
                builder.add_root(symbol);
            }
        }
        _ => {}
    }
}

fn members<'a, 'input>(compound: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    elements(compound, "sectiondef").flat_map(|section| elements(section, "memberdef"))
}

fn load_member(member: Node<'_, '_>) -> Option<Symbol> {
    let kind = SymbolKind::from_doxygen(member.attribute("kind")?)?;
    let name = child(member, "name").map(text_of)?;

    let mut symbol = Symbol::new(kind, name)
        .with_visibility(Visibility::from_prot(member.attribute("prot").unwrap_or("public")));
    symbol.attributes = doc_attributes(member);
    symbol.ty = child(member, "type").map(|t| strip_type_noise(&text_of(t))).unwrap_or_default();

    if member.attribute("static") == Some("yes") {
        symbol.flags |= SymbolFlags::STATIC;
    }
    if member.attribute("const") == Some("yes") {
        symbol.flags |= SymbolFlags::CONST;
    }
    match member.attribute("virt") {
        Some("virtual") => symbol.flags |= SymbolFlags::VIRTUAL,
        Some("pure-virtual") => symbol.flags |= SymbolFlags::PURE_VIRTUAL,
        _ => {}
    }

    match kind {
        SymbolKind::Function | SymbolKind::Slot | SymbolKind::Signal => {
            let docs = param_docs(member);
            for param in elements(member, "param") {
                let ty = child(param, "type").map(text_of).unwrap_or_default();
                let declname = child(param, "declname").map(text_of);
                if ty == "void" && declname.is_none() {
                    continue;
                }
                let mut parameter = Parameter::new(ty);
                if let Some(declname) = declname {
                    if let Some(doc) = docs.get(&declname) {
                        parameter.doc = doc.clone();
                    }
                    parameter.name = Some(declname);
                }
                symbol.params.push(parameter);
            }
        }
        SymbolKind::Variable => {
            let args = child(member, "argsstring").map(text_of).unwrap_or_default();
            if args.starts_with('[') {
                symbol.array_extent = Some(args);
            }
        }
        SymbolKind::Enum => {
            symbol.enumerators = elements(member, "enumvalue")
                .filter_map(|value| {
                    let name = child(value, "name").map(text_of)?;
                    let literal =
                        child(value, "initializer").and_then(|i| parse_initializer(&text_of(i)));
                    Some(Enumerator::new(name, literal))
                })
                .collect();
        }
        SymbolKind::Aggregate | SymbolKind::Typedef => {}
    }

    Some(symbol)
}

/// Parse an enumerator initializer such as `= 4`, `= -1` or `=0x10`.
fn parse_initializer(text: &str) -> Option<i64> {
    let value = text.trim().strip_prefix('=').unwrap_or(text).trim();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, value),
    };
    let digits = digits.trim_end_matches(['u', 'U', 'l', 'L']);
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn strip_type_noise(ty: &str) -> String {
    let mut words: Vec<&str> = ty.split_whitespace().collect();
    while words.first().is_some_and(|w| TYPE_NOISE.contains(w)) {
        words.remove(0);
    }
    words.join(" ")
}

/// Map parameter name to its documentation fragment.
fn param_docs(member: Node<'_, '_>) -> FxHashMap<String, String> {
    let mut docs = FxHashMap::default();
    let items = member
        .descendants()
        .filter(|n| n.has_tag_name("parameterlist") && n.attribute("kind") == Some("param"))
        .flat_map(|list| elements(list, "parameteritem"));

    for item in items {
        let description = child(item, "parameterdescription")
            .map(text_of)
            .unwrap_or_default();
        for name in item
            .descendants()
            .filter(|n| n.has_tag_name("parametername"))
        {
            let fragment = match name.attribute("direction") {
                Some(direction) => format!("[{direction}] {description}"),
                None => description.clone(),
            };
            docs.insert(text_of(name), fragment.trim().to_string());
        }
    }
    docs
}

/// Collect attribute tags from a symbol's brief and detailed description.
fn doc_attributes(node: Node<'_, '_>) -> Vec<String> {
    let mut attributes = Vec::new();
    let descriptions = ["briefdescription", "detaileddescription"]
        .into_iter()
        .filter_map(|tag| child(node, tag));

    for description in descriptions {
        for para in description.descendants().filter(|n| n.has_tag_name("para")) {
            let text: String = para
                .children()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect();
            scan_attributes(&text, &mut attributes);
        }
    }
    attributes
}

fn scan_attributes(text: &str, out: &mut Vec<String>) {
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            break;
        };
        let tag = &after[..close];
        let is_word = !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if is_word && tag != "in" && tag != "out" {
            out.push(tag.to_string());
        }
        rest = &after[close + 1..];
    }

    let trimmed = text.trim();
    let is_directive = trimmed
        .strip_prefix(DIRECTIVE_PREFIX)
        .is_some_and(|rest| rest.trim_start().starts_with(':'));
    if is_directive {
        out.push(trimmed.to_string());
    }
}

fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| n.has_tag_name(tag))
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

/// Concatenated text of a node and its descendants, whitespace collapsed.
fn text_of(node: Node<'_, '_>) -> String {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
