//! The symbol model.
//!
//! Symbols live in a `SymbolArena` and are addressed by `SymbolId`.
//! `children` is the owning edge; `parent` is a plain back-index, so the
//! nested forest is a tree with no reference cycles. Symbols are immutable
//! once a document's build completes; edits replace the whole arena.

use fishls_common::{Position, Range};
use fishls_parser::NodeIndex;
use serde::{Deserialize, Serialize};

/// Handle into a `SymbolArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// How a symbol was introduced. Drives scope defaults and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FishKind {
    Function,
    /// Function parameter (`--argument-names`) or the implicit `argv`.
    Argument,
    Set,
    For,
    Read,
    Argparse,
    Alias,
    /// `NAME=value` prefix before a command.
    InlineVariable,
    Export,
    /// Synthetic variables such as the script-level `argv`.
    Variable,
}

impl FishKind {
    /// Consumer-facing function/variable split.
    pub fn symbol_kind(self) -> SymbolKind {
        match self {
            FishKind::Function | FishKind::Alias => SymbolKind::Function,
            _ => SymbolKind::Variable,
        }
    }

    pub fn is_variable(self) -> bool {
        self.symbol_kind() == SymbolKind::Variable
    }

    pub fn is_function(self) -> bool {
        self.symbol_kind() == SymbolKind::Function
    }
}

/// The generic kind consumers (outline, workspace search) care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Variable,
}

/// Visibility class of a definition.
///
/// `Function` and `Inherit` are local-like: `Function` pins the variable to
/// the nearest enclosing function, `Inherit` is the unflagged fallback that
/// reuses the enclosing scope. `Universal` behaves like `Global` for
/// visibility but is reported distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeTag {
    Local,
    Function,
    Inherit,
    Global,
    Universal,
}

impl ScopeTag {
    pub fn is_global(self) -> bool {
        matches!(self, ScopeTag::Global | ScopeTag::Universal)
    }

    pub fn is_local(self) -> bool {
        !self.is_global()
    }
}

/// The lexical boundary of a symbol's visibility: a syntax node plus its
/// resolved position range, and the tag saying how the symbol escapes (or
/// doesn't escape) that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionScope {
    pub scope_node: NodeIndex,
    pub range: Range,
    pub tag: ScopeTag,
}

impl DefinitionScope {
    pub fn new(scope_node: NodeIndex, range: Range, tag: ScopeTag) -> Self {
        DefinitionScope {
            scope_node,
            range,
            tag,
        }
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.range.contains_position(position)
    }
}

/// One definition produced by the symbol tree builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishSymbol {
    pub name: String,
    pub fish_kind: FishKind,
    /// Owning document; identification only, not an ownership edge.
    pub uri: String,
    /// Short human-readable description shown by consumers.
    pub detail: String,
    /// Span of the whole defining construct.
    pub range: Range,
    /// Span of just the identifier.
    pub selection_range: Range,
    /// The defining construct's node.
    pub node: NodeIndex,
    /// The identifier node the selection range came from.
    pub focused_node: NodeIndex,
    pub scope: DefinitionScope,
    pub parent: Option<SymbolId>,
    pub children: Vec<SymbolId>,
    /// Sibling spellings of the same definition, e.g. `_flag_h` and
    /// `_flag_help` from one argparse option.
    pub aliased_names: Vec<String>,
}

impl FishSymbol {
    pub fn kind(&self) -> SymbolKind {
        self.fish_kind.symbol_kind()
    }

    pub fn is_variable(&self) -> bool {
        self.fish_kind.is_variable()
    }

    pub fn is_function(&self) -> bool {
        self.fish_kind.is_function()
    }

    /// Universal counts as global; exactly one of `is_global`/`is_local`
    /// holds for every symbol.
    pub fn is_global(&self) -> bool {
        self.scope.tag.is_global()
    }

    pub fn is_local(&self) -> bool {
        !self.is_global()
    }

    /// Defined directly at the file's top level, outside any function.
    pub fn is_root_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Textual order by identifier start position.
    pub fn is_before(&self, other: &FishSymbol) -> bool {
        self.selection_range.start < other.selection_range.start
    }

    pub fn is_after(&self, other: &FishSymbol) -> bool {
        other.is_before(self)
    }

    /// Same lexical block: identical scope node spans.
    pub fn equal_scopes(&self, other: &FishSymbol) -> bool {
        self.scope.range == other.scope.range
    }

    /// Structural identity: name, kind, anchor, document.
    pub fn equals(&self, other: &FishSymbol) -> bool {
        self.name == other.name
            && self.fish_kind == other.fish_kind
            && self.selection_range == other.selection_range
            && self.uri == other.uri
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.range.contains_position(position)
    }

    pub fn scope_contains_position(&self, position: Position) -> bool {
        self.scope.contains_position(position)
    }

    /// Does `name` refer to this symbol? Aliased spellings count.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliased_names.iter().any(|n| n == name)
    }
}

/// Flat storage for one document's symbols. Allocation order is the
/// builder's walk order, which is pre-order source order.
#[derive(Debug, Default, Clone)]
pub struct SymbolArena {
    symbols: Vec<FishSymbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        SymbolArena::default()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, id: SymbolId) -> Option<&FishSymbol> {
        self.symbols.get(id.0 as usize)
    }

    /// Panics on a dangling id; ids are only minted by this arena.
    pub fn symbol(&self, id: SymbolId) -> &FishSymbol {
        &self.symbols[id.0 as usize]
    }

    pub fn alloc(&mut self, symbol: FishSymbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    /// Attach `child` under `parent`, fixing both links.
    pub fn attach(&mut self, parent: SymbolId, child: SymbolId) {
        debug_assert!(parent != child, "symbol cannot own itself");
        self.symbols[child.0 as usize].parent = Some(parent);
        self.symbols[parent.0 as usize].children.push(child);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &FishSymbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + use<> {
        (0..self.symbols.len() as u32).map(SymbolId)
    }
}
