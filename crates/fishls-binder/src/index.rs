//! Per-document symbol index.
//!
//! Wraps one document's symbol forest with the flat views and position
//! queries consumers ask for. The index is immutable; edits rebuild it
//! from a fresh parse.

use crate::builder::{SymbolForest, build_symbols};
use crate::symbol::{FishSymbol, SymbolArena, SymbolId};
use fishls_common::{LspDocument, Position};
use fishls_parser::SyntaxTree;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Most names have one or two definitions per document.
type NameEntry = SmallVec<[SymbolId; 2]>;

#[derive(Debug, Default)]
pub struct DocumentSymbolIndex {
    uri: String,
    arena: SymbolArena,
    roots: Vec<SymbolId>,
    /// All symbols in document pre-order: parents before children, earlier
    /// definitions first.
    flat: Vec<SymbolId>,
    /// Name (and aliased-name) lookup; values keep pre-order.
    by_name: FxHashMap<String, NameEntry>,
}

impl DocumentSymbolIndex {
    pub fn build(document: &LspDocument, tree: &SyntaxTree) -> Self {
        let SymbolForest { arena, roots } = build_symbols(document, tree);
        let mut flat = Vec::with_capacity(arena.len());
        let mut stack: Vec<SymbolId> = roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            flat.push(id);
            for &child in arena.symbol(id).children.iter().rev() {
                stack.push(child);
            }
        }
        let mut by_name: FxHashMap<String, NameEntry> = FxHashMap::default();
        for &id in &flat {
            let symbol = arena.symbol(id);
            by_name.entry(symbol.name.clone()).or_default().push(id);
            for alias in &symbol.aliased_names {
                if *alias != symbol.name {
                    by_name.entry(alias.clone()).or_default().push(id);
                }
            }
        }
        DocumentSymbolIndex {
            uri: document.uri().to_string(),
            arena,
            roots,
            flat,
            by_name,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn arena(&self) -> &SymbolArena {
        &self.arena
    }

    /// Top-level symbols, in source order.
    pub fn roots(&self) -> &[SymbolId] {
        &self.roots
    }

    /// Every symbol in pre-order.
    pub fn flat(&self) -> &[SymbolId] {
        &self.flat
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    pub fn symbol(&self, id: SymbolId) -> &FishSymbol {
        self.arena.symbol(id)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &FishSymbol> {
        self.flat.iter().map(|&id| self.arena.symbol(id))
    }

    /// All symbols answering to `name`, including aliased spellings, in
    /// pre-order.
    pub fn find_by_name(&self, name: &str) -> &[SymbolId] {
        self.by_name
            .get(name)
            .map(SmallVec::as_slice)
            .unwrap_or(&[])
    }

    /// The definition whose identifier covers `position`, if any.
    pub fn definition_at(&self, position: Position) -> Option<SymbolId> {
        self.flat
            .iter()
            .copied()
            .find(|&id| self.arena.symbol(id).selection_range.contains_position(position))
    }

    /// Symbols whose defining construct contains `position`, innermost
    /// last.
    pub fn containing(&self, position: Position) -> Vec<SymbolId> {
        self.flat
            .iter()
            .copied()
            .filter(|&id| self.arena.symbol(id).contains_position(position))
            .collect()
    }

    /// Symbols visible at `position`: their scope range covers it.
    pub fn visible_at(&self, position: Position) -> Vec<SymbolId> {
        self.flat
            .iter()
            .copied()
            .filter(|&id| self.arena.symbol(id).scope_contains_position(position))
            .collect()
    }
}
