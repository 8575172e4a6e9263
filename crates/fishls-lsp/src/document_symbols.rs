//! Document outline and folding.
//!
//! Converts a document's symbol forest into the LSP `DocumentSymbol`
//! nesting for outlines, and derives folding ranges from multi-line
//! function symbols.

use crate::analyzer::Analyzer;
use fishls_binder::{DocumentSymbolIndex, FishKind, SymbolId, SymbolKind};
use fishls_common::Range;
use serde::Serialize;

/// Hierarchical outline entry, shaped like the LSP `DocumentSymbol` type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSymbol {
    pub name: String,
    pub detail: String,
    pub kind: SymbolKind,
    pub range: Range,
    pub selection_range: Range,
    pub children: Vec<DocumentSymbol>,
}

/// Foldable region, shaped like the LSP `FoldingRange` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldingRange {
    pub start_line: u32,
    pub end_line: u32,
    pub collapsed_text: String,
}

pub struct DocumentSymbolsProvider<'a> {
    analyzer: &'a Analyzer,
}

impl<'a> DocumentSymbolsProvider<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        DocumentSymbolsProvider { analyzer }
    }

    /// The nested outline of `uri`, in source order. `None` for an
    /// unanalyzed document.
    pub fn document_symbols(&self, uri: &str) -> Option<Vec<DocumentSymbol>> {
        let index = self.analyzer.index(uri)?;
        Some(
            index
                .roots()
                .iter()
                .map(|&id| convert(index, id))
                .collect(),
        )
    }

    /// One folding range per function symbol spanning more than one line.
    pub fn folding_ranges(&self, uri: &str) -> Option<Vec<FoldingRange>> {
        let index = self.analyzer.index(uri)?;
        Some(
            index
                .symbols()
                .filter(|s| s.fish_kind == FishKind::Function)
                .filter(|s| s.range.end.line > s.range.start.line)
                .map(|s| FoldingRange {
                    start_line: s.range.start.line,
                    end_line: s.range.end.line,
                    collapsed_text: s.detail.clone(),
                })
                .collect(),
        )
    }
}

fn convert(index: &DocumentSymbolIndex, id: SymbolId) -> DocumentSymbol {
    let symbol = index.symbol(id);
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: symbol.detail.clone(),
        kind: symbol.kind(),
        range: symbol.range,
        selection_range: symbol.selection_range,
        children: symbol
            .children
            .iter()
            .map(|&child| convert(index, child))
            .collect(),
    }
}

#[cfg(test)]
#[path = "../tests/document_symbols_tests.rs"]
mod document_symbols_tests;
