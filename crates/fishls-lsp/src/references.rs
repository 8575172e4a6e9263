//! Find-references across the workspace.
//!
//! References to a symbol live in its defining document plus every
//! document that reaches it over a source edge. Candidate nodes are
//! matched by text first, then confirmed by resolving them back to the
//! target definition, so shadowed same-named bindings are excluded.

use crate::analyzer::Analyzer;
use crate::cancellation::CancellationToken;
use crate::resolver::{Resolver, SymbolRef};
use crate::source::sourcing_documents;
use fishls_binder::FishKind;
use fishls_common::{Location, Position};
use fishls_parser::NodeKind;

pub struct FindReferences<'a> {
    analyzer: &'a Analyzer,
}

impl<'a> FindReferences<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        FindReferences { analyzer }
    }

    /// All references to the symbol at `position`, definition included.
    /// `None` when no symbol resolves there.
    pub fn find_references(&self, uri: &str, position: Position) -> Option<Vec<Location>> {
        let target = Resolver::new(self.analyzer).resolve(uri, position)?;
        Some(self.references_to(&target, &CancellationToken::new()))
    }

    /// Ordered locations of every reference resolving to `target`.
    ///
    /// The defining document is scanned first, then sourcing documents in
    /// uri order. Cancellation abandons the scan between documents and
    /// discards partial results.
    pub fn references_to(&self, target: &SymbolRef, token: &CancellationToken) -> Vec<Location> {
        let Some(symbol) = target.symbol(self.analyzer) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = vec![symbol.name.as_str()];
        for alias in &symbol.aliased_names {
            if !names.contains(&alias.as_str()) {
                names.push(alias);
            }
        }

        let mut documents = vec![target.uri.clone()];
        documents.extend(sourcing_documents(self.analyzer, &target.uri));

        let mut locations = Vec::new();
        self.push_definition_sites(target, &mut locations);
        for uri in &documents {
            if token.is_cancelled() {
                return Vec::new();
            }
            self.scan_document(uri, target, symbol.fish_kind, &names, &mut locations);
        }
        locations.sort_by(|a, b| {
            a.uri
                .cmp(&b.uri)
                .then_with(|| a.range.start.cmp(&b.range.start))
        });
        locations.dedup();
        locations
    }

    /// The identifier ranges of the definition itself. For argparse flags
    /// the short and long spellings come from one option word and rename
    /// together.
    fn push_definition_sites(&self, target: &SymbolRef, locations: &mut Vec<Location>) {
        let Some(index) = self.analyzer.index(&target.uri) else {
            return;
        };
        let symbol = index.symbol(target.id);
        locations.push(Location::new(target.uri.clone(), symbol.selection_range));
        if symbol.fish_kind == FishKind::Argparse {
            for (_, twin) in index.arena().iter() {
                if twin.fish_kind == FishKind::Argparse
                    && twin.node == symbol.node
                    && twin.selection_range != symbol.selection_range
                {
                    locations.push(Location::new(target.uri.clone(), twin.selection_range));
                }
            }
        }
    }

    fn scan_document(
        &self,
        uri: &str,
        target: &SymbolRef,
        target_kind: FishKind,
        names: &[&str],
        locations: &mut Vec<Location>,
    ) {
        let Some(tree) = self.analyzer.tree(uri) else {
            return;
        };
        let resolver = Resolver::new(self.analyzer);
        for node in tree.arena().descendants(tree.root()) {
            let candidate = match tree.arena().kind(node) {
                Some(NodeKind::VariableName | NodeKind::Word) => names.contains(&tree.text(node)),
                _ => false,
            };
            if !candidate {
                continue;
            }
            let position = tree.range(node).start;
            // Definition identifiers are emitted from the index, with the
            // identifier-only range.
            if let Some(index) = self.analyzer.index(uri)
                && index.definition_at(position).is_some()
            {
                continue;
            }
            let Some(resolved) = resolver.resolve(uri, position) else {
                continue;
            };
            if self.same_definition(&resolved, target, target_kind) {
                locations.push(Location::new(uri.to_string(), tree.range(node)));
            }
        }
    }

    /// Argparse twins (`_flag_h`/`_flag_help`) count as the same
    /// definition; everything else compares structurally.
    fn same_definition(&self, resolved: &SymbolRef, target: &SymbolRef, target_kind: FishKind) -> bool {
        if resolved == target {
            return true;
        }
        if target_kind != FishKind::Argparse || resolved.uri != target.uri {
            return false;
        }
        let Some(index) = self.analyzer.index(&target.uri) else {
            return false;
        };
        let resolved_symbol = index.symbol(resolved.id);
        let target_symbol = index.symbol(target.id);
        resolved_symbol.fish_kind == FishKind::Argparse
            && resolved_symbol.node == target_symbol.node
    }
}

#[cfg(test)]
#[path = "../tests/references_tests.rs"]
mod references_tests;
