//! Reference resolution.
//!
//! Given a position in an analyzed document, find the definition the
//! reference at that position refers to. Resolution walks the enclosing
//! scope chain innermost-first (standard lexical shadowing), then falls
//! back to symbols exported over source edges, then to global symbols
//! anywhere in the workspace. An unresolved reference is the normal
//! outcome for external commands and builtins, not an error.

use crate::analyzer::Analyzer;
use crate::source::{exported_symbols, sources_visible_at};
use fishls_binder::{DocumentSymbolIndex, FishKind, FishSymbol, SymbolId};
use fishls_common::Position;
use fishls_parser::classify::{command_name_node, is_scope_node};
use fishls_parser::{NodeIndex, NodeKind, SyntaxTree};

/// A resolved definition: the owning document plus the symbol's id in that
/// document's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub uri: String,
    pub id: SymbolId,
}

impl SymbolRef {
    pub fn symbol<'a>(&self, analyzer: &'a Analyzer) -> Option<&'a FishSymbol> {
        analyzer.index(&self.uri).and_then(|i| i.arena().get(self.id))
    }
}

/// What a reference node names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReferenceKind {
    /// `$name` expansions and loop/assignment identifiers.
    Variable,
    /// A command word, matched against functions and aliases.
    Command,
}

fn kind_matches(symbol: &FishSymbol, kind: ReferenceKind) -> bool {
    match kind {
        ReferenceKind::Variable => symbol.is_variable(),
        ReferenceKind::Command => symbol.is_function(),
    }
}

pub struct Resolver<'a> {
    analyzer: &'a Analyzer,
}

impl<'a> Resolver<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        Resolver { analyzer }
    }

    /// Resolve the reference at `position` in `uri` to its definition.
    pub fn resolve(&self, uri: &str, position: Position) -> Option<SymbolRef> {
        let tree = self.analyzer.tree(uri)?;
        let index = self.analyzer.index(uri)?;

        // A definition identifier resolves to itself.
        if let Some(id) = index.definition_at(position) {
            return Some(SymbolRef {
                uri: uri.to_string(),
                id,
            });
        }

        let node = tree.node_at_position(position)?;
        let (name, kind) = classify_reference(tree, node)?;
        let reference_start = tree.range(node).start;

        // Innermost enclosing scope wins over same-named outer definitions.
        let mut scopes: Vec<NodeIndex> = tree
            .arena()
            .ancestors(node)
            .filter(|&a| is_scope_node(tree, a))
            .collect();
        if scopes.last() != Some(&tree.root()) {
            scopes.push(tree.root());
        }
        for &scope in &scopes {
            if let Some(id) = match_in_scope(index, scope, name, kind, reference_start) {
                return Some(SymbolRef {
                    uri: uri.to_string(),
                    id,
                });
            }
        }

        // Symbols pulled in by source commands whose edge is in effect at
        // the reference, nearest edge first.
        for to in sources_visible_at(self.analyzer, uri, reference_start) {
            let Some(target_index) = self.analyzer.index(&to) else {
                continue;
            };
            for id in exported_symbols(self.analyzer, &to) {
                let symbol = target_index.symbol(id);
                if symbol.matches_name(name) && kind_matches(symbol, kind) {
                    return Some(SymbolRef { uri: to, id });
                }
            }
        }

        // Last resort: a global or universal definition anywhere else.
        for other in self.analyzer.uris() {
            if other == uri {
                continue;
            }
            let Some(other_index) = self.analyzer.index(other) else {
                continue;
            };
            for &id in other_index.find_by_name(name) {
                let symbol = other_index.symbol(id);
                if symbol.is_global() && kind_matches(symbol, kind) {
                    return Some(SymbolRef {
                        uri: other.to_string(),
                        id,
                    });
                }
            }
        }
        None
    }
}

/// Match a symbol named `name` defined at scope level `scope`.
///
/// Variables obey the "definition precedes use" rule unless they escape
/// globally or are function arguments (visible through the whole body).
/// Functions and aliases are hoisted within their scope. Among several
/// qualifying definitions the last one in source order wins, which is the
/// closest preceding redefinition.
fn match_in_scope(
    index: &DocumentSymbolIndex,
    scope: NodeIndex,
    name: &str,
    kind: ReferenceKind,
    reference_start: Position,
) -> Option<SymbolId> {
    let mut exact = None;
    let mut aliased = None;
    for &id in index.find_by_name(name) {
        let symbol = index.symbol(id);
        if symbol.scope.scope_node != scope || !kind_matches(symbol, kind) {
            continue;
        }
        let visible = match kind {
            ReferenceKind::Command => true,
            ReferenceKind::Variable => {
                symbol.selection_range.start <= reference_start
                    || symbol.is_global()
                    || symbol.fish_kind == FishKind::Argument
            }
        };
        if !visible {
            continue;
        }
        if symbol.name == name {
            exact = Some(id);
        } else {
            aliased = Some(id);
        }
    }
    exact.or(aliased)
}

/// Is `node` a reference, and to what name?
fn classify_reference<'t>(
    tree: &'t SyntaxTree,
    node: NodeIndex,
) -> Option<(&'t str, ReferenceKind)> {
    match tree.arena().kind(node)? {
        NodeKind::VariableName => Some((tree.text(node), ReferenceKind::Variable)),
        NodeKind::VariableExpansion => {
            let name = tree.arena().first_child(node)?;
            Some((tree.text(name), ReferenceKind::Variable))
        }
        NodeKind::Word => {
            let parent = tree.arena().parent(node)?;
            if command_name_node(tree, parent) == Some(node) {
                Some((tree.text(node), ReferenceKind::Command))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod resolver_tests;
