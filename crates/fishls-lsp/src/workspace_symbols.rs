//! Workspace-wide symbol search.
//!
//! Aggregates every indexed document's flat symbol list into one queryable
//! surface. Search results are ranked exact > prefix > substring
//! (case-insensitive), alphabetical within a rank, and capped.

use crate::analyzer::Analyzer;
use crate::cancellation::CancellationToken;
use crate::resolver::{Resolver, SymbolRef};
use fishls_binder::SymbolKind;
use fishls_common::{Location, Position};
use serde::Serialize;

/// Maximum number of results returned by a workspace symbol search.
const MAX_RESULTS: usize = 100;

/// One search result, shaped like the LSP `SymbolInformation` type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub location: Location,
}

/// Relevance category for sorting search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchKind {
    Exact = 0,
    Prefix = 1,
    Substring = 2,
}

pub struct WorkspaceSymbolsProvider<'a> {
    analyzer: &'a Analyzer,
}

impl<'a> WorkspaceSymbolsProvider<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        WorkspaceSymbolsProvider { analyzer }
    }

    /// Every definition of `name` across the workspace, in uri order.
    pub fn find(&self, name: &str) -> Vec<SymbolRef> {
        let mut found = Vec::new();
        for uri in self.analyzer.uris() {
            let Some(index) = self.analyzer.index(uri) else {
                continue;
            };
            for &id in index.find_by_name(name) {
                found.push(SymbolRef {
                    uri: uri.to_string(),
                    id,
                });
            }
        }
        found
    }

    /// The definition behind the reference at `position`, local scopes
    /// first, then sourced and global symbols.
    pub fn find_definition_at(&self, uri: &str, position: Position) -> Option<SymbolRef> {
        Resolver::new(self.analyzer).resolve(uri, position)
    }

    /// Search all indexed symbols. An empty query returns nothing; a
    /// cancelled scan discards partial results and returns nothing.
    pub fn find_symbols(&self, query: &str, token: &CancellationToken) -> Vec<WorkspaceSymbol> {
        if query.is_empty() {
            return Vec::new();
        }
        let query_lower = query.to_lowercase();
        let mut matches: Vec<(MatchKind, WorkspaceSymbol)> = Vec::new();
        for uri in self.analyzer.uris() {
            if token.is_cancelled() {
                return Vec::new();
            }
            let Some(index) = self.analyzer.index(uri) else {
                continue;
            };
            for symbol in index.symbols() {
                let name_lower = symbol.name.to_lowercase();
                let match_kind = if name_lower == query_lower {
                    MatchKind::Exact
                } else if name_lower.starts_with(&query_lower) {
                    MatchKind::Prefix
                } else if name_lower.contains(&query_lower) {
                    MatchKind::Substring
                } else {
                    continue;
                };
                matches.push((
                    match_kind,
                    WorkspaceSymbol {
                        name: symbol.name.clone(),
                        kind: symbol.kind(),
                        location: Location::new(uri.to_string(), symbol.selection_range),
                    },
                ));
            }
        }
        matches.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.name.cmp(&b.1.name))
                .then_with(|| a.1.location.uri.cmp(&b.1.location.uri))
        });
        matches
            .into_iter()
            .take(MAX_RESULTS)
            .map(|(_, info)| info)
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/workspace_symbols_tests.rs"]
mod workspace_symbols_tests;
