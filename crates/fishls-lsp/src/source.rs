//! Cross-file resolution over `source` edges.
//!
//! `source file.fish` (and its `.` spelling) inlines another file's top
//! level into the caller. The static approximation here: an edge exists
//! when the filename argument is a literal that resolves to an analyzed
//! document; a symbol crosses the edge iff it is defined at the sourced
//! file's root or escapes globally anyway. The edge is only visible where
//! the source command itself runs: inside its enclosing function, or from
//! the source line onward at the top level.

use crate::analyzer::Analyzer;
use fishls_binder::SymbolId;
use fishls_common::{Position, Range};
use fishls_parser::classify::{
    enclosing_scope, is_source_command, source_command_argument, unquote,
};
use fishls_parser::{NodeIndex, NodeKind};
use rustc_hash::FxHashSet;
use tracing::trace;

/// One static `from` sources `to` edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResource {
    pub from: String,
    pub to: String,
    /// The source command node in `from`.
    pub node: NodeIndex,
    /// Range of the source command, for "go to sourced file" style jumps.
    pub range: Range,
    /// Range of the scope the source command runs in; pulled-in symbols
    /// stay confined to it.
    pub definition_scope: Range,
    /// Whether the source command sits at the file's top level.
    pub root_level: bool,
}

impl SourceResource {
    /// Can a reference at `position` in `from` see symbols pulled in over
    /// this edge? Top-level edges take effect from the source line onward;
    /// nested edges never escape their scope.
    pub fn visible_at(&self, position: Position) -> bool {
        if self.root_level {
            self.range.start <= position
        } else {
            self.definition_scope.contains_position(position)
        }
    }
}

/// All source edges leaving `uri`, in document order. Dynamic arguments
/// (`source $file`, globs) produce no edge.
pub fn collect_source_resources(analyzer: &Analyzer, uri: &str) -> Vec<SourceResource> {
    let Some(tree) = analyzer.tree(uri) else {
        return Vec::new();
    };
    let mut resources = Vec::new();
    for node in tree.arena().descendants(tree.root()) {
        if tree.arena().kind(node) != Some(NodeKind::Command) || !is_source_command(tree, node) {
            continue;
        }
        let Some(arg) = source_command_argument(tree, node) else {
            continue;
        };
        let text = unquote(tree, arg);
        let Some(to) = resolve_source_target(analyzer, uri, text) else {
            trace!(uri, argument = text, "unresolved source target");
            continue;
        };
        let scope = enclosing_scope(tree, node);
        resources.push(SourceResource {
            from: uri.to_string(),
            to,
            node,
            range: tree.range(node),
            definition_scope: tree.range(scope),
            root_level: scope == tree.root(),
        });
    }
    resources
}

/// Uris reachable from `uri` through source edges, transitively, in
/// breadth-first discovery order. `uri` itself is not included.
pub fn reachable_sources(analyzer: &Analyzer, uri: &str) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    seen.insert(uri.to_string());
    let mut order = Vec::new();
    let mut queue = vec![uri.to_string()];
    let mut head = 0;
    while head < queue.len() {
        let current = queue[head].clone();
        head += 1;
        for resource in collect_source_resources(analyzer, &current) {
            if seen.insert(resource.to.clone()) {
                order.push(resource.to.clone());
                queue.push(resource.to);
            }
        }
    }
    order
}

/// Uris whose exports are visible at `position` in `uri`, nearest edge
/// first. Direct edges must be visible at the reference position; deeper
/// edges chain only from the sourced file's top level, since a source
/// wrapped in a function has not run when the file is sourced.
pub fn sources_visible_at(analyzer: &Analyzer, uri: &str, position: Position) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    seen.insert(uri.to_string());
    let mut order = Vec::new();
    let mut queue = Vec::new();
    for resource in collect_source_resources(analyzer, uri) {
        if resource.visible_at(position) && seen.insert(resource.to.clone()) {
            order.push(resource.to.clone());
            queue.push(resource.to);
        }
    }
    let mut head = 0;
    while head < queue.len() {
        let current = queue[head].clone();
        head += 1;
        for resource in collect_source_resources(analyzer, &current) {
            if resource.root_level && seen.insert(resource.to.clone()) {
                order.push(resource.to.clone());
                queue.push(resource.to);
            }
        }
    }
    order
}

/// Documents with a direct or transitive source edge to `target`, in
/// lexicographic uri order.
pub fn sourcing_documents(analyzer: &Analyzer, target: &str) -> Vec<String> {
    analyzer
        .uris()
        .into_iter()
        .filter(|&uri| uri != target)
        .filter(|&uri| reachable_sources(analyzer, uri).iter().any(|u| u == target))
        .map(str::to_string)
        .collect()
}

/// The subset of `to`'s symbols visible in `from` once the source has run:
/// root-level definitions plus anything explicitly global or universal.
pub fn symbols_from_resource(analyzer: &Analyzer, resource: &SourceResource) -> Vec<SymbolId> {
    exported_symbols(analyzer, &resource.to)
}

/// Symbols `uri` exports across any source boundary.
pub fn exported_symbols(analyzer: &Analyzer, uri: &str) -> Vec<SymbolId> {
    let Some(index) = analyzer.index(uri) else {
        return Vec::new();
    };
    index
        .flat()
        .iter()
        .copied()
        .filter(|&id| {
            let symbol = index.symbol(id);
            symbol.is_root_level() || symbol.is_global()
        })
        .collect()
}

/// Resolve a literal source argument to an analyzed uri.
///
/// Tries, in order: an absolute path, a path relative to the sourcing
/// file's directory, and finally a unique filename suffix match across the
/// workspace (autoload directories source by bare name).
fn resolve_source_target(analyzer: &Analyzer, from: &str, argument: &str) -> Option<String> {
    if argument.is_empty() || argument.contains('$') || argument.contains('*') {
        return None;
    }
    let candidate = if argument.starts_with('/') {
        format!("file://{argument}")
    } else {
        join_uri(from, argument)
    };
    if analyzer.contains(&candidate) {
        return Some(candidate);
    }
    let file = argument.rsplit('/').next().unwrap_or(argument);
    let suffix = format!("/{file}");
    let mut matches = analyzer
        .uris()
        .into_iter()
        .filter(|uri| uri.ends_with(&suffix));
    match (matches.next(), matches.next()) {
        (Some(uri), None) => Some(uri.to_string()),
        _ => None,
    }
}

/// Join a relative path onto the directory of `base_uri`, folding `.` and
/// `..` segments without escaping the uri scheme.
fn join_uri(base_uri: &str, relative: &str) -> String {
    let dir = match base_uri.rfind('/') {
        Some(pos) => &base_uri[..pos],
        None => base_uri,
    };
    let mut segments: Vec<&str> = dir.split('/').collect();
    for part in relative.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if segments.len() > 3 {
                    segments.pop();
                }
            }
            part => segments.push(part),
        }
    }
    segments.join("/")
}

#[cfg(test)]
#[path = "../tests/source_tests.rs"]
mod source_tests;
