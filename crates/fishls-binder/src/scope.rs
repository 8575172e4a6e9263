//! Scope-tag determination.
//!
//! Maps explicit scope flags (`-l/-g/-U/-f`), the defining construct, and
//! the file's autoload classification to a `DefinitionScope`. The unflagged
//! redefinition case keeps the original engine's lexical approximation
//! (`Inherit` tag bound to the enclosing scope) rather than attempting
//! runtime shadow tracking.

use crate::symbol::{DefinitionScope, ScopeTag};
use fishls_common::LspDocument;
use fishls_parser::classify::{enclosing_scope, is_top_level, parent_function};
use fishls_parser::options::first_matching_opt;
use fishls_parser::{NodeIndex, Opt, SyntaxTree};

/// The scope-modifier flags shared by `set` and `read`.
pub const SCOPE_MODIFIERS: &[(&str, &str, ScopeTag)] = &[
    ("-U", "--universal", ScopeTag::Universal),
    ("-g", "--global", ScopeTag::Global),
    ("-f", "--function", ScopeTag::Function),
    ("-l", "--local", ScopeTag::Local),
];

/// Scope tag from an explicit modifier flag among `args`, if present.
/// With several modifiers the last one wins, matching the shell.
pub fn explicit_modifier(tree: &SyntaxTree, args: &[NodeIndex]) -> Option<ScopeTag> {
    let mut found = None;
    for &arg in args {
        for &(short, long, tag) in SCOPE_MODIFIERS {
            if Opt::new(short, long).matches(tree, arg) {
                found = Some(tag);
            }
        }
    }
    found
}

/// Single modifier flag as an `Opt` list, for callers that scan manually.
pub fn modifier_opts() -> [Opt; 4] {
    [
        Opt::new("-U", "--universal"),
        Opt::new("-g", "--global"),
        Opt::new("-f", "--function"),
        Opt::new("-l", "--local"),
    ]
}

pub fn has_modifier(tree: &SyntaxTree, args: &[NodeIndex]) -> bool {
    first_matching_opt(tree, args, &modifier_opts()).is_some()
}

fn scope_at(tree: &SyntaxTree, node: NodeIndex, tag: ScopeTag) -> DefinitionScope {
    DefinitionScope::new(node, tree.range(node), tag)
}

/// Scope of a variable definition given its optional explicit modifier.
///
/// Rule order (first match wins):
/// 1. explicit `-U`/`-g` bind to the file root with that tag; `-f` pins to
///    the nearest function; `-l` binds to the nearest scope node
/// 2. no flag inside a function body: function-scoped
/// 3. no flag at the root of a config/conf.d file: global
/// 4. no flag elsewhere: inherit, bound to the enclosing scope
pub fn variable_scope(
    tree: &SyntaxTree,
    document: &LspDocument,
    defining_node: NodeIndex,
    explicit: Option<ScopeTag>,
) -> DefinitionScope {
    match explicit {
        Some(tag @ (ScopeTag::Global | ScopeTag::Universal)) => scope_at(tree, tree.root(), tag),
        Some(ScopeTag::Function) => {
            let node = parent_function(tree, defining_node).unwrap_or_else(|| tree.root());
            scope_at(tree, node, ScopeTag::Function)
        }
        Some(tag) => scope_at(tree, enclosing_scope(tree, defining_node), tag),
        None => {
            if let Some(func) = parent_function(tree, defining_node) {
                return scope_at(tree, func, ScopeTag::Function);
            }
            if document.is_config_file() && is_top_level(tree, defining_node) {
                return scope_at(tree, tree.root(), ScopeTag::Global);
            }
            scope_at(tree, enclosing_scope(tree, defining_node), ScopeTag::Inherit)
        }
    }
}

/// Scope of a function definition.
///
/// Autoloaded function files make the matching function name global, as do
/// root-level functions in startup-loaded files; everything else is local
/// to the surrounding scope.
pub fn function_scope(
    tree: &SyntaxTree,
    document: &LspDocument,
    function_node: NodeIndex,
    name: &str,
) -> DefinitionScope {
    let global = match document.autoload_type() {
        fishls_common::AutoloadType::Functions => name == document.autoload_name(),
        fishls_common::AutoloadType::Config | fishls_common::AutoloadType::Conf => {
            is_top_level(tree, function_node)
        }
        _ => false,
    };
    let scope_node = enclosing_scope(tree, function_node);
    if global {
        scope_at(tree, tree.root(), ScopeTag::Global)
    } else {
        scope_at(tree, scope_node, ScopeTag::Local)
    }
}

/// Scope of a function parameter or the implicit `argv`: the function body.
pub fn argument_scope(tree: &SyntaxTree, function_node: NodeIndex) -> DefinitionScope {
    scope_at(tree, function_node, ScopeTag::Local)
}

/// Scope of a `for` loop variable: the loop itself.
pub fn for_scope(tree: &SyntaxTree, for_node: NodeIndex) -> DefinitionScope {
    scope_at(tree, for_node, ScopeTag::Local)
}

/// Scope of argparse `_flag_` variables: the enclosing function, or the
/// file root for a bare script fragment.
pub fn argparse_scope(tree: &SyntaxTree, command_node: NodeIndex) -> DefinitionScope {
    let node = parent_function(tree, command_node).unwrap_or_else(|| tree.root());
    scope_at(tree, node, ScopeTag::Local)
}

/// Scope of an inline `NAME=value` prefix: the command it prefixes.
pub fn inline_variable_scope(tree: &SyntaxTree, command_node: NodeIndex) -> DefinitionScope {
    scope_at(tree, command_node, ScopeTag::Local)
}

/// `export` always creates a global exported variable.
pub fn export_scope(tree: &SyntaxTree) -> DefinitionScope {
    scope_at(tree, tree.root(), ScopeTag::Global)
}
