//! Node classification predicates.
//!
//! Pure functions over a tree and a node handle. These answer the
//! "what is this node" questions the binder and resolvers ask, including
//! the distinction between a defining construct and a command that merely
//! shares its name (`echo set` is not a definition).

use crate::node::{NodeIndex, NodeKind, SyntaxTree};

/// Command words that wrap another command rather than naming one:
/// `and grep …` runs `grep`.
const COMMAND_DECORATORS: &[&str] = &["and", "or", "not", "command", "builtin", "exec", "time"];

pub fn is_program(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena().kind(idx) == Some(NodeKind::Program)
}

pub fn is_comment(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena().kind(idx) == Some(NodeKind::Comment)
}

pub fn is_function_definition(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena().kind(idx) == Some(NodeKind::FunctionDefinition)
}

pub fn is_for_loop(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena().kind(idx) == Some(NodeKind::ForStatement)
}

pub fn is_command(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena().kind(idx) == Some(NodeKind::Command)
}

pub fn is_error(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena().kind(idx) == Some(NodeKind::Error)
}

/// The node carrying a command's effective name: the first `Word` child,
/// skipping `NAME=value` prefixes and decorator words like `command` or
/// `and`.
pub fn command_name_node(tree: &SyntaxTree, idx: NodeIndex) -> Option<NodeIndex> {
    if !is_command(tree, idx) {
        return None;
    }
    for &child in tree.arena().children(idx) {
        match tree.arena().kind(child)? {
            NodeKind::VariableAssignment => continue,
            NodeKind::Word => {
                if COMMAND_DECORATORS.contains(&tree.text(child)) {
                    continue;
                }
                return Some(child);
            }
            _ => return None,
        }
    }
    None
}

pub fn command_name<'t>(tree: &'t SyntaxTree, idx: NodeIndex) -> Option<&'t str> {
    command_name_node(tree, idx).map(|n| tree.text(n))
}

pub fn is_command_with_name(tree: &SyntaxTree, idx: NodeIndex, name: &str) -> bool {
    command_name(tree, idx) == Some(name)
}

/// Commands that introduce variables: `set`, `read`, `argparse`.
pub fn is_variable_definition_command(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    matches!(command_name(tree, idx), Some("set" | "read" | "argparse"))
}

pub fn is_alias_command(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    is_command_with_name(tree, idx, "alias")
}

pub fn is_export_command(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    is_command_with_name(tree, idx, "export")
}

/// `source file.fish` or `. file.fish`.
pub fn is_source_command(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    matches!(command_name(tree, idx), Some("source" | "."))
}

/// The filename argument of a source command. Bare `-` reads stdin and
/// names no file.
pub fn source_command_argument(tree: &SyntaxTree, idx: NodeIndex) -> Option<NodeIndex> {
    if !is_source_command(tree, idx) {
        return None;
    }
    let name = command_name_node(tree, idx)?;
    let children = tree.arena().children(idx);
    let pos = children.iter().position(|&c| c == name)?;
    let arg = children.get(pos + 1).copied()?;
    match tree.arena().kind(arg)? {
        NodeKind::Word | NodeKind::SingleQuoteString | NodeKind::DoubleQuoteString
        | NodeKind::Concatenation => {
            if tree.text(arg) == "-" {
                None
            } else {
                Some(arg)
            }
        }
        _ => None,
    }
}

pub fn is_source_command_argument(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena()
        .parent(idx)
        .and_then(|p| source_command_argument(tree, p))
        == Some(idx)
}

/// Blocks whose bodies do not introduce variable scope (`if`, `while`,
/// `switch`, `begin` and their clauses).
pub fn is_scope_transparent_block(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena()
        .kind(idx)
        .is_some_and(|k| k.is_scope_transparent_block())
}

/// Nodes whose span bounds symbol visibility: the file root, function
/// bodies, and for-loop bodies.
pub fn is_scope_node(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    matches!(
        tree.arena().kind(idx),
        Some(NodeKind::Program | NodeKind::FunctionDefinition | NodeKind::ForStatement)
    )
}

pub fn is_option(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena().kind(idx) == Some(NodeKind::Option)
}

pub fn is_short_option(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    is_option(tree, idx) && !tree.text(idx).starts_with("--")
}

pub fn is_long_option(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    is_option(tree, idx) && tree.text(idx).starts_with("--")
}

/// The `--` separator terminating option parsing.
pub fn is_end_stdin(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    is_option(tree, idx) && tree.text(idx) == "--"
}

pub fn is_variable_expansion(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena().kind(idx) == Some(NodeKind::VariableExpansion)
}

pub fn is_variable_name(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    tree.arena().kind(idx) == Some(NodeKind::VariableName)
}

pub fn is_string(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    matches!(
        tree.arena().kind(idx),
        Some(NodeKind::SingleQuoteString | NodeKind::DoubleQuoteString)
    )
}

/// Strip matching quotes from a string node's text.
pub fn unquote<'t>(tree: &'t SyntaxTree, idx: NodeIndex) -> &'t str {
    let text = tree.text(idx);
    if is_string(tree, idx) && text.len() >= 2 {
        let bytes = text.as_bytes();
        if (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[text.len() - 1] == bytes[0] {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// True when no enclosing function exists; scope-transparent blocks do
/// not count against top-levelness.
pub fn is_top_level(tree: &SyntaxTree, idx: NodeIndex) -> bool {
    !tree
        .arena()
        .ancestors(idx)
        .any(|a| is_function_definition(tree, a))
}

/// Nearest enclosing function definition, if any.
pub fn parent_function(tree: &SyntaxTree, idx: NodeIndex) -> Option<NodeIndex> {
    tree.arena()
        .ancestors(idx)
        .find(|&a| is_function_definition(tree, a))
}

/// Nearest enclosing scope node; every node has one because the program
/// root qualifies.
pub fn enclosing_scope(tree: &SyntaxTree, idx: NodeIndex) -> NodeIndex {
    tree.arena()
        .ancestors(idx)
        .find(|&a| is_scope_node(tree, a))
        .unwrap_or_else(|| tree.root())
}
