//! Rename support.
//!
//! Rename is find-references plus a guard: builtins, reserved keywords,
//! and positions with no resolvable symbol cannot be renamed. The caller
//! turns the returned locations into text edits.

use crate::analyzer::Analyzer;
use crate::cancellation::CancellationToken;
use crate::references::FindReferences;
use crate::resolver::Resolver;
use fishls_common::{Location, Position};

/// Shell builtins, keywords, and reserved variable names that user code
/// can reference but never owns.
const RESERVED_NAMES: &[&str] = &[
    "and", "argparse", "begin", "bg", "bind", "block", "break", "breakpoint", "builtin", "case",
    "cd", "command", "commandline", "complete", "contains", "continue", "count", "disown", "echo",
    "else", "emit", "end", "eval", "exec", "exit", "false", "fg", "for", "function", "functions",
    "history", "if", "jobs", "math", "not", "or", "printf", "pwd", "random", "read", "return",
    "set", "set_color", "source", "status", "string", "switch", "test", "time", "true", "type",
    "ulimit", "wait", "while", "argv", "pipestatus", "fish_pid", "umask",
];

pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

pub struct RenameProvider<'a> {
    analyzer: &'a Analyzer,
}

impl<'a> RenameProvider<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        RenameProvider { analyzer }
    }

    /// Can the symbol at `position` be renamed at all?
    pub fn can_rename(&self, uri: &str, position: Position) -> bool {
        let Some(target) = Resolver::new(self.analyzer).resolve(uri, position) else {
            return false;
        };
        match target.symbol(self.analyzer) {
            Some(symbol) => !is_reserved_name(&symbol.name),
            None => false,
        }
    }

    /// Every location the rename must edit, or `None` when renaming is
    /// not possible here.
    pub fn rename_locations(&self, uri: &str, position: Position) -> Option<Vec<Location>> {
        let target = Resolver::new(self.analyzer).resolve(uri, position)?;
        let symbol = target.symbol(self.analyzer)?;
        if is_reserved_name(&symbol.name) {
            return None;
        }
        Some(FindReferences::new(self.analyzer).references_to(&target, &CancellationToken::new()))
    }
}

#[cfg(test)]
#[path = "../tests/rename_tests.rs"]
mod rename_tests;
