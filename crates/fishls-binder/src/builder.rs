//! Symbol tree builder.
//!
//! One top-down walk over a parsed document produces the nested symbol
//! forest: functions own their parameters and body definitions, loops own
//! their bodies, everything else hangs off the file root. The walk uses an
//! explicit work stack and threads the owning symbol through it, so nesting
//! depth never touches the call stack.

use crate::scope::{
    argparse_scope, argument_scope, explicit_modifier, export_scope, for_scope, function_scope,
    inline_variable_scope, variable_scope,
};
use crate::symbol::{DefinitionScope, FishKind, FishSymbol, ScopeTag, SymbolArena, SymbolId};
use fishls_common::{LspDocument, Position, Range, Span};
use fishls_parser::classify::{
    command_name, command_name_node, is_end_stdin, is_option, is_string, unquote,
};
use fishls_parser::options::{has_opt, is_opt_value, opt_values};
use fishls_parser::{NodeIndex, NodeKind, Opt, SyntaxTree};
use tracing::debug;

fn argument_names_opt() -> Opt {
    Opt::new("-a", "--argument-names")
}

fn inherited_variable_opts() -> [Opt; 2] {
    [
        Opt::new("-V", "--inherit-variable"),
        Opt::new("-v", "--on-variable"),
    ]
}

/// `read` flags whose following argument is a value, not a variable name.
fn read_value_flags() -> [Opt; 6] {
    [
        Opt::new("-c", "--command"),
        Opt::new("-d", "--delimiter"),
        Opt::new("-n", "--nchars"),
        Opt::new("-p", "--prompt"),
        Opt::new("-P", "--prompt-str"),
        Opt::new("-R", "--right-prompt"),
    ]
}

/// `argparse` flags taking a value before the `--` separator.
fn argparse_value_flags() -> [Opt; 4] {
    [
        Opt::new("-n", "--name"),
        Opt::new("-x", "--exclusive"),
        Opt::new("-N", "--min-args"),
        Opt::new("-X", "--max-args"),
    ]
}

/// The symbol forest of one document.
#[derive(Debug, Default)]
pub struct SymbolForest {
    pub arena: SymbolArena,
    pub roots: Vec<SymbolId>,
}

/// Build the symbol forest for `document`'s parsed `tree`.
pub fn build_symbols(document: &LspDocument, tree: &SyntaxTree) -> SymbolForest {
    let mut builder = Builder {
        document,
        tree,
        arena: SymbolArena::new(),
        roots: Vec::new(),
    };
    builder.run();
    debug!(
        uri = document.uri(),
        symbols = builder.arena.len(),
        "built symbol forest"
    );
    SymbolForest {
        arena: builder.arena,
        roots: builder.roots,
    }
}

struct Builder<'a> {
    document: &'a LspDocument,
    tree: &'a SyntaxTree,
    arena: SymbolArena,
    roots: Vec<SymbolId>,
}

impl Builder<'_> {
    fn run(&mut self) {
        if self.document.is_plain_script() {
            self.push_script_argv();
        }
        let mut stack: Vec<(NodeIndex, Option<SymbolId>)> = Vec::new();
        for &child in self.tree.arena().children(self.tree.root()).iter().rev() {
            stack.push((child, None));
        }
        while let Some((node, parent)) = stack.pop() {
            match self.tree.arena().kind(node) {
                Some(NodeKind::FunctionDefinition) => {
                    let owner = self.process_function(node, parent).or(parent);
                    self.push_children(&mut stack, node, owner);
                }
                Some(NodeKind::ForStatement) => {
                    let owner = self.process_for(node, parent).or(parent);
                    self.push_children(&mut stack, node, owner);
                }
                Some(NodeKind::Command) => {
                    self.process_command(node, parent);
                }
                Some(
                    NodeKind::Pipeline
                    | NodeKind::WhileStatement
                    | NodeKind::IfStatement
                    | NodeKind::ElseClause
                    | NodeKind::ElseIfClause
                    | NodeKind::SwitchStatement
                    | NodeKind::CaseClause
                    | NodeKind::BeginStatement
                    | NodeKind::Error,
                ) => {
                    self.push_children(&mut stack, node, parent);
                }
                _ => {}
            }
        }
    }

    fn push_children(
        &self,
        stack: &mut Vec<(NodeIndex, Option<SymbolId>)>,
        node: NodeIndex,
        parent: Option<SymbolId>,
    ) {
        for &child in self.tree.arena().children(node).iter().rev() {
            stack.push((child, parent));
        }
    }

    /// Allocate and hook up one symbol.
    fn push_symbol(&mut self, symbol: FishSymbol, parent: Option<SymbolId>) -> SymbolId {
        let id = self.arena.alloc(symbol);
        match parent {
            Some(parent) => self.arena.attach(parent, id),
            None => self.roots.push(id),
        }
        id
    }

    fn make_symbol(
        &self,
        name: impl Into<String>,
        fish_kind: FishKind,
        node: NodeIndex,
        focused_node: NodeIndex,
        scope: DefinitionScope,
    ) -> FishSymbol {
        FishSymbol {
            name: name.into(),
            fish_kind,
            uri: self.document.uri().to_string(),
            detail: self.detail_of(node),
            range: self.tree.range(node),
            selection_range: self.tree.range(focused_node),
            node,
            focused_node,
            scope,
            parent: None,
            children: Vec::new(),
            aliased_names: Vec::new(),
        }
    }

    /// First source line of the defining construct.
    fn detail_of(&self, node: NodeIndex) -> String {
        self.tree
            .text(node)
            .lines()
            .next()
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    /// Every script invocation carries `argv` even without a surrounding
    /// function.
    fn push_script_argv(&mut self) {
        let root = self.tree.root();
        let mut symbol = self.make_symbol(
            "argv",
            FishKind::Variable,
            root,
            root,
            argument_scope(self.tree, root),
        );
        symbol.detail = "the arguments passed to the script".to_string();
        symbol.selection_range = Range::new(Position::new(0, 0), Position::new(0, 0));
        self.push_symbol(symbol, None);
    }

    /// Arguments of a command, after the effective command name.
    fn command_args(&self, command: NodeIndex) -> Vec<NodeIndex> {
        let Some(name) = command_name_node(self.tree, command) else {
            return Vec::new();
        };
        let children = self.tree.arena().children(command);
        match children.iter().position(|&c| c == name) {
            Some(pos) => children[pos + 1..].to_vec(),
            None => Vec::new(),
        }
    }

    fn process_function(&mut self, node: NodeIndex, parent: Option<SymbolId>) -> Option<SymbolId> {
        let arena = self.tree.arena();
        let name_node = arena
            .children(node)
            .iter()
            .copied()
            .find(|&c| arena.kind(c) == Some(NodeKind::Word))?;
        let name = self.tree.text(name_node).to_string();
        let scope = function_scope(self.tree, self.document, node, &name);
        let symbol = self.make_symbol(&name, FishKind::Function, node, name_node, scope);
        let id = self.push_symbol(symbol, parent);

        // The implicit argument list is always in scope inside the body.
        let mut argv = self.make_symbol(
            "argv",
            FishKind::Argument,
            node,
            name_node,
            argument_scope(self.tree, node),
        );
        argv.detail = format!("the arguments passed to `{name}`");
        self.push_symbol(argv, Some(id));

        let children = self.tree.arena().children(node).to_vec();
        let mut params = opt_values(self.tree, &children, argument_names_opt());
        for opt in inherited_variable_opts() {
            params.extend(opt_values(self.tree, &children, opt).first().copied());
        }
        params.retain(|&value| self.tree.arena().kind(value) == Some(NodeKind::Word));
        // Source order, whichever flag introduced them.
        params.sort_by_key(|&value| self.tree.arena().span(value).start);
        for value in params {
            let symbol = self.make_symbol(
                self.tree.text(value),
                FishKind::Argument,
                value,
                value,
                argument_scope(self.tree, node),
            );
            self.push_symbol(symbol, Some(id));
        }
        Some(id)
    }

    fn process_for(&mut self, node: NodeIndex, parent: Option<SymbolId>) -> Option<SymbolId> {
        let arena = self.tree.arena();
        let var = arena
            .children(node)
            .iter()
            .copied()
            .find(|&c| arena.kind(c) == Some(NodeKind::VariableName))?;
        let symbol = self.make_symbol(
            self.tree.text(var),
            FishKind::For,
            node,
            var,
            for_scope(self.tree, node),
        );
        Some(self.push_symbol(symbol, parent))
    }

    fn process_command(&mut self, node: NodeIndex, parent: Option<SymbolId>) {
        // `VAR=value cmd` prefixes define a variable for just that command.
        let arena = self.tree.arena();
        let assignments: Vec<NodeIndex> = arena
            .children(node)
            .iter()
            .copied()
            .filter(|&c| arena.kind(c) == Some(NodeKind::VariableAssignment))
            .collect();
        for assignment in assignments {
            self.process_inline_assignment(node, assignment, parent);
        }
        match command_name(self.tree, node) {
            Some("set") => self.process_set(node, parent),
            Some("read") => self.process_read(node, parent),
            Some("argparse") => self.process_argparse(node, parent),
            Some("alias") => self.process_alias(node, parent),
            Some("export") => self.process_export(node, parent),
            _ => {}
        }
    }

    fn process_inline_assignment(
        &mut self,
        command: NodeIndex,
        assignment: NodeIndex,
        parent: Option<SymbolId>,
    ) {
        let arena = self.tree.arena();
        let Some(name) = arena
            .children(assignment)
            .iter()
            .copied()
            .find(|&c| arena.kind(c) == Some(NodeKind::VariableName))
        else {
            return;
        };
        let symbol = self.make_symbol(
            self.tree.text(name),
            FishKind::InlineVariable,
            assignment,
            name,
            inline_variable_scope(self.tree, command),
        );
        self.push_symbol(symbol, parent);
    }

    fn process_set(&mut self, node: NodeIndex, parent: Option<SymbolId>) {
        let args = self.command_args(node);
        // Queries and erasures read or remove variables; neither defines one.
        if has_opt(self.tree, &args, Opt::new("-q", "--query"))
            || has_opt(self.tree, &args, Opt::new("-e", "--erase"))
        {
            return;
        }
        let Some(def) = args.iter().copied().find(|&a| !is_option(self.tree, a)) else {
            return;
        };
        // `set $name …` assigns through a dynamic name no index can track.
        if self.tree.arena().kind(def) != Some(NodeKind::Word) {
            return;
        }
        let explicit = explicit_modifier(self.tree, &args);
        let name = variable_base_name(self.tree.text(def));
        let scope = variable_scope(self.tree, self.document, node, explicit);
        let mut symbol = self.make_symbol(name, FishKind::Set, node, def, scope);
        symbol.selection_range = self.name_range(def, name.len());
        self.push_symbol(symbol, parent);
    }

    fn process_read(&mut self, node: NodeIndex, parent: Option<SymbolId>) {
        let args = self.command_args(node);
        let value_flags = read_value_flags();
        // A scope flag applies to the variables that follow it, so the
        // current modifier is tracked through the argument list.
        let mut explicit = None;
        for &arg in &args {
            if is_option(self.tree, arg) {
                if let Some(tag) = explicit_modifier(self.tree, &[arg]) {
                    explicit = Some(tag);
                }
                continue;
            }
            if value_flags
                .iter()
                .any(|&opt| is_opt_value(self.tree, arg, opt))
            {
                continue;
            }
            if self.tree.arena().kind(arg) != Some(NodeKind::Word) {
                continue;
            }
            let scope = variable_scope(self.tree, self.document, node, explicit);
            let symbol = self.make_symbol(self.tree.text(arg), FishKind::Read, node, arg, scope);
            self.push_symbol(symbol, parent);
        }
    }

    fn process_argparse(&mut self, node: NodeIndex, parent: Option<SymbolId>) {
        let args = self.command_args(node);
        // Without the `--` separator argparse fails before defining anything.
        let Some(end) = args.iter().position(|&a| is_end_stdin(self.tree, a)) else {
            return;
        };
        let value_flags = argparse_value_flags();
        let scope = argparse_scope(self.tree, node);
        for &arg in &args[..end] {
            if is_option(self.tree, arg) {
                continue;
            }
            if value_flags
                .iter()
                .any(|&opt| is_opt_value(self.tree, arg, opt))
            {
                continue;
            }
            let quoted = is_string(self.tree, arg);
            if !quoted && self.tree.arena().kind(arg) != Some(NodeKind::Word) {
                continue;
            }
            let raw = unquote(self.tree, arg);
            // `n/name=?` keeps only the flag spellings before `=`.
            let spec = raw.split('=').next().unwrap_or_default();
            if spec.is_empty() {
                continue;
            }
            let parts: Vec<&str> = spec.split('/').collect();
            let names: Vec<String> = parts
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| format!("_flag_{}", p.replace('-', "_")))
                .collect();
            if names.is_empty() {
                continue;
            }
            let base = self.tree.arena().span(arg).start + u32::from(quoted);
            let mut offset = 0u32;
            for part in &parts {
                // An empty part still occupies its separator slot.
                if part.is_empty() {
                    offset += 1;
                    continue;
                }
                let name = format!("_flag_{}", part.replace('-', "_"));
                let span = Span::new(base + offset, base + offset + part.len() as u32);
                let mut symbol = self.make_symbol(name, FishKind::Argparse, node, arg, scope);
                symbol.selection_range = self.tree.line_map().range_of(span);
                symbol.aliased_names = names.clone();
                self.push_symbol(symbol, parent);
                offset += part.len() as u32 + 1;
            }
        }
    }

    fn process_alias(&mut self, node: NodeIndex, parent: Option<SymbolId>) {
        let args = self.command_args(node);
        let Some(first) = args.iter().copied().find(|&a| !is_option(self.tree, a)) else {
            return;
        };
        let quoted = is_string(self.tree, first);
        let text = unquote(self.tree, first);
        let name = text.split('=').next().unwrap_or_default().to_string();
        if name.is_empty() {
            return;
        }
        // Aliases behave like functions: visible everywhere only when the
        // shell defines them at startup.
        let scope = if self.document.is_config_file() && parent.is_none() {
            variable_scope(self.tree, self.document, node, Some(ScopeTag::Global))
        } else {
            variable_scope(self.tree, self.document, node, Some(ScopeTag::Local))
        };
        let mut symbol = self.make_symbol(&name, FishKind::Alias, node, first, scope);
        let start = self.tree.arena().span(first).start + u32::from(quoted);
        symbol.selection_range = self
            .tree
            .line_map()
            .range_of(Span::new(start, start + name.len() as u32));
        self.push_symbol(symbol, parent);
    }

    fn process_export(&mut self, node: NodeIndex, parent: Option<SymbolId>) {
        let args = self.command_args(node);
        let Some(first) = args.iter().copied().find(|&a| !is_option(self.tree, a)) else {
            return;
        };
        let quoted = is_string(self.tree, first);
        let text = unquote(self.tree, first);
        let name = text.split('=').next().unwrap_or_default().to_string();
        if name.is_empty() {
            return;
        }
        let mut symbol =
            self.make_symbol(&name, FishKind::Export, node, first, export_scope(self.tree));
        let start = self.tree.arena().span(first).start + u32::from(quoted);
        symbol.selection_range = self
            .tree
            .line_map()
            .range_of(Span::new(start, start + name.len() as u32));
        self.push_symbol(symbol, parent);
    }

    /// Identifier range when the defining word carries extra syntax, e.g.
    /// the index brackets in `set PATH[1] …`.
    fn name_range(&self, node: NodeIndex, name_len: usize) -> Range {
        let start = self.tree.arena().span(node).start;
        self.tree
            .line_map()
            .range_of(Span::new(start, start + name_len as u32))
    }
}

/// `PATH[1]` defines `PATH`.
fn variable_base_name(text: &str) -> &str {
    text.split('[').next().unwrap_or(text)
}
