//! Structure parser: token stream to syntax tree.
//!
//! Error tolerant by construction: malformed input produces `Error` nodes
//! (or implicitly closed blocks at end of input) and parsing always
//! continues. The parser never panics on any input.

use crate::lexer::{Token, TokenKind, tokenize};
use crate::node::{NodeArena, NodeIndex, NodeKind, SyntaxTree};
use fishls_common::Span;
use tracing::debug;

/// Parse fish source into a syntax tree. Pure function of the text.
pub fn parse(source: &str) -> SyntaxTree {
    let tokens = tokenize(source);
    let mut state = ParserState {
        source,
        tokens,
        pos: 0,
        arena: NodeArena::with_capacity(source.len() / 8 + 16),
    };
    let children = state.statement_list(&[]);
    let root = state
        .arena
        .add_node(NodeKind::Program, Span::new(0, source.len() as u32), children);
    SyntaxTree::new(state.arena, root, source.to_string())
}

struct ParserState<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    arena: NodeArena,
}

impl<'a> ParserState<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn token_text(&self, token: Token) -> &'a str {
        &self.source[token.span.start as usize..token.span.end as usize]
    }

    /// True when the current token is a word equal to one of `keywords`.
    fn at_keyword(&self, keywords: &[&str]) -> bool {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Word => keywords.contains(&self.token_text(t)),
            _ => false,
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> Option<Token> {
        if self.at_keyword(&[keyword]) {
            self.bump()
        } else {
            None
        }
    }

    /// Parse statements until end of input or a terminator keyword in
    /// statement position. The terminator token is left for the caller.
    fn statement_list(&mut self, terminators: &[&str]) -> Vec<NodeIndex> {
        let mut statements = Vec::new();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Newline
                | TokenKind::Semi
                | TokenKind::Background
                | TokenKind::AndAnd
                | TokenKind::OrOr
                | TokenKind::Pipe => {
                    self.bump();
                }
                TokenKind::Comment => {
                    self.bump();
                    statements.push(self.arena.add_leaf(NodeKind::Comment, token.span));
                }
                TokenKind::Redirect => {
                    // Stray redirect with no command; recover as an error
                    // node and keep going.
                    self.bump();
                    statements.push(self.arena.add_leaf(NodeKind::Error, token.span));
                }
                TokenKind::Word => {
                    let text = self.token_text(token);
                    if terminators.contains(&text) {
                        break;
                    }
                    match text {
                        "function" => statements.push(self.parse_function()),
                        "for" => statements.push(self.parse_for()),
                        "while" => statements.push(self.parse_while()),
                        "if" => statements.push(self.parse_if()),
                        "switch" => statements.push(self.parse_switch()),
                        "begin" => statements.push(self.parse_begin()),
                        "end" | "else" | "case" => {
                            debug!(keyword = text, "stray block keyword");
                            self.bump();
                            statements.push(self.arena.add_leaf(NodeKind::Error, token.span));
                        }
                        _ => statements.push(self.parse_pipeline()),
                    }
                }
                TokenKind::SingleQuote | TokenKind::DoubleQuote => {
                    statements.push(self.parse_pipeline());
                }
            }
        }
        statements
    }

    /// `function NAME [options] ... end`
    fn parse_function(&mut self) -> NodeIndex {
        let keyword = self.bump().expect("caller checked keyword");
        let mut children = self.command_elements(false);
        let body = self.statement_list(&["end"]);
        children.extend(body);
        let end = self.eat_keyword("end");
        let span = self.block_span(keyword.span, &children, end);
        self.arena.add_node(NodeKind::FunctionDefinition, span, children)
    }

    /// `for NAME in values ... end`
    fn parse_for(&mut self) -> NodeIndex {
        let keyword = self.bump().expect("caller checked keyword");
        let mut children = Vec::new();
        if let Some(token) = self.peek()
            && token.kind == TokenKind::Word
            && is_identifier(self.token_text(token))
        {
            self.bump();
            children.push(self.arena.add_leaf(NodeKind::VariableName, token.span));
        }
        // `in` is a keyword here, not an argument.
        self.eat_keyword("in");
        children.extend(self.command_elements(false));
        let body = self.statement_list(&["end"]);
        children.extend(body);
        let end = self.eat_keyword("end");
        let span = self.block_span(keyword.span, &children, end);
        self.arena.add_node(NodeKind::ForStatement, span, children)
    }

    fn parse_while(&mut self) -> NodeIndex {
        let keyword = self.bump().expect("caller checked keyword");
        let mut children = Vec::new();
        children.extend(self.condition());
        children.extend(self.statement_list(&["end"]));
        let end = self.eat_keyword("end");
        let span = self.block_span(keyword.span, &children, end);
        self.arena.add_node(NodeKind::WhileStatement, span, children)
    }

    fn parse_if(&mut self) -> NodeIndex {
        let keyword = self.bump().expect("caller checked keyword");
        let mut children = Vec::new();
        children.extend(self.condition());
        children.extend(self.statement_list(&["end", "else"]));
        while self.at_keyword(&["else"]) {
            let else_kw = self.bump().expect("checked");
            if self.at_keyword(&["if"]) {
                self.bump();
                let mut clause_children = Vec::new();
                clause_children.extend(self.condition());
                clause_children.extend(self.statement_list(&["end", "else"]));
                let span = self.block_span(else_kw.span, &clause_children, None);
                children
                    .push(self.arena.add_node(NodeKind::ElseIfClause, span, clause_children));
            } else {
                let clause_children = self.statement_list(&["end"]);
                let span = self.block_span(else_kw.span, &clause_children, None);
                children.push(self.arena.add_node(NodeKind::ElseClause, span, clause_children));
            }
        }
        let end = self.eat_keyword("end");
        let span = self.block_span(keyword.span, &children, end);
        self.arena.add_node(NodeKind::IfStatement, span, children)
    }

    fn parse_switch(&mut self) -> NodeIndex {
        let keyword = self.bump().expect("caller checked keyword");
        let mut children = self.command_elements(false);
        loop {
            // Skip separators between clauses.
            while let Some(t) = self.peek() {
                match t.kind {
                    TokenKind::Newline | TokenKind::Semi => {
                        self.bump();
                    }
                    TokenKind::Comment => {
                        self.bump();
                        children.push(self.arena.add_leaf(NodeKind::Comment, t.span));
                    }
                    _ => break,
                }
            }
            if self.at_keyword(&["case"]) {
                let case_kw = self.bump().expect("checked");
                let mut clause_children = self.command_elements(false);
                clause_children.extend(self.statement_list(&["case", "end"]));
                let span = self.block_span(case_kw.span, &clause_children, None);
                children.push(self.arena.add_node(NodeKind::CaseClause, span, clause_children));
            } else {
                break;
            }
        }
        let end = self.eat_keyword("end");
        let span = self.block_span(keyword.span, &children, end);
        self.arena.add_node(NodeKind::SwitchStatement, span, children)
    }

    fn parse_begin(&mut self) -> NodeIndex {
        let keyword = self.bump().expect("caller checked keyword");
        let children = self.statement_list(&["end"]);
        let end = self.eat_keyword("end");
        let span = self.block_span(keyword.span, &children, end);
        self.arena.add_node(NodeKind::BeginStatement, span, children)
    }

    /// The condition command of `if`/`while`, if one is present before the
    /// line break.
    fn condition(&mut self) -> Option<NodeIndex> {
        match self.peek() {
            Some(t)
                if matches!(
                    t.kind,
                    TokenKind::Word | TokenKind::SingleQuote | TokenKind::DoubleQuote
                ) =>
            {
                Some(self.parse_pipeline())
            }
            _ => None,
        }
    }

    /// A command, or a pipeline of commands joined by `|`.
    fn parse_pipeline(&mut self) -> NodeIndex {
        let first = self.parse_command();
        if !matches!(self.peek().map(|t| t.kind), Some(TokenKind::Pipe)) {
            return first;
        }
        let mut commands = vec![first];
        while matches!(self.peek().map(|t| t.kind), Some(TokenKind::Pipe)) {
            self.bump();
            // A pipe may be followed by a line break before the next command.
            while matches!(self.peek().map(|t| t.kind), Some(TokenKind::Newline)) {
                self.bump();
            }
            match self.peek() {
                Some(t)
                    if matches!(
                        t.kind,
                        TokenKind::Word | TokenKind::SingleQuote | TokenKind::DoubleQuote
                    ) =>
                {
                    commands.push(self.parse_command());
                }
                _ => break,
            }
        }
        let span = self.covering_span(&commands);
        self.arena.add_node(NodeKind::Pipeline, span, commands)
    }

    fn parse_command(&mut self) -> NodeIndex {
        let children = self.command_elements(true);
        if children.is_empty() {
            // Only reachable on odd token sequences; emit a zero-width
            // error node at the current offset.
            let offset = self.peek().map(|t| t.span.start).unwrap_or(0);
            return self.arena.add_leaf(NodeKind::Error, Span::empty(offset));
        }
        let span = self.covering_span(&children);
        self.arena.add_node(NodeKind::Command, span, children)
    }

    /// Argument elements up to the next statement separator. With
    /// `allow_assignments`, leading `NAME=value` words become
    /// `VariableAssignment` prefixes.
    fn command_elements(&mut self, allow_assignments: bool) -> Vec<NodeIndex> {
        let mut elements = Vec::new();
        let mut has_name = false;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Word => {
                    self.bump();
                    let text = self.token_text(token);
                    if allow_assignments && !has_name && is_inline_assignment(text) {
                        elements.push(self.inline_assignment(token));
                        continue;
                    }
                    if has_name && text.len() > 1 && text.starts_with('-') && !text.contains('$') {
                        elements.push(self.arena.add_leaf(NodeKind::Option, token.span));
                        continue;
                    }
                    has_name = true;
                    elements.push(self.word_element(token));
                }
                TokenKind::SingleQuote => {
                    self.bump();
                    has_name = true;
                    elements.push(self.arena.add_leaf(NodeKind::SingleQuoteString, token.span));
                }
                TokenKind::DoubleQuote => {
                    self.bump();
                    has_name = true;
                    elements.push(self.double_quote_string(token));
                }
                TokenKind::Redirect => {
                    self.bump();
                    elements.push(self.arena.add_leaf(NodeKind::Redirection, token.span));
                }
                _ => break,
            }
        }
        elements
    }

    /// A bare word, possibly containing `$name` expansions.
    fn word_element(&mut self, token: Token) -> NodeIndex {
        let expansions = self.collect_expansions(token.span);
        let text = self.token_text(token);
        if expansions.len() == 1 && text.starts_with('$') {
            let only = expansions[0];
            if self.arena.span(only) == token.span {
                return only;
            }
        }
        if expansions.is_empty() {
            self.arena.add_leaf(NodeKind::Word, token.span)
        } else {
            self.arena.add_node(NodeKind::Concatenation, token.span, expansions)
        }
    }

    fn double_quote_string(&mut self, token: Token) -> NodeIndex {
        // Scan the interior only, so the delimiters never match.
        let inner = Span::new(
            token.span.start + 1,
            token.span.end.saturating_sub(1).max(token.span.start + 1),
        );
        let expansions = self.collect_expansions(inner);
        self.arena.add_node(NodeKind::DoubleQuoteString, token.span, expansions)
    }

    /// `NAME=value` command prefix. The `VariableName` child anchors the
    /// definition; expansions in the value part are still references.
    fn inline_assignment(&mut self, token: Token) -> NodeIndex {
        let text = self.token_text(token);
        let eq = text.find('=').expect("caller checked assignment");
        let name_span = Span::new(token.span.start, token.span.start + eq as u32);
        let value_span = Span::new(token.span.start + eq as u32 + 1, token.span.end);
        let mut children = vec![self.arena.add_leaf(NodeKind::VariableName, name_span)];
        children.extend(self.collect_expansions(value_span));
        self.arena.add_node(NodeKind::VariableAssignment, token.span, children)
    }

    /// `$name` occurrences inside `span`, as `VariableExpansion` nodes each
    /// holding a `VariableName` child for the bare identifier.
    fn collect_expansions(&mut self, span: Span) -> Vec<NodeIndex> {
        let bytes = self.source.as_bytes();
        let mut out = Vec::new();
        let mut i = span.start as usize;
        let end = (span.end as usize).min(bytes.len());
        while i < end {
            match bytes[i] {
                b'\\' => i += 2,
                b'$' => {
                    let name_start = i + 1;
                    let mut j = name_start;
                    while j < end && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
                        j += 1;
                    }
                    if j > name_start {
                        let name =
                            self.arena.add_leaf(NodeKind::VariableName, Span::new(name_start as u32, j as u32));
                        let expansion = self.arena.add_node(
                            NodeKind::VariableExpansion,
                            Span::new(i as u32, j as u32),
                            vec![name],
                        );
                        out.push(expansion);
                    }
                    i = j.max(i + 1);
                }
                _ => i += 1,
            }
        }
        out
    }

    fn covering_span(&self, children: &[NodeIndex]) -> Span {
        let mut iter = children.iter();
        let first = match iter.next() {
            Some(&c) => self.arena.span(c),
            None => Span::default(),
        };
        children
            .iter()
            .fold(first, |acc, &c| acc.join(self.arena.span(c)))
    }

    /// Span of a block statement: keyword through `end` when matched,
    /// otherwise through the last recovered child.
    fn block_span(&self, keyword: Span, children: &[NodeIndex], end: Option<Token>) -> Span {
        let mut span = keyword;
        if let Some(&last) = children.last() {
            span = span.join(self.arena.span(last));
        }
        if let Some(end) = end {
            span = span.join(end.span);
        }
        span
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `NAME=value` with a well-formed variable name before the `=`.
fn is_inline_assignment(text: &str) -> bool {
    match text.find('=') {
        Some(0) | None => false,
        Some(eq) => is_identifier(&text[..eq]),
    }
}
