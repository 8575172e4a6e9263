//! Syntax tree storage.
//!
//! Nodes live in a flat `NodeArena` and are addressed by `NodeIndex`
//! handles. Children are owned by their parent node; the parent link is a
//! plain back-index. The arena is built bottom-up during parsing, so a
//! child's index is always smaller than its parent's.

use fishls_common::{LineMap, Range, Span};
use serde::{Deserialize, Serialize};

/// Handle into a `NodeArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

/// The closed set of node kinds the engine dispatches on.
///
/// Parsing classifies every node exactly once; downstream code pattern
/// matches on this enum instead of comparing type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    Comment,
    FunctionDefinition,
    ForStatement,
    WhileStatement,
    IfStatement,
    ElseClause,
    ElseIfClause,
    SwitchStatement,
    CaseClause,
    BeginStatement,
    Command,
    Pipeline,
    Redirection,
    VariableName,
    VariableExpansion,
    /// `NAME=value` prefix before a command name.
    VariableAssignment,
    Word,
    /// A word beginning with `-` in command-argument position.
    Option,
    DoubleQuoteString,
    SingleQuoteString,
    /// A word with embedded expansions, e.g. `pre$var.txt`.
    Concatenation,
    /// Unparseable input; children hold whatever was recovered.
    Error,
}

impl NodeKind {
    /// Block statements whose body shares the enclosing variable scope.
    /// Only functions and for-loops introduce new scope nodes.
    pub fn is_scope_transparent_block(self) -> bool {
        matches!(
            self,
            NodeKind::WhileStatement
                | NodeKind::IfStatement
                | NodeKind::ElseClause
                | NodeKind::ElseIfClause
                | NodeKind::SwitchStatement
                | NodeKind::CaseClause
                | NodeKind::BeginStatement
        )
    }
}

/// One node: kind, source span, parent back-link, owned children.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
}

/// Flat storage for one document's tree.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.0 as usize)
    }

    /// Allocate a leaf node. Children are attached by `add_node` or
    /// `attach_child` once they exist.
    pub fn add_leaf(&mut self, kind: NodeKind, span: Span) -> NodeIndex {
        self.add_node(kind, span, Vec::new())
    }

    /// Allocate a node owning `children`, fixing up their parent links.
    pub fn add_node(&mut self, kind: NodeKind, span: Span, children: Vec<NodeIndex>) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        for &child in &children {
            self.set_parent(child, idx);
        }
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
            children,
        });
        idx
    }

    pub fn attach_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.set_parent(child, parent);
        if let Some(node) = self.nodes.get_mut(parent.0 as usize) {
            node.children.push(child);
        }
    }

    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if let Some(node) = self.nodes.get_mut(child.0 as usize) {
            node.parent = Some(parent);
        }
    }

    pub fn kind(&self, idx: NodeIndex) -> Option<NodeKind> {
        self.get(idx).map(|n| n.kind)
    }

    pub fn span(&self, idx: NodeIndex) -> Span {
        self.get(idx).map(|n| n.span).unwrap_or_default()
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.get(idx).and_then(|n| n.parent)
    }

    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.get(idx).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.children(idx).first().copied()
    }

    pub fn next_sibling(&self, idx: NodeIndex) -> Option<NodeIndex> {
        let parent = self.parent(idx)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == idx)?;
        siblings.get(pos + 1).copied()
    }

    pub fn prev_sibling(&self, idx: NodeIndex) -> Option<NodeIndex> {
        let parent = self.parent(idx)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&c| c == idx)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    /// Walk ancestors from the immediate parent outward.
    pub fn ancestors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let mut current = self.parent(idx);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.parent(next);
            Some(next)
        })
    }

    /// Pre-order traversal of the subtree rooted at `idx` using an
    /// explicit work stack.
    pub fn descendants(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let mut stack = vec![idx];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            for &child in self.children(next).iter().rev() {
                stack.push(child);
            }
            Some(next)
        })
    }
}

/// A parsed document: arena, root node, and the source text the spans
/// index into.
#[derive(Debug)]
pub struct SyntaxTree {
    arena: NodeArena,
    root: NodeIndex,
    source: String,
    line_map: LineMap,
}

impl SyntaxTree {
    pub fn new(arena: NodeArena, root: NodeIndex, source: String) -> Self {
        let line_map = LineMap::new(&source);
        SyntaxTree {
            arena,
            root,
            source,
            line_map,
        }
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    pub fn text(&self, idx: NodeIndex) -> &str {
        let span = self.arena.span(idx);
        &self.source[span.start as usize..span.end as usize]
    }

    pub fn range(&self, idx: NodeIndex) -> Range {
        self.line_map.range_of(self.arena.span(idx))
    }

    /// The smallest node whose span contains `offset`, preferring the
    /// deepest match.
    pub fn node_at_offset(&self, offset: u32) -> Option<NodeIndex> {
        let mut current = self.root;
        if !self.arena.span(current).contains_offset(offset) {
            return None;
        }
        'outer: loop {
            for &child in self.arena.children(current) {
                if self.arena.span(child).contains_offset(offset) {
                    current = child;
                    continue 'outer;
                }
            }
            return Some(current);
        }
    }

    /// Named leaf-ish node at a line/character position, if any.
    pub fn node_at_position(&self, position: fishls_common::Position) -> Option<NodeIndex> {
        let offset = self.line_map.offset_at(position)?;
        self.node_at_offset(offset)
    }
}
