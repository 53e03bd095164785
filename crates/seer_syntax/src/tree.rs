//! Arena parse tree.
//!
//! Nodes live in a [`Tree`] and are addressed by [`NodeId`]. Leaves keep their token text and
//! prefix, so the tree reproduces the parsed source exactly. Branches are named after the grammar
//! rule that produced them, or [`ERROR_NODE`] for input that error recovery set aside.
//!
//! ## Notes
//! - A rule that matched a single child is collapsed into that child, except for `file_input` and
//!   `expr_stmt`. A lone name therefore has an `expr_stmt` parent, not an `atom` parent.
//! - Branches built by the parser are never empty.

use std::fmt::Write as _;
use std::sync::Arc;

use seer_core::lang::operators::OperatorId;

use crate::grammar::SymbolId;
use crate::position::Position;
use crate::token::TokenType;

/// Type name of branches holding input that error recovery removed from the parser stack.
pub const ERROR_NODE: &str = "error_node";

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a leaf holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Name,
    Keyword,
    Operator(OperatorId),
    Number,
    String,
    Newline,
    Indent,
    Dedent,
    EndMarker,
    /// A token the parser could not place anywhere.
    ErrorLeaf(TokenType),
}

impl LeafKind {
    /// Leaf kind for a shifted token; `is_keyword` is the parser's classification of a NAME.
    pub fn from_token(kind: TokenType, is_keyword: bool) -> LeafKind {
        match kind {
            TokenType::Name if is_keyword => LeafKind::Keyword,
            TokenType::Name => LeafKind::Name,
            TokenType::Number => LeafKind::Number,
            TokenType::String => LeafKind::String,
            TokenType::Op(id) => LeafKind::Operator(id),
            TokenType::Newline => LeafKind::Newline,
            TokenType::Indent => LeafKind::Indent,
            TokenType::Dedent => LeafKind::Dedent,
            TokenType::EndMarker => LeafKind::EndMarker,
            TokenType::ErrorToken => LeafKind::ErrorLeaf(TokenType::ErrorToken),
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            LeafKind::Name => "name",
            LeafKind::Keyword => "keyword",
            LeafKind::Operator(_) => "operator",
            LeafKind::Number => "number",
            LeafKind::String => "string",
            LeafKind::Newline => "newline",
            LeafKind::Indent => "indent",
            LeafKind::Dedent => "dedent",
            LeafKind::EndMarker => "endmarker",
            LeafKind::ErrorLeaf(_) => "error_leaf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub kind: LeafKind,
    pub value: String,
    pub prefix: String,
    pub start: Position,
    parent: Option<NodeId>,
}

impl Leaf {
    /// Position just past the value; multi-line values move to a later line.
    pub fn end(&self) -> Position {
        self.start.advanced_by(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Grammar rule, or `None` for an error node.
    pub symbol: Option<SymbolId>,
    pub name: Arc<str>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Leaf),
    Branch(Branch),
}

/// Node arena.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn add_leaf(&mut self, kind: LeafKind, value: String, prefix: String, start: Position) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::Leaf(Leaf {
            kind,
            value,
            prefix,
            start,
            parent: None,
        }));
        id
    }

    /// Add a branch and re-parent `children` under it.
    pub(crate) fn add_branch(&mut self, symbol: Option<SymbolId>, name: Arc<str>, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in &children {
            self.set_parent(*child, id);
        }
        self.nodes.push(Node::Branch(Branch {
            symbol,
            name,
            children,
            parent: None,
        }));
        id
    }

    fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        match self.nodes.get_mut(id.index()) {
            Some(Node::Leaf(leaf)) => leaf.parent = Some(parent),
            Some(Node::Branch(branch)) => branch.parent = Some(parent),
            None => {}
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn leaf(&self, id: NodeId) -> Option<&Leaf> {
        match self.node(id) {
            Some(Node::Leaf(leaf)) => Some(leaf),
            _ => None,
        }
    }

    pub fn branch(&self, id: NodeId) -> Option<&Branch> {
        match self.node(id) {
            Some(Node::Branch(branch)) => Some(branch),
            _ => None,
        }
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.leaf(id).is_some()
    }

    /// Rule name for branches, kind name (`name`, `keyword`, `error_leaf`, ...) for leaves.
    pub fn type_name(&self, id: NodeId) -> &str {
        match self.node(id) {
            Some(Node::Leaf(leaf)) => leaf.kind.type_name(),
            Some(Node::Branch(branch)) => &branch.name,
            None => "",
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(Node::Branch(branch)) => &branch.children,
            _ => &[],
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id)? {
            Node::Leaf(leaf) => leaf.parent,
            Node::Branch(branch) => branch.parent,
        }
    }

    /// Leaf value, or `""` for branches.
    pub fn value(&self, id: NodeId) -> &str {
        self.leaf(id).map_or("", |leaf| leaf.value.as_str())
    }

    pub fn first_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            if self.is_leaf(current) {
                return Some(current);
            }
            current = *self.children(current).first()?;
        }
    }

    pub fn last_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            if self.is_leaf(current) {
                return Some(current);
            }
            current = *self.children(current).last()?;
        }
    }

    /// Start of the first leaf (prefix excluded).
    pub fn start(&self, id: NodeId) -> Position {
        self.first_leaf(id)
            .and_then(|leaf| self.leaf(leaf))
            .map_or(Position::START, |leaf| leaf.start)
    }

    /// End of the last leaf.
    pub fn end(&self, id: NodeId) -> Position {
        self.last_leaf(id)
            .and_then(|leaf| self.leaf(leaf))
            .map_or(Position::START, Leaf::end)
    }

    /// All leaves under `id`, in document order.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if self.is_leaf(current) {
                out.push(current);
            } else {
                pending.extend(self.children(current).iter().rev());
            }
        }
        out
    }

    /// Source text of `id`, prefixes included.
    pub fn code(&self, id: NodeId) -> String {
        self.leaves(id)
            .into_iter()
            .filter_map(|leaf| self.leaf(leaf))
            .fold(String::new(), |mut out, leaf| {
                out.push_str(&leaf.prefix);
                out.push_str(&leaf.value);
                out
            })
    }

    /// The leaf before `id` in document order, or `None` for the first leaf of the tree.
    pub fn previous_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut node = id;
        let sibling = loop {
            let parent = self.parent(node)?;
            let siblings = self.children(parent);
            let index = siblings.iter().position(|c| *c == node)?;
            if index == 0 {
                node = parent;
            } else {
                break siblings[index - 1];
            }
        };
        self.last_leaf(sibling)
    }

    /// Indented outline of the subtree, one node per line.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self.node(id) {
            Some(Node::Leaf(leaf)) => {
                let _ = writeln!(out, "{indent}{} {:?} @{}", leaf.kind.type_name(), leaf.value, leaf.start);
            }
            Some(Node::Branch(branch)) => {
                let _ = writeln!(out, "{indent}{}", branch.name);
                for child in &branch.children {
                    self.dump_into(*child, depth + 1, out);
                }
            }
            None => {}
        }
    }
}
