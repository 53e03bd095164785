//! The parsed module and its position queries.

use crate::position::Position;
use crate::tree::{LeafKind, NodeId, Tree};

use super::ErrorStatement;

/// Node types that statement lookup descends into instead of returning.
const STATEMENT_CONTAINERS: [&str; 10] = [
    "decorated",
    "simple_stmt",
    "suite",
    "if_stmt",
    "while_stmt",
    "for_stmt",
    "try_stmt",
    "with_stmt",
    "funcdef",
    "classdef",
];

/// A parsed module: the tree plus what error recovery recorded.
#[derive(Debug, Clone)]
pub struct Module {
    tree: Tree,
    root: NodeId,
    error_statements: Vec<ErrorStatement>,
    pub(super) added_newline: bool,
}

impl Module {
    pub(super) fn new(tree: Tree, root: NodeId, error_statements: Vec<ErrorStatement>) -> Self {
        Self {
            tree,
            root,
            error_statements,
            added_newline: false,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The `file_input` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn error_statements(&self) -> &[ErrorStatement] {
        &self.error_statements
    }

    /// True if the parser appended a newline the source did not have.
    pub fn added_newline(&self) -> bool {
        self.added_newline
    }

    /// Source text as given to the parser.
    pub fn code(&self) -> String {
        let mut code = self.tree.code(self.root);
        if self.added_newline {
            code.pop();
        }
        code
    }

    pub fn dump(&self) -> String {
        self.tree.dump(self.root)
    }

    /// Innermost statement whose span (ends inclusive) contains `pos`.
    ///
    /// Descends through compound statements, suites and simple statements. Returns `None` when
    /// `pos` falls inside a container but outside any of its statements (on a block's colon, for
    /// instance).
    pub fn statement_for_position(&self, pos: Position) -> Option<NodeId> {
        self.statement_in(self.root, pos)
    }

    fn statement_in(&self, node: NodeId, pos: Position) -> Option<NodeId> {
        let tree = &self.tree;
        let child = tree
            .children(node)
            .iter()
            .copied()
            .find(|child| tree.start(*child) <= pos && pos <= tree.end(*child))?;
        if tree.is_leaf(child) || !STATEMENT_CONTAINERS.contains(&tree.type_name(child)) {
            return Some(child);
        }
        self.statement_in(child, pos)
    }

    /// Leaf at `pos`.
    ///
    /// A position on the boundary between two leaves belongs to the earlier one. With
    /// `include_prefixes` a position in the whitespace before a leaf resolves to that leaf,
    /// otherwise it resolves to nothing. Positions outside the module give `None`.
    pub fn leaf_for_position(&self, pos: Position, include_prefixes: bool) -> Option<NodeId> {
        if pos < Position::START || pos > self.tree.end(self.root) {
            return None;
        }
        self.leaf_in(self.root, pos, include_prefixes)
    }

    fn leaf_in(&self, node: NodeId, pos: Position, include_prefixes: bool) -> Option<NodeId> {
        let tree = &self.tree;
        let children = tree.children(node);
        if children.is_empty() {
            return None;
        }
        let (mut lower, mut upper) = (0, children.len() - 1);
        while lower < upper {
            let middle = (lower + upper) / 2;
            if pos <= tree.end(children[middle]) {
                upper = middle;
            } else {
                lower = middle + 1;
            }
        }
        let element = children[lower];
        if !include_prefixes && pos < tree.start(element) {
            return None;
        }
        if tree.is_leaf(element) {
            Some(element)
        } else {
            self.leaf_in(element, pos, include_prefixes)
        }
    }

    /// NAME leaf whose span (ends inclusive) contains `pos`. Keywords are not names.
    pub fn name_for_position(&self, pos: Position) -> Option<NodeId> {
        self.tree.leaves(self.root).into_iter().find(|id| {
            self.tree
                .leaf(*id)
                .is_some_and(|leaf| leaf.kind == LeafKind::Name && leaf.start <= pos && pos <= leaf.end())
        })
    }

    pub fn previous_leaf(&self, id: NodeId) -> Option<NodeId> {
        self.tree.previous_leaf(id)
    }
}
