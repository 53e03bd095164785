//! Error recovery.
//!
//! When a token has no place on the stack, the parser looks for the innermost statement container
//! (a multi-line `suite`, a `simple_stmt` that already holds something, or `file_input`), removes
//! every frame above it and retries the token. The removed frames are kept in the tree as an
//! `error_node` and recorded as an [`ErrorStatement`] so the engine can still make sense of them
//! (an incomplete import, for example).
//!
//! If nothing can be removed the token itself is dropped: an INDENT is remembered so that its
//! DEDENT is dropped as well, anything else becomes an `error_leaf`.

use std::sync::Arc;

use crate::position::Position;
use crate::token::{Token, TokenType};
use crate::tree::{ERROR_NODE, LeafKind, NodeId};

use super::Parser;

/// Frames that error recovery removed from the parser stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorStatement {
    stack: Vec<(Arc<str>, Vec<NodeId>)>,
    next_token: String,
    start: Position,
    end: Position,
}

impl ErrorStatement {
    /// Removed frames, outermost first, as `(rule name, children)`.
    pub fn stack(&self) -> &[(Arc<str>, Vec<NodeId>)] {
        &self.stack
    }

    /// Rule name of the outermost removed frame.
    pub fn first_type(&self) -> &str {
        self.stack.first().map_or("", |(name, _)| name.as_ref())
    }

    /// Children of the outermost removed frame.
    pub fn first_nodes(&self) -> &[NodeId] {
        self.stack.first().map_or(&[], |(_, nodes)| nodes.as_slice())
    }

    /// Value of the token that did not fit.
    pub fn next_token(&self) -> &str {
        &self.next_token
    }

    pub fn start(&self) -> Position {
        self.start
    }

    /// Start of the token that did not fit.
    pub fn end(&self) -> Position {
        self.end
    }
}

pub(super) enum Recovery {
    /// Frames were removed; feed the token again.
    Retry(Token),
    /// The token was turned into an error leaf or dropped.
    Absorbed,
}

impl<'g> Parser<'g> {
    pub(super) fn recover(&mut self, token: Token) -> Recovery {
        let (mut index, rule) = self.current_suite();
        if rule == "simple_stmt" {
            // Fold the statement into its enclosing container so only what follows is discarded.
            let statement = index;
            index = index.saturating_sub(2);
            let nodes = std::mem::take(&mut self.stack[statement].children);
            let symbol = self.stack[statement].symbol();
            let name = self.grammar.symbol_name_arc(symbol).unwrap_or_else(|| Arc::from("simple_stmt"));
            let wrapped = self.tree.add_branch(Some(symbol), name, nodes);
            self.stack[index].children.push(wrapped);
        }

        if self.remove_frames(index + 1, &token) {
            tracing::debug!(value = %token.value, position = %token.start, "retrying token after error recovery");
            return Recovery::Retry(token);
        }

        if token.kind == TokenType::Indent {
            self.omitted_dedents.push(self.indent_counter);
        } else {
            tracing::debug!(value = %token.value, position = %token.start, "error leaf");
            let leaf = self
                .tree
                .add_leaf(LeafKind::ErrorLeaf(token.kind), token.value, token.prefix, token.start);
            if let Some(top) = self.stack.last_mut() {
                top.children.push(leaf);
            }
        }
        Recovery::Absorbed
    }

    /// Index and rule name of the innermost frame that can take a new statement.
    fn current_suite(&self) -> (usize, &'g str) {
        let grammar = self.grammar;
        for (index, frame) in self.stack.iter().enumerate().rev() {
            let name = grammar.symbol_name(frame.symbol());
            match name {
                "file_input" => return (index, name),
                "suite" | "simple_stmt" if frame.children.len() > 1 => return (index, name),
                _ => {}
            }
        }
        (0, self.stack.first().map_or("", |frame| grammar.symbol_name(frame.symbol())))
    }

    /// Remove frames from `start_index` up. Returns true if any frame held nodes.
    fn remove_frames(&mut self, start_index: usize, token: &Token) -> bool {
        if start_index >= self.stack.len() {
            return false;
        }
        let grammar = self.grammar;

        let mut failed: Vec<(Arc<str>, Vec<NodeId>)> = Vec::new();
        let mut all_nodes: Vec<NodeId> = Vec::new();
        for frame in &self.stack[start_index..] {
            if failed.is_empty() && frame.children.is_empty() {
                continue;
            }
            let name = grammar
                .symbol_name_arc(frame.symbol())
                .unwrap_or_else(|| Arc::from(grammar.symbol_name(frame.symbol())));
            failed.push((name, frame.children.clone()));
            all_nodes.extend(frame.children.iter().copied());
        }
        self.stack.truncate(start_index);

        let Some(&first) = all_nodes.first() else {
            return false;
        };
        let start = self.tree.start(first);
        let error_node = self.tree.add_branch(None, Arc::from(ERROR_NODE), all_nodes);
        if let Some(container) = self.stack.last_mut() {
            container.children.push(error_node);
        }
        tracing::debug!(
            rule = %failed[0].0,
            next_token = %token.value,
            "removed frames during error recovery"
        );
        self.error_statements.push(ErrorStatement {
            stack: failed,
            next_token: token.value.clone(),
            start,
            end: token.start,
        });
        true
    }
}
