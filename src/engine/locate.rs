//! Finding the syntactic unit a completion request starts from.

use seer_syntax::tree::NodeId;
use seer_syntax::{Module, Position};

use crate::errors::{CompletionError, CompletionResult};

/// What the cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located {
    /// An indentation marker: there is no statement text to re-parse.
    Whitespace,
    /// The statement (or leaf) whose start is where the snippet begins.
    Node(NodeId),
}

/// Locate the statement enclosing `pos`.
///
/// Falls back to the leaf at `pos` (prefix whitespace included) when no statement encloses it. A
/// cursor at or before the start of what was found belongs to the construct before it, so lookup
/// moves to the statement around the previous leaf.
///
/// ## Errors
/// - [`CompletionError::UnparsableContext`] when the result is a string or an error leaf.
/// - [`CompletionError::OutOfBounds`] when `pos` is outside the module.
pub fn locate(module: &Module, pos: Position) -> CompletionResult<Located> {
    let tree = module.tree();
    let statement = module.statement_for_position(pos);
    if let Some(statement) = statement {
        if matches!(tree.type_name(statement), "indent" | "dedent") {
            return Ok(Located::Whitespace);
        }
    }

    let mut node = match statement {
        Some(statement) => statement,
        None => module
            .leaf_for_position(pos, true)
            .ok_or(CompletionError::OutOfBounds { position: pos })?,
    };

    if pos <= tree.start(node) {
        if let Some(previous) = module.previous_leaf(node) {
            node = module.statement_for_position(tree.start(previous)).unwrap_or(previous);
        }
    }

    match tree.type_name(node) {
        kind @ ("error_leaf" | "string") => Err(CompletionError::UnparsableContext {
            kind: kind.to_string(),
            position: pos,
        }),
        _ => Ok(Located::Node(node)),
    }
}
