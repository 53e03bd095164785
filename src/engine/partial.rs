//! Re-running the parser on the snippet before the cursor.
//!
//! The snippet is tokenized without DEDENTs and fed to the same parser that builds module trees.
//! When only the end marker is left the parser is stopped and its stack is returned: the open rules
//! and their DFA states are exactly what may follow the cursor.

use std::fmt::Write as _;

use seer_syntax::grammar::Grammar;
use seer_syntax::parser::{Parser, StackFrame};
use seer_syntax::tokenizer::{Tokenizer, tokenize};
use seer_syntax::tree::{NodeId, Tree};
use seer_syntax::{Module, Position, Token, TokenType};

use super::locate::{Located, locate};
use super::slice::{code_between, trim_snippet};
use crate::errors::{CompletionError, CompletionResult};

/// Result of pulling the next token for the partial parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pull {
    Token(Token),
    /// Only the end marker is left.
    EndOfInput,
    /// The token stream ended without an end marker.
    Exhausted,
}

/// Token source for a truncated snippet: DEDENTs are skipped and ENDMARKER is reported as
/// [`Pull::EndOfInput`] instead of being yielded.
#[derive(Debug, Clone)]
pub struct TruncatedTokens<I> {
    inner: I,
}

impl TruncatedTokens<Tokenizer> {
    pub fn new(code: &str) -> Self {
        Self::from_tokens(tokenize(code))
    }
}

impl<I: Iterator<Item = Token>> TruncatedTokens<I> {
    pub fn from_tokens(inner: I) -> Self {
        Self { inner }
    }

    pub fn pull(&mut self) -> Pull {
        loop {
            match self.inner.next() {
                None => return Pull::Exhausted,
                Some(token) if token.kind == TokenType::EndMarker => return Pull::EndOfInput,
                Some(token) if token.kind == TokenType::Dedent => continue,
                Some(token) => return Pull::Token(token),
            }
        }
    }
}

/// The parser stack captured at the end of a snippet, bottom (`file_input`) first.
#[derive(Debug, Clone)]
pub struct ParseStack<'g> {
    frames: Vec<StackFrame<'g>>,
    tree: Tree,
}

impl<'g> ParseStack<'g> {
    pub fn frames(&self) -> &[StackFrame<'g>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Nodes built while parsing the snippet.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Rule names of the open frames, bottom first.
    pub fn node_names<'a>(&'a self, grammar: &'a Grammar) -> impl Iterator<Item = &'a str> + 'a {
        self.frames.iter().map(move |frame| grammar.symbol_name(frame.symbol()))
    }

    /// Children accumulated by every open frame, bottom first.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.frames.iter().flat_map(|frame| frame.children().iter().copied())
    }

    /// One line per frame: rule name, DFA state, collected children.
    pub fn dump(&self, grammar: &Grammar) -> String {
        let mut out = String::new();
        for frame in &self.frames {
            let children: Vec<String> = frame
                .children()
                .iter()
                .map(|child| match self.tree.leaf(*child) {
                    Some(leaf) => format!("{:?}", leaf.value),
                    None => self.tree.type_name(*child).to_string(),
                })
                .collect();
            let _ = writeln!(
                out,
                "{} state={} [{}]",
                grammar.symbol_name(frame.symbol()),
                frame.state(),
                children.join(", ")
            );
        }
        out
    }
}

/// Parse `code` until only its end marker is left and return the parser stack.
///
/// ## Errors
/// - [`CompletionError::EndOfInputNotReached`] if the tokens end without an end marker or the
///   parser completes the module before it.
#[tracing::instrument(level = "debug", skip_all, fields(code_len = code.len()))]
pub fn partial_parse<'g>(grammar: &'g Grammar, code: &str) -> CompletionResult<ParseStack<'g>> {
    drive(grammar, TruncatedTokens::new(code))
}

fn drive<'g, I: Iterator<Item = Token>>(
    grammar: &'g Grammar,
    mut tokens: TruncatedTokens<I>,
) -> CompletionResult<ParseStack<'g>> {
    let mut parser = Parser::new(grammar);
    loop {
        match tokens.pull() {
            Pull::Token(token) => {
                if parser.add_token(token)? {
                    return Err(CompletionError::EndOfInputNotReached);
                }
            }
            Pull::EndOfInput => {
                let (frames, tree) = parser.into_parts();
                tracing::trace!(depth = frames.len(), "end marker reached");
                return Ok(ParseStack { frames, tree });
            }
            Pull::Exhausted => return Err(CompletionError::EndOfInputNotReached),
        }
    }
}

/// Snippet to re-parse for a cursor at `pos`: the enclosing statement's text up to the cursor.
pub fn snippet_at_position(source: &str, module: &Module, pos: Position) -> CompletionResult<String> {
    let node = match locate(module, pos)? {
        Located::Whitespace => return Ok(String::new()),
        Located::Node(node) => node,
    };
    let code = code_between(source, module.tree().start(node), pos);
    Ok(trim_snippet(&code).to_string())
}

/// Parser stack at `pos`.
///
/// ## Errors
/// - Recoverable errors from [`locate`] (cursor in a string, error leaf or outside the module).
/// - [`CompletionError::EndOfInputNotReached`] and parse errors from [`partial_parse`].
#[tracing::instrument(level = "debug", skip_all, fields(%pos))]
pub fn stack_at_position<'g>(
    grammar: &'g Grammar,
    source: &str,
    module: &Module,
    pos: Position,
) -> CompletionResult<ParseStack<'g>> {
    let code = snippet_at_position(source, module, pos)?;
    tracing::debug!(snippet = %code, "re-parsing snippet");
    partial_parse(grammar, &code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seer_syntax::parse_module;

    #[test]
    fn test_pull_skips_dedents_and_stops_at_end_marker() {
        let mut tokens = TruncatedTokens::new("if x:\n    y\n");
        let mut kinds = Vec::new();
        let last = loop {
            match tokens.pull() {
                Pull::Token(token) => kinds.push(token.kind),
                other => break other,
            }
        };
        assert_eq!(last, Pull::EndOfInput);
        assert!(kinds.contains(&TokenType::Indent));
        assert!(!kinds.contains(&TokenType::Dedent));
    }

    #[test]
    fn test_exhausted_without_end_marker() {
        let grammar = Grammar::python().unwrap();
        let tokens = vec![Token::new(TokenType::Name, "x", "", Position::new(1, 0))];
        let err = drive(&grammar, TruncatedTokens::from_tokens(tokens.into_iter())).unwrap_err();
        assert_eq!(err, CompletionError::EndOfInputNotReached);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_empty_snippet_leaves_module_frame() {
        let grammar = Grammar::python().unwrap();
        let stack = partial_parse(&grammar, "").unwrap();
        assert_eq!(stack.node_names(&grammar).collect::<Vec<_>>(), ["file_input"]);
        assert_eq!(stack.frames()[0].state(), 0);
        assert_eq!(stack.nodes().count(), 0);
    }

    #[test]
    fn test_import_stack_dump() {
        let grammar = Grammar::python().unwrap();
        let stack = partial_parse(&grammar, "from os.path import").unwrap();
        let names: Vec<&str> = stack.node_names(&grammar).collect();
        assert_eq!(names, ["file_input", "stmt", "simple_stmt", "small_stmt", "import_stmt", "import_from"]);

        let tree = stack.tree();
        let values: Vec<String> = stack
            .nodes()
            .map(|node| match tree.leaf(node) {
                Some(leaf) => leaf.value.clone(),
                None => tree.type_name(node).to_string(),
            })
            .collect();
        assert_eq!(values, ["from", "dotted_name", "import"]);
    }

    #[test]
    fn test_stack_at_position_uses_statement_prefix() {
        let grammar = Grammar::python().unwrap();
        let source = "import os\nx = os.pa\n";
        let module = parse_module(&grammar, source).unwrap();
        let pos = Position::new(2, 7);
        assert_eq!(snippet_at_position(source, &module, pos).unwrap(), "x = os.");

        let stack = stack_at_position(&grammar, source, &module, pos).unwrap();
        assert_eq!(stack.node_names(&grammar).last(), Some("trailer"));
    }

    #[test]
    fn test_whitespace_statement_gives_empty_snippet() {
        let grammar = Grammar::python().unwrap();
        let source = "if x:\n    pass\n";
        let module = parse_module(&grammar, source).unwrap();
        // Column 4 of line 2 is the zero-width INDENT.
        let snippet = snippet_at_position(source, &module, Position::new(2, 4)).unwrap();
        assert_eq!(snippet, "");
    }
}
