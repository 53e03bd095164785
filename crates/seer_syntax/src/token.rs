//! Token types produced by the tokenizer and consumed by the parser.

use std::fmt;

use seer_core::lang::operators::{self, OperatorId};

use crate::position::Position;

/// Token type, with operators always reported by their exact type.
///
/// ## Notes
/// - Keywords are tokenized as [`TokenType::Name`]; the parser classifies them against the grammar.
/// - `Ord` is derived so completion results can be kept in sorted sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenType {
    Name,
    Number,
    String,
    Op(OperatorId),
    Newline,
    Indent,
    Dedent,
    EndMarker,
    ErrorToken,
}

impl TokenType {
    /// Resolve a terminal name used in grammar descriptions (`NAME`, `NEWLINE`, ...).
    ///
    /// ## Returns
    /// - `None` for names that are not grammar terminals (including `OP` and `ERRORTOKEN`).
    pub fn from_grammar_name(name: &str) -> Option<TokenType> {
        match name {
            "NAME" => Some(TokenType::Name),
            "NUMBER" => Some(TokenType::Number),
            "STRING" => Some(TokenType::String),
            "NEWLINE" => Some(TokenType::Newline),
            "INDENT" => Some(TokenType::Indent),
            "DEDENT" => Some(TokenType::Dedent),
            "ENDMARKER" => Some(TokenType::EndMarker),
            _ => None,
        }
    }

    /// The `token` module name of this type (`OP` for every operator).
    pub fn name(self) -> &'static str {
        match self {
            TokenType::Name => "NAME",
            TokenType::Number => "NUMBER",
            TokenType::String => "STRING",
            TokenType::Op(_) => "OP",
            TokenType::Newline => "NEWLINE",
            TokenType::Indent => "INDENT",
            TokenType::Dedent => "DEDENT",
            TokenType::EndMarker => "ENDMARKER",
            TokenType::ErrorToken => "ERRORTOKEN",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Op(id) => write!(f, "'{}'", operators::as_str(*id)),
            other => f.write_str(other.name()),
        }
    }
}

/// A single token.
///
/// `prefix` holds everything between the previous token and this one: whitespace, comments,
/// blank lines, line continuations and newlines inside brackets. Concatenating `prefix + value` over
/// a whole token stream reproduces the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    pub value: String,
    pub prefix: String,
    pub start: Position,
}

impl Token {
    pub fn new(kind: TokenType, value: impl Into<String>, prefix: impl Into<String>, start: Position) -> Self {
        Self {
            kind,
            value: value.into(),
            prefix: prefix.into(),
            start,
        }
    }

    /// Position just past the token's value.
    pub fn end(&self) -> Position {
        self.start.advanced_by(&self.value)
    }

    pub fn is_op(&self, id: OperatorId) -> bool {
        self.kind == TokenType::Op(id)
    }
}
