//! Tokenizer for Python source.
//!
//! Produces the token stream the pgen parser consumes:
//! - Names (keywords included), numbers, strings and exact-type operators
//! - NEWLINE at the end of each logical line outside brackets
//! - Zero-width INDENT/DEDENT tokens at the first token of a line
//! - A final ENDMARKER carrying the trailing prefix
//!
//! ## Notes
//! - Tokenizing never fails. Anything that cannot be lexed becomes an `ERRORTOKEN`.
//! - No NEWLINE is synthesized at end of input, so a truncated snippet ends exactly where the text
//!   ends. Callers that parse whole files append the newline themselves.
//! - Dedenting to a column that was never indented to is tolerated: blocks are closed until the
//!   indentation stack top is not deeper than the line.
//!
//! ## Module Structure
//!
//! - `indent` - line-start indentation measurement and INDENT/DEDENT emission
//! - `numbers` - numeric literal scanning
//! - `strings` - string literal scanning (prefixes, triple quotes, unterminated strings)

mod indent;
mod numbers;
mod strings;

use std::collections::VecDeque;

use seer_core::lang::operators::{self, MAX_SPELLING_LEN};

use crate::position::Position;
use crate::token::{Token, TokenType};

// ============================================================================
// TOKENIZER STATE
// ----------------------------------------------------------------------------
// [Start of line] → measure indentation → INDENT/DEDENT → [Inside line]
//                                                            ↓
//                                       see '(' → [bracket_depth++], '\n' joins the prefix
//                                                            ↓
//                                       see '\n' at depth 0 → NEWLINE → [Start of line]
// ============================================================================

/// Lazy Python tokenizer.
///
/// Implements [`Iterator`]; tokens are produced on demand so callers can stop pulling at any point.
pub struct Tokenizer {
    chars: Vec<char>,
    index: usize,
    position: Position,
    indents: Vec<usize>,
    bracket_depth: usize,
    at_line_start: bool,
    prefix: String,
    pending: VecDeque<Token>,
    finished: bool,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            position: Position::START,
            indents: vec![0],
            bracket_depth: 0,
            at_line_start: true,
            prefix: String::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Position of the next unread character.
    pub fn position(&self) -> Position {
        self.position
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        if c == '\n' {
            self.position = Position::new(self.position.line + 1, 0);
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    /// Consume one character into the pending prefix.
    fn bump_prefix(&mut self) {
        if let Some(c) = self.advance() {
            self.prefix.push(c);
        }
    }

    /// Length of the line break at the cursor (`\n` or `\r\n`), or 0.
    fn newline_len(&self) -> usize {
        match (self.peek(), self.peek_at(1)) {
            (Some('\n'), _) => 1,
            (Some('\r'), Some('\n')) => 2,
            _ => 0,
        }
    }

    fn emit(&mut self, kind: TokenType, value: String, start: Position) {
        let prefix = std::mem::take(&mut self.prefix);
        self.pending.push_back(Token::new(kind, value, prefix, start));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    /// Scan until at least one token is pending or the stream is finished.
    fn scan(&mut self) {
        if self.at_line_start && self.bracket_depth == 0 && self.scan_indentation() {
            return;
        }

        self.skip_trivia();

        let start = self.position;
        let Some(c) = self.peek() else {
            self.finish();
            return;
        };

        match c {
            '\n' | '\r' => {
                let mut value = String::new();
                for _ in 0..self.newline_len() {
                    if let Some(c) = self.advance() {
                        value.push(c);
                    }
                }
                self.emit(TokenType::Newline, value, start);
                self.at_line_start = true;
            }
            '\'' | '"' => {
                self.scan_string(String::new(), start);
            }
            '0'..='9' => {
                let value = self.scan_number();
                self.emit(TokenType::Number, value, start);
            }
            '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                let value = self.scan_number();
                self.emit(TokenType::Number, value, start);
            }
            _ if is_name_start(c) => self.scan_name(start),
            _ => self.scan_operator(start),
        }
    }

    /// Skip whitespace, comments, line continuations and bracketed newlines into the prefix.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\x0c' => self.bump_prefix(),
                '#' => {
                    while self.peek().is_some() && self.newline_len() == 0 {
                        self.bump_prefix();
                    }
                }
                '\\' if matches!(self.peek_at(1), Some('\n' | '\r')) => {
                    self.bump_prefix();
                    for _ in 0..self.newline_len().max(1) {
                        self.bump_prefix();
                    }
                }
                '\n' | '\r' if self.bracket_depth > 0 => self.bump_prefix(),
                '\r' if self.newline_len() == 0 => self.bump_prefix(),
                _ => break,
            }
        }
    }

    /// Emit the closing DEDENTs and the ENDMARKER.
    fn finish(&mut self) {
        let end = self.position;
        while self.indents.len() > 1 {
            self.indents.pop();
            self.pending.push_back(Token::new(TokenType::Dedent, "", "", end));
        }
        self.emit(TokenType::EndMarker, String::new(), end);
        self.finished = true;
    }

    // ========================================================================
    // Names and operators
    // ========================================================================

    fn scan_name(&mut self, start: Position) {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if !is_name_continue(c) {
                break;
            }
            value.push(c);
            self.advance();
        }

        if strings::is_string_prefix(&value) && matches!(self.peek(), Some('\'' | '"')) {
            self.scan_string(value, start);
        } else {
            self.emit(TokenType::Name, value, start);
        }
    }

    /// Longest-match operator scan; unknown characters become single-character error tokens.
    fn scan_operator(&mut self, start: Position) {
        for len in (1..=MAX_SPELLING_LEN).rev() {
            let candidate: String = self.chars.iter().skip(self.index).take(len).collect();
            if candidate.chars().count() != len {
                continue;
            }
            if let Some(id) = operators::from_str(&candidate) {
                for _ in 0..len {
                    self.advance();
                }
                match operators::bracket_delta(id) {
                    1 => self.bracket_depth += 1,
                    -1 => self.bracket_depth = self.bracket_depth.saturating_sub(1),
                    _ => {}
                }
                self.emit(TokenType::Op(id), candidate, start);
                return;
            }
        }

        let mut value = String::new();
        if let Some(c) = self.advance() {
            value.push(c);
        }
        self.emit(TokenType::ErrorToken, value, start);
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.finished {
                return None;
            }
            self.scan();
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize `source` lazily.
///
/// ## Examples
/// ```rust
/// use seer_syntax::token::TokenType;
/// use seer_syntax::tokenizer::tokenize;
///
/// let kinds: Vec<TokenType> = tokenize("x").map(|t| t.kind).collect();
/// assert_eq!(kinds, vec![TokenType::Name, TokenType::EndMarker]);
/// ```
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: &str) -> Tokenizer {
    Tokenizer::new(source)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use seer_core::lang::operators::OperatorId;

    fn kinds(source: &str) -> Vec<TokenType> {
        tokenize(source).map(|t| t.kind).collect()
    }

    fn values(source: &str) -> Vec<String> {
        tokenize(source).map(|t| t.value).collect()
    }

    #[test]
    fn test_operator_registry_parity() {
        for o in operators::OPERATORS {
            let source = match operators::bracket_delta(o.id) {
                -1 => format!("x{}", o.spelling),
                _ => o.spelling.to_string(),
            };
            let tokens: Vec<Token> = tokenize(&source).collect();
            assert!(
                tokens.iter().any(|t| t.kind == TokenType::Op(o.id) && t.value == o.spelling),
                "tokenize({:?}) did not produce {:?}: {:?}",
                source,
                o.id,
                tokens
            );
        }
    }

    #[test]
    fn test_simple_statement() {
        assert_eq!(
            kinds("x = 1\n"),
            vec![
                TokenType::Name,
                TokenType::Op(OperatorId::Equal),
                TokenType::Number,
                TokenType::Newline,
                TokenType::EndMarker,
            ]
        );
    }

    #[test]
    fn test_no_newline_synthesized_at_eof() {
        assert_eq!(
            kinds("simple("),
            vec![TokenType::Name, TokenType::Op(OperatorId::LPar), TokenType::EndMarker]
        );
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(values("a **= b"), vec!["a", "**=", "b", ""]);
        assert_eq!(values("..."), vec!["...", ""]);
        assert_eq!(values(".."), vec![".", ".", ""]);
        assert_eq!(values("x->y"), vec!["x", "->", "y", ""]);
    }

    #[test]
    fn test_prefix_carries_whitespace_and_comments() {
        let tokens: Vec<Token> = tokenize("x  # note\n\n  \ny").collect();
        assert_eq!(tokens[0].prefix, "");
        assert_eq!(tokens[1].kind, TokenType::Newline);
        assert_eq!(tokens[1].prefix, "  # note");
        assert_eq!(tokens[2].value, "y");
        assert_eq!(tokens[2].prefix, "\n  \n");
        assert_eq!(tokens[2].start, Position::new(4, 0));
    }

    #[test]
    fn test_source_round_trip() {
        let source = "def f(a,\n      b):\n    return a  # c\n\nx = '''s\n'''\n";
        let rebuilt: String = tokenize(source).map(|t| format!("{}{}", t.prefix, t.value)).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_indent_dedent() {
        let tokens: Vec<Token> = tokenize("if x:\n    y\nz\n").collect();
        let kinds: Vec<TokenType> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::Name,
                TokenType::Name,
                TokenType::Op(OperatorId::Colon),
                TokenType::Newline,
                TokenType::Indent,
                TokenType::Name,
                TokenType::Newline,
                TokenType::Dedent,
                TokenType::Name,
                TokenType::Newline,
                TokenType::EndMarker,
            ]
        );
        // INDENT/DEDENT are zero-width at the first token of their line.
        assert_eq!(tokens[4].start, Position::new(2, 4));
        assert_eq!(tokens[4].end(), Position::new(2, 4));
        assert_eq!(tokens[7].start, Position::new(3, 0));
    }

    #[test]
    fn test_dedents_at_eof() {
        let kinds = kinds("if x:\n    y");
        assert_eq!(&kinds[kinds.len() - 2..], &[TokenType::Dedent, TokenType::EndMarker]);
    }

    #[test]
    fn test_inconsistent_dedent_is_tolerated() {
        let kinds = kinds("if a:\n        b\n    c\n");
        let dedents = kinds.iter().filter(|k| **k == TokenType::Dedent).count();
        let indents = kinds.iter().filter(|k| **k == TokenType::Indent).count();
        assert_eq!(indents, 1);
        assert_eq!(dedents, 1);
    }

    #[test]
    fn test_tab_advances_to_multiple_of_eight() {
        // A tab and eight spaces are the same indentation level.
        let kinds = kinds("if a:\n\tb\n        c\n");
        assert_eq!(kinds.iter().filter(|k| **k == TokenType::Indent).count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == TokenType::Dedent).count(), 1);
    }

    #[test]
    fn test_newlines_inside_brackets_join_the_prefix() {
        let tokens: Vec<Token> = tokenize("f(a,\n  b)\n").collect();
        let kinds: Vec<TokenType> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds.iter().filter(|k| **k == TokenType::Newline).count(), 1);
        assert_eq!(tokens[4].value, "b");
        assert_eq!(tokens[4].prefix, "\n  ");
    }

    #[test]
    fn test_backslash_continuation() {
        let kinds = kinds("x = 1 + \\\n    2\n");
        assert_eq!(kinds.iter().filter(|k| **k == TokenType::Newline).count(), 1);
        assert!(!kinds.contains(&TokenType::Indent));
    }

    #[test]
    fn test_keywords_are_names() {
        assert_eq!(kinds("import"), vec![TokenType::Name, TokenType::EndMarker]);
    }

    #[test]
    fn test_unknown_character_is_error_token() {
        let tokens: Vec<Token> = tokenize("a $ b").collect();
        assert_eq!(tokens[1].kind, TokenType::ErrorToken);
        assert_eq!(tokens[1].value, "$");
        assert_eq!(tokens[2].value, "b");
    }

    #[test]
    fn test_windows_line_endings() {
        let tokens: Vec<Token> = tokenize("x\r\ny\r\n").collect();
        assert_eq!(tokens[1].kind, TokenType::Newline);
        assert_eq!(tokens[1].value, "\r\n");
        assert_eq!(tokens[2].start, Position::new(2, 0));
    }

    #[test]
    fn test_unicode_columns_count_characters() {
        let tokens: Vec<Token> = tokenize("é = ü").collect();
        assert_eq!(tokens[0].kind, TokenType::Name);
        assert_eq!(tokens[2].start, Position::new(1, 4));
    }
}
