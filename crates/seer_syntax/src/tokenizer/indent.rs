//! Indentation handling: Python-style INDENT/DEDENT tokens.

use super::Tokenizer;
use crate::token::{Token, TokenType};

/// Tab stops are every 8 columns, as in CPython's tokenizer.
const TAB_SIZE: usize = 8;

impl Tokenizer {
    /// Measure the indentation of a new logical line and queue INDENT/DEDENT tokens.
    ///
    /// ## Returns
    /// - `true` if the line was blank or comment-only and has been consumed into the prefix; the
    ///   tokenizer stays at line start.
    /// - `false` once the line holds a real token (or the input ended).
    pub(super) fn scan_indentation(&mut self) -> bool {
        let mut width = 0;
        loop {
            match self.peek() {
                Some(' ') => width += 1,
                Some('\t') => width = (width / TAB_SIZE + 1) * TAB_SIZE,
                Some('\x0c') => width = 0,
                _ => break,
            }
            self.bump_prefix();
        }

        match self.peek() {
            None => return false,
            Some('#') => {
                while self.peek().is_some() && self.newline_len() == 0 {
                    self.bump_prefix();
                }
                self.consume_line_break();
                return true;
            }
            Some('\n' | '\r') if self.newline_len() > 0 => {
                self.consume_line_break();
                return true;
            }
            _ => {}
        }

        self.at_line_start = false;
        let at = self.position;
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.pending.push_back(Token::new(TokenType::Indent, "", "", at));
        } else {
            while self.indents.len() > 1 && self.indents.last().is_some_and(|top| width < *top) {
                self.indents.pop();
                self.pending.push_back(Token::new(TokenType::Dedent, "", "", at));
            }
        }
        false
    }

    fn consume_line_break(&mut self) {
        for _ in 0..self.newline_len() {
            self.bump_prefix();
        }
    }
}
