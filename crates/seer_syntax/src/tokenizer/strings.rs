//! String literal scanning.

use super::Tokenizer;
use crate::position::Position;
use crate::token::TokenType;

/// String prefixes accepted before a quote (case-insensitive).
const STRING_PREFIXES: &[&str] = &["r", "u", "b", "f", "br", "rb", "fr", "rf"];

pub(super) fn is_string_prefix(name: &str) -> bool {
    name.len() <= 2 && STRING_PREFIXES.contains(&name.to_ascii_lowercase().as_str())
}

impl Tokenizer {
    /// Scan a string literal whose prefix letters (if any) are already in `value`.
    ///
    /// ## Notes
    /// - An unterminated single-quoted string yields an `ERRORTOKEN` for the prefix and opening quote
    ///   only; tokenizing resumes right after the quote.
    /// - An unterminated triple-quoted string swallows the rest of the input as one `ERRORTOKEN`.
    pub(super) fn scan_string(&mut self, mut value: String, start: Position) {
        let Some(quote) = self.peek() else {
            self.emit(TokenType::Name, value, start);
            return;
        };
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.take_into(&mut value, if triple { 3 } else { 1 });

        let resume = (self.index, self.position, value.clone());
        loop {
            match self.peek() {
                None => break,
                Some('\\') => self.take_into(&mut value, 2),
                Some('\n' | '\r') if !triple => break,
                Some(c) if c == quote => {
                    if !triple {
                        self.take_into(&mut value, 1);
                        self.emit(TokenType::String, value, start);
                        return;
                    }
                    if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                        self.take_into(&mut value, 3);
                        self.emit(TokenType::String, value, start);
                        return;
                    }
                    self.take_into(&mut value, 1);
                }
                Some(_) => self.take_into(&mut value, 1),
            }
        }

        if triple {
            self.emit(TokenType::ErrorToken, value, start);
        } else {
            let (index, position, opening) = resume;
            self.index = index;
            self.position = position;
            self.emit(TokenType::ErrorToken, opening, start);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::position::Position;
    use crate::token::{Token, TokenType};
    use crate::tokenizer::tokenize;

    #[test]
    fn test_string_forms() {
        for literal in [r#""a""#, "'b'", r#"'it\'s'"#, "'''x\ny'''", r#""""q""""#, "rb'raw'", "f'{x}'", "U'u'"] {
            let token = tokenize(literal).next().unwrap();
            assert_eq!(token.kind, TokenType::String, "literal {literal}");
            assert_eq!(token.value, literal);
        }
    }

    #[test]
    fn test_prefix_like_name_without_quote_is_name() {
        let token = tokenize("rb + 1").next().unwrap();
        assert_eq!(token.kind, TokenType::Name);
    }

    #[test]
    fn test_multiline_string_end_position() {
        let token = tokenize("'''a\nbc'''").next().unwrap();
        assert_eq!(token.end(), Position::new(2, 5));
    }

    #[test]
    fn test_unterminated_string_resumes_after_quote() {
        let tokens: Vec<Token> = tokenize("x = 'abc\ny").collect();
        assert_eq!(tokens[2].kind, TokenType::ErrorToken);
        assert_eq!(tokens[2].value, "'");
        assert_eq!(tokens[3].kind, TokenType::Name);
        assert_eq!(tokens[3].value, "abc");
        assert_eq!(tokens[4].kind, TokenType::Newline);
    }

    #[test]
    fn test_unterminated_triple_string_consumes_rest() {
        let tokens: Vec<Token> = tokenize("x = '''abc\ny").collect();
        assert_eq!(tokens[2].kind, TokenType::ErrorToken);
        assert_eq!(tokens[2].value, "'''abc\ny");
        assert_eq!(tokens[3].kind, TokenType::EndMarker);
    }
}
