//! Numeric literal scanning.

use super::Tokenizer;

impl Tokenizer {
    /// Scan an integer, float or imaginary literal starting at the cursor.
    ///
    /// ## Notes
    /// - Validation is loose: `0x` followed by non-hex letters still forms one NUMBER, matching how
    ///   a completion tokenizer should keep going on half-typed input.
    pub(super) fn scan_number(&mut self) -> String {
        let mut value = String::new();

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            self.take_into(&mut value, 2);
            self.take_while_into(&mut value, |c| c.is_ascii_alphanumeric() || c == '_');
            return value;
        }

        self.take_while_into(&mut value, |c| c.is_ascii_digit() || c == '_');
        if self.peek() == Some('.') {
            self.take_into(&mut value, 1);
            self.take_while_into(&mut value, |c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.take_into(&mut value, digit_at);
                self.take_while_into(&mut value, |c| c.is_ascii_digit() || c == '_');
            }
        }
        if matches!(self.peek(), Some('j' | 'J')) {
            self.take_into(&mut value, 1);
        }
        value
    }

    pub(super) fn take_into(&mut self, value: &mut String, count: usize) {
        for _ in 0..count {
            if let Some(c) = self.advance() {
                value.push(c);
            }
        }
    }

    fn take_while_into(&mut self, value: &mut String, accept: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !accept(c) {
                break;
            }
            value.push(c);
            self.advance();
        }
    }
}
