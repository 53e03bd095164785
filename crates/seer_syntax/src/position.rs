//! Source positions.

use std::fmt;

/// A cursor or token position: 1-based line, 0-based column counted in characters.
///
/// ## Notes
/// - Ordering is lexicographic on `(line, column)`, which is document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position of the first character of any source.
    pub const START: Position = Position { line: 1, column: 0 };

    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Return the position reached after writing `text` starting at `self`.
    ///
    /// ## Examples
    /// ```rust
    /// use seer_syntax::position::Position;
    ///
    /// assert_eq!(Position::new(1, 4).advanced_by("abc"), Position::new(1, 7));
    /// assert_eq!(Position::new(1, 4).advanced_by("'''a\nbc'''"), Position::new(2, 5));
    /// ```
    pub fn advanced_by(self, text: &str) -> Position {
        text.chars().fold(self, |pos, c| {
            if c == '\n' {
                Position::new(pos.line + 1, 0)
            } else {
                Position::new(pos.line, pos.column + 1)
            }
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
