//! Operator and delimiter vocabulary.
//!
//! Python's tokenizer reports every operator and delimiter as an `OP` token; in exact-type mode each
//! spelling has its own type. [`OperatorId`] is that exact type.
//!
//! ## Notes
//! - Lookup via [`from_str`] is exact: `"**="` resolves to [`OperatorId::DoubleStarEqual`], not to `**`.
//! - [`MAX_SPELLING_LEN`] bounds the longest-match scan performed by the tokenizer.
//!
//! ## Examples
//! ```rust
//! use seer_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("->"), Some(OperatorId::RArrow));
//! assert_eq!(operators::as_str(OperatorId::Ellipsis), "...");
//! assert_eq!(operators::from_str("$"), None);
//! ```

use super::registry::Since;

/// Broad grouping for operator tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    /// Brackets, braces and parentheses.
    Bracket,
    /// `,` `:` `;` `.` `->` `...` `@` (as decorator marker it is still an operator token).
    Delimiter,
    Arithmetic,
    Bitwise,
    Comparison,
    Assignment,
}

/// Stable identifier for every exact operator token type.
///
/// ## Notes
/// - Names follow the `token` module of CPython (`LPAR` → [`OperatorId::LPar`], ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorId {
    LPar,
    RPar,
    LSqb,
    RSqb,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Semi,
    Dot,
    Ellipsis,
    RArrow,
    At,
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    Tilde,
    VBar,
    Amper,
    Circumflex,
    LeftShift,
    RightShift,
    Less,
    Greater,
    EqEqual,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Equal,
    PlusEqual,
    MinEqual,
    StarEqual,
    DoubleStarEqual,
    SlashEqual,
    DoubleSlashEqual,
    PercentEqual,
    AtEqual,
    VBarEqual,
    AmperEqual,
    CircumflexEqual,
    LeftShiftEqual,
    RightShiftEqual,
}

/// Metadata for an operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub category: OperatorCategory,
    pub since: Since,
}

/// Length in characters of the longest operator spelling.
pub const MAX_SPELLING_LEN: usize = 3;

/// Registry of all operators, in [`OperatorId`] declaration order.
pub const OPERATORS: &[OperatorInfo] = &[
    op(OperatorId::LPar, "(", OperatorCategory::Bracket),
    op(OperatorId::RPar, ")", OperatorCategory::Bracket),
    op(OperatorId::LSqb, "[", OperatorCategory::Bracket),
    op(OperatorId::RSqb, "]", OperatorCategory::Bracket),
    op(OperatorId::LBrace, "{", OperatorCategory::Bracket),
    op(OperatorId::RBrace, "}", OperatorCategory::Bracket),
    op(OperatorId::Colon, ":", OperatorCategory::Delimiter),
    op(OperatorId::Comma, ",", OperatorCategory::Delimiter),
    op(OperatorId::Semi, ";", OperatorCategory::Delimiter),
    op(OperatorId::Dot, ".", OperatorCategory::Delimiter),
    since(OperatorId::Ellipsis, "...", OperatorCategory::Delimiter, Since(3, 0)),
    since(OperatorId::RArrow, "->", OperatorCategory::Delimiter, Since(3, 0)),
    op(OperatorId::At, "@", OperatorCategory::Delimiter),
    op(OperatorId::Plus, "+", OperatorCategory::Arithmetic),
    op(OperatorId::Minus, "-", OperatorCategory::Arithmetic),
    op(OperatorId::Star, "*", OperatorCategory::Arithmetic),
    op(OperatorId::DoubleStar, "**", OperatorCategory::Arithmetic),
    op(OperatorId::Slash, "/", OperatorCategory::Arithmetic),
    op(OperatorId::DoubleSlash, "//", OperatorCategory::Arithmetic),
    op(OperatorId::Percent, "%", OperatorCategory::Arithmetic),
    op(OperatorId::Tilde, "~", OperatorCategory::Bitwise),
    op(OperatorId::VBar, "|", OperatorCategory::Bitwise),
    op(OperatorId::Amper, "&", OperatorCategory::Bitwise),
    op(OperatorId::Circumflex, "^", OperatorCategory::Bitwise),
    op(OperatorId::LeftShift, "<<", OperatorCategory::Bitwise),
    op(OperatorId::RightShift, ">>", OperatorCategory::Bitwise),
    op(OperatorId::Less, "<", OperatorCategory::Comparison),
    op(OperatorId::Greater, ">", OperatorCategory::Comparison),
    op(OperatorId::EqEqual, "==", OperatorCategory::Comparison),
    op(OperatorId::NotEqual, "!=", OperatorCategory::Comparison),
    op(OperatorId::LessEqual, "<=", OperatorCategory::Comparison),
    op(OperatorId::GreaterEqual, ">=", OperatorCategory::Comparison),
    op(OperatorId::Equal, "=", OperatorCategory::Assignment),
    op(OperatorId::PlusEqual, "+=", OperatorCategory::Assignment),
    op(OperatorId::MinEqual, "-=", OperatorCategory::Assignment),
    op(OperatorId::StarEqual, "*=", OperatorCategory::Assignment),
    op(OperatorId::DoubleStarEqual, "**=", OperatorCategory::Assignment),
    op(OperatorId::SlashEqual, "/=", OperatorCategory::Assignment),
    op(OperatorId::DoubleSlashEqual, "//=", OperatorCategory::Assignment),
    op(OperatorId::PercentEqual, "%=", OperatorCategory::Assignment),
    since(OperatorId::AtEqual, "@=", OperatorCategory::Assignment, Since(3, 5)),
    op(OperatorId::VBarEqual, "|=", OperatorCategory::Assignment),
    op(OperatorId::AmperEqual, "&=", OperatorCategory::Assignment),
    op(OperatorId::CircumflexEqual, "^=", OperatorCategory::Assignment),
    op(OperatorId::LeftShiftEqual, "<<=", OperatorCategory::Assignment),
    op(OperatorId::RightShiftEqual, ">>=", OperatorCategory::Assignment),
];

/// Full metadata entry for `id`.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    &OPERATORS[id as usize]
}

/// Spelling of `id`.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Category of `id`.
pub fn category(id: OperatorId) -> OperatorCategory {
    info_for(id).category
}

/// Resolve an operator spelling to its identifier.
///
/// ## Parameters
/// - `spelling`: Candidate operator token.
///
/// ## Returns
/// - `Some(OperatorId)` if the spelling exists in [`OPERATORS`].
/// - `None` otherwise.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Return the bracket depth change caused by `id`: `1` for openers, `-1` for closers, `0` otherwise.
pub fn bracket_delta(id: OperatorId) -> i8 {
    match id {
        OperatorId::LPar | OperatorId::LSqb | OperatorId::LBrace => 1,
        OperatorId::RPar | OperatorId::RSqb | OperatorId::RBrace => -1,
        _ => 0,
    }
}

// --- helpers -----------------------------------------------------------------

const fn op(id: OperatorId, spelling: &'static str, category: OperatorCategory) -> OperatorInfo {
    since(id, spelling, category, Since(2, 0))
}

const fn since(id: OperatorId, spelling: &'static str, category: OperatorCategory, since: Since) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        category,
        since,
    }
}
