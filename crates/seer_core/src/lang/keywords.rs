//! Define the reserved keyword vocabulary of Python 3.
//!
//! This module is the single source of truth for reserved words: a stable identifier
//! ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records spellings and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (`None` is a keyword, `none` is a name).
//! - Soft keywords (`match`, `case`, `type`) and `async`/`await` are not part of this registry; the
//!   bundled grammar treats them as plain names.
//!
//! ## Examples
//! ```rust
//! use seer_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("import"), Some(KeywordId::Import));
//! assert_eq!(keywords::as_str(KeywordId::Import), "import");
//! assert_eq!(keywords::from_str("print"), None);
//! ```

/// Stable identifier for every reserved keyword.
///
/// ## Notes
/// - Variant order follows the Python `keyword.kwlist` ordering and is what `Ord` sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeywordId {
    False,
    None,
    True,
    And,
    As,
    Assert,
    Break,
    Class,
    Continue,
    Def,
    Del,
    Elif,
    Else,
    Except,
    Finally,
    For,
    From,
    Global,
    If,
    Import,
    In,
    Is,
    Lambda,
    Nonlocal,
    Not,
    Or,
    Pass,
    Raise,
    Return,
    Try,
    While,
    With,
    Yield,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Starts or continues a control-flow statement (`if`, `while`, `try`, ...).
    ControlFlow,
    /// Introduces a definition (`def`, `class`, `lambda`).
    Definition,
    /// Part of an import statement (`import`, `from`, `as`).
    Import,
    /// Scope declarations and simple statements (`global`, `del`, `pass`, ...).
    Statement,
    /// Literal constants (`None`, `True`, `False`).
    Literal,
    /// Word operators (`and`, `or`, `not`, `in`, `is`).
    Operator,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    /// True when the keyword can only appear at the start of a statement.
    pub starts_statement: bool,
}

/// Registry of all keywords.
///
/// ## Notes
/// - Entries are stored in [`KeywordId`] declaration order so lookups by id are direct indexing.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::False, "False", KeywordCategory::Literal, false),
    info(KeywordId::None, "None", KeywordCategory::Literal, false),
    info(KeywordId::True, "True", KeywordCategory::Literal, false),
    info(KeywordId::And, "and", KeywordCategory::Operator, false),
    info(KeywordId::As, "as", KeywordCategory::Import, false),
    info(KeywordId::Assert, "assert", KeywordCategory::Statement, true),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow, true),
    info(KeywordId::Class, "class", KeywordCategory::Definition, true),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow, true),
    info(KeywordId::Def, "def", KeywordCategory::Definition, true),
    info(KeywordId::Del, "del", KeywordCategory::Statement, true),
    info(KeywordId::Elif, "elif", KeywordCategory::ControlFlow, true),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow, false),
    info(KeywordId::Except, "except", KeywordCategory::ControlFlow, true),
    info(KeywordId::Finally, "finally", KeywordCategory::ControlFlow, true),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow, false),
    info(KeywordId::From, "from", KeywordCategory::Import, true),
    info(KeywordId::Global, "global", KeywordCategory::Statement, true),
    info(KeywordId::If, "if", KeywordCategory::ControlFlow, false),
    info(KeywordId::Import, "import", KeywordCategory::Import, true),
    info(KeywordId::In, "in", KeywordCategory::Operator, false),
    info(KeywordId::Is, "is", KeywordCategory::Operator, false),
    info(KeywordId::Lambda, "lambda", KeywordCategory::Definition, false),
    info(KeywordId::Nonlocal, "nonlocal", KeywordCategory::Statement, true),
    info(KeywordId::Not, "not", KeywordCategory::Operator, false),
    info(KeywordId::Or, "or", KeywordCategory::Operator, false),
    info(KeywordId::Pass, "pass", KeywordCategory::Statement, true),
    info(KeywordId::Raise, "raise", KeywordCategory::ControlFlow, true),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow, true),
    info(KeywordId::Try, "try", KeywordCategory::ControlFlow, true),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow, true),
    info(KeywordId::With, "with", KeywordCategory::ControlFlow, true),
    info(KeywordId::Yield, "yield", KeywordCategory::ControlFlow, false),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The spelling for `id`.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata entry.
///
/// ## Notes
/// - Every [`KeywordId`] variant has exactly one entry in [`KEYWORDS`], at the variant's index.
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory, starts_statement: bool) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        starts_statement,
    }
}
