//! Error types of the syntax layer.
//!
//! ## Notes
//! - Tokenizing never fails (bad input becomes `ERRORTOKEN`) and parsing recovers from syntax
//!   errors, so the only failures here are a broken grammar description and a token stream that
//!   keeps going after the start rule was accepted.

use miette::Diagnostic;
use thiserror::Error;

use crate::position::Position;

/// A grammar description could not be compiled into parse tables.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum GrammarError {
    #[error("grammar syntax error on line {line}: {message}")]
    #[diagnostic(code(seer_syntax::grammar::syntax))]
    Syntax { line: usize, message: String },

    #[error("grammar defines no rules")]
    #[diagnostic(code(seer_syntax::grammar::empty))]
    Empty,

    #[error("rule `{rule}` is defined twice")]
    #[diagnostic(code(seer_syntax::grammar::duplicate_rule))]
    DuplicateRule { rule: String },

    #[error("rule `{rule}` references `{name}`, which is neither a rule nor a token name")]
    #[diagnostic(code(seer_syntax::grammar::unknown_token))]
    UnknownToken { rule: String, name: String },

    #[error("rule `{rule}` uses {spelling}, which is not a registered keyword")]
    #[diagnostic(
        code(seer_syntax::grammar::unknown_keyword),
        help("keywords must exist in seer_core::lang::keywords")
    )]
    UnknownKeyword { rule: String, spelling: String },

    #[error("rule `{rule}` uses {spelling}, which is not a registered operator")]
    #[diagnostic(code(seer_syntax::grammar::unknown_operator))]
    UnknownOperator { rule: String, spelling: String },

    #[error("rule `{rule}` is left-recursive")]
    #[diagnostic(code(seer_syntax::grammar::left_recursion))]
    LeftRecursion { rule: String },

    #[error("rule `{rule}` is ambiguous: {label} is in the first sets of {first} as well as {second}")]
    #[diagnostic(code(seer_syntax::grammar::ambiguous))]
    Ambiguous {
        rule: String,
        label: String,
        first: String,
        second: String,
    },
}

/// The parser could not accept a token at all.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error("token {value:?} at {position} arrived after the start rule was complete")]
    #[diagnostic(code(seer_syntax::parse::too_much_input))]
    TooMuchInput { value: String, position: Position },
}
