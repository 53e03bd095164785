//! Syntax layer for seer: tokenizer, grammar tables, parser and parse tree.
//!
//! Everything the completion engine needs to turn Python source into a tree and to re-run the parser
//! on a truncated snippet lives here. The crate knows nothing about completions; it exposes the
//! automaton (grammar DFAs, parser stack) so the engine can inspect it.
//!
//! ## Notes
//! - Vocabulary identity (keywords/operators) comes from `seer_core::lang` registries.
//! - The grammar table is built once with [`grammar::Grammar::python`] and passed by reference.
//!
//! ## Examples
//! ```rust
//! use seer_syntax::grammar::Grammar;
//! use seer_syntax::parser::parse_module;
//! use seer_syntax::position::Position;
//!
//! let grammar = Grammar::python().unwrap();
//! let module = parse_module(&grammar, "import os\n").unwrap();
//! let name = module.name_for_position(Position::new(1, 8)).unwrap();
//! assert_eq!(module.tree().value(name), "os");
//! ```

pub mod diagnostics;
pub mod grammar;
pub mod parser;
pub mod position;
pub mod token;
pub mod tokenizer;
pub mod tree;

pub use diagnostics::{GrammarError, ParseError};
pub use grammar::Grammar;
pub use parser::{Module, parse_module};
pub use position::Position;
pub use token::{Token, TokenType};
