#![forbid(unsafe_code)]
//! Seer: completion context for Python source.
//!
//! Given a module and a cursor position, seer works out what may be typed there. It re-parses the
//! statement under the cursor up to the cursor, reads the parser stack and reports the keywords
//! and token kinds the grammar allows next, the import being written (if any) and the definitions
//! of the name under the cursor.
//!
//! The syntax layer (tokenizer, grammar tables, parser) lives in `seer_syntax`; this crate holds
//! the engine, a small name evaluator and the tooling (CLI, LSP).
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. Grammar defects
//!   surface as [`errors::CompletionError`] values, never as panics.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod evaluate;
pub mod lsp;

pub use config::CompletionConfig;
pub use engine::{CompletionReport, CompletionTypes, ImportContext, ImportResolution, ParseStack, complete};
pub use errors::{CompletionError, CompletionResult};
pub use evaluate::{Definition, DefinitionKind, ScopeEvaluator};
pub use seer_syntax::{Grammar, Module, Position, parse_module};
