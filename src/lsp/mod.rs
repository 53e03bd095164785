//! Seer Language Server Protocol (LSP) implementation
//!
//! Provides IDE features:
//! - Syntax diagnostics for statements error recovery discarded
//! - Go-to-definition
//! - Keyword and name completions

pub mod backend;
pub mod diagnostics;

pub use backend::SeerLanguageServer;
