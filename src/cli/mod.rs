//! CLI module for seer
//!
//! ## Commands
//!
//! - `complete <file> <line> <column>` - Completions at a position
//! - `goto <file> <line> <column>` - Definitions of the name or expression at a position
//! - `stack <file> <line> <column>` - Parser stack captured at a position (debug)
//!
//! Lines are 1-based, columns 0-based.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use seer_syntax::Position;

use crate::config::CompletionConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Partial-parse completion engine for Python source
#[derive(Parser, Debug)]
#[command(name = "seer")]
#[command(version = VERSION)]
#[command(about = "Completions and definitions for Python source", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    // Debug/development flags
    /// Print the token stream (debug)
    #[arg(long = "tokens", value_name = "FILE")]
    pub tokens_file: Option<PathBuf>,

    /// Print the parse tree (debug)
    #[arg(long = "tree", value_name = "FILE", conflicts_with = "tokens_file")]
    pub tree_file: Option<PathBuf>,
}

/// A file and a cursor in it.
#[derive(Args, Debug, Clone)]
pub struct Location {
    /// Python source file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Line, starting at 1
    #[arg(value_name = "LINE", value_parser = clap::value_parser!(u32).range(1..))]
    pub line: u32,
    /// Column, starting at 0
    #[arg(value_name = "COLUMN")]
    pub column: u32,
}

impl Location {
    pub fn position(&self) -> Position {
        Position::new(self.line as usize, self.column as usize)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Complete at a position
    Complete {
        #[command(flatten)]
        location: Location,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Leave keywords out of the candidates
        #[arg(long = "no-keywords")]
        no_keywords: bool,
        /// Leave module names out of the candidates
        #[arg(long = "no-names")]
        no_names: bool,
        /// Match the typed prefix case-insensitively
        #[arg(short = 'i', long = "ignore-case")]
        ignore_case: bool,
    },

    /// Find the definitions of what is at a position
    Goto {
        #[command(flatten)]
        location: Location,
        /// Print the definitions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the parser stack captured at a position
    Stack {
        #[command(flatten)]
        location: Location,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = cli.tokens_file {
        return commands::tokens_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.tree_file {
        return commands::tree_file(&file.to_string_lossy());
    }

    match cli.command {
        Some(Command::Complete {
            location,
            json,
            no_keywords,
            no_names,
            ignore_case,
        }) => {
            let config = CompletionConfig::new()
                .with_keywords(!no_keywords)
                .with_names(!no_names)
                .with_case_insensitive(ignore_case);
            commands::complete_at(&location.file.to_string_lossy(), location.position(), &config, json)
        }
        Some(Command::Goto { location, json }) => {
            commands::goto_at(&location.file.to_string_lossy(), location.position(), json)
        }
        Some(Command::Stack { location }) => commands::stack_at(&location.file.to_string_lossy(), location.position()),
        // No command - show help
        None => Err(CliError::with_code(
            "Usage: seer <complete|goto|stack> FILE LINE COLUMN (see --help)",
            2,
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
