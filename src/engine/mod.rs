//! The completion engine.
//!
//! Two independent queries over a parsed [`Module`]:
//!
//! - **What may be typed here**: [`stack_at_position`] re-parses the statement text up to the
//!   cursor and [`completion_types`] reads the allowed keywords and token kinds off the resulting
//!   parser stack. [`check_error_statements`] adds the import path typed so far when the cursor is
//!   in an unfinished import.
//! - **What does this refer to**: [`context_results`] hands the name or expression under the
//!   cursor to an [`Evaluator`].
//!
//! [`complete`] runs the first query together with the import query and turns the result into
//! candidate strings.
//!
//! ## Modules
//!
//! - `locate` - the statement or leaf a request starts from
//! - `slice` - source text between two positions
//! - `partial` - truncated token stream and partial parse
//! - `stack` - completion types from a parser stack
//! - `imports` - import context from error-recovered statements
//! - `context` - evaluator contract and definition lookup

pub mod context;
pub mod imports;
pub mod locate;
pub mod partial;
pub mod slice;
pub mod stack;

use seer_syntax::{Grammar, Module, Position};

use crate::config::CompletionConfig;
use crate::errors::CompletionResult;

pub use context::{
    CompletionParts, DefinitionSite, Evaluator, context_results, get_completion_parts, sorted_definitions,
};
pub use imports::{
    ImportContext, ImportName, ImportResolution, ImportTarget, check_error_statements, import_context,
    on_import_statement,
};
pub use locate::{Located, locate};
pub use partial::{ParseStack, Pull, TruncatedTokens, partial_parse, snippet_at_position, stack_at_position};
pub use stack::{CompletionTypes, completion_types};

/// Everything [`complete`] found at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub parts: CompletionParts,
    /// `None` when the cursor is somewhere nothing can be typed (inside a string, for example).
    pub types: Option<CompletionTypes>,
    pub import: ImportResolution,
    /// Keywords and names matching the typed prefix.
    pub candidates: Vec<String>,
}

/// Completions at `pos`.
///
/// The parser stack is taken where the identifier being typed starts, so `imp|` completes like
/// `|`. Keywords come first in registry order, then the evaluator's names, both filtered by the
/// typed prefix. A cursor on the `import` keyword yields no candidates.
///
/// ## Errors
/// Only defects propagate ([`CompletionError::is_recoverable`](crate::errors::CompletionError::is_recoverable)
/// is false); an unparsable or out-of-range cursor gives a report without types.
#[tracing::instrument(level = "debug", skip_all, fields(%pos))]
pub fn complete<E: Evaluator>(
    grammar: &Grammar,
    module: &Module,
    source: &str,
    pos: Position,
    evaluator: &E,
    config: &CompletionConfig,
) -> CompletionResult<CompletionReport> {
    let parts = get_completion_parts(&path_until_cursor(source, pos));
    let name_start = Position::new(pos.line, pos.column.saturating_sub(parts.name.chars().count()));

    let types = match stack_at_position(grammar, source, module, name_start) {
        Ok(stack) => Some(completion_types(grammar, &stack)?),
        Err(err) if err.is_recoverable() => {
            tracing::debug!(error = %err, "no completion types");
            None
        }
        Err(err) => return Err(err),
    };
    let import = check_error_statements(module, pos);

    let mut candidates = Vec::new();
    if let (Some(types), false) = (&types, import == ImportResolution::OnImportKeyword) {
        if config.include_keywords {
            candidates.extend(types.keyword_strings().into_iter().map(str::to_string));
        }
        if config.include_names && types.allows_name() && !parts.has_dot {
            let mut names = evaluator.names_in_scope(module, name_start);
            names.sort();
            names.dedup();
            candidates.extend(names);
        }
        candidates.retain(|candidate| config.matches(candidate, &parts.name));
    }

    let types = types.map(|mut types| {
        if !config.include_token_kinds {
            types.grammar_labels.clear();
        }
        types
    });
    Ok(CompletionReport {
        parts,
        types,
        import,
        candidates,
    })
}

/// The dotted identifier run that ends at the cursor on its line.
fn path_until_cursor(source: &str, pos: Position) -> String {
    let line = slice::code_between(source, Position::new(pos.line, 0), pos);
    let reversed: Vec<char> = line
        .chars()
        .rev()
        .take_while(|c| *c == '.' || context::is_word_char(*c))
        .collect();
    reversed.into_iter().rev().collect()
}
