//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;

use seer_syntax::tokenizer::tokenize;
use seer_syntax::{Grammar, Module, Position, parse_module};
use serde_json::json;

use crate::config::CompletionConfig;
use crate::engine::{self, ImportResolution, context_results, stack_at_position};
use crate::errors::CompletionError;
use crate::evaluate::{Definition, ScopeEvaluator};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (10 MB)
const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (10 MB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Render an engine error with its diagnostic code.
fn report(error: impl miette::Diagnostic + Send + Sync + 'static) -> CliError {
    CliError::failure(format!("{:?}", miette::Report::new(error)))
}

fn load(file_path: &str) -> CliResult<(Grammar, String, Module)> {
    let source = read_source(file_path)?;
    let grammar = Grammar::python().map_err(report)?;
    let module = parse_module(&grammar, &source).map_err(report)?;
    Ok((grammar, source, module))
}

fn to_json(value: &serde_json::Value) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::failure(format!("Error encoding JSON: {}", e)))
}

fn definition_json(definition: &Definition) -> serde_json::Value {
    json!({
        "name": definition.name,
        "kind": definition.kind.as_str(),
        "module_path": definition.module_path,
        "line": definition.start.line,
        "column": definition.start.column,
    })
}

/// `--tokens`: one token per line.
pub fn tokens_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    for token in tokenize(&source) {
        println!("{:<6} {:<10} {:?}", token.start.to_string(), token.kind.to_string(), token.value);
    }
    Ok(ExitCode::SUCCESS)
}

/// `--tree`: the parse tree and any error statements.
pub fn tree_file(file_path: &str) -> CliResult<ExitCode> {
    let (_, _, module) = load(file_path)?;
    print!("{}", module.dump());
    for statement in module.error_statements() {
        println!(
            "error statement {} at {}..{} before {:?}",
            statement.first_type(),
            statement.start(),
            statement.end(),
            statement.next_token()
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub fn complete_at(file_path: &str, pos: Position, config: &CompletionConfig, json: bool) -> CliResult<ExitCode> {
    let (grammar, source, module) = load(file_path)?;
    let evaluator = ScopeEvaluator::new().with_module_path(file_path);
    let completions = engine::complete(&grammar, &module, &source, pos, &evaluator, config).map_err(report)?;

    if json {
        let types = completions.types.as_ref().map(|types| {
            json!({
                "keywords": types.keyword_strings(),
                "tokens": types.grammar_labels.iter().map(|kind| kind.name()).collect::<Vec<_>>(),
                "rules": types.expanded.iter().map(|symbol| grammar.symbol_name(*symbol)).collect::<Vec<_>>(),
            })
        });
        let import = match &completions.import {
            ImportResolution::NotApplicable => serde_json::Value::Null,
            ImportResolution::OnImportKeyword => json!({ "on_import_keyword": true }),
            ImportResolution::Resolved(context) => json!({
                "names": context.names.iter().map(|name| name.value.as_str()).collect::<Vec<_>>(),
                "level": context.level,
                "only_modules": context.only_modules,
                "unfinished_dotted": context.unfinished_dotted,
            }),
        };
        let value = json!({
            "path": completions.parts.path,
            "has_dot": completions.parts.has_dot,
            "name": completions.parts.name,
            "types": types,
            "import": import,
            "candidates": completions.candidates,
        });
        println!("{}", to_json(&value)?);
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(context) = completions.import.context() {
        println!("# import {}", context.dotted_path());
    }
    for candidate in &completions.candidates {
        println!("{}", candidate);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn goto_at(file_path: &str, pos: Position, json: bool) -> CliResult<ExitCode> {
    let (_, _, module) = load(file_path)?;
    let evaluator = ScopeEvaluator::new().with_module_path(file_path);
    let definitions = context_results(&evaluator, &module, pos);

    if json {
        let value = serde_json::Value::Array(definitions.iter().map(definition_json).collect());
        println!("{}", to_json(&value)?);
    } else {
        for definition in &definitions {
            println!(
                "{}:{}:{}: {} {}",
                file_path,
                definition.start.line,
                definition.start.column,
                definition.kind.as_str(),
                definition.name
            );
        }
    }
    if definitions.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn stack_at(file_path: &str, pos: Position) -> CliResult<ExitCode> {
    let (grammar, source, module) = load(file_path)?;
    match stack_at_position(&grammar, &source, &module, pos) {
        Ok(stack) => {
            print!("{}", stack.dump(&grammar));
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ (CompletionError::UnparsableContext { .. } | CompletionError::OutOfBounds { .. })) => {
            eprintln!("{}", err);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(report(err)),
    }
}
