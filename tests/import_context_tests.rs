//! Import context reconstruction from error-recovered import statements.

use seer::engine::{ImportName, ImportResolution, check_error_statements};
use seer::{CompletionConfig, Grammar, Module, Position, ScopeEvaluator, complete, parse_module};

fn module(source: &str) -> Module {
    let grammar = Grammar::python().expect("grammar builds");
    parse_module(&grammar, source).expect("module parses")
}

fn values(names: &[ImportName]) -> Vec<&str> {
    names.iter().map(|name| name.value.as_str()).collect()
}

#[test]
fn test_relative_level_counts_dots() {
    let module = module("from ...");
    let resolution = check_error_statements(&module, Position::new(1, 8));
    let context = resolution.context().expect("import context");
    assert_eq!(context.level, 3);
    assert!(context.names.is_empty());
    assert!(!context.unfinished_dotted);
    assert!(context.only_modules);
}

#[test]
fn test_trailing_dot_is_unfinished() {
    let module = module("import os.");
    let resolution = check_error_statements(&module, Position::new(1, 10));
    let context = resolution.context().expect("import context");
    assert_eq!(values(&context.names), ["os"]);
    assert_eq!(context.level, 0);
    assert!(context.unfinished_dotted);
}

#[test]
fn test_from_dotted_module_without_import() {
    let module = module("from pkg.sub");
    let resolution = check_error_statements(&module, Position::new(1, 12));
    let context = resolution.context().expect("import context");
    assert_eq!(values(&context.names), ["pkg", "sub"]);
    assert_eq!(context.names[0].start, Position::new(1, 5));
    assert_eq!(context.names[1].start, Position::new(1, 9));
    assert_eq!(context.level, 0);
    assert!(context.only_modules);
    assert!(!context.unfinished_dotted);
    assert_eq!(context.dotted_path(), "pkg.sub");
}

#[test]
fn test_cursor_on_import_keyword_short_circuits() {
    let source = "import";
    let grammar = Grammar::python().unwrap();
    let module = parse_module(&grammar, source).unwrap();
    let pos = Position::new(1, 3);

    assert_eq!(check_error_statements(&module, pos), ImportResolution::OnImportKeyword);

    let report = complete(
        &grammar,
        &module,
        source,
        pos,
        &ScopeEvaluator::new(),
        &CompletionConfig::default(),
    )
    .unwrap();
    assert_eq!(report.import, ImportResolution::OnImportKeyword);
    assert!(report.candidates.is_empty());
}

#[test]
fn test_complete_reports_import_alongside_types() {
    let source = "import collections\nfrom pkg.sub";
    let grammar = Grammar::python().unwrap();
    let module = parse_module(&grammar, source).unwrap();

    let report = complete(
        &grammar,
        &module,
        source,
        Position::new(2, 12),
        &ScopeEvaluator::new(),
        &CompletionConfig::default(),
    )
    .unwrap();
    let context = report.import.context().expect("import context");
    assert_eq!(context.dotted_path(), "pkg.sub");
    assert_eq!(report.parts.name, "sub");
    assert!(report.parts.has_dot);
}

#[test]
fn test_complete_statement_has_no_error_context() {
    let module = module("from pkg import name\n");
    assert_eq!(
        check_error_statements(&module, Position::new(1, 20)),
        ImportResolution::NotApplicable
    );
}
