//! End-to-end completion tests: full module parse, cursor lookup, partial parse, stack query.

use seer::engine::{completion_types, snippet_at_position, stack_at_position};
use seer::{CompletionConfig, CompletionError, Grammar, Module, Position, ScopeEvaluator, complete, parse_module};
use seer_syntax::TokenType;

fn setup(source: &str) -> (Grammar, Module) {
    let grammar = Grammar::python().expect("grammar builds");
    let module = parse_module(&grammar, source).expect("module parses");
    (grammar, module)
}

#[test]
fn test_call_argument_completion() {
    let source = "simple(";
    let (grammar, module) = setup(source);
    let stack = stack_at_position(&grammar, source, &module, Position::new(1, 7)).unwrap();
    let types = completion_types(&grammar, &stack).unwrap();

    let arglist = grammar.symbol("arglist").unwrap();
    assert!(types.expanded.contains(&arglist));
    assert!(types.allows_name());
    assert!(types.grammar_labels.contains(&TokenType::Number));

    let words = types.keyword_strings();
    assert!(words.contains(&"lambda"));
    for statement_keyword in ["def", "class", "import", "return"] {
        assert!(!words.contains(&statement_keyword), "unexpected {statement_keyword}");
    }
}

#[test]
fn test_cursor_at_statement_start_uses_previous_statement() {
    let source = "x = 1; y = 2\n";
    let (grammar, module) = setup(source);
    let pos = Position::new(1, 7);

    let snippet = snippet_at_position(source, &module, pos).unwrap();
    assert_eq!(snippet, "x = 1;");

    let stack = stack_at_position(&grammar, source, &module, pos).unwrap();
    let words = completion_types(&grammar, &stack).unwrap().keyword_strings();
    assert!(words.contains(&"pass"));
    assert!(!words.contains(&"def"));
}

#[test]
fn test_cursor_at_line_start_follows_previous_newline() {
    let source = "x = 1\ny = 2\n";
    let (grammar, module) = setup(source);
    let pos = Position::new(2, 0);

    let snippet = snippet_at_position(source, &module, pos).unwrap();
    assert_eq!(snippet.trim(), "");

    let stack = stack_at_position(&grammar, source, &module, pos).unwrap();
    let words = completion_types(&grammar, &stack).unwrap().keyword_strings();
    assert!(words.contains(&"def"));
}

#[test]
fn test_complete_keyword_prefix() {
    let source = "imp";
    let (grammar, module) = setup(source);
    let evaluator = ScopeEvaluator::new();
    let config = CompletionConfig::default();

    let report = complete(&grammar, &module, source, Position::new(1, 3), &evaluator, &config).unwrap();
    assert_eq!(report.parts.name, "imp");
    assert!(!report.parts.has_dot);
    assert_eq!(report.candidates, ["import"]);
}

#[test]
fn test_complete_names_in_scope() {
    let source = "def handler(request):\n    return\nhan";
    let (grammar, module) = setup(source);
    let evaluator = ScopeEvaluator::new();

    let report = complete(
        &grammar,
        &module,
        source,
        Position::new(3, 3),
        &evaluator,
        &CompletionConfig::default(),
    )
    .unwrap();
    assert_eq!(report.candidates, ["handler"]);

    let config = CompletionConfig::default().with_names(false);
    let report = complete(&grammar, &module, source, Position::new(3, 3), &evaluator, &config).unwrap();
    assert!(report.candidates.is_empty());
}

#[test]
fn test_attribute_access_offers_no_keywords() {
    let source = "import os\nos.pa";
    let (grammar, module) = setup(source);
    let evaluator = ScopeEvaluator::new();

    let report = complete(
        &grammar,
        &module,
        source,
        Position::new(2, 5),
        &evaluator,
        &CompletionConfig::default(),
    )
    .unwrap();
    assert_eq!(report.parts.path, "os");
    assert!(report.parts.has_dot);
    assert_eq!(report.parts.name, "pa");
    let types = report.types.unwrap();
    assert!(types.keywords.is_empty());
    assert!(types.allows_name());
    assert!(report.candidates.is_empty());
}

#[test]
fn test_cursor_in_string_degrades_to_no_types() {
    let source = "x = '''abc";
    let (grammar, module) = setup(source);
    let pos = Position::new(1, 8);

    let err = stack_at_position(&grammar, source, &module, pos).unwrap_err();
    assert!(matches!(err, CompletionError::UnparsableContext { .. }));
    assert!(err.is_recoverable());

    let report = complete(
        &grammar,
        &module,
        source,
        pos,
        &ScopeEvaluator::new(),
        &CompletionConfig::default(),
    )
    .unwrap();
    assert_eq!(report.types, None);
    assert!(report.candidates.is_empty());
}

#[test]
fn test_config_drops_token_kinds() {
    let source = "x";
    let (grammar, module) = setup(source);
    let config = CompletionConfig::default().with_token_kinds(false);

    let report = complete(&grammar, &module, source, Position::new(1, 0), &ScopeEvaluator::new(), &config).unwrap();
    let types = report.types.unwrap();
    assert!(types.grammar_labels.is_empty());
    assert!(!types.keywords.is_empty());
}

#[test]
fn test_stack_snapshot() {
    let source = "from os.path import";
    let (grammar, module) = setup(source);
    let stack = stack_at_position(&grammar, source, &module, Position::new(1, 19)).unwrap();
    let names: Vec<&str> = stack.node_names(&grammar).collect();
    assert_eq!(names, ["file_input", "stmt", "simple_stmt", "small_stmt", "import_stmt", "import_from"]);
}
