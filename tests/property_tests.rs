//! Property-based tests for the completion engine
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use std::collections::HashSet;

use proptest::prelude::*;
use seer::engine::{completion_types, partial_parse, stack_at_position};
use seer::{CompletionConfig, CompletionTypes, Grammar, Position, ScopeEvaluator, complete, parse_module};
use seer_core::lang::keywords;

/// Statement fragments a user might be in the middle of typing.
fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("import os.".to_string()),
        Just("from os import ".to_string()),
        Just("from ..pkg".to_string()),
        Just("x = foo.".to_string()),
        Just("x = foo".to_string()),
        Just("print(a, ".to_string()),
        Just("def f(a, ".to_string()),
        Just("class C(".to_string()),
        Just("y = [1, two".to_string()),
        Just("if x ".to_string()),
        Just("return ".to_string()),
        Just("lambda q: ".to_string()),
        "[a-z]{1,6}"
            .prop_filter("not a keyword", |name| keywords::from_str(name).is_none())
            .prop_map(|name| format!("{name} = {name}.")),
    ]
}

/// Text typed after the cursor on the same line, possibly followed by another statement.
fn suffix_strategy() -> impl Strategy<Value = String> {
    ("[a-z_]{0,6}", proptest::option::of("[a-z]{1,5} = [0-9]{1,3}"))
        .prop_map(|(rest, next)| match next {
            Some(next) => format!("{rest}\n{next}\n"),
            None => rest,
        })
}

fn types_at(grammar: &Grammar, source: &str, pos: Position) -> Option<CompletionTypes> {
    let module = parse_module(grammar, source).ok()?;
    let stack = stack_at_position(grammar, source, &module, pos).ok()?;
    completion_types(grammar, &stack).ok()
}

fn end_of(fragment: &str) -> Position {
    Position::new(1, fragment.chars().count())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn completion_types_are_deterministic(fragment in fragment_strategy()) {
        let grammar = Grammar::python().unwrap();
        let pos = end_of(&fragment);
        let first = types_at(&grammar, &fragment, pos);
        let second = types_at(&grammar, &fragment, pos);
        prop_assert!(first.is_some());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn text_after_the_cursor_does_not_matter(fragment in fragment_strategy(), suffix in suffix_strategy()) {
        let grammar = Grammar::python().unwrap();
        let pos = end_of(&fragment);
        let alone = types_at(&grammar, &fragment, pos);
        let extended = types_at(&grammar, &format!("{fragment}{suffix}"), pos);
        prop_assert_eq!(alone, extended);
    }

    #[test]
    fn each_rule_is_expanded_once(fragment in fragment_strategy()) {
        let grammar = Grammar::python().unwrap();
        let stack = partial_parse(&grammar, &fragment).unwrap();
        let types = completion_types(&grammar, &stack).unwrap();
        let unique: HashSet<_> = types.expanded.iter().collect();
        prop_assert_eq!(unique.len(), types.expanded.len());
    }

    #[test]
    fn arbitrary_input_never_panics(
        source in "[a-z0-9 .,:=()\\[\\]'\"#\n\t]{0,40}",
        line in 1usize..4,
        column in 0usize..45,
    ) {
        let grammar = Grammar::python().unwrap();
        let Ok(module) = parse_module(&grammar, &source) else {
            return Ok(());
        };
        let pos = Position::new(line, column);
        // Only defects may surface as errors, and they must not panic either.
        let _ = complete(&grammar, &module, &source, pos, &ScopeEvaluator::new(), &CompletionConfig::default());
        let _ = partial_parse(&grammar, &source);
    }
}
