#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use seer::engine::{completion_types, partial_parse, stack_at_position};
use seer::{Grammar, Position, parse_module};
use seer_syntax::tokenizer::tokenize;

fn grammar() -> Option<&'static Grammar> {
    static GRAMMAR: OnceLock<Option<Grammar>> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar::python().ok()).as_ref()
}

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    let Ok(s) = std::str::from_utf8(data) else { return };
    let Some(grammar) = grammar() else { return };

    // The tokenizer never fails; drain it.
    let _ = tokenize(s).count();

    // Full parse with recovery, then a cursor lookup at the last character.
    if let Ok(module) = parse_module(grammar, s) {
        let lines = s.lines().count().max(1);
        let column = s.lines().last().map_or(0, |line| line.chars().count());
        let _ = stack_at_position(grammar, s, &module, Position::new(lines, column));
    }

    // The same text as a truncated snippet.
    if let Ok(stack) = partial_parse(grammar, s) {
        let _ = completion_types(grammar, &stack);
    }
});
