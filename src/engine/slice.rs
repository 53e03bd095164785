//! Cutting the source between a statement start and the cursor.

use seer_syntax::Position;

/// Source text from `start` up to (excluding) `end`.
///
/// Lines are split on `\n` (a trailing `\r` is dropped) and joined back with `\n`. Columns count
/// characters. Positions past the end of a line or of the source are clamped.
pub fn code_between(source: &str, start: Position, end: Position) -> String {
    let lines: Vec<&str> = source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let first = start.line.saturating_sub(1);
    let last = end.line.min(lines.len());
    if first >= last {
        return String::new();
    }

    let mut selected: Vec<String> = lines[first..last].iter().map(|line| line.to_string()).collect();
    if let Some(tail) = selected.last_mut() {
        *tail = tail.chars().take(end.column).collect();
    }
    if let Some(head) = selected.first_mut() {
        *head = head.chars().skip(start.column).collect();
    }
    selected.join("\n")
}

/// Normalize a snippet before it is tokenized.
///
/// Surrounding tabs and spaces are removed: the tokenizer would otherwise see trailing whitespace
/// without a newline. A lone `;` is not a statement prefix and becomes empty.
pub fn trim_snippet(code: &str) -> &str {
    let code = code.trim_matches(|c| c == ' ' || c == '\t');
    if code == ";" { "" } else { code }
}
