//! Convert seer positions and syntax errors to LSP types

use seer_syntax::Position as SourcePosition;
use seer_syntax::parser::Module;
use seer_syntax::tree::LeafKind;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

/// LSP position (0-based line) to a seer position (1-based line).
///
/// Columns are characters on both sides.
pub fn to_source_position(position: Position) -> SourcePosition {
    SourcePosition::new(position.line as usize + 1, position.character as usize)
}

pub fn to_lsp_position(position: SourcePosition) -> Position {
    let line = position.line.saturating_sub(1);
    Position::new(
        u32::try_from(line).unwrap_or(u32::MAX),
        u32::try_from(position.column).unwrap_or(u32::MAX),
    )
}

/// Range between two seer positions; an empty range is widened to one character.
pub fn to_lsp_range(start: SourcePosition, end: SourcePosition) -> Range {
    let end = if end <= start {
        SourcePosition::new(start.line, start.column + 1)
    } else {
        end
    };
    Range::new(to_lsp_position(start), to_lsp_position(end))
}

fn syntax_diagnostic(range: Range, code: &str, message: String) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::ERROR),
        code: Some(NumberOrString::String(code.to_string())),
        code_description: None,
        source: Some("seer".to_string()),
        message,
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Diagnostics for everything error recovery had to discard.
///
/// One per error statement (the removed frames) and one per error leaf (a token that fit nowhere).
pub fn module_diagnostics(module: &Module) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = module
        .error_statements()
        .iter()
        .map(|statement| {
            syntax_diagnostic(
                to_lsp_range(statement.start(), statement.end()),
                "seer::incomplete_statement",
                format!(
                    "incomplete {} before {:?}",
                    statement.first_type(),
                    statement.next_token()
                ),
            )
        })
        .collect();

    let tree = module.tree();
    for id in tree.leaves(module.root()) {
        let Some(leaf) = tree.leaf(id) else { continue };
        if let LeafKind::ErrorLeaf(kind) = leaf.kind {
            diagnostics.push(syntax_diagnostic(
                to_lsp_range(leaf.start, leaf.end()),
                "seer::unexpected_token",
                format!("unexpected {} {:?}", kind.name(), leaf.value),
            ));
        }
    }

    diagnostics.sort_by_key(|d| (d.range.start.line, d.range.start.character));
    diagnostics
}
