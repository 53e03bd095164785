//! Error types of the completion engine.
//!
//! Most failures here are not failures for the user: a cursor inside a string or outside the
//! module simply means "nothing to offer". [`CompletionError::is_recoverable`] tells those apart
//! from the two defects (a snippet that never reached its end marker, a corrupted grammar table),
//! which must be propagated.

use miette::Diagnostic;
use seer_syntax::{GrammarError, ParseError, Position};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CompletionError {
    #[error("cannot complete inside {kind} at {position}")]
    #[diagnostic(
        code(seer::unparsable_context),
        help("completions are not available inside string literals or unparsable tokens")
    )]
    UnparsableContext { kind: String, position: Position },

    #[error("position {position} is outside the module")]
    #[diagnostic(code(seer::out_of_bounds))]
    OutOfBounds { position: Position },

    #[error("the truncated snippet ended without an end marker")]
    #[diagnostic(code(seer::end_of_input_not_reached))]
    EndOfInputNotReached,

    #[error("grammar table is inconsistent: {detail}")]
    #[diagnostic(code(seer::corrupt_grammar))]
    CorruptGrammar { detail: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarError),
}

impl CompletionError {
    /// True for conditions that should degrade to "no completions" instead of failing the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CompletionError::UnparsableContext { .. } | CompletionError::OutOfBounds { .. }
        )
    }
}

pub type CompletionResult<T> = Result<T, CompletionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic as _;

    #[test]
    fn test_recoverable_split() {
        let unparsable = CompletionError::UnparsableContext {
            kind: "string".to_string(),
            position: Position::new(1, 3),
        };
        assert!(unparsable.is_recoverable());
        assert!(CompletionError::OutOfBounds { position: Position::new(4, 0) }.is_recoverable());
        assert!(!CompletionError::EndOfInputNotReached.is_recoverable());
        assert!(
            !CompletionError::CorruptGrammar {
                detail: "label 7".to_string()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_codes_and_messages() {
        let error = CompletionError::UnparsableContext {
            kind: "error_leaf".to_string(),
            position: Position::new(2, 5),
        };
        assert_eq!(error.to_string(), "cannot complete inside error_leaf at 2:5");
        assert_eq!(
            error.code().map(|code| code.to_string()).as_deref(),
            Some("seer::unparsable_context")
        );
    }
}
