//! What the grammar allows next, read off a captured parser stack.

use std::collections::{BTreeSet, HashSet};

use seer_core::lang::keywords::{self, KeywordId};
use seer_syntax::grammar::{Grammar, Label, LabelId, SymbolId};
use seer_syntax::TokenType;

use super::partial::ParseStack;
use crate::errors::{CompletionError, CompletionResult};

/// Keywords and token kinds that may come next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionTypes {
    pub keywords: BTreeSet<KeywordId>,
    pub grammar_labels: BTreeSet<TokenType>,
    /// Nonterminals whose FIRST sets were folded in, in expansion order. Each appears once.
    pub expanded: Vec<SymbolId>,
}

impl CompletionTypes {
    /// Keyword spellings in registry order.
    pub fn keyword_strings(&self) -> Vec<&'static str> {
        self.keywords.iter().map(|kw| keywords::as_str(*kw)).collect()
    }

    pub fn allows_name(&self) -> bool {
        self.grammar_labels.contains(&TokenType::Name)
    }
}

/// Collect the keywords and token kinds the grammar accepts after `stack`.
///
/// Starts at the innermost frame. An accepting state also makes the frame below reachable; a
/// nonterminal arc contributes its FIRST set.
///
/// ## Errors
/// - [`CompletionError::CorruptGrammar`] if an arc label does not resolve, or resolves to an
///   accept label where a terminal or rule is required.
#[tracing::instrument(level = "debug", skip_all, fields(depth = stack.len()))]
pub fn completion_types(grammar: &Grammar, stack: &ParseStack<'_>) -> CompletionResult<CompletionTypes> {
    let mut resolver = Resolver {
        grammar,
        stack,
        visited: HashSet::new(),
        types: CompletionTypes::default(),
    };
    if !stack.is_empty() {
        resolver.scan_frame(stack.len() - 1)?;
    }
    tracing::debug!(
        keywords = resolver.types.keywords.len(),
        tokens = resolver.types.grammar_labels.len(),
        "completion types resolved"
    );
    Ok(resolver.types)
}

struct Resolver<'a, 'g> {
    grammar: &'a Grammar,
    stack: &'a ParseStack<'g>,
    visited: HashSet<SymbolId>,
    types: CompletionTypes,
}

impl Resolver<'_, '_> {
    fn scan_frame(&mut self, index: usize) -> CompletionResult<()> {
        let frame = &self.stack.frames()[index];
        for arc in frame.arcs() {
            if arc.label == LabelId::EMPTY {
                if index > 0 {
                    self.scan_frame(index - 1)?;
                }
            } else {
                self.add_label(arc.label)?;
            }
        }
        Ok(())
    }

    fn add_label(&mut self, label: LabelId) -> CompletionResult<()> {
        match self.grammar.label(label) {
            Some(Label::Keyword(keyword)) => {
                self.types.keywords.insert(keyword);
            }
            Some(Label::Token(kind)) => {
                self.types.grammar_labels.insert(kind);
            }
            Some(Label::Nonterminal(symbol)) => {
                if !self.visited.insert(symbol) {
                    return Ok(());
                }
                self.types.expanded.push(symbol);
                let dfa = self.grammar.dfa(symbol).ok_or_else(|| CompletionError::CorruptGrammar {
                    detail: format!("label {} names a rule without a DFA", label.index()),
                })?;
                for first in dfa.first() {
                    self.add_label(*first)?;
                }
            }
            Some(Label::Empty) => {
                return Err(CompletionError::CorruptGrammar {
                    detail: "accept label inside a FIRST set".to_string(),
                });
            }
            None => {
                return Err(CompletionError::CorruptGrammar {
                    detail: format!("label {} is not in the table", label.index()),
                });
            }
        }
        Ok(())
    }
}
