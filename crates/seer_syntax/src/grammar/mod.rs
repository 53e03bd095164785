//! Grammar tables for the pushdown-automaton parser.
//!
//! A [`Grammar`] holds one DFA per nonterminal, the label table the DFAs' arcs refer to, and the
//! precomputed FIRST set of every nonterminal. It is built once from a pgen-style description and is
//! immutable afterwards; share it by reference (or `Arc`) across requests and threads.
//!
//! ## Notes
//! - Label index 0 is always [`Label::Empty`]. An arc carrying it marks its state as accepting and
//!   points back at the state itself.
//! - Every label is resolved to a [`Label`] variant when the table is built, so consumers never
//!   re-classify labels by lookup.
//! - FIRST sets contain terminal labels only (keywords and token types).
//!
//! ## Examples
//! ```rust
//! use seer_core::lang::keywords::KeywordId;
//! use seer_syntax::grammar::{Grammar, Label};
//!
//! let grammar = Grammar::python().unwrap();
//! let import_stmt = grammar.symbol("import_stmt").unwrap();
//! let first = grammar.dfa(import_stmt).unwrap().first();
//! let keywords: Vec<Label> = first.iter().filter_map(|l| grammar.label(*l)).collect();
//! assert!(keywords.contains(&Label::Keyword(KeywordId::Import)));
//! assert!(keywords.contains(&Label::Keyword(KeywordId::From)));
//! ```

mod pgen;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use seer_core::lang::keywords::{self, KeywordId};
use seer_core::lang::operators;

use crate::diagnostics::GrammarError;
use crate::token::TokenType;

/// The bundled Python 3 grammar description.
pub const PYTHON_GRAMMAR: &str = include_str!("python.grammar");

/// Identifier of a nonterminal (grammar rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index into the grammar's label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelId(u32);

impl LabelId {
    /// The accepting label.
    pub const EMPTY: LabelId = LabelId(0);

    pub fn from_index(index: usize) -> LabelId {
        LabelId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What an arc label stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// The state may end the rule here.
    Empty,
    /// A reserved word, matched against NAME tokens by spelling.
    Keyword(KeywordId),
    /// A token type (exact operator types included).
    Token(TokenType),
    /// A nested rule; entered when the next token is in its FIRST set.
    Nonterminal(SymbolId),
}

/// One DFA arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub label: LabelId,
    pub target: usize,
}

/// The automaton of one nonterminal.
#[derive(Debug, Clone)]
pub struct Dfa {
    symbol: SymbolId,
    states: Vec<Vec<Transition>>,
    first: BTreeSet<LabelId>,
}

impl Dfa {
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    pub fn states(&self) -> &[Vec<Transition>] {
        &self.states
    }

    /// Outgoing arcs of `state` (empty for an out-of-range state).
    pub fn arcs(&self, state: usize) -> &[Transition] {
        self.states.get(state).map_or(&[], Vec::as_slice)
    }

    /// Terminal labels that can begin this nonterminal.
    pub fn first(&self) -> &BTreeSet<LabelId> {
        &self.first
    }

    /// True if the rule may end in `state`.
    pub fn is_accepting(&self, state: usize) -> bool {
        self.arcs(state).iter().any(|t| t.label == LabelId::EMPTY)
    }

    /// True if ending the rule is the only thing `state` allows.
    pub fn is_accept_only(&self, state: usize) -> bool {
        matches!(self.arcs(state), [only] if only.label == LabelId::EMPTY && only.target == state)
    }
}

/// Immutable parse tables.
#[derive(Debug, Clone)]
pub struct Grammar {
    symbol_names: Vec<Arc<str>>,
    symbol_ids: HashMap<Arc<str>, SymbolId>,
    labels: Vec<Label>,
    keywords: HashMap<KeywordId, LabelId>,
    tokens: HashMap<TokenType, LabelId>,
    dfas: Vec<Dfa>,
    start: SymbolId,
}

impl Grammar {
    /// Build the tables for the bundled Python grammar.
    pub fn python() -> Result<Grammar, GrammarError> {
        Grammar::from_source(PYTHON_GRAMMAR)
    }

    /// Build tables from a pgen-style description. The first rule is the start symbol.
    #[tracing::instrument(skip_all, fields(source_len = source.len()))]
    pub fn from_source(source: &str) -> Result<Grammar, GrammarError> {
        let rules = pgen::compile(source)?;
        if rules.is_empty() {
            return Err(GrammarError::Empty);
        }

        let symbol_names: Vec<Arc<str>> = rules.iter().map(|r| Arc::from(r.name.as_str())).collect();
        let symbol_ids: HashMap<Arc<str>, SymbolId> = symbol_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), SymbolId(i as u32)))
            .collect();

        let mut builder = TableBuilder {
            rules: &rules,
            labels: vec![Label::Empty],
            label_ids: HashMap::from([(Label::Empty, LabelId::EMPTY)]),
            keywords: HashMap::new(),
            tokens: HashMap::new(),
        };

        let firsts = builder.first_sets()?;

        let mut dfas = Vec::with_capacity(rules.len());
        for (index, rule) in rules.iter().enumerate() {
            let mut states = Vec::with_capacity(rule.states.len());
            for (state_index, state) in rule.states.iter().enumerate() {
                let mut arcs = Vec::with_capacity(state.arcs.len() + 1);
                for (raw, target) in &state.arcs {
                    arcs.push(Transition {
                        label: builder.make_label(&rule.name, raw)?,
                        target: *target,
                    });
                }
                if state.is_final {
                    arcs.push(Transition {
                        label: LabelId::EMPTY,
                        target: state_index,
                    });
                }
                states.push(arcs);
            }

            let mut first = BTreeSet::new();
            for raw in firsts.get(&rule.name).into_iter().flatten() {
                first.insert(builder.make_label(&rule.name, raw)?);
            }

            dfas.push(Dfa {
                symbol: SymbolId(index as u32),
                states,
                first,
            });
        }

        let grammar = Grammar {
            symbol_names,
            labels: builder.labels,
            keywords: builder.keywords,
            tokens: builder.tokens,
            symbol_ids,
            dfas,
            start: SymbolId(0),
        };
        tracing::debug!(
            symbols = grammar.dfas.len(),
            labels = grammar.labels.len(),
            "grammar tables built"
        );
        Ok(grammar)
    }

    /// The start symbol (the first rule of the description).
    pub fn start(&self) -> SymbolId {
        self.start
    }

    pub fn symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbol_ids.get(name).copied()
    }

    /// Rule name of `symbol` (`"?"` for an id that does not belong to this grammar).
    pub fn symbol_name(&self, symbol: SymbolId) -> &str {
        self.symbol_names.get(symbol.index()).map_or("?", |name| name.as_ref())
    }

    /// Shared handle to the rule name, for storing in trees.
    pub fn symbol_name_arc(&self, symbol: SymbolId) -> Option<Arc<str>> {
        self.symbol_names.get(symbol.index()).cloned()
    }

    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.dfas.len()).map(|i| SymbolId(i as u32))
    }

    pub fn dfa(&self, symbol: SymbolId) -> Option<&Dfa> {
        self.dfas.get(symbol.index())
    }

    pub fn label(&self, id: LabelId) -> Option<Label> {
        self.labels.get(id.index()).copied()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label of a keyword, if the grammar uses it.
    pub fn keyword_label(&self, keyword: KeywordId) -> Option<LabelId> {
        self.keywords.get(&keyword).copied()
    }

    /// Label of a token type, if the grammar uses it.
    pub fn token_label(&self, kind: TokenType) -> Option<LabelId> {
        self.tokens.get(&kind).copied()
    }

    /// Keywords the grammar uses, in registry order.
    pub fn keywords(&self) -> impl Iterator<Item = KeywordId> + '_ {
        keywords::KEYWORDS
            .iter()
            .map(|info| info.id)
            .filter(|id| self.keywords.contains_key(id))
    }

    /// Human-readable form of a label (`NAME`, `'('`, `'import'`, `dotted_name`).
    pub fn describe_label(&self, id: LabelId) -> String {
        match self.label(id) {
            Some(Label::Empty) => "EMPTY".to_string(),
            Some(Label::Keyword(k)) => format!("'{}'", keywords::as_str(k)),
            Some(Label::Token(t)) => t.to_string(),
            Some(Label::Nonterminal(s)) => self.symbol_name(s).to_string(),
            None => format!("<label {}>", id.index()),
        }
    }
}

impl fmt::Display for Grammar {
    /// Dump the tables in a stable text form (one block per rule).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dfa in &self.dfas {
            writeln!(f, "{}:", self.symbol_name(dfa.symbol))?;
            for (index, arcs) in dfa.states.iter().enumerate() {
                let arcs: Vec<String> = arcs
                    .iter()
                    .map(|t| format!("{} -> {}", self.describe_label(t.label), t.target))
                    .collect();
                writeln!(f, "  {index}: {}", arcs.join(", "))?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Table construction
// ============================================================================

struct TableBuilder<'a> {
    rules: &'a [pgen::RawRule],
    labels: Vec<Label>,
    label_ids: HashMap<Label, LabelId>,
    keywords: HashMap<KeywordId, LabelId>,
    tokens: HashMap<TokenType, LabelId>,
}

impl TableBuilder<'_> {
    /// Resolve raw label text to a label id, registering new labels on first use.
    fn make_label(&mut self, rule: &str, raw: &str) -> Result<LabelId, GrammarError> {
        let label = if raw.starts_with(|c: char| c.is_alphabetic() || c == '_') {
            if let Some(index) = self.rules.iter().position(|r| r.name == raw) {
                Label::Nonterminal(SymbolId(index as u32))
            } else if let Some(kind) = TokenType::from_grammar_name(raw) {
                Label::Token(kind)
            } else {
                return Err(GrammarError::UnknownToken {
                    rule: rule.to_string(),
                    name: raw.to_string(),
                });
            }
        } else {
            let spelling = raw.trim_matches('\'');
            if spelling.starts_with(char::is_alphabetic) {
                match keywords::from_str(spelling) {
                    Some(keyword) => Label::Keyword(keyword),
                    None => {
                        return Err(GrammarError::UnknownKeyword {
                            rule: rule.to_string(),
                            spelling: raw.to_string(),
                        });
                    }
                }
            } else {
                match operators::from_str(spelling) {
                    Some(op) => Label::Token(TokenType::Op(op)),
                    None => {
                        return Err(GrammarError::UnknownOperator {
                            rule: rule.to_string(),
                            spelling: raw.to_string(),
                        });
                    }
                }
            }
        };

        if let Some(id) = self.label_ids.get(&label) {
            return Ok(*id);
        }
        let id = LabelId::from_index(self.labels.len());
        self.labels.push(label);
        self.label_ids.insert(label, id);
        match label {
            Label::Keyword(keyword) => {
                self.keywords.insert(keyword, id);
            }
            Label::Token(kind) => {
                self.tokens.insert(kind, id);
            }
            Label::Empty | Label::Nonterminal(_) => {}
        }
        Ok(id)
    }

    /// FIRST sets of every rule as raw terminal label text.
    fn first_sets(&self) -> Result<HashMap<String, BTreeSet<String>>, GrammarError> {
        let mut firsts: HashMap<String, Option<BTreeSet<String>>> = HashMap::new();
        for rule in self.rules {
            if !firsts.contains_key(&rule.name) {
                self.calc_first(rule, &mut firsts)?;
            }
        }
        Ok(firsts
            .into_iter()
            .filter_map(|(name, set)| set.map(|set| (name, set)))
            .collect())
    }

    /// Compute the FIRST set of `rule`; `None` in `firsts` marks a rule being computed.
    fn calc_first(
        &self,
        rule: &pgen::RawRule,
        firsts: &mut HashMap<String, Option<BTreeSet<String>>>,
    ) -> Result<(), GrammarError> {
        firsts.insert(rule.name.clone(), None);

        let mut total = BTreeSet::new();
        let mut overlap: Vec<(&str, BTreeSet<String>)> = Vec::new();
        let initial = rule.states.first().map(|s| &s.arcs);
        for label in initial.into_iter().flat_map(|arcs| arcs.keys()) {
            if let Some(sub) = self.rules.iter().find(|r| &r.name == label) {
                let set = match firsts.get(label) {
                    Some(Some(set)) => set.clone(),
                    Some(None) => {
                        return Err(GrammarError::LeftRecursion {
                            rule: rule.name.clone(),
                        });
                    }
                    None => {
                        self.calc_first(sub, firsts)?;
                        firsts.get(label).cloned().flatten().unwrap_or_default()
                    }
                };
                total.extend(set.iter().cloned());
                overlap.push((label.as_str(), set));
            } else {
                total.insert(label.clone());
                overlap.push((label.as_str(), BTreeSet::from([label.clone()])));
            }
        }

        let mut inverse: HashMap<&str, &str> = HashMap::new();
        for (label, set) in &overlap {
            for terminal in set {
                if let Some(previous) = inverse.insert(terminal.as_str(), *label) {
                    return Err(GrammarError::Ambiguous {
                        rule: rule.name.clone(),
                        label: terminal.clone(),
                        first: previous.to_string(),
                        second: label.to_string(),
                    });
                }
            }
        }

        firsts.insert(rule.name.clone(), Some(total));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seer_core::lang::operators::OperatorId;

    fn python() -> Grammar {
        Grammar::python().unwrap()
    }

    fn first_labels(grammar: &Grammar, rule: &str) -> Vec<Label> {
        let symbol = grammar.symbol(rule).unwrap();
        grammar
            .dfa(symbol)
            .unwrap()
            .first()
            .iter()
            .map(|id| grammar.label(*id).unwrap())
            .collect()
    }

    #[test]
    fn test_python_grammar_builds() {
        let grammar = python();
        assert_eq!(grammar.symbol_name(grammar.start()), "file_input");
        assert_eq!(grammar.label(LabelId::EMPTY), Some(Label::Empty));
        for name in ["import_from", "import_name", "dotted_name", "trailer", "arglist", "suite", "simple_stmt"] {
            assert!(grammar.symbol(name).is_some(), "missing rule {name}");
        }
    }

    #[test]
    fn test_every_keyword_is_used_by_the_grammar() {
        let grammar = python();
        for info in keywords::KEYWORDS {
            assert!(
                grammar.keyword_label(info.id).is_some(),
                "keyword {} unused by the grammar",
                info.canonical
            );
        }
    }

    #[test]
    fn test_first_sets_are_terminal_only() {
        let grammar = python();
        for symbol in grammar.symbols() {
            for label in grammar.dfa(symbol).unwrap().first() {
                assert!(matches!(
                    grammar.label(*label),
                    Some(Label::Keyword(_) | Label::Token(_))
                ));
            }
        }
    }

    #[test]
    fn test_first_of_trailer() {
        let first = first_labels(&python(), "trailer");
        assert_eq!(first.len(), 3);
        assert!(first.contains(&Label::Token(TokenType::Op(OperatorId::LPar))));
        assert!(first.contains(&Label::Token(TokenType::Op(OperatorId::LSqb))));
        assert!(first.contains(&Label::Token(TokenType::Op(OperatorId::Dot))));
    }

    #[test]
    fn test_accepting_states_end_with_empty_self_arc() {
        let grammar = python();
        for symbol in grammar.symbols() {
            let dfa = grammar.dfa(symbol).unwrap();
            for (index, arcs) in dfa.states().iter().enumerate() {
                for (position, arc) in arcs.iter().enumerate() {
                    if arc.label == LabelId::EMPTY {
                        assert_eq!(arc.target, index);
                        assert_eq!(position, arcs.len() - 1);
                    }
                }
            }
            assert!(!dfa.is_accepting(0), "{} accepts the empty input", grammar.symbol_name(symbol));
        }
    }

    #[test]
    fn test_left_recursion_is_rejected() {
        let err = Grammar::from_source("a: a NAME | NAME\n").unwrap_err();
        assert_eq!(err, GrammarError::LeftRecursion { rule: "a".to_string() });
    }

    #[test]
    fn test_ambiguity_is_rejected() {
        let err = Grammar::from_source("a: b | c\nb: NAME\nc: NAME NUMBER\n").unwrap_err();
        assert!(matches!(err, GrammarError::Ambiguous { ref rule, .. } if rule == "a"));
    }

    #[test]
    fn test_unknown_vocabulary_is_rejected() {
        assert!(matches!(
            Grammar::from_source("a: WORD\n").unwrap_err(),
            GrammarError::UnknownToken { .. }
        ));
        assert!(matches!(
            Grammar::from_source("a: 'print' NAME\n").unwrap_err(),
            GrammarError::UnknownKeyword { .. }
        ));
        assert!(matches!(
            Grammar::from_source("a: '$' NAME\n").unwrap_err(),
            GrammarError::UnknownOperator { .. }
        ));
    }

    #[test]
    fn test_dump_mentions_labels() {
        let grammar = Grammar::from_source("pair: NAME '=' [NUMBER]\n").unwrap();
        insta::assert_snapshot!(grammar.to_string(), @r"
        pair:
          0: NAME -> 1
          1: '=' -> 2
          2: NUMBER -> 3, EMPTY -> 2
          3: EMPTY -> 3
        ");
    }
}
