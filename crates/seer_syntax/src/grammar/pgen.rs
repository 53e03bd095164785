//! Compile a pgen-style EBNF grammar description into one DFA per rule.
//!
//! The description language is the one CPython's `Grammar/Grammar` used:
//!
//! ```text
//! rule:  NAME ':' rhs
//! rhs:   alt ('|' alt)*
//! alt:   item+
//! item:  '[' rhs ']' | atom ['+' | '*']
//! atom:  '(' rhs ')' | NAME | STRING
//! ```
//!
//! Each rule is turned into an NFA, converted to a DFA by subset construction (arcs ordered by label
//! text), and then minimized by merging equivalent states. Labels stay as raw text here; the
//! [`super::Grammar`] builder resolves them.

use std::collections::{BTreeMap, BTreeSet};

use crate::diagnostics::GrammarError;

/// One compiled rule.
#[derive(Debug, Clone)]
pub(super) struct RawRule {
    pub name: String,
    pub states: Vec<RawState>,
}

/// One DFA state with arcs keyed by raw label text (`NAME`, `'('`, `atom`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RawState {
    pub arcs: BTreeMap<String, usize>,
    pub is_final: bool,
}

/// Compile every rule of `source`, in definition order.
pub(super) fn compile(source: &str) -> Result<Vec<RawRule>, GrammarError> {
    let mut rules: Vec<RawRule> = Vec::new();
    for text in split_rules(source)? {
        let mut parser = RuleParser::new(&text);
        let (name, start, finish) = parser.parse_rule()?;
        if rules.iter().any(|r| r.name == name) {
            return Err(GrammarError::DuplicateRule { rule: name });
        }
        let mut states = make_dfa(&parser.nfa, start, finish);
        simplify_dfa(&mut states);
        rules.push(RawRule { name, states });
    }
    Ok(rules)
}

// ============================================================================
// Description tokenizer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum MetaToken {
    Name(String),
    /// A quoted literal, quotes included.
    Literal(String),
    Op(char),
}

/// The tokens of one rule together with the line it starts on.
struct RuleText {
    line: usize,
    tokens: Vec<MetaToken>,
}

fn split_rules(source: &str) -> Result<Vec<RuleText>, GrammarError> {
    let mut rules: Vec<RuleText> = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = strip_comment(raw);
        if text.trim().is_empty() {
            continue;
        }
        let tokens = tokenize_line(text, line)?;
        if text.starts_with(char::is_whitespace) {
            match rules.last_mut() {
                Some(rule) => rule.tokens.extend(tokens),
                None => {
                    return Err(GrammarError::Syntax {
                        line,
                        message: "continuation line before the first rule".to_string(),
                    });
                }
            }
        } else {
            rules.push(RuleText { line, tokens });
        }
    }
    Ok(rules)
}

fn strip_comment(line: &str) -> &str {
    let mut in_literal = false;
    for (index, c) in line.char_indices() {
        match c {
            '\'' => in_literal = !in_literal,
            '#' if !in_literal => return &line[..index],
            _ => {}
        }
    }
    line
}

fn tokenize_line(text: &str, line: usize) -> Result<Vec<MetaToken>, GrammarError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            _ if c.is_whitespace() => {}
            ':' | '|' | '[' | ']' | '(' | ')' | '+' | '*' => tokens.push(MetaToken::Op(c)),
            '\'' => {
                let mut literal = String::from('\'');
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => literal.push(c),
                        None => {
                            return Err(GrammarError::Syntax {
                                line,
                                message: "unterminated literal".to_string(),
                            });
                        }
                    }
                }
                literal.push('\'');
                tokens.push(MetaToken::Literal(literal));
            }
            _ if c.is_alphabetic() || c == '_' => {
                let mut name = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !(next.is_alphanumeric() || next == '_') {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                tokens.push(MetaToken::Name(name));
            }
            _ => {
                return Err(GrammarError::Syntax {
                    line,
                    message: format!("unexpected character {c:?}"),
                });
            }
        }
    }
    Ok(tokens)
}

// ============================================================================
// NFA construction
// ============================================================================

/// Arcs of each NFA state; a `None` label is an epsilon arc.
type Nfa = Vec<Vec<(Option<String>, usize)>>;

struct RuleParser<'a> {
    tokens: &'a [MetaToken],
    line: usize,
    pos: usize,
    nfa: Nfa,
}

impl<'a> RuleParser<'a> {
    fn new(text: &'a RuleText) -> Self {
        Self {
            tokens: &text.tokens,
            line: text.line,
            pos: 0,
            nfa: Vec::new(),
        }
    }

    fn error(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<&MetaToken> {
        self.tokens.get(self.pos)
    }

    fn eat_op(&mut self, op: char) -> bool {
        if self.peek() == Some(&MetaToken::Op(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_op(&mut self, op: char) -> Result<(), GrammarError> {
        if self.eat_op(op) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{op}', found {:?}", self.peek())))
        }
    }

    fn new_state(&mut self) -> usize {
        self.nfa.push(Vec::new());
        self.nfa.len() - 1
    }

    fn add_arc(&mut self, from: usize, to: usize, label: Option<String>) {
        self.nfa[from].push((label, to));
    }

    fn parse_rule(&mut self) -> Result<(String, usize, usize), GrammarError> {
        let name = match self.peek() {
            Some(MetaToken::Name(name)) => name.clone(),
            other => return Err(self.error(format!("expected rule name, found {other:?}"))),
        };
        self.pos += 1;
        self.expect_op(':')?;
        let (start, finish) = self.parse_rhs()?;
        if let Some(extra) = self.peek() {
            return Err(self.error(format!("unexpected {extra:?} after rule `{name}`")));
        }
        Ok((name, start, finish))
    }

    fn parse_rhs(&mut self) -> Result<(usize, usize), GrammarError> {
        let (a, z) = self.parse_alt()?;
        if self.peek() != Some(&MetaToken::Op('|')) {
            return Ok((a, z));
        }
        let start = self.new_state();
        let finish = self.new_state();
        self.add_arc(start, a, None);
        self.add_arc(z, finish, None);
        while self.eat_op('|') {
            let (a, z) = self.parse_alt()?;
            self.add_arc(start, a, None);
            self.add_arc(z, finish, None);
        }
        Ok((start, finish))
    }

    fn parse_alt(&mut self) -> Result<(usize, usize), GrammarError> {
        let (a, mut b) = self.parse_item()?;
        while matches!(
            self.peek(),
            Some(MetaToken::Op('(' | '[') | MetaToken::Name(_) | MetaToken::Literal(_))
        ) {
            let (c, d) = self.parse_item()?;
            self.add_arc(b, c, None);
            b = d;
        }
        Ok((a, b))
    }

    fn parse_item(&mut self) -> Result<(usize, usize), GrammarError> {
        if self.eat_op('[') {
            let (a, z) = self.parse_rhs()?;
            self.expect_op(']')?;
            self.add_arc(a, z, None);
            return Ok((a, z));
        }
        let (a, z) = self.parse_atom()?;
        if self.eat_op('+') {
            self.add_arc(z, a, None);
            Ok((a, z))
        } else if self.eat_op('*') {
            self.add_arc(z, a, None);
            Ok((a, a))
        } else {
            Ok((a, z))
        }
    }

    fn parse_atom(&mut self) -> Result<(usize, usize), GrammarError> {
        if self.eat_op('(') {
            let (a, z) = self.parse_rhs()?;
            self.expect_op(')')?;
            return Ok((a, z));
        }
        let label = match self.peek() {
            Some(MetaToken::Name(text) | MetaToken::Literal(text)) => text.clone(),
            other => return Err(self.error(format!("expected (...), NAME or STRING, found {other:?}"))),
        };
        self.pos += 1;
        let a = self.new_state();
        let z = self.new_state();
        self.add_arc(a, z, Some(label));
        Ok((a, z))
    }
}

// ============================================================================
// DFA construction
// ============================================================================

fn add_closure(nfa: &Nfa, state: usize, set: &mut BTreeSet<usize>) {
    if !set.insert(state) {
        return;
    }
    for (label, next) in &nfa[state] {
        if label.is_none() {
            add_closure(nfa, *next, set);
        }
    }
}

/// Subset construction. State 0 of the result is the start state.
fn make_dfa(nfa: &Nfa, start: usize, finish: usize) -> Vec<RawState> {
    let mut initial = BTreeSet::new();
    add_closure(nfa, start, &mut initial);

    let mut sets = vec![initial];
    let mut states = Vec::new();
    let mut index = 0;
    while index < sets.len() {
        let mut by_label: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        for &nfa_state in &sets[index] {
            for (label, next) in &nfa[nfa_state] {
                if let Some(label) = label {
                    add_closure(nfa, *next, by_label.entry(label.clone()).or_default());
                }
            }
        }

        let mut state = RawState {
            arcs: BTreeMap::new(),
            is_final: sets[index].contains(&finish),
        };
        for (label, set) in by_label {
            let target = match sets.iter().position(|existing| *existing == set) {
                Some(target) => target,
                None => {
                    sets.push(set);
                    sets.len() - 1
                }
            };
            state.arcs.insert(label, target);
        }
        states.push(state);
        index += 1;
    }
    states
}

/// Merge equivalent states until no two states are equal.
fn simplify_dfa(states: &mut Vec<RawState>) {
    loop {
        let Some((keep, drop)) = find_equivalent(states) else {
            return;
        };
        states.remove(drop);
        for state in states.iter_mut() {
            for target in state.arcs.values_mut() {
                if *target == drop {
                    *target = keep;
                } else if *target > drop {
                    *target -= 1;
                }
            }
        }
    }
}

fn find_equivalent(states: &[RawState]) -> Option<(usize, usize)> {
    for i in 0..states.len() {
        for j in (i + 1)..states.len() {
            if states[i] == states[j] {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(source: &str) -> RawRule {
        let mut rules = compile(source).unwrap();
        assert_eq!(rules.len(), 1);
        rules.remove(0)
    }

    #[test]
    fn test_sequence() {
        let rule = single("pair: NAME '=' NUMBER\n");
        assert_eq!(rule.name, "pair");
        assert_eq!(rule.states.len(), 4);
        assert!(rule.states[3].is_final);
        assert_eq!(rule.states[0].arcs.get("NAME"), Some(&1));
    }

    #[test]
    fn test_star_loops_back_to_accepting_state() {
        let rule = single("names: NAME (',' NAME)*\n");
        // After the first NAME we may stop or see a comma.
        let after_name = rule.states[0].arcs["NAME"];
        assert!(rule.states[after_name].is_final);
        let after_comma = rule.states[after_name].arcs["','"];
        assert_eq!(rule.states[after_comma].arcs["NAME"], after_name);
    }

    #[test]
    fn test_shared_prefix_alternatives_merge() {
        // Both alternatives start with `is`, which must become a single arc.
        let rule = single("comp_op: '<' | 'is' | 'is' 'not'\n");
        assert_eq!(rule.states[0].arcs.len(), 2);
        let after_is = rule.states[0].arcs["'is'"];
        assert!(rule.states[after_is].is_final);
        assert!(rule.states[after_is].arcs.contains_key("'not'"));
    }

    #[test]
    fn test_equivalent_final_states_are_merged() {
        let rule = single("atom: NAME | NUMBER | STRING\n");
        assert_eq!(rule.states.len(), 2);
    }

    #[test]
    fn test_continuation_lines_and_comments() {
        let rules = compile("# header\na: NAME\n   | NUMBER  # trailing\nb: a\n").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].states[0].arcs.len(), 2);
    }

    #[test]
    fn test_syntax_errors_report_line() {
        let err = compile("a: NAME\nb NAME\n").unwrap_err();
        assert!(matches!(err, GrammarError::Syntax { line: 2, .. }));
        let err = compile("a: (NAME\n").unwrap_err();
        assert!(matches!(err, GrammarError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_duplicate_rule() {
        let err = compile("a: NAME\na: NUMBER\n").unwrap_err();
        assert_eq!(err, GrammarError::DuplicateRule { rule: "a".to_string() });
    }
}
