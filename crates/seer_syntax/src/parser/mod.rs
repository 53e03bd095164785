//! LL(1) pushdown parser driven by the [`Grammar`] tables.
//!
//! Tokens are fed one at a time through [`Parser::add_token`]. The parser keeps an explicit stack
//! of [`StackFrame`]s (one per nonterminal being recognized) which is also what the completion
//! engine inspects after running a truncated snippet through it.
//!
//! ## Notes
//! - Tokens that do not fit are handled by error recovery (see `recovery.rs`) instead of failing the
//!   parse, so a tree is always produced.
//! - A frame that matched a single child is collapsed into that child when popped, except for
//!   `file_input` and `expr_stmt`.

mod module;
mod recovery;

use std::sync::Arc;

use seer_core::lang::keywords;

use crate::diagnostics::ParseError;
use crate::grammar::{Dfa, Grammar, Label, LabelId, SymbolId, Transition};
use crate::token::{Token, TokenType};
use crate::tokenizer::tokenize;
use crate::tree::{LeafKind, NodeId, Tree};

pub use module::Module;
pub use recovery::ErrorStatement;

use recovery::Recovery;

/// Rules whose node is kept even when it has exactly one child.
const KEEP_SINGLE_CHILD: [&str; 2] = ["file_input", "expr_stmt"];

/// One nonterminal in progress.
#[derive(Debug, Clone)]
pub struct StackFrame<'g> {
    dfa: &'g Dfa,
    state: usize,
    children: Vec<NodeId>,
}

impl<'g> StackFrame<'g> {
    fn new(dfa: &'g Dfa) -> Self {
        Self {
            dfa,
            state: 0,
            children: Vec::new(),
        }
    }

    pub fn dfa(&self) -> &'g Dfa {
        self.dfa
    }

    pub fn symbol(&self) -> SymbolId {
        self.dfa.symbol()
    }

    pub fn state(&self) -> usize {
        self.state
    }

    /// Arcs leaving the current state.
    pub fn arcs(&self) -> &'g [Transition] {
        self.dfa.arcs(self.state)
    }

    /// Nodes collected so far for this rule.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

enum Step {
    Accepted { done: bool },
    Recover,
}

#[derive(Debug)]
pub struct Parser<'g> {
    grammar: &'g Grammar,
    stack: Vec<StackFrame<'g>>,
    tree: Tree,
    root: Option<NodeId>,
    error_statements: Vec<ErrorStatement>,
    /// Indent levels whose INDENT was dropped; the matching DEDENT is dropped too.
    omitted_dedents: Vec<usize>,
    indent_counter: usize,
}

impl<'g> Parser<'g> {
    /// Parser positioned at the start rule.
    pub fn new(grammar: &'g Grammar) -> Self {
        let stack = grammar.dfa(grammar.start()).map(StackFrame::new).into_iter().collect();
        Self {
            grammar,
            stack,
            tree: Tree::new(),
            root: None,
            error_statements: Vec::new(),
            omitted_dedents: Vec::new(),
            indent_counter: 0,
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn stack(&self) -> &[StackFrame<'g>] {
        &self.stack
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn error_statements(&self) -> &[ErrorStatement] {
        &self.error_statements
    }

    /// True once the start rule has been completed.
    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    /// Feed one token.
    ///
    /// Returns `Ok(true)` when the token completed the start rule. Tokens that do not fit trigger
    /// error recovery and never fail; only input after completion is an error.
    pub fn add_token(&mut self, token: Token) -> Result<bool, ParseError> {
        match token.kind {
            TokenType::Dedent => {
                if self.omitted_dedents.last() == Some(&self.indent_counter) {
                    self.omitted_dedents.pop();
                    return Ok(false);
                }
                self.indent_counter = self.indent_counter.saturating_sub(1);
            }
            TokenType::Indent => self.indent_counter += 1,
            _ => {}
        }

        let mut token = token;
        loop {
            if self.stack.is_empty() {
                return Err(too_much_input(&token));
            }
            let step = match self.classify(&token) {
                Some(label) => self.step(label, &token)?,
                None => Step::Recover,
            };
            match step {
                Step::Accepted { done } => return Ok(done),
                Step::Recover => match self.recover(token) {
                    Recovery::Retry(retry) => token = retry,
                    Recovery::Absorbed => return Ok(false),
                },
            }
        }
    }

    /// Label for a token: NAMEs spelled like a grammar keyword get the keyword label.
    fn classify(&self, token: &Token) -> Option<LabelId> {
        if token.kind == TokenType::Name {
            let keyword = keywords::from_str(&token.value).and_then(|kw| self.grammar.keyword_label(kw));
            if keyword.is_some() {
                return keyword;
            }
        }
        self.grammar.token_label(token.kind)
    }

    fn step(&mut self, label: LabelId, token: &Token) -> Result<Step, ParseError> {
        let grammar = self.grammar;
        loop {
            let Some(frame) = self.stack.last() else {
                return Err(too_much_input(token));
            };
            let (dfa, state) = (frame.dfa, frame.state);

            let mut pushed = false;
            for arc in dfa.arcs(state) {
                if arc.label == label {
                    self.shift(token, label, arc.target);
                    return Ok(Step::Accepted {
                        done: self.pop_completed(),
                    });
                }
                if let Some(Label::Nonterminal(symbol)) = grammar.label(arc.label) {
                    if let Some(child) = grammar.dfa(symbol).filter(|child| child.first().contains(&label)) {
                        self.push(child, arc.target);
                        pushed = true;
                        break;
                    }
                }
            }
            if pushed {
                continue;
            }

            if dfa.is_accepting(state) {
                self.pop();
                if self.stack.is_empty() {
                    return Err(too_much_input(token));
                }
                continue;
            }
            return Ok(Step::Recover);
        }
    }

    fn shift(&mut self, token: &Token, label: LabelId, target: usize) {
        let is_keyword = matches!(self.grammar.label(label), Some(Label::Keyword(_)));
        let leaf = self.tree.add_leaf(
            LeafKind::from_token(token.kind, is_keyword),
            token.value.clone(),
            token.prefix.clone(),
            token.start,
        );
        if let Some(top) = self.stack.last_mut() {
            top.state = target;
            top.children.push(leaf);
        }
    }

    fn push(&mut self, dfa: &'g Dfa, target: usize) {
        if let Some(top) = self.stack.last_mut() {
            top.state = target;
        }
        self.stack.push(StackFrame::new(dfa));
    }

    /// Pop frames that cannot take another token. Returns true if the stack ran empty.
    fn pop_completed(&mut self) -> bool {
        while let Some(top) = self.stack.last() {
            if !top.dfa.is_accept_only(top.state) {
                return false;
            }
            self.pop();
        }
        true
    }

    fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            let node = self.convert(frame);
            self.attach(node);
        }
    }

    fn convert(&mut self, frame: StackFrame<'g>) -> NodeId {
        let grammar = self.grammar;
        let symbol = frame.symbol();
        let name = grammar.symbol_name(symbol);
        if let [only] = frame.children.as_slice() {
            if !KEEP_SINGLE_CHILD.contains(&name) {
                return *only;
            }
        }
        let name = grammar.symbol_name_arc(symbol).unwrap_or_else(|| Arc::from(name));
        self.tree.add_branch(Some(symbol), name, frame.children)
    }

    fn attach(&mut self, node: NodeId) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root = Some(node),
        }
    }

    /// Close every open rule and return the module.
    ///
    /// Used when input ran out before ENDMARKER was accepted; frames without children are dropped.
    pub fn finish(mut self) -> Module {
        while let Some(frame) = self.stack.pop() {
            if frame.children.is_empty() && !self.stack.is_empty() {
                continue;
            }
            let node = self.convert(frame);
            self.attach(node);
        }
        let root = match self.root {
            Some(root) => root,
            None => {
                let start = self.grammar.start();
                let name = self.grammar.symbol_name_arc(start).unwrap_or_else(|| Arc::from("file_input"));
                self.tree.add_branch(Some(start), name, Vec::new())
            }
        };
        Module::new(self.tree, root, self.error_statements)
    }

    /// Stop parsing and hand out the raw stack together with the nodes built so far.
    pub fn into_parts(self) -> (Vec<StackFrame<'g>>, Tree) {
        (self.stack, self.tree)
    }
}

fn too_much_input(token: &Token) -> ParseError {
    ParseError::TooMuchInput {
        value: token.value.clone(),
        position: token.start,
    }
}

/// Parse a whole module.
///
/// A trailing newline is appended when `source` lacks one; [`Module::code`] strips it again.
#[tracing::instrument(level = "debug", skip_all, fields(source_len = source.len()))]
pub fn parse_module(grammar: &Grammar, source: &str) -> Result<Module, ParseError> {
    let added_newline = !source.ends_with('\n');
    let text = if added_newline {
        format!("{source}\n")
    } else {
        source.to_string()
    };

    let mut parser = Parser::new(grammar);
    for token in tokenize(&text) {
        if parser.add_token(token)? {
            break;
        }
    }
    let mut module = parser.finish();
    module.added_newline = added_newline;
    tracing::debug!(
        error_statements = module.error_statements().len(),
        "parsed module"
    );
    Ok(module)
}

#[cfg(test)]
mod tests;
