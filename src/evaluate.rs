//! A small evaluator over a single module.
//!
//! Finds binding sites by spelling: no scopes, no types, no other modules. This is enough for the
//! CLI and the language server to answer goto requests and to offer module names as completions.

use std::collections::BTreeSet;

use seer_syntax::tree::{LeafKind, NodeId, Tree};
use seer_syntax::{Module, Position};

use crate::engine::{DefinitionSite, Evaluator, sorted_definitions};

/// What kind of construct binds a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Function,
    Class,
    Parameter,
    Assignment,
    LoopTarget,
    WithTarget,
    ExceptTarget,
    Import,
    /// A literal an expression evaluates to.
    Literal,
}

impl DefinitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DefinitionKind::Function => "function",
            DefinitionKind::Class => "class",
            DefinitionKind::Parameter => "parameter",
            DefinitionKind::Assignment => "assignment",
            DefinitionKind::LoopTarget => "loop target",
            DefinitionKind::WithTarget => "with target",
            DefinitionKind::ExceptTarget => "except target",
            DefinitionKind::Import => "import",
            DefinitionKind::Literal => "literal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub kind: DefinitionKind,
    pub start: Position,
    pub end: Position,
    pub module_path: Option<String>,
}

impl DefinitionSite for Definition {
    fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    fn line(&self) -> Option<usize> {
        Some(self.start.line)
    }

    fn column(&self) -> Option<usize> {
        Some(self.start.column)
    }
}

/// Evaluator that resolves names to their binding sites in the same module.
#[derive(Debug, Clone, Default)]
pub struct ScopeEvaluator {
    module_path: Option<String>,
}

impl ScopeEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a path to every definition this evaluator reports.
    pub fn with_module_path(mut self, path: impl Into<String>) -> Self {
        self.module_path = Some(path.into());
        self
    }

    /// Every binding site in `module`, in document order.
    pub fn definitions(&self, module: &Module) -> Vec<Definition> {
        let tree = module.tree();
        let definitions = tree
            .leaves(module.root())
            .into_iter()
            .filter_map(|leaf| {
                let kind = binding_kind(tree, leaf)?;
                Some(self.definition(tree, leaf, kind))
            })
            .collect();
        sorted_definitions(definitions)
    }

    fn definition(&self, tree: &Tree, leaf: NodeId, kind: DefinitionKind) -> Definition {
        Definition {
            name: tree.value(leaf).to_string(),
            kind,
            start: tree.start(leaf),
            end: tree.end(leaf),
            module_path: self.module_path.clone(),
        }
    }
}

impl Evaluator for ScopeEvaluator {
    type Definition = Definition;

    fn goto_definition(&self, module: &Module, name: NodeId) -> Vec<Definition> {
        let spelling = module.tree().value(name);
        self.definitions(module)
            .into_iter()
            .filter(|definition| definition.name == spelling)
            .collect()
    }

    fn eval_element(&self, module: &Module, node: NodeId) -> Vec<Definition> {
        let tree = module.tree();
        let leading = tree.leaves(node).into_iter().find_map(|leaf| {
            let kind = tree.leaf(leaf)?.kind;
            matches!(
                kind,
                LeafKind::Name | LeafKind::Number | LeafKind::String | LeafKind::Keyword
            )
            .then_some((leaf, kind))
        });
        match leading {
            Some((leaf, LeafKind::Name)) => self.goto_definition(module, leaf),
            Some((leaf, _)) => vec![self.definition(tree, leaf, DefinitionKind::Literal)],
            None => Vec::new(),
        }
    }

    fn names_in_scope(&self, module: &Module, pos: Position) -> Vec<String> {
        let names: BTreeSet<String> = self
            .definitions(module)
            .into_iter()
            .filter(|definition| definition.start < pos)
            .map(|definition| definition.name)
            .collect();
        names.into_iter().collect()
    }
}

/// How the NAME leaf `name` is bound, if it is a binding occurrence.
fn binding_kind(tree: &Tree, name: NodeId) -> Option<DefinitionKind> {
    if tree.leaf(name)?.kind != LeafKind::Name {
        return None;
    }
    let parent = tree.parent(name)?;
    let siblings = tree.children(parent);
    let index = siblings.iter().position(|child| *child == name)?;
    let previous = index.checked_sub(1).map(|i| tree.value(siblings[i]));

    let kind = match tree.type_name(parent) {
        "funcdef" if index == 1 => DefinitionKind::Function,
        "classdef" if index == 1 => DefinitionKind::Class,
        "parameters" | "typedargslist" | "varargslist" => DefinitionKind::Parameter,
        "tfpdef" | "tfpdef_item" | "vfpdef_item" if index == 0 || matches!(previous, Some("*" | "**")) => {
            DefinitionKind::Parameter
        }
        "lambdef" | "lambdef_nocond" if index == 1 => DefinitionKind::Parameter,
        "import_name" | "dotted_as_names" | "import_as_names" => DefinitionKind::Import,
        "import_as_name" | "dotted_as_name" if index == 2 => DefinitionKind::Import,
        "import_from" if siblings[..index].iter().any(|s| tree.value(*s) == "import") => DefinitionKind::Import,
        "dotted_name" if index == 0 => {
            let owner = tree.parent(parent).map(|owner| tree.type_name(owner));
            if matches!(owner, Some("import_name" | "dotted_as_names")) {
                DefinitionKind::Import
            } else {
                return None;
            }
        }
        "except_clause" if previous == Some("as") => DefinitionKind::ExceptTarget,
        _ => return target_kind(tree, name),
    };
    Some(kind)
}

/// Assignment, loop and `with` targets, possibly nested in tuples and lists.
fn target_kind(tree: &Tree, name: NodeId) -> Option<DefinitionKind> {
    let mut node = name;
    loop {
        let parent = tree.parent(node)?;
        let siblings = tree.children(parent);
        let index = siblings.iter().position(|child| *child == node)?;
        match tree.type_name(parent) {
            "testlist_star_expr" | "exprlist" | "testlist_comp" | "star_expr" => node = parent,
            "atom" if matches!(siblings.first().map(|s| tree.value(*s)), Some("(" | "[")) => node = parent,
            "expr_stmt" => {
                let next = siblings.get(index + 1).map(|s| tree.value(*s));
                return (next == Some("=")).then_some(DefinitionKind::Assignment);
            }
            "for_stmt" | "comp_for" => return (index == 1).then_some(DefinitionKind::LoopTarget),
            "with_item" => {
                let previous = index.checked_sub(1).map(|i| tree.value(siblings[i]));
                return (previous == Some("as")).then_some(DefinitionKind::WithTarget);
            }
            _ => return None,
        }
    }
}
