//! Import context from statements the parser could not finish.
//!
//! An unfinished `import a.b.` or `from ..pkg import` never becomes an import node: error recovery
//! removes its frames and keeps them as an [`ErrorStatement`]. The frames still hold everything
//! needed to know which module path has been typed so far.

use seer_syntax::parser::ErrorStatement;
use seer_syntax::tree::{LeafKind, NodeId, Tree};
use seer_syntax::{Module, Position};

const IMPORT_RULES: [&str; 2] = ["import_from", "import_name"];

/// A NAME of a dotted import path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportName {
    pub node: NodeId,
    pub value: String,
    pub start: Position,
}

impl ImportName {
    fn from_leaf(tree: &Tree, node: NodeId) -> Option<ImportName> {
        let leaf = tree.leaf(node)?;
        Some(ImportName {
            node,
            value: leaf.value.clone(),
            start: leaf.start,
        })
    }
}

/// What has been typed of an import statement before the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportContext {
    /// Path components up to the cursor.
    pub names: Vec<ImportName>,
    /// Leading dots of a relative import.
    pub level: usize,
    /// False once the `import` of a `from ... import` form is behind the cursor.
    pub only_modules: bool,
    /// The path ends in a `.` with no name after it.
    pub unfinished_dotted: bool,
}

impl Default for ImportContext {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            level: 0,
            only_modules: true,
            unfinished_dotted: false,
        }
    }
}

impl ImportContext {
    pub fn dotted_path(&self) -> String {
        let names: Vec<&str> = self.names.iter().map(|name| name.value.as_str()).collect();
        format!("{}{}", ".".repeat(self.level), names.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResolution {
    /// The statement is not an import, or the cursor is outside it.
    NotApplicable,
    /// The cursor is on the `import` keyword: nothing to complete.
    OnImportKeyword,
    Resolved(ImportContext),
}

impl ImportResolution {
    pub fn context(&self) -> Option<&ImportContext> {
        match self {
            ImportResolution::Resolved(context) => Some(context),
            _ => None,
        }
    }
}

/// True if `statement` is an import fragment whose span holds `pos` (start exclusive).
pub fn is_applicable(statement: &ErrorStatement, pos: Position) -> bool {
    IMPORT_RULES.contains(&statement.first_type()) && statement.start() < pos && pos <= statement.end()
}

/// Reconstruct the import context of an unfinished import statement.
#[tracing::instrument(level = "debug", skip_all, fields(%pos, rule = statement.first_type()))]
pub fn import_context(tree: &Tree, statement: &ErrorStatement, pos: Position) -> ImportResolution {
    if !is_applicable(statement, pos) {
        return ImportResolution::NotApplicable;
    }

    let mut context = ImportContext::default();
    for (rule, nodes) in statement.stack() {
        match rule.as_ref() {
            "dotted_name" => {
                context.names.extend(path_names(tree, nodes).filter(|name| name.start <= pos));
                if nodes.last().is_some_and(|last| tree.value(*last) == ".") {
                    context.unfinished_dotted = true;
                }
            }
            "import_name" => {
                if let Some(&keyword) = nodes.first() {
                    if tree.start(keyword) <= pos && pos <= tree.end(keyword) {
                        tracing::debug!("cursor on the import keyword");
                        return ImportResolution::OnImportKeyword;
                    }
                }
            }
            "import_from" => {
                for &node in nodes {
                    if tree.start(node) >= pos {
                        break;
                    }
                    match tree.leaf(node).map(|leaf| (leaf.kind, leaf.value.as_str())) {
                        None if tree.type_name(node) == "dotted_name" => {
                            let names = path_names(tree, tree.children(node)).filter(|name| name.start <= pos);
                            context.names.extend(names);
                        }
                        Some((LeafKind::Operator(_), dots @ ("." | "..."))) => context.level += dots.len(),
                        Some((LeafKind::Name, _)) => context.names.extend(ImportName::from_leaf(tree, node)),
                        Some((LeafKind::Keyword, "import")) => context.only_modules = false,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    ImportResolution::Resolved(context)
}

/// NAMEs of a dotted name: every other child.
fn path_names<'t>(tree: &'t Tree, children: &'t [NodeId]) -> impl Iterator<Item = ImportName> + 't {
    children
        .iter()
        .step_by(2)
        .filter_map(move |child| ImportName::from_leaf(tree, *child))
}

/// Import context from the first unfinished import statement around `pos`.
pub fn check_error_statements(module: &Module, pos: Position) -> ImportResolution {
    module
        .error_statements()
        .iter()
        .find(|statement| is_applicable(statement, pos))
        .map_or(ImportResolution::NotApplicable, |statement| {
            import_context(module.tree(), statement, pos)
        })
}

/// A name in a complete import statement and the path that leads to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub name: ImportName,
    /// Path components up to and including `name`.
    pub path: Vec<ImportName>,
    pub level: usize,
}

/// Resolve the import path under the cursor in a parsed import statement.
///
/// Only the parts up to the cursor are kept: on `os` in `import os.path` the path is `os`. Names
/// bound with `as` are definitions, not paths, and give `None`.
pub fn on_import_statement(module: &Module, pos: Position) -> Option<ImportTarget> {
    let tree = module.tree();
    let name = module.name_for_position(pos)?;
    let mut statement = tree.parent(name)?;
    while !IMPORT_RULES.contains(&tree.type_name(statement)) {
        if matches!(tree.type_name(statement), "simple_stmt" | "file_input" | "error_node") {
            return None;
        }
        statement = tree.parent(statement)?;
    }

    let parent = tree.parent(name)?;
    let is_alias = matches!(tree.type_name(parent), "dotted_as_name" | "import_as_name")
        && tree.children(parent).iter().position(|c| *c == name) == Some(2);
    if is_alias {
        return None;
    }

    let leading = |name: NodeId| -> Vec<ImportName> {
        if tree.type_name(parent) == "dotted_name" {
            let children = tree.children(parent);
            let until = children.iter().position(|c| *c == name).unwrap_or(0);
            path_names(tree, &children[..=until]).collect()
        } else {
            ImportName::from_leaf(tree, name).into_iter().collect()
        }
    };

    let target = ImportName::from_leaf(tree, name)?;
    if tree.type_name(statement) == "import_name" {
        return Some(ImportTarget {
            name: target,
            path: leading(name),
            level: 0,
        });
    }

    let children = tree.children(statement);
    let import_keyword = children
        .iter()
        .copied()
        .find(|child| tree.type_name(*child) == "keyword" && tree.value(*child) == "import");
    let mut level = 0;
    let mut module_path = Vec::new();
    for &child in children.iter().skip(1) {
        if Some(child) == import_keyword {
            break;
        }
        match tree.value(child) {
            dots @ ("." | "...") => level += dots.len(),
            _ if tree.type_name(child) == "dotted_name" => {
                module_path = path_names(tree, tree.children(child)).collect();
            }
            _ => module_path.extend(ImportName::from_leaf(tree, child)),
        }
    }

    let before_import = import_keyword.is_none_or(|keyword| target.start < tree.start(keyword));
    let path = if before_import {
        leading(name)
    } else {
        module_path.push(target.clone());
        module_path
    };
    Some(ImportTarget {
        name: target,
        path,
        level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seer_syntax::{Grammar, parse_module};

    fn module(source: &str) -> Module {
        let grammar = Grammar::python().unwrap();
        parse_module(&grammar, source).unwrap()
    }

    fn values(names: &[ImportName]) -> Vec<&str> {
        names.iter().map(|name| name.value.as_str()).collect()
    }

    #[test]
    fn test_not_applicable_outside_statement() {
        let module = module("import os.\nx = 1\n");
        assert_eq!(check_error_statements(&module, Position::new(2, 3)), ImportResolution::NotApplicable);
        // Start of the statement is excluded.
        assert_eq!(check_error_statements(&module, Position::new(1, 0)), ImportResolution::NotApplicable);
    }

    #[test]
    fn test_partial_names_stop_at_cursor() {
        let module = module("import foo.bar.\n");
        let resolution = check_error_statements(&module, Position::new(1, 9));
        let context = resolution.context().unwrap();
        assert_eq!(values(&context.names), ["foo"]);
        assert!(context.unfinished_dotted);
    }

    #[test]
    fn test_from_import_relative_with_module() {
        let module = module("from ..pkg import (\n");
        let resolution = check_error_statements(&module, Position::new(1, 19));
        let context = resolution.context().unwrap();
        assert_eq!(context.level, 2);
        assert_eq!(values(&context.names), ["pkg"]);
        assert!(!context.only_modules);
        assert_eq!(context.dotted_path(), "..pkg");
    }

    #[test]
    fn test_on_import_statement_import_name() {
        let module = module("import os.path\n");
        let target = on_import_statement(&module, Position::new(1, 12)).unwrap();
        assert_eq!(target.name.value, "path");
        assert_eq!(values(&target.path), ["os", "path"]);

        let target = on_import_statement(&module, Position::new(1, 8)).unwrap();
        assert_eq!(values(&target.path), ["os"]);
    }

    #[test]
    fn test_on_import_statement_import_from() {
        let module = module("from os.path import join as j\n");
        let target = on_import_statement(&module, Position::new(1, 22)).unwrap();
        assert_eq!(values(&target.path), ["os", "path", "join"]);
        assert_eq!(target.level, 0);

        let target = on_import_statement(&module, Position::new(1, 6)).unwrap();
        assert_eq!(values(&target.path), ["os"]);

        assert_eq!(on_import_statement(&module, Position::new(1, 29)), None);
    }

    #[test]
    fn test_on_import_statement_relative() {
        let module = module("from .. import x\n");
        let target = on_import_statement(&module, Position::new(1, 16)).unwrap();
        assert_eq!(target.level, 2);
        assert_eq!(values(&target.path), ["x"]);
    }

    #[test]
    fn test_on_import_statement_ignores_other_statements() {
        let module = module("x = os.path\n");
        assert_eq!(on_import_statement(&module, Position::new(1, 1)), None);
    }
}
