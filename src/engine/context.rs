//! Name and definition lookup at a position, delegated to an [`Evaluator`].

use std::cmp::Ordering;

use seer_syntax::tree::NodeId;
use seer_syntax::{Module, Position};

/// Semantic services the engine calls but does not implement.
pub trait Evaluator {
    type Definition;

    /// Definitions of the NAME leaf `name`.
    fn goto_definition(&self, module: &Module, name: NodeId) -> Vec<Self::Definition>;

    /// Values the expression `node` may evaluate to.
    fn eval_element(&self, module: &Module, node: NodeId) -> Vec<Self::Definition>;

    /// Names visible at `pos`, for completing a NAME.
    fn names_in_scope(&self, module: &Module, pos: Position) -> Vec<String> {
        let _ = (module, pos);
        Vec::new()
    }
}

/// Where a definition lives; used to order results.
pub trait DefinitionSite {
    fn module_path(&self) -> Option<&str>;
    fn line(&self) -> Option<usize>;
    fn column(&self) -> Option<usize>;
}

/// Sort by module path, then line, then column. Missing values sort first.
pub fn sorted_definitions<D: DefinitionSite>(mut definitions: Vec<D>) -> Vec<D> {
    definitions.sort_by(|a, b| compare_sites(a, b));
    definitions
}

fn compare_sites<D: DefinitionSite>(a: &D, b: &D) -> Ordering {
    let key = |d: &D| (d.module_path().unwrap_or("").to_string(), d.line().unwrap_or(0), d.column().unwrap_or(0));
    key(a).cmp(&key(b))
}

/// Answer "what does the thing at `pos` refer to".
///
/// A NAME under the cursor goes to [`Evaluator::goto_definition`]. Otherwise the leaf at `pos` is
/// evaluated through its enclosing atom or, inside a trailer, through the expression that owns the
/// trailer. Anything else has no context.
#[tracing::instrument(level = "debug", skip_all, fields(%pos))]
pub fn context_results<E: Evaluator>(evaluator: &E, module: &Module, pos: Position) -> Vec<E::Definition> {
    if let Some(name) = module.name_for_position(pos) {
        return evaluator.goto_definition(module, name);
    }

    let tree = module.tree();
    let Some(leaf) = module.leaf_for_position(pos, false) else {
        return Vec::new();
    };
    let Some(parent) = tree.parent(leaf) else {
        return Vec::new();
    };
    match tree.type_name(parent) {
        "atom" => evaluator.eval_element(module, parent),
        "trailer" => match tree.parent(parent) {
            Some(owner) => evaluator.eval_element(module, owner),
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// A dotted path split for completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionParts {
    /// Everything before the last dot.
    pub path: String,
    pub has_dot: bool,
    /// The identifier being typed.
    pub name: String,
}

/// Split `path_until_cursor` into the path, the dot and the trailing identifier.
///
/// ## Examples
/// ```rust
/// use seer::engine::context::get_completion_parts;
///
/// let parts = get_completion_parts("os.path.jo");
/// assert_eq!((parts.path.as_str(), parts.has_dot, parts.name.as_str()), ("os.path", true, "jo"));
/// ```
pub fn get_completion_parts(path_until_cursor: &str) -> CompletionParts {
    let name_start = path_until_cursor
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map_or(path_until_cursor.len(), |(index, _)| index);
    let (head, name) = path_until_cursor.split_at(name_start);
    let (path, has_dot) = match head.strip_suffix('.') {
        Some(path) => (path, true),
        None => (head, false),
    };
    CompletionParts {
        path: path.to_string(),
        has_dot,
        name: name.to_string(),
    }
}

pub(crate) fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
