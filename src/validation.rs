//! Validation context and entry points.
//!
//! This module provides the [`Context`] type threaded through every constraint, and the
//! [`validate`], [`validate_node`] and [`validate_context`] entry points. A context is an
//! immutable value: every `with_*` method returns a new context that shares the old
//! one's path frames, so sibling branches of a descent never see each other's state.

use std::sync::Arc;

use tracing::{debug, debug_span, warn};

use crate::constraint::Constraint;
use crate::error::{ConstraintError, Details, PathKind, Violation};
use crate::node::{Node, Reflect};
use crate::path::{PathStack, ValueNode};

/// The struct tag consulted for field display names unless a context overrides it.
pub const DEFAULT_STRUCT_TAG: &str = "validation";

/// Traversal state and configuration for one validation run.
///
/// `Context` carries:
/// - the stack of named nodes from the root to the value under inspection
/// - the [`PathKind`] stamped onto violations built from it
/// - the struct tag used to resolve record field display names
/// - the strict-types policy consulted by [`should_be`](crate::should_be)
///
/// Contexts can only be created from a root node, so the stack is never empty.
///
/// # Example
///
/// ```rust
/// use waymark::{Context, Node, PathKind};
///
/// let root = Node::Int(1);
/// let child = Node::Int(2);
///
/// let ctx = Context::new(&root).with_struct_tag("json");
/// let key_ctx = ctx.with_value("id", &child).with_path_kind(PathKind::Key);
///
/// assert_eq!(ctx.path(), ".");
/// assert_eq!(key_ctx.path(), ".id");
/// assert_eq!(key_ctx.violation("bad key", None).path_kind, PathKind::Key);
/// ```
#[derive(Debug, Clone)]
pub struct Context<'a> {
    path_kind: PathKind,
    struct_tag: Arc<str>,
    strict_types: bool,
    stack: PathStack<'a>,
}

impl<'a> Context<'a> {
    /// Creates a context rooted at `root` with the default struct tag, strict types
    /// enabled and the value path kind.
    pub fn new(root: &'a Node) -> Self {
        Self {
            path_kind: PathKind::Value,
            struct_tag: Arc::from(DEFAULT_STRUCT_TAG),
            strict_types: true,
            stack: PathStack::root(root),
        }
    }

    /// Returns a new context with `node` pushed under `name`.
    pub fn with_value(&self, name: impl Into<Box<str>>, node: &'a Node) -> Self {
        Self {
            path_kind: self.path_kind,
            struct_tag: Arc::clone(&self.struct_tag),
            strict_types: self.strict_types,
            stack: self.stack.push(name, node),
        }
    }

    /// Returns a new context with the given path kind. The stack is unchanged.
    pub fn with_path_kind(&self, path_kind: PathKind) -> Self {
        Self {
            path_kind,
            ..self.clone()
        }
    }

    /// Returns a new context that resolves field names through `tag`.
    pub fn with_struct_tag(&self, tag: impl AsRef<str>) -> Self {
        Self {
            struct_tag: Arc::from(tag.as_ref()),
            ..self.clone()
        }
    }

    /// Returns a new context with the given strict-types policy.
    ///
    /// When disabled, shape mismatches found by [`should_be`](crate::should_be) become
    /// violations instead of fatal errors.
    pub fn with_strict_types(&self, strict_types: bool) -> Self {
        Self {
            strict_types,
            ..self.clone()
        }
    }

    /// Returns the current value-node.
    pub fn value(&self) -> ValueNode<'_> {
        self.stack.current()
    }

    /// Returns the current node.
    pub fn node(&self) -> &'a Node {
        self.stack.node()
    }

    /// Returns the node validation started from.
    pub fn root(&self) -> &'a Node {
        self.stack.root_node()
    }

    pub fn path_kind(&self) -> PathKind {
        self.path_kind
    }

    pub fn struct_tag(&self) -> &str {
        &self.struct_tag
    }

    pub fn strict_types(&self) -> bool {
        self.strict_types
    }

    /// Returns the number of values on the stack, root included.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Returns the value-nodes from the root to the current value.
    pub fn values(&self) -> Vec<ValueNode<'_>> {
        self.stack.values()
    }

    /// Renders the dotted path of the current value.
    pub fn path(&self) -> String {
        self.stack.to_string()
    }

    /// Builds a violation located at the current path, with the current path kind.
    pub fn violation(&self, message: impl Into<String>, details: Option<Details>) -> Violation {
        Violation::new(self.path(), message)
            .with_path_kind(self.path_kind)
            .with_details(details.unwrap_or_default())
    }
}

/// Validates any reflectable value.
///
/// The value is projected into a [`Node`] and validated with a fresh [`Context`].
///
/// # Example
///
/// ```rust
/// use waymark::{validate, rules};
///
/// let violations = validate(&0, &rules::required()).unwrap();
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].path, ".");
///
/// assert!(validate(&1, &rules::required()).unwrap().is_empty());
/// ```
pub fn validate<T, C>(value: &T, constraint: &C) -> Result<Vec<Violation>, ConstraintError>
where
    T: Reflect + ?Sized,
    C: Constraint + ?Sized,
{
    let node = value.reflect();
    validate_node(&node, constraint)
}

/// Validates a node with a fresh [`Context`].
pub fn validate_node<C>(node: &Node, constraint: &C) -> Result<Vec<Violation>, ConstraintError>
where
    C: Constraint + ?Sized,
{
    validate_context(&Context::new(node), constraint)
}

/// Validates the current node of `ctx`.
///
/// Pass a [`Constraints`](crate::Constraints) to run several constraints. The returned
/// violations are stably sorted by path.
///
/// # Errors
///
/// Returns [`ConstraintError::InvalidRoot`] if the context's root is
/// [`Node::Invalid`], or any fatal error raised by the constraint tree.
pub fn validate_context<C>(
    ctx: &Context<'_>,
    constraint: &C,
) -> Result<Vec<Violation>, ConstraintError>
where
    C: Constraint + ?Sized,
{
    let span = debug_span!("validate", path = %ctx.path(), strict_types = ctx.strict_types());
    let _enter = span.enter();

    if !ctx.root().is_valid() {
        warn!("refusing to validate an invalid root value");
        return Err(ConstraintError::InvalidRoot);
    }

    let mut violations = constraint.violations(ctx).map_err(|err| {
        warn!(error = %err, "validation aborted");
        err
    })?;
    violations.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(violations = violations.len(), "validation finished");
    Ok(violations)
}
