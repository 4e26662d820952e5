//! Descent into map keys.

use std::fmt;

use tracing::trace;

use super::traits::{Constraint, ConstraintResult};
use crate::error::PathKind;
use crate::introspect::{kind_of, should_be, unwrap_value};
use crate::node::{Kind, Node};
use crate::validation::Context;

/// Validates every key of a map.
///
/// Each key is pushed under its own display string with [`PathKind::Key`], so a key
/// violation and a value violation on the same entry share a path but can still be
/// told apart. A nil or empty map produces no violations.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use waymark::{rules, validate, Keys, PathKind};
///
/// let mut scores = BTreeMap::new();
/// scores.insert("a".to_string(), 1);
///
/// let violations = validate(&scores, &Keys::new().with(rules::min_length(10))).unwrap();
///
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].path, ".a");
/// assert_eq!(violations[0].path_kind, PathKind::Key);
/// ```
#[derive(Default)]
pub struct Keys {
    constraints: Vec<Box<dyn Constraint>>,
}

impl Keys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint run against every key.
    pub fn with<C>(mut self, constraint: C) -> Self
    where
        C: Constraint + 'static,
    {
        self.constraints.push(Box::new(constraint));
        self
    }
}

impl Constraint for Keys {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        let node = unwrap_value(ctx.node());
        let mismatch = should_be(ctx, kind_of(node), &[Kind::Map])?;
        if !mismatch.is_empty() {
            return Ok(mismatch);
        }

        let entries = match node {
            Node::Map { entries, .. } if !entries.is_empty() => entries,
            _ => return Ok(Vec::new()),
        };

        trace!(path = %ctx.path(), keys = entries.len(), "descending into keys");

        let mut violations = Vec::new();
        for (key, _) in entries {
            let key_ctx = ctx
                .with_value(key.to_string(), key)
                .with_path_kind(PathKind::Key);
            for constraint in &self.constraints {
                violations.extend(constraint.violations(&key_ctx)?);
            }
        }
        Ok(violations)
    }
}

impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys")
            .field("constraints", &self.constraints.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::from_fn;
    use crate::constraint::testing::Probe;
    use crate::error::ConstraintError;
    use crate::node::{Reflect, Type};
    use crate::validation::{validate, validate_context, validate_node};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn test_runs_constraint_once_per_key() {
        let map: HashMap<String, i32> = (0..6).map(|i| (format!("k{}", i), i)).collect();
        let probe = Arc::new(Probe::violating());

        let violations = validate(&map, &Keys::new().with(Arc::clone(&probe))).unwrap();

        assert_eq!(probe.calls(), 6);
        assert!(violations.iter().all(|v| v.path_kind == PathKind::Key));
    }

    #[test]
    fn test_children_see_keys() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = {
            let seen = Arc::clone(&seen);
            from_fn(move |ctx| {
                seen.lock().push(ctx.node().clone());
                Ok(Vec::new())
            })
        };
        let node = Node::map(
            Type::Int,
            Type::String,
            [
                (Node::Int(1), Node::String("one".into())),
                (Node::Int(2), Node::String("two".into())),
            ],
        );

        validate_node(&node, &Keys::new().with(recorder)).unwrap();

        assert_eq!(*seen.lock(), vec![Node::Int(1), Node::Int(2)]);
    }

    #[test]
    fn test_nil_and_empty_maps_short_circuit() {
        let nodes = vec![
            None::<HashMap<String, i32>>.reflect(),
            HashMap::<String, i32>::new().reflect(),
        ];

        for node in nodes {
            let probe = Arc::new(Probe::violating());
            let violations = validate_node(&node, &Keys::new().with(Arc::clone(&probe))).unwrap();
            assert!(violations.is_empty());
            assert_eq!(probe.calls(), 0);
        }
    }

    #[test]
    fn test_key_paths() {
        let node = Node::map(
            Type::Pointer(Arc::new(Type::String)),
            Type::Int,
            [
                (Node::nil_pointer(Type::String), Node::Int(1)),
                (
                    Node::pointer(Type::String, Node::String("set".into())),
                    Node::Int(2),
                ),
            ],
        );

        let violations = validate_node(&node, &Keys::new().with(Probe::violating())).unwrap();
        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec![".nil", ".set"]);
    }

    #[test]
    fn test_wrong_kind() {
        let node = vec![1, 2].reflect();

        assert!(matches!(
            validate_node(&node, &Keys::new().with(Probe::violating())),
            Err(ConstraintError::KindMismatch { .. })
        ));

        let ctx = Context::new(&node).with_strict_types(false);
        let violations = validate_context(&ctx, &Keys::new().with(Probe::violating())).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path_kind, PathKind::Value);
    }
}
