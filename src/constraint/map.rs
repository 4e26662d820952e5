//! Descent into specific map values.

use std::fmt;

use tracing::trace;

use super::traits::{Constraint, ConstraintResult};
use crate::error::ConstraintError;
use crate::introspect::{kind_of, should_be, unwrap_value};
use crate::node::{Kind, Node, Reflect, Type, INVALID};
use crate::validation::Context;

/// Validates the values stored under specific map keys.
///
/// A key the map does not contain is visited as [`Node::Invalid`], so presence rules
/// such as [`rules::required`](crate::rules::required) report it while optional rules
/// skip it. A nil map produces no violations.
///
/// Every key must have the map's declared key type, unless that type is an interface.
/// A key of another type is a fatal [`ConstraintError::KindMismatch`] rather than a
/// missing entry.
///
/// Use [`Elements`](crate::Elements) to run the same constraints against every value,
/// or [`Keys`](crate::Keys) to validate the keys themselves.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use waymark::{rules, validate, Map};
///
/// let mut env = HashMap::new();
/// env.insert("HOME".to_string(), "/root".to_string());
///
/// let constraints = Map::new()
///     .key("HOME", rules::required())
///     .key("PATH", rules::required());
///
/// let violations = validate(&env, &constraints).unwrap();
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].path, ".PATH");
/// ```
#[derive(Default)]
pub struct Map {
    entries: Vec<(Node, Box<dyn Constraint>)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint for the value stored under `key`. A repeated key replaces the
    /// earlier constraint.
    pub fn key<K, C>(mut self, key: K, constraint: C) -> Self
    where
        K: Reflect,
        C: Constraint + 'static,
    {
        let key = key.reflect();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = Box::new(constraint),
            None => self.entries.push((key, Box::new(constraint))),
        }
        self
    }

    fn check_key_types(&self, key_type: &Type) -> Result<(), ConstraintError> {
        if *key_type == Type::Interface {
            return Ok(());
        }
        for (key, _) in &self.entries {
            if key.type_of().as_ref() != Some(key_type) {
                return Err(ConstraintError::KindMismatch {
                    allowed: vec![key_type.kind()],
                    actual: key.kind(),
                });
            }
        }
        Ok(())
    }
}

impl Constraint for Map {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        let node = unwrap_value(ctx.node());
        let mismatch = should_be(ctx, kind_of(node), &[Kind::Map])?;
        if !mismatch.is_empty() {
            return Ok(mismatch);
        }

        if node.is_nil() {
            return Ok(Vec::new());
        }

        if let Node::Map { key: key_type, .. } = node {
            self.check_key_types(key_type)?;
        }

        trace!(path = %ctx.path(), keys = self.entries.len(), "descending into map values");

        let mut violations = Vec::new();
        for (key, constraint) in &self.entries {
            let child = node.get(key).unwrap_or(&INVALID);
            violations.extend(constraint.violations(&ctx.with_value(key.to_string(), child))?);
        }
        Ok(violations)
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field(
                "keys",
                &self.entries.iter().map(|(k, _)| k.to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::from_fn;
    use crate::constraint::testing::Probe;
    use crate::validation::{validate, validate_context, validate_node};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn env() -> HashMap<String, String> {
        [
            ("HOME".to_string(), "/root".to_string()),
            ("SHELL".to_string(), "/bin/sh".to_string()),
        ]
        .into()
    }

    #[test]
    fn test_runs_each_key_constraint_once() {
        let probe = Arc::new(Probe::violating());
        let checks = Map::new()
            .key("HOME", Arc::clone(&probe))
            .key("SHELL", Arc::clone(&probe));

        let violations = validate(&env(), &checks).unwrap();

        assert_eq!(probe.calls(), 2);
        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec![".HOME", ".SHELL"]);
    }

    #[test]
    fn test_children_see_values() {
        let checks = Map::new().key(
            "HOME",
            from_fn(|ctx| {
                assert_eq!(ctx.node().as_str(), Some("/root"));
                Ok(Vec::new())
            }),
        );
        assert!(validate(&env(), &checks).unwrap().is_empty());
    }

    #[test]
    fn test_missing_key_is_invalid_node() {
        let checks = Map::new().key(
            "PATH",
            from_fn(|ctx| {
                assert!(!ctx.node().is_valid());
                Ok(vec![ctx.violation("missing", None)])
            }),
        );

        let violations = validate(&env(), &checks).unwrap();
        assert_eq!(violations[0].path, ".PATH");
    }

    #[test]
    fn test_non_string_keys() {
        let node = Node::map(
            Type::Int,
            Type::String,
            [(Node::Int(7), Node::String("seven".into()))],
        );
        let checks = Map::new().key(7, Probe::violating());

        let violations = validate_node(&node, &checks).unwrap();
        assert_eq!(violations[0].path, ".7");
    }

    #[test]
    fn test_key_of_another_type_is_fatal() {
        let ports: HashMap<u32, String> = [(7, "echo".to_string())].into();
        let probe = Arc::new(Probe::violating());
        let checks = Map::new().key(7i32, Arc::clone(&probe));

        assert_eq!(
            validate(&ports, &checks),
            Err(ConstraintError::KindMismatch {
                allowed: vec![Kind::Uint],
                actual: Kind::Int,
            })
        );
        assert_eq!(probe.calls(), 0);

        let checks = Map::new().key(7u32, Arc::clone(&probe));
        assert_eq!(validate(&ports, &checks).unwrap().len(), 1);
        assert_eq!(probe.calls(), 1);
    }

    #[test]
    fn test_interface_keys_accept_any_type() {
        let node = Node::map(
            Type::Interface,
            Type::String,
            [(Node::Int(7), Node::String("seven".into()))],
        );
        let checks = Map::new().key(7, Probe::violating()).key("x", Probe::violating());

        let violations = validate_node(&node, &checks).unwrap();
        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec![".7", ".x"]);
    }

    #[test]
    fn test_repeated_key_replaces_constraint() {
        let first = Arc::new(Probe::violating());
        let second = Arc::new(Probe::silent());
        let checks = Map::new()
            .key("HOME", Arc::clone(&first))
            .key("HOME", Arc::clone(&second));

        assert!(validate(&env(), &checks).unwrap().is_empty());
        assert_eq!(first.calls(), 0);
        assert_eq!(second.calls(), 1);
    }

    #[test]
    fn test_nil_map_short_circuits() {
        let probe = Arc::new(Probe::violating());
        let checks = Map::new().key("HOME", Arc::clone(&probe));

        assert!(validate(&None::<HashMap<String, String>>, &checks)
            .unwrap()
            .is_empty());
        assert_eq!(probe.calls(), 0);
    }

    #[test]
    fn test_wrong_kind() {
        let node = Node::String("hello".into());
        let checks = Map::new().key("HOME", Probe::violating());

        assert!(matches!(
            validate_node(&node, &checks),
            Err(ConstraintError::KindMismatch { .. })
        ));

        let ctx = Context::new(&node).with_strict_types(false);
        assert_eq!(validate_context(&ctx, &checks).unwrap().len(), 1);
    }
}
