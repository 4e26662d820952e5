//! Kind checks and custom value rules.

use crate::constraint::{from_fn, Constraint, ConstraintResult};
use crate::error::ConstraintError;
use crate::introspect::{is_empty, kind_of, kind_violation, should_be, unwrap_value};
use crate::node::{Kind, Node};
use crate::validation::Context;

/// Builds a rule from a function over the unwrapped value.
///
/// Empty values are skipped. Otherwise the value must be one of `kinds`, checked with
/// [`should_be`], before `f` sees it. Most rules in this module are built this way.
///
/// # Example
///
/// ```rust
/// use waymark::{rules, validate, Kind};
///
/// let even = rules::value_fn(&[Kind::Int, Kind::Uint], |ctx, node| {
///     match node.as_f64() {
///         Some(n) if n % 2.0 != 0.0 => Ok(vec![ctx.violation("value must be even", None)]),
///         _ => Ok(Vec::new()),
///     }
/// });
///
/// assert_eq!(validate(&3, &even).unwrap().len(), 1);
/// assert!(validate(&4, &even).unwrap().is_empty());
/// ```
pub fn value_fn<F>(kinds: &[Kind], f: F) -> impl Constraint
where
    F: Fn(&Context<'_>, &Node) -> ConstraintResult + Send + Sync,
{
    let kinds = kinds.to_vec();
    from_fn(move |ctx| {
        let node = unwrap_value(ctx.node());
        if is_empty(node) {
            return Ok(Vec::new());
        }

        let mismatch = should_be(ctx, kind_of(node), &kinds)?;
        if !mismatch.is_empty() {
            return Ok(mismatch);
        }

        f(ctx, node)
    })
}

/// Reports a non-empty value whose kind is not one of `allowed`.
///
/// Unlike the guards inside other rules, a mismatch here is always a violation, even
/// under strict types: checking the kind is this rule's whole purpose.
///
/// # Errors
///
/// Validation fails with [`ConstraintError::NoKinds`] if `allowed` is empty.
pub fn kind(allowed: &[Kind]) -> impl Constraint {
    let allowed = allowed.to_vec();
    from_fn(move |ctx| {
        if allowed.is_empty() {
            return Err(ConstraintError::NoKinds);
        }

        let node = unwrap_value(ctx.node());
        if is_empty(node) || allowed.contains(&kind_of(node)) {
            return Ok(Vec::new());
        }
        Ok(vec![kind_violation(ctx, &allowed)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, validate_context};
    use std::collections::HashMap;

    #[test]
    fn test_kind_accepts_allowed() {
        assert!(validate(&"hello", &kind(&[Kind::String])).unwrap().is_empty());
        assert!(validate(&Some(3), &kind(&[Kind::Int, Kind::Float])).unwrap().is_empty());
    }

    #[test]
    fn test_kind_reports_mismatch_even_when_strict() {
        let violations = validate(&"hello", &kind(&[Kind::Int, Kind::Map])).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].details["allowed_kinds"],
            serde_json::json!(["int", "map"])
        );
    }

    #[test]
    fn test_kind_skips_empty_values() {
        assert!(validate(&"", &kind(&[Kind::Int])).unwrap().is_empty());
        assert!(validate(&HashMap::<i32, i32>::new(), &kind(&[Kind::Int]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_kind_without_allowed_kinds_is_fatal() {
        assert_eq!(validate(&1, &kind(&[])), Err(ConstraintError::NoKinds));
    }

    #[test]
    fn test_value_fn_receives_unwrapped_value() {
        let rule = value_fn(&[Kind::String], |_, node| {
            assert_eq!(node.as_str(), Some("inner"));
            Ok(Vec::new())
        });
        assert!(validate(&Some(Box::new("inner".to_string())), &rule)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_value_fn_guards_kind() {
        let rule = value_fn(&[Kind::String], |ctx, _| Ok(vec![ctx.violation("called", None)]));

        assert!(matches!(
            validate(&5, &rule),
            Err(ConstraintError::KindMismatch { .. })
        ));

        let node = Node::Int(5);
        let permissive = Context::new(&node).with_strict_types(false);
        let violations = validate_context(&permissive, &rule).unwrap();
        assert_eq!(violations[0].message, "value must be one of the allowed kinds");
    }
}
