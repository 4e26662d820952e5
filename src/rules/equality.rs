//! Rules comparing a value against expected values.
//!
//! Comparison is structural over [`Node`]s, after pointer layers are stripped from both
//! sides. Kinds must match exactly: an `i32` field never equals a `u32` expectation.

use serde_json::Value;

use super::detail_map;
use super::kind::value_fn;
use crate::constraint::{from_fn, Constraint};
use crate::error::ConstraintError;
use crate::introspect::{is_empty, unwrap_value};
use crate::node::{Kind, Node, Reflect};

fn reflect_all<T, I>(values: I) -> Vec<Node>
where
    T: Reflect,
    I: IntoIterator<Item = T>,
{
    values.into_iter().map(|v| v.reflect()).collect()
}

fn contains(candidates: &[Node], node: &Node) -> bool {
    candidates.iter().any(|c| unwrap_value(c) == node)
}

fn to_json_array(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(Node::to_json).collect())
}

/// Reports a non-empty value that differs from `expected`.
pub fn equals<T: Reflect>(expected: T) -> impl Constraint {
    let expected = expected.reflect();
    from_fn(move |ctx| {
        let node = unwrap_value(ctx.node());
        if is_empty(node) || node == unwrap_value(&expected) {
            return Ok(Vec::new());
        }

        let details = detail_map([("expected", expected.to_json())]);
        Ok(vec![ctx.violation("value must equal expected value", Some(details))])
    })
}

/// Reports a non-empty value equal to `unexpected`.
pub fn not_equals<T: Reflect>(unexpected: T) -> impl Constraint {
    let unexpected = unexpected.reflect();
    from_fn(move |ctx| {
        let node = unwrap_value(ctx.node());
        if is_empty(node) || node != unwrap_value(&unexpected) {
            return Ok(Vec::new());
        }

        let details = detail_map([("expected", unexpected.to_json())]);
        Ok(vec![ctx.violation("value must not equal expected value", Some(details))])
    })
}

/// Reports a non-empty value that is not one of `allowed`.
///
/// # Errors
///
/// [`ConstraintError::InvalidArgument`] if fewer than two values are given. A single
/// allowed value is [`equals`].
///
/// # Example
///
/// ```rust
/// use waymark::{rules, validate};
///
/// let colour = rules::one_of(["red", "green", "blue"]).unwrap();
///
/// assert!(validate(&"green", &colour).unwrap().is_empty());
/// assert_eq!(validate(&"pink", &colour).unwrap().len(), 1);
/// assert!(rules::one_of(["red"]).is_err());
/// ```
pub fn one_of<T, I>(allowed: I) -> Result<impl Constraint, ConstraintError>
where
    T: Reflect,
    I: IntoIterator<Item = T>,
{
    let allowed = reflect_all(allowed);
    if allowed.len() < 2 {
        return Err(ConstraintError::InvalidArgument(
            "one_of must be given at least 2 allowed values".into(),
        ));
    }

    Ok(from_fn(move |ctx| {
        let node = unwrap_value(ctx.node());
        if is_empty(node) || contains(&allowed, node) {
            return Ok(Vec::new());
        }

        let details = detail_map([("allowed", to_json_array(&allowed))]);
        Ok(vec![ctx.violation(
            "value must be one of the allowed values",
            Some(details),
        )])
    }))
}

/// Reports a non-empty value that is one of `disallowed`.
///
/// # Errors
///
/// [`ConstraintError::InvalidArgument`] if fewer than two values are given. A single
/// disallowed value is [`not_equals`].
pub fn none_of<T, I>(disallowed: I) -> Result<impl Constraint, ConstraintError>
where
    T: Reflect,
    I: IntoIterator<Item = T>,
{
    let disallowed = reflect_all(disallowed);
    if disallowed.len() < 2 {
        return Err(ConstraintError::InvalidArgument(
            "none_of must be given at least 2 disallowed values".into(),
        ));
    }

    Ok(from_fn(move |ctx| {
        let node = unwrap_value(ctx.node());
        if is_empty(node) || !contains(&disallowed, node) {
            return Ok(Vec::new());
        }

        let details = detail_map([("disallowed", to_json_array(&disallowed))]);
        Ok(vec![ctx.violation(
            "value must not be one of the disallowed values",
            Some(details),
        )])
    }))
}

/// Reports a map holding any key outside `keys`.
///
/// The violation lists every unexpected key by its display form.
///
/// # Errors
///
/// [`ConstraintError::InvalidArgument`] if no keys are given.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use waymark::{rules, validate};
///
/// let options = BTreeMap::from([("verbose", true), ("colour", true)]);
/// let known = rules::one_of_keys(["verbose", "quiet"]).unwrap();
///
/// let violations = validate(&options, &known).unwrap();
/// assert_eq!(violations[0].details["unexpected"], serde_json::json!(["colour"]));
/// ```
pub fn one_of_keys<T, I>(keys: I) -> Result<impl Constraint, ConstraintError>
where
    T: Reflect,
    I: IntoIterator<Item = T>,
{
    let keys = reflect_all(keys);
    if keys.is_empty() {
        return Err(ConstraintError::InvalidArgument(
            "one_of_keys must be given at least 1 allowed key".into(),
        ));
    }

    Ok(value_fn(&[Kind::Map], move |ctx, node| {
        let unexpected: Vec<Value> = match node {
            Node::Map { entries, .. } => entries
                .iter()
                .map(|(key, _)| key)
                .filter(|key| !contains(&keys, unwrap_value(key)))
                .map(|key| Value::from(key.to_string()))
                .collect(),
            _ => Vec::new(),
        };

        if unexpected.is_empty() {
            return Ok(Vec::new());
        }

        let details = detail_map([("unexpected", Value::Array(unexpected))]);
        Ok(vec![ctx.violation("key must be one of the allowed keys", Some(details))])
    }))
}
