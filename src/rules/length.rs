//! Length rules for strings and containers.
//!
//! Strings are measured in characters, arrays and slices in items, maps in entries.

use serde_json::Value;

use super::detail_map;
use super::kind::value_fn;
use crate::constraint::Constraint;
use crate::node::Kind;

const MEASURABLE: &[Kind] = &[Kind::Array, Kind::Slice, Kind::Map, Kind::String];

/// Reports a value whose length is not exactly `expected`.
pub fn length(expected: usize) -> impl Constraint {
    value_fn(MEASURABLE, move |ctx, node| {
        let actual = node.len().unwrap_or_default();
        if actual != expected {
            let details = detail_map([
                ("actual", Value::from(actual)),
                ("expected", Value::from(expected)),
            ]);
            return Ok(vec![ctx.violation("exact length not met", Some(details))]);
        }
        Ok(Vec::new())
    })
}

/// Reports a value shorter than `minimum`.
pub fn min_length(minimum: usize) -> impl Constraint {
    value_fn(MEASURABLE, move |ctx, node| {
        let actual = node.len().unwrap_or_default();
        if actual < minimum {
            let details = detail_map([
                ("actual", Value::from(actual)),
                ("minimum", Value::from(minimum)),
            ]);
            return Ok(vec![ctx.violation("minimum length not met", Some(details))]);
        }
        Ok(Vec::new())
    })
}

/// Reports a value longer than `maximum`.
pub fn max_length(maximum: usize) -> impl Constraint {
    value_fn(MEASURABLE, move |ctx, node| {
        let actual = node.len().unwrap_or_default();
        if actual > maximum {
            let details = detail_map([
                ("actual", Value::from(actual)),
                ("maximum", Value::from(maximum)),
            ]);
            return Ok(vec![ctx.violation("maximum length exceeded", Some(details))]);
        }
        Ok(Vec::new())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstraintError;
    use crate::node::Node;
    use crate::validation::{validate, validate_context};
    use crate::Context;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_length() {
        assert!(validate(&"abc", &length(3)).unwrap().is_empty());
        assert!(validate(&vec![1, 2, 3], &length(3)).unwrap().is_empty());

        let violations = validate(&HashMap::from([(1, 2)]), &length(3)).unwrap();
        assert_eq!(violations[0].message, "exact length not met");
        assert_eq!(violations[0].details["actual"], json!(1));
        assert_eq!(violations[0].details["expected"], json!(3));
    }

    #[test]
    fn test_min_length() {
        assert!(validate(&"hello", &min_length(5)).unwrap().is_empty());

        let violations = validate(&"hi", &min_length(5)).unwrap();
        assert_eq!(violations[0].message, "minimum length not met");
        assert_eq!(violations[0].details["actual"], json!(2));
        assert_eq!(violations[0].details["minimum"], json!(5));
    }

    #[test]
    fn test_max_length() {
        assert!(validate(&[1, 2], &max_length(2)).unwrap().is_empty());

        let violations = validate(&"héllo wörld", &max_length(5)).unwrap();
        assert_eq!(violations[0].message, "maximum length exceeded");
        assert_eq!(violations[0].details["actual"], json!(11));
    }

    #[test]
    fn test_length_rules_are_optional() {
        assert!(validate(&"", &min_length(5)).unwrap().is_empty());
        assert!(validate(&Vec::<i32>::new(), &length(2)).unwrap().is_empty());
        assert!(validate(&None::<String>, &max_length(0)).unwrap().is_empty());
    }

    #[test]
    fn test_length_rules_guard_kind() {
        assert!(matches!(
            validate(&12345, &max_length(2)),
            Err(ConstraintError::KindMismatch { .. })
        ));

        let node = Node::Bool(true);
        let ctx = Context::new(&node).with_strict_types(false);
        assert_eq!(validate_context(&ctx, &min_length(2)).unwrap().len(), 1);
    }
}
