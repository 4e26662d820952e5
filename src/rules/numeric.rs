//! Numeric range rules.

use serde_json::Value;

use super::detail_map;
use super::kind::value_fn;
use crate::constraint::Constraint;
use crate::node::Kind;

const NUMERIC: &[Kind] = &[Kind::Int, Kind::Uint, Kind::Float];

/// Reports a number below `min`.
///
/// Zero is an empty value, so it is skipped like any other empty value.
pub fn min(min: f64) -> impl Constraint {
    value_fn(NUMERIC, move |ctx, node| {
        let actual = node.as_f64().unwrap_or_default();
        if actual < min {
            let details = detail_map([("minimum", Value::from(min))]);
            return Ok(vec![ctx.violation("minimum value not met", Some(details))]);
        }
        Ok(Vec::new())
    })
}

/// Reports a number above `max`.
pub fn max(max: f64) -> impl Constraint {
    value_fn(NUMERIC, move |ctx, node| {
        let actual = node.as_f64().unwrap_or_default();
        if actual > max {
            let details = detail_map([
                ("actual", Value::from(actual)),
                ("maximum", Value::from(max)),
            ]);
            return Ok(vec![ctx.violation("maximum value exceeded", Some(details))]);
        }
        Ok(Vec::new())
    })
}
