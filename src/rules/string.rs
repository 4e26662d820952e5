//! String pattern rules.

use regex::Regex;
use serde_json::Value;

use super::detail_map;
use super::kind::value_fn;
use crate::constraint::Constraint;
use crate::node::Kind;

/// Reports a string that does not match `regex`.
pub fn regexp(regex: Regex) -> impl Constraint {
    value_fn(&[Kind::String], move |ctx, node| {
        let text = node.as_str().unwrap_or_default();
        if !regex.is_match(text) {
            let details = detail_map([("regexp", Value::from(regex.as_str()))]);
            return Ok(vec![ctx.violation(
                "value must match regular expression",
                Some(details),
            )]);
        }
        Ok(Vec::new())
    })
}

/// Compiles `pattern` and builds a [`regexp`] rule from it.
///
/// # Errors
///
/// Returns the compile error if `pattern` is not a valid regular expression.
///
/// # Example
///
/// ```rust
/// use waymark::{rules, validate};
///
/// let slug = rules::pattern(r"^[a-z0-9-]+$").unwrap();
///
/// assert!(validate(&"hello-world", &slug).unwrap().is_empty());
/// assert_eq!(validate(&"Hello World", &slug).unwrap().len(), 1);
/// assert!(rules::pattern("[unclosed").is_err());
/// ```
pub fn pattern(pattern: &str) -> Result<impl Constraint, regex::Error> {
    Ok(regexp(Regex::new(pattern)?))
}
