//! Custom messages for existing rules.

use crate::constraint::{from_fn, Constraint};
use crate::error::Details;

/// Replaces the violations of `constraint` with one violation carrying `message` and
/// `details`, located at the current path.
///
/// Use it to give a generic rule a purpose-specific message.
///
/// # Example
///
/// ```rust
/// use waymark::{rules, validate, Details};
///
/// let mut details = Details::new();
/// details.insert("hint".into(), "use at least 12 characters".into());
///
/// let password = rules::details(rules::min_length(12), "password is too weak", details);
///
/// let violations = validate(&"hunter2", &password).unwrap();
/// assert_eq!(violations[0].message, "password is too weak");
/// assert_eq!(violations[0].details["hint"], "use at least 12 characters");
/// ```
pub fn details<C>(constraint: C, message: impl Into<String>, details: Details) -> impl Constraint
where
    C: Constraint,
{
    let message = message.into();
    from_fn(move |ctx| {
        if constraint.violations(ctx)?.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![ctx.violation(message.clone(), Some(details.clone()))])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::testing::Probe;
    use crate::error::ConstraintError;
    use crate::node::Node;
    use crate::validation::validate_node;
    use crate::Constraints;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_collapses_violations_into_one() {
        let probe = Arc::new(Probe::violating());
        let mut extra = Details::new();
        extra.insert("some".into(), json!("detail"));

        let checks = details(
            Constraints::new()
                .with(Arc::clone(&probe))
                .with(Arc::clone(&probe)),
            "custom message",
            extra.clone(),
        );

        let violations = validate_node(&Node::Int(1), &checks).unwrap();
        assert_eq!(probe.calls(), 2);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "custom message");
        assert_eq!(violations[0].details, extra);
    }

    #[test]
    fn test_passes_through_success() {
        let checks = details(Probe::silent(), "unused", Details::new());
        assert!(validate_node(&Node::Int(1), &checks).unwrap().is_empty());
    }

    #[test]
    fn test_propagates_fatal_errors() {
        let checks = details(
            crate::constraint::from_fn(|_| Err(ConstraintError::NoKinds)),
            "unused",
            Details::new(),
        );
        assert_eq!(
            validate_node(&Node::Int(1), &checks),
            Err(ConstraintError::NoKinds)
        );
    }
}
