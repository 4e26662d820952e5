//! Presence rules.

use crate::constraint::{from_fn, Constraint};
use crate::introspect::{is_empty, is_nillable, unwrap_value};

/// Reports a value that is empty.
///
/// The node is checked as found, so `Some(0)` is present while `None` and `0` are not.
pub fn required() -> impl Constraint {
    from_fn(|ctx| {
        if is_empty(ctx.node()) {
            Ok(vec![ctx.violation("a value is required", None)])
        } else {
            Ok(Vec::new())
        }
    })
}

/// Reports a value that is not empty.
pub fn empty() -> impl Constraint {
    from_fn(|ctx| {
        if is_empty(ctx.node()) {
            Ok(Vec::new())
        } else {
            Ok(vec![ctx.violation("a value must not be provided", None)])
        }
    })
}

/// Reports a nillable value that is not nil. Values that can never be nil pass.
pub fn nil() -> impl Constraint {
    from_fn(|ctx| {
        let node = unwrap_value(ctx.node());
        if is_nillable(node) && !node.is_nil() {
            Ok(vec![ctx.violation("value must be nil", None)])
        } else {
            Ok(Vec::new())
        }
    })
}

/// Reports a nil value. Values that can never be nil pass.
pub fn not_nil() -> impl Constraint {
    from_fn(|ctx| {
        let node = unwrap_value(ctx.node());
        if is_nillable(node) && node.is_nil() {
            Ok(vec![ctx.violation("value must not be nil", None)])
        } else {
            Ok(Vec::new())
        }
    })
}
