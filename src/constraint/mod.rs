//! Constraint definitions for validation.
//!
//! A constraint inspects a [`Context`](crate::Context) and reports violations. This
//! module provides the [`Constraint`] trait and the composite variants that give a
//! constraint tree its structure:
//!
//! - [`Constraints`]: run several constraints against the same value
//! - [`Elements`]: descend into every item of an array or slice, or every map value
//! - [`Fields`]: descend into named record fields
//! - [`Keys`]: descend into every map key
//! - [`Map`]: descend into specific map values
//! - [`Lazy`] and [`LazyDynamic`]: build a constraint at validation time
//! - [`When`] and [`WhenFn`]: gate constraints on a condition
//!
//! Leaf constraints live in [`rules`](crate::rules).
//!
//! # Example
//!
//! ```rust
//! use waymark::{constraints, reflect_record, rules, validate, Elements, Fields};
//!
//! struct Order {
//!     id: String,
//!     lines: Vec<u32>,
//! }
//!
//! reflect_record!(Order { id, lines });
//!
//! let order_constraints = Fields::new()
//!     .field("id", rules::required())
//!     .field("lines", constraints![
//!         rules::min_length(1),
//!         Elements::new().with(rules::min(1.0)),
//!     ]);
//!
//! let order = Order { id: String::new(), lines: vec![2, 0] };
//! let violations = validate(&order, &order_constraints).unwrap();
//!
//! let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
//! assert_eq!(paths, vec![".id"]);
//! ```

mod conditional;
mod elements;
mod fields;
mod keys;
mod lazy;
mod map;
mod sequence;
mod traits;

pub use conditional::{when, when_fn, When, WhenFn};
pub use elements::Elements;
pub use fields::Fields;
pub use keys::Keys;
pub use lazy::{Lazy, LazyDynamic};
pub use map::Map;
pub use sequence::Constraints;
pub use traits::{from_fn, Constraint, ConstraintResult, FnConstraint};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{Constraint, ConstraintResult};
    use crate::validation::Context;

    /// Counts its invocations and optionally reports one violation per call.
    pub(crate) struct Probe {
        calls: AtomicUsize,
        violate: bool,
    }

    impl Probe {
        pub(crate) fn violating() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                violate: true,
            }
        }

        pub(crate) fn silent() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                violate: false,
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Constraint for Probe {
        fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.violate {
                Ok(vec![ctx.violation("test violation", None)])
            } else {
                Ok(Vec::new())
            }
        }
    }
}
