//! Leaf constraints.
//!
//! Rules inspect the current node and report violations; they never descend. Apart
//! from the presence rules ([`required`], [`empty`], [`nil`], [`not_nil`]), every rule
//! is optional: an empty value (see [`is_empty`](crate::is_empty)) produces no
//! violations. Pair a rule with [`required`] to make the value mandatory.
//!
//! Rules that only make sense for some kinds guard with
//! [`should_be`](crate::should_be), so the context's strict-types policy decides whether
//! a value of the wrong shape is a fatal error or a violation.
//!
//! # Example
//!
//! ```rust
//! use waymark::{constraints, reflect_record, rules, validate, Fields};
//!
//! struct Signup {
//!     email: String,
//!     age: u32,
//!     plan: String,
//! }
//!
//! reflect_record!(Signup { email, age, plan });
//!
//! let constraints = Fields::new()
//!     .field("email", constraints![rules::required(), rules::pattern(r"^[^@]+@[^@]+$").unwrap()])
//!     .field("age", rules::min(18.0))
//!     .field("plan", rules::one_of(["free", "pro"]).unwrap());
//!
//! let signup = Signup { email: "nobody".into(), age: 12, plan: "gold".into() };
//! let violations = validate(&signup, &constraints).unwrap();
//!
//! let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
//! assert_eq!(messages, vec![
//!     "minimum value not met",
//!     "value must match regular expression",
//!     "value must be one of the allowed values",
//! ]);
//! ```

mod details;
mod equality;
mod fields;
mod kind;
mod length;
mod numeric;
mod presence;
mod string;

pub use details::details;
pub use equality::{equals, none_of, not_equals, one_of, one_of_keys};
pub use fields::{
    at_least_n_required, at_most_n_required, exactly_n_required, mutually_exclusive,
    mutually_inclusive,
};
pub use kind::{kind, value_fn};
pub use length::{length, max_length, min_length};
pub use numeric::{max, min};
pub use presence::{empty, nil, not_nil, required};
pub use string::{pattern, regexp};

use serde_json::Value;

use crate::error::Details;

fn detail_map<const N: usize>(pairs: [(&str, Value); N]) -> Details {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}
