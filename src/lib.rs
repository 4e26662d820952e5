//! # Waymark
//!
//! A validation engine that walks arbitrarily nested values against a composable tree
//! of constraints and reports every violation it finds, each annotated with the path
//! to the offending value.
//!
//! ## Overview
//!
//! Values are projected into a dynamic [`Node`] tree, through the [`Reflect`] trait, the
//! [`reflect_record!`] macro, or [`Node::from_json`]. A constraint tree is then built
//! from composite variants that give it structure ([`Fields`], [`Elements`], [`Keys`],
//! [`Map`], [`Lazy`], [`When`], ...) and leaf [`rules`] that inspect single values.
//!
//! Validation never stops at the first failure. Data problems are collected as
//! [`Violation`]s; only programmer errors, such as naming a field a record does not
//! have, abort a run with a [`ConstraintError`].
//!
//! ## Core Types
//!
//! - [`Context`]: the immutable traversal state threaded through every constraint
//! - [`Constraint`]: the one capability every constraint implements
//! - [`Violation`]: a single failure with its path, path kind, message and details
//! - [`Violations`]: a non-empty, combinable collection for `stillwater` pipelines
//!
//! ## Example
//!
//! ```rust
//! use waymark::{constraints, reflect_record, rules, validate, Elements, Fields};
//!
//! struct Team {
//!     name: String,
//!     members: Vec<Member>,
//! }
//!
//! struct Member {
//!     email: String,
//! }
//!
//! reflect_record!(Team { name, members });
//! reflect_record!(Member { email ["validation" = "email_address"] });
//!
//! let team_constraints = Fields::new()
//!     .field("name", constraints![rules::required(), rules::max_length(20)])
//!     .field(
//!         "members",
//!         Elements::new().with(Fields::new().field("email", rules::required())),
//!     );
//!
//! let team = Team {
//!     name: String::new(),
//!     members: vec![Member { email: "a@example.com".into() }, Member { email: String::new() }],
//! };
//!
//! let violations = validate(&team, &team_constraints).unwrap();
//! let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
//! assert_eq!(paths, vec![".members.[1].email_address", ".name"]);
//! ```

pub mod constraint;
pub mod error;
pub mod introspect;
mod node;
pub mod path;
pub mod rules;
pub mod validation;

pub use constraint::{
    from_fn, when, when_fn, Constraint, ConstraintResult, Constraints, Elements, Fields,
    FnConstraint, Keys, Lazy, LazyDynamic, Map, When, WhenFn,
};
pub use error::{into_validation, ConstraintError, Details, PathKind, Violation, Violations};
pub use introspect::{
    field_name, is_empty, is_nillable, kind_of, must_be, should_be, unwrap_type, unwrap_value,
};
pub use node::{FieldDef, Kind, Node, RecordType, RecordTypeBuilder, Reflect, Type};
pub use path::{PathStack, ValueNode};
pub use validation::{validate, validate_context, validate_node, Context, DEFAULT_STRUCT_TAG};

/// Type alias for validation results in `stillwater` form.
pub type ValidationResult<T> = stillwater::Validation<T, Violations>;
