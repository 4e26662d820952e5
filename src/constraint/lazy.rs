//! Constraints built at validation time.

use std::fmt;

use tracing::trace;

use super::traits::{Constraint, ConstraintResult};
use crate::introspect::{kind_of, should_be, unwrap_value};
use crate::node::{Kind, Node};
use crate::validation::Context;

/// Defers building a constraint until validation reaches it.
///
/// The builder runs once per visit and never at construction, which is what allows a
/// constraint tree to refer to itself. Recursion ends where the data does: a nil
/// pointer short-circuits [`Fields`](crate::Fields) before `Lazy` is reached again.
///
/// # Example
///
/// ```rust
/// use waymark::{reflect_record, rules, validate, Fields, Lazy};
///
/// struct Category {
///     name: String,
///     parent: Option<Box<Category>>,
/// }
///
/// reflect_record!(Category { name, parent });
///
/// fn category() -> Fields {
///     Fields::new()
///         .field("name", rules::required())
///         .field("parent", Lazy::new(category))
/// }
///
/// let leaf = Category {
///     name: "leaf".into(),
///     parent: Some(Box::new(Category { name: String::new(), parent: None })),
/// };
///
/// let violations = validate(&leaf, &category()).unwrap();
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].path, ".parent.name");
/// ```
pub struct Lazy<F> {
    build: F,
}

impl<F, C> Lazy<F>
where
    F: Fn() -> C + Send + Sync,
    C: Constraint,
{
    pub fn new(build: F) -> Self {
        Self { build }
    }
}

impl<F, C> Constraint for Lazy<F>
where
    F: Fn() -> C + Send + Sync,
    C: Constraint,
{
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        trace!(path = %ctx.path(), "building lazy constraint");
        (self.build)().violations(ctx)
    }
}

impl<F> fmt::Debug for Lazy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy").finish_non_exhaustive()
    }
}

/// Which node a [`LazyDynamic`] builder receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Receiver {
    /// The node as found, possibly behind pointer layers.
    Declared,
    /// The record behind any pointer layers.
    Unwrapped,
}

/// Builds a constraint from the record being validated.
///
/// This lets the constraints depend on the data itself, for example checking one field
/// differently based on another. The current node must be a record; a nil record is
/// skipped without calling the builder.
///
/// [`declared`](LazyDynamic::declared) hands the builder the node as it sits in the
/// tree, pointer layers included. [`unwrapped`](LazyDynamic::unwrapped) hands it the
/// record itself.
///
/// # Example
///
/// ```rust
/// use waymark::{reflect_record, rules, validate, Fields, LazyDynamic, Node};
///
/// struct Payment {
///     method: String,
///     card_number: String,
/// }
///
/// reflect_record!(Payment { method, card_number });
///
/// let constraints = LazyDynamic::unwrapped(|payment: &Node| {
///     let by_card = payment.field("method").and_then(|m| m.as_str()) == Some("card");
///     let mut fields = Fields::new();
///     if by_card {
///         fields = fields.field("card_number", rules::required());
///     }
///     fields
/// });
///
/// let cash = Payment { method: "cash".into(), card_number: String::new() };
/// let card = Payment { method: "card".into(), card_number: String::new() };
///
/// assert!(validate(&cash, &constraints).unwrap().is_empty());
/// assert_eq!(validate(&card, &constraints).unwrap()[0].path, ".card_number");
/// ```
pub struct LazyDynamic<F> {
    build: F,
    receiver: Receiver,
}

impl<F, C> LazyDynamic<F>
where
    F: Fn(&Node) -> C + Send + Sync,
    C: Constraint,
{
    /// The builder receives the current node without unwrapping.
    pub fn declared(build: F) -> Self {
        Self {
            build,
            receiver: Receiver::Declared,
        }
    }

    /// The builder receives the record behind any pointer or interface layers.
    pub fn unwrapped(build: F) -> Self {
        Self {
            build,
            receiver: Receiver::Unwrapped,
        }
    }
}

impl<F, C> Constraint for LazyDynamic<F>
where
    F: Fn(&Node) -> C + Send + Sync,
    C: Constraint,
{
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        let declared = ctx.node();
        let record = unwrap_value(declared);
        let mismatch = should_be(ctx, kind_of(record), &[Kind::Record])?;
        if !mismatch.is_empty() {
            return Ok(mismatch);
        }

        if record.is_nil() {
            return Ok(Vec::new());
        }

        trace!(path = %ctx.path(), receiver = ?self.receiver, "building dynamic constraint");

        let constraint = match self.receiver {
            Receiver::Declared => (self.build)(declared),
            Receiver::Unwrapped => (self.build)(record),
        };
        constraint.violations(ctx)
    }
}

impl<F> fmt::Debug for LazyDynamic<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyDynamic")
            .field("receiver", &self.receiver)
            .finish_non_exhaustive()
    }
}
