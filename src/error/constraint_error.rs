//! Fatal errors raised by misuse of the engine.

use thiserror::Error;

use crate::node::Kind;

/// A programmer error that aborts a validation run.
///
/// These describe how a constraint tree was built or applied, never a property of
/// the data: a field that does not exist, a guard with no allowed kinds, a shape
/// mismatch under strict typing. Data failures are reported as
/// [`Violation`](crate::Violation)s instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// The root value was [`Node::Invalid`](crate::Node::Invalid).
    #[error("cannot validate an invalid value")]
    InvalidRoot,

    /// A type guard was called with an empty list of allowed kinds.
    #[error("a type guard needs at least one allowed kind")]
    NoKinds,

    /// Under strict typing, a node's kind was not one a constraint accepts.
    #[error("value of kind `{actual}` is not one of the allowed kinds: {}", join_kinds(.allowed))]
    KindMismatch { allowed: Vec<Kind>, actual: Kind },

    /// A field lookup was made against a node that is not a record.
    #[error("field lookups need a record, got a value of kind `{0}`")]
    NotARecord(Kind),

    /// A field lookup named a field the record does not declare.
    #[error("record `{record}` has no field `{field}`")]
    NoSuchField { record: String, field: String },

    /// A constraint was constructed with arguments that can never make sense.
    #[error("invalid constraint argument: {0}")]
    InvalidArgument(String),
}

fn join_kinds(kinds: &[Kind]) -> String {
    kinds.iter().map(|k| k.name()).collect::<Vec<_>>().join(", ")
}
