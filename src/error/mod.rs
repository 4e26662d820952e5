//! Error types for validation.

pub mod constraint_error;
pub mod violation;

pub use constraint_error::ConstraintError;
pub use violation::{into_validation, Details, PathKind, Violation, Violations};
