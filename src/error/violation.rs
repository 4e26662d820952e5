//! Violation types.
//!
//! This module provides [`Violation`] for a single reported failure and
//! [`Violations`] for a non-empty accumulation of them.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::prelude::*;
use stillwater::Validation;

use crate::ValidationResult;

/// Structured violation details, in insertion order.
pub type Details = IndexMap<String, Value>;

/// Whether a violation concerns a map key or a value.
///
/// Validating a map key and the value stored under it both project to the same path
/// string, so the kind is what tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PathKind {
    #[default]
    Value,
    Key,
}

impl PathKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PathKind::Value => "value",
            PathKind::Key => "key",
        }
    }
}

impl Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported failure.
///
/// - **path**: dotted location from the root, e.g. `.users.[0].email`; `.` is the root
/// - **path_kind**: whether the path names a map key or a value
/// - **message**: human-readable description
/// - **details**: structured, machine-readable context (may be empty)
///
/// Violations are normally built through [`Context::violation`](crate::Context::violation),
/// which fills in the path and path kind.
///
/// # Example
///
/// ```rust
/// use waymark::{PathKind, Violation};
///
/// let violation = Violation::new(".email", "a value is required")
///     .with_detail("minimum", 1);
///
/// assert_eq!(violation.path_kind, PathKind::Value);
/// assert_eq!(violation.details["minimum"], 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: String,
    pub path_kind: PathKind,
    pub message: String,
    pub details: Details,
}

impl Violation {
    /// Creates a value violation with no details.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            path_kind: PathKind::Value,
            message: message.into(),
            details: Details::new(),
        }
    }

    /// Sets the path kind and returns self for chaining.
    pub fn with_path_kind(mut self, path_kind: PathKind) -> Self {
        self.path_kind = path_kind;
        self
    }

    /// Adds one detail entry and returns self for chaining.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Replaces the details and returns self for chaining.
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if self.path_kind == PathKind::Key {
            write!(f, " (key)")?;
        }
        write!(f, ": {}", self.message)?;

        if !self.details.is_empty() {
            let rendered: Vec<String> = self
                .details
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, " [{}]", rendered.join(", "))?;
        }

        Ok(())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violation>();
    assert_sync::<Violation>();
};

/// A non-empty collection of violations.
///
/// `Violations` wraps a `NonEmptyVec<Violation>` so it can be the failure side of a
/// `Validation<T, Violations>`, and implements `Semigroup` so failures from separate
/// validation runs combine.
///
/// ```rust
/// use waymark::{Violation, Violations};
/// use stillwater::prelude::*;
///
/// let a = Violations::single(Violation::new(".name", "a value is required"));
/// let b = Violations::single(Violation::new(".email", "a value is required"));
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(NonEmptyVec<Violation>);

impl Violations {
    pub fn single(violation: Violation) -> Self {
        Self(NonEmptyVec::singleton(violation))
    }

    /// Returns `None` if `violations` is empty.
    pub fn from_vec(violations: Vec<Violation>) -> Option<Self> {
        let mut iter = violations.into_iter();
        let first = Self::single(iter.next()?);
        Some(iter.fold(first, |acc, v| acc.combine(Self::single(v))))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API consistency.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn first(&self) -> &Violation {
        self.0.head()
    }

    /// Returns all violations reported at `path`.
    pub fn at_path(&self, path: &str) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.path == path).collect()
    }

    /// Returns all violations of the given path kind.
    pub fn of_kind(&self, kind: PathKind) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.path_kind == kind).collect()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0.into_vec()
    }
}

impl Semigroup for Violations {
    fn combine(self, other: Self) -> Self {
        Violations(self.0.combine(other.0))
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} constraint violation(s):", self.len())?;
        for (i, violation) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

/// Turns a violation list into an accumulated validation result.
///
/// An empty list is a success.
pub fn into_validation(violations: Vec<Violation>) -> ValidationResult<()> {
    match Violations::from_vec(violations) {
        Some(violations) => Validation::Failure(violations),
        None => Validation::Success(()),
    }
}
