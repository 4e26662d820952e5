//! Sequencing of constraints.

use std::fmt;

use super::traits::{Constraint, ConstraintResult};
use crate::validation::Context;

/// Runs every contained constraint against the same context and concatenates the
/// violations. The first fatal error aborts the sequence.
///
/// # Example
///
/// ```rust
/// use waymark::{constraints, rules, validate};
///
/// let checks = constraints![rules::required(), rules::max_length(3)];
///
/// assert_eq!(validate(&"toolong", &checks).unwrap().len(), 1);
/// assert_eq!(validate(&"", &checks).unwrap().len(), 1);
/// ```
#[derive(Default)]
pub struct Constraints {
    constraints: Vec<Box<dyn Constraint>>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a constraint and returns self for chaining.
    pub fn with<C>(mut self, constraint: C) -> Self
    where
        C: Constraint + 'static,
    {
        self.constraints.push(Box::new(constraint));
        self
    }

    pub fn push(&mut self, constraint: Box<dyn Constraint>) {
        self.constraints.push(constraint);
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl Constraint for Constraints {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        let mut violations = Vec::new();
        for constraint in &self.constraints {
            violations.extend(constraint.violations(ctx)?);
        }
        Ok(violations)
    }
}

impl From<Vec<Box<dyn Constraint>>> for Constraints {
    fn from(constraints: Vec<Box<dyn Constraint>>) -> Self {
        Self { constraints }
    }
}

impl FromIterator<Box<dyn Constraint>> for Constraints {
    fn from_iter<I: IntoIterator<Item = Box<dyn Constraint>>>(iter: I) -> Self {
        Self {
            constraints: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraints")
            .field("len", &self.constraints.len())
            .finish()
    }
}

/// Builds a [`Constraints`] sequence from a list of constraints of any types.
#[macro_export]
macro_rules! constraints {
    () => {
        $crate::Constraints::new()
    };
    ($($constraint:expr),+ $(,)?) => {
        $crate::Constraints::from(::std::vec![
            $( ::std::boxed::Box::new($constraint) as ::std::boxed::Box<dyn $crate::Constraint> ),+
        ])
    };
}
