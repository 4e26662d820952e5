//! Descent into the items of arrays, slices and maps.

use std::fmt;

use rayon::prelude::*;
use tracing::trace;

use super::traits::{Constraint, ConstraintResult};
use crate::introspect::{is_empty, kind_of, should_be, unwrap_value};
use crate::node::{Kind, Node};
use crate::validation::Context;

const ALLOWED: &[Kind] = &[Kind::Array, Kind::Slice, Kind::Map];

/// Validates every item of an array or slice, or every value of a map.
///
/// Items are named `[i]`; map values are named by the display form of their key. An
/// empty container (nil, zero-length, or an array whose items are all zero) produces
/// no violations and runs nothing.
///
/// Call [`parallel`](Elements::parallel) to validate items on the rayon thread pool.
/// The violations come back in the same order as a sequential run.
///
/// # Example
///
/// ```rust
/// use waymark::{rules, validate, Elements};
///
/// let names = vec!["ann".to_string(), String::new(), "cy".to_string()];
/// let violations = validate(&names, &Elements::new().with(rules::required())).unwrap();
///
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].path, ".[1]");
/// ```
#[derive(Default)]
pub struct Elements {
    constraints: Vec<Box<dyn Constraint>>,
    parallel: bool,
}

impl Elements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint run against every element, and returns self for chaining.
    pub fn with<C>(mut self, constraint: C) -> Self
    where
        C: Constraint + 'static,
    {
        self.constraints.push(Box::new(constraint));
        self
    }

    /// Validates elements concurrently.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    fn validate_child(&self, ctx: &Context<'_>) -> ConstraintResult {
        let mut violations = Vec::new();
        for constraint in &self.constraints {
            violations.extend(constraint.violations(ctx)?);
        }
        Ok(violations)
    }
}

impl Constraint for Elements {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        let node = unwrap_value(ctx.node());
        let mismatch = should_be(ctx, kind_of(node), ALLOWED)?;
        if !mismatch.is_empty() {
            return Ok(mismatch);
        }

        if is_empty(node) {
            return Ok(Vec::new());
        }

        let children: Vec<(String, &Node)> = match node {
            Node::Array { items, .. } | Node::Slice { items, .. } => items
                .iter()
                .enumerate()
                .map(|(i, item)| (format!("[{}]", i), item))
                .collect(),
            Node::Map { entries, .. } => entries
                .iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            _ => return Ok(Vec::new()),
        };

        trace!(
            path = %ctx.path(),
            elements = children.len(),
            parallel = self.parallel,
            "descending into elements"
        );

        if self.parallel {
            let results = children
                .into_par_iter()
                .map(|(name, child)| self.validate_child(&ctx.with_value(name, child)))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(results.into_iter().flatten().collect());
        }

        let mut violations = Vec::new();
        for (name, child) in children {
            violations.extend(self.validate_child(&ctx.with_value(name, child))?);
        }
        Ok(violations)
    }
}

impl fmt::Debug for Elements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Elements")
            .field("constraints", &self.constraints.len())
            .field("parallel", &self.parallel)
            .finish()
    }
}
