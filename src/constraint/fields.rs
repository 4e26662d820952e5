//! Descent into named record fields.

use std::fmt;

use indexmap::IndexMap;
use tracing::trace;

use super::traits::{Constraint, ConstraintResult};
use crate::introspect::{field_name, kind_of, should_be, unwrap_value};
use crate::node::{Kind, INVALID};
use crate::validation::Context;

/// Validates specific fields of a record.
///
/// Each entry maps a declared field name to the constraint run against that field's
/// value. The child is named by [`field_name`], so struct tags can rename or suppress
/// its path segment. A nil record pointer produces no violations.
///
/// Fields are visited in insertion order.
///
/// # Errors
///
/// Naming a field the record does not declare is a fatal
/// [`ConstraintError::NoSuchField`](crate::ConstraintError::NoSuchField).
///
/// # Example
///
/// ```rust
/// use waymark::{reflect_record, rules, validate, Fields};
///
/// struct Login {
///     user: String,
///     password: String,
/// }
///
/// reflect_record!(Login { user, password });
///
/// let constraints = Fields::new()
///     .field("user", rules::required())
///     .field("password", rules::min_length(8));
///
/// let login = Login { user: String::new(), password: "hunter2".into() };
/// let violations = validate(&login, &constraints).unwrap();
///
/// let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
/// assert_eq!(paths, vec![".password", ".user"]);
/// ```
#[derive(Default)]
pub struct Fields {
    fields: IndexMap<String, Box<dyn Constraint>>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the constraint for a field, replacing any earlier one for the same name.
    pub fn field<C>(mut self, name: impl Into<String>, constraint: C) -> Self
    where
        C: Constraint + 'static,
    {
        self.fields.insert(name.into(), Box::new(constraint));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Constraint for Fields {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        let node = unwrap_value(ctx.node());
        let mismatch = should_be(ctx, kind_of(node), &[Kind::Record])?;
        if !mismatch.is_empty() {
            return Ok(mismatch);
        }

        if node.is_nil() {
            return Ok(Vec::new());
        }

        trace!(path = %ctx.path(), fields = self.fields.len(), "descending into fields");

        let mut violations = Vec::new();
        for (field, constraint) in &self.fields {
            let name = field_name(ctx, field)?;
            let child = node.field(field).unwrap_or(&INVALID);
            violations.extend(constraint.violations(&ctx.with_value(name, child))?);
        }
        Ok(violations)
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fields")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}
