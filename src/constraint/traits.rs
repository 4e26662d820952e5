//! The constraint capability.
//!
//! This module provides the [`Constraint`] trait that every composite and leaf
//! constraint implements, and [`from_fn`] for writing one as a closure.

use std::fmt;
use std::sync::Arc;

use crate::error::{ConstraintError, Violation};
use crate::validation::Context;

/// The result of running a constraint: the violations found at and below the current
/// node, or a fatal error that aborts the run.
pub type ConstraintResult = Result<Vec<Violation>, ConstraintError>;

/// Inspects a [`Context`] and reports zero or more violations.
///
/// An empty `Vec` is the only way to report "no violations". `Err` is reserved for
/// programmer errors, see [`ConstraintError`].
///
/// The `Send + Sync` bounds let constraint trees be shared across threads and used by
/// parallel descent.
///
/// # Example
///
/// ```rust
/// use waymark::{validate, Constraint, ConstraintResult, Context};
///
/// struct Positive;
///
/// impl Constraint for Positive {
///     fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
///         match ctx.node().as_f64() {
///             Some(n) if n <= 0.0 => Ok(vec![ctx.violation("value must be positive", None)]),
///             _ => Ok(Vec::new()),
///         }
///     }
/// }
///
/// assert_eq!(validate(&-3, &Positive).unwrap().len(), 1);
/// ```
pub trait Constraint: Send + Sync {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult;
}

impl<C: Constraint + ?Sized> Constraint for &C {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        (**self).violations(ctx)
    }
}

impl<C: Constraint + ?Sized> Constraint for Box<C> {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        (**self).violations(ctx)
    }
}

impl<C: Constraint + ?Sized> Constraint for Arc<C> {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        (**self).violations(ctx)
    }
}

/// A constraint backed by a closure. Built with [`from_fn`].
#[derive(Clone)]
pub struct FnConstraint<F> {
    f: F,
}

impl<F> Constraint for FnConstraint<F>
where
    F: Fn(&Context<'_>) -> ConstraintResult + Send + Sync,
{
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        (self.f)(ctx)
    }
}

impl<F> fmt::Debug for FnConstraint<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConstraint").finish_non_exhaustive()
    }
}

/// Wraps a closure as a [`Constraint`].
///
/// ```rust
/// use waymark::{from_fn, validate};
///
/// let never_empty = from_fn(|ctx| {
///     if ctx.node().is_zero() {
///         Ok(vec![ctx.violation("a value is required", None)])
///     } else {
///         Ok(Vec::new())
///     }
/// });
///
/// assert_eq!(validate(&"", &never_empty).unwrap().len(), 1);
/// ```
pub fn from_fn<F>(f: F) -> FnConstraint<F>
where
    F: Fn(&Context<'_>) -> ConstraintResult + Send + Sync,
{
    FnConstraint { f }
}
