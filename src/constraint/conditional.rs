//! Conditional gating of constraints.

use std::fmt;

use super::sequence::Constraints;
use super::traits::{Constraint, ConstraintResult};
use crate::validation::Context;

/// Runs its constraints only if a predicate fixed at construction holds.
///
/// Built with [`when`]. For a predicate evaluated during validation, use [`WhenFn`].
#[derive(Debug)]
pub struct When {
    predicate: bool,
    constraints: Constraints,
}

/// Gates `constraints` on `predicate`.
///
/// # Example
///
/// ```rust
/// use waymark::{constraints, rules, validate, when};
///
/// let strict_mode = false;
/// let checks = when(strict_mode, constraints![rules::required()]);
///
/// assert!(validate(&"", &checks).unwrap().is_empty());
/// ```
pub fn when(predicate: bool, constraints: Constraints) -> When {
    When {
        predicate,
        constraints,
    }
}

impl Constraint for When {
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        if !self.predicate {
            return Ok(Vec::new());
        }
        self.constraints.violations(ctx)
    }
}

/// Runs its constraints only if a predicate over the current [`Context`] holds.
///
/// The predicate is evaluated once per visit, before any constraint runs. Built with
/// [`when_fn`].
pub struct WhenFn<P> {
    predicate: P,
    constraints: Constraints,
}

/// Gates `constraints` on a predicate evaluated during validation.
///
/// # Example
///
/// ```rust
/// use waymark::{constraints, rules, validate, when_fn};
///
/// // Only long identifiers are checked against the pattern.
/// let checks = when_fn(
///     |ctx| ctx.node().len().unwrap_or(0) > 3,
///     constraints![rules::max_length(5)],
/// );
///
/// assert!(validate(&"abc", &checks).unwrap().is_empty());
/// assert_eq!(validate(&"abcdefg", &checks).unwrap().len(), 1);
/// ```
pub fn when_fn<P>(predicate: P, constraints: Constraints) -> WhenFn<P>
where
    P: Fn(&Context<'_>) -> bool + Send + Sync,
{
    WhenFn {
        predicate,
        constraints,
    }
}

impl<P> Constraint for WhenFn<P>
where
    P: Fn(&Context<'_>) -> bool + Send + Sync,
{
    fn violations(&self, ctx: &Context<'_>) -> ConstraintResult {
        if !(self.predicate)(ctx) {
            return Ok(Vec::new());
        }
        self.constraints.violations(ctx)
    }
}

impl<P> fmt::Debug for WhenFn<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhenFn")
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::testing::Probe;
    use crate::node::Node;
    use crate::validation::validate_node;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn probes(probe: &Arc<Probe>, n: usize) -> Constraints {
        (0..n)
            .map(|_| Box::new(Arc::clone(probe)) as Box<dyn Constraint>)
            .collect()
    }

    #[test]
    fn test_when_false_runs_nothing() {
        let probe = Arc::new(Probe::violating());
        let node = Node::Int(1);

        let violations = validate_node(&node, &when(false, probes(&probe, 3))).unwrap();

        assert!(violations.is_empty());
        assert_eq!(probe.calls(), 0);
    }

    #[test]
    fn test_when_true_runs_each_once() {
        let probe = Arc::new(Probe::violating());
        let node = Node::Int(1);

        let violations = validate_node(&node, &when(true, probes(&probe, 3))).unwrap();

        assert_eq!(violations.len(), 3);
        assert_eq!(probe.calls(), 3);
    }

    #[test]
    fn test_when_fn_false_runs_nothing() {
        let probe = Arc::new(Probe::violating());
        let node = Node::Int(1);

        let violations = validate_node(&node, &when_fn(|_| false, probes(&probe, 3))).unwrap();

        assert!(violations.is_empty());
        assert_eq!(probe.calls(), 0);
    }

    #[test]
    fn test_when_fn_evaluates_predicate_once_per_visit() {
        let probe = Arc::new(Probe::violating());
        let evaluated = Arc::new(AtomicUsize::new(0));
        let checks = {
            let evaluated = Arc::clone(&evaluated);
            when_fn(
                move |_| {
                    evaluated.fetch_add(1, Ordering::SeqCst);
                    true
                },
                probes(&probe, 3),
            )
        };
        assert_eq!(evaluated.load(Ordering::SeqCst), 0);

        let node = Node::Int(1);
        let violations = validate_node(&node, &checks).unwrap();

        assert_eq!(evaluated.load(Ordering::SeqCst), 1);
        assert_eq!(probe.calls(), 3);
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn test_when_fn_sees_current_node() {
        let probe = Arc::new(Probe::violating());
        let checks = when_fn(|ctx| ctx.node() == &Node::Int(2), probes(&probe, 1));

        assert!(validate_node(&Node::Int(1), &checks).unwrap().is_empty());
        assert_eq!(validate_node(&Node::Int(2), &checks).unwrap().len(), 1);
    }
}
