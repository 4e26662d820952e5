//! Rules over how many fields of a record are set.
//!
//! A field is set when its value is not empty. Field names are resolved through the
//! context's struct tag before they are reported.
//!
//! These rules only make sense on records: any other kind is a fatal
//! [`ConstraintError::KindMismatch`], even when the value is empty and even under
//! permissive typing.

use serde_json::Value;

use super::detail_map;
use crate::constraint::{from_fn, Constraint, ConstraintResult};
use crate::error::ConstraintError;
use crate::introspect::{field_name, is_empty, kind_of, must_be, unwrap_value};
use crate::node::{Kind, Node, INVALID};
use crate::validation::Context;

/// The resolved names of the fields under test, and the names of those that are set.
struct Presence {
    names: Vec<String>,
    set: Vec<String>,
}

fn presence(
    ctx: &Context<'_>,
    record: &Node,
    fields: &[String],
) -> Result<Presence, ConstraintError> {
    let mut names = Vec::with_capacity(fields.len());
    let mut set = Vec::new();
    for field in fields {
        let name = field_name(ctx, field)?;
        if !is_empty(record.field(field).unwrap_or(&INVALID)) {
            set.push(name.clone());
        }
        names.push(name);
    }
    Ok(Presence { names, set })
}

/// Runs `f` against a non-empty record, checking the kind before emptiness.
fn record_fn<F>(f: F) -> impl Constraint
where
    F: Fn(&Context<'_>, &Node) -> ConstraintResult + Send + Sync,
{
    from_fn(move |ctx| {
        let node = unwrap_value(ctx.node());
        must_be(kind_of(node), &[Kind::Record])?;
        if is_empty(node) {
            return Ok(Vec::new());
        }
        f(ctx, node)
    })
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| (*f).to_owned()).collect()
}

fn check_arity(rule: &str, n: usize, fields: &[&str]) -> Result<(), ConstraintError> {
    if n < 1 {
        return Err(ConstraintError::InvalidArgument(format!(
            "value of n given to {} must be at least 1",
            rule
        )));
    }
    if n >= fields.len() {
        return Err(ConstraintError::InvalidArgument(format!(
            "value of n given to {} must be less than the number of fields",
            rule
        )));
    }
    Ok(())
}

/// Reports a record with more than one of `fields` set.
pub fn mutually_exclusive(fields: &[&str]) -> impl Constraint {
    let fields = owned(fields);
    record_fn(move |ctx, record| {
        let presence = presence(ctx, record, &fields)?;
        if presence.set.len() > 1 {
            let details = detail_map([("fields", Value::from(presence.set))]);
            return Ok(vec![ctx.violation("fields are mutually exclusive", Some(details))]);
        }
        Ok(Vec::new())
    })
}

/// Reports a record with some, but not all, of `fields` set.
pub fn mutually_inclusive(fields: &[&str]) -> impl Constraint {
    let fields = owned(fields);
    record_fn(move |ctx, record| {
        let presence = presence(ctx, record, &fields)?;
        if !presence.set.is_empty() && presence.set.len() != fields.len() {
            let details = detail_map([("fields", Value::from(presence.names))]);
            return Ok(vec![ctx.violation("fields are mutually inclusive", Some(details))]);
        }
        Ok(Vec::new())
    })
}

/// Reports a record with fewer than `n` of `fields` set.
///
/// # Errors
///
/// [`ConstraintError::InvalidArgument`] unless `1 <= n < fields.len()`. Requiring all
/// of the fields is better expressed with [`required`](super::required) on each.
///
/// # Example
///
/// ```rust
/// use waymark::{reflect_record, rules, validate};
///
/// struct Contact {
///     email: String,
///     phone: String,
///     post: String,
/// }
///
/// reflect_record!(Contact { email, phone, post });
///
/// let reachable = rules::at_least_n_required(1, &["email", "phone", "post"]).unwrap();
///
/// let nobody = Contact { email: String::new(), phone: String::new(), post: "x".into() };
/// assert!(validate(&nobody, &reachable).unwrap().is_empty());
/// assert!(rules::at_least_n_required(3, &["email", "phone", "post"]).is_err());
/// ```
pub fn at_least_n_required(
    n: usize,
    fields: &[&str],
) -> Result<impl Constraint, ConstraintError> {
    check_arity("at_least_n_required", n, fields)?;
    let fields = owned(fields);
    Ok(record_fn(move |ctx, record| {
        let presence = presence(ctx, record, &fields)?;
        if presence.set.len() < n {
            let details = detail_map([
                ("minimum", Value::from(n)),
                ("fields", Value::from(presence.names)),
            ]);
            return Ok(vec![ctx.violation(
                "minimum number of required fields not met",
                Some(details),
            )]);
        }
        Ok(Vec::new())
    }))
}

/// Reports a record with more than `n` of `fields` set.
///
/// # Errors
///
/// [`ConstraintError::InvalidArgument`] unless `1 <= n < fields.len()`.
pub fn at_most_n_required(
    n: usize,
    fields: &[&str],
) -> Result<impl Constraint, ConstraintError> {
    check_arity("at_most_n_required", n, fields)?;
    let fields = owned(fields);
    Ok(record_fn(move |ctx, record| {
        let presence = presence(ctx, record, &fields)?;
        if presence.set.len() > n {
            let details = detail_map([
                ("actual", Value::from(presence.set.len())),
                ("maximum", Value::from(n)),
                ("fields", Value::from(presence.names)),
            ]);
            return Ok(vec![ctx.violation(
                "maximum number of required fields exceeded",
                Some(details),
            )]);
        }
        Ok(Vec::new())
    }))
}

/// Reports a record with anything other than exactly `n` of `fields` set.
///
/// # Errors
///
/// [`ConstraintError::InvalidArgument`] unless `1 <= n < fields.len()`.
pub fn exactly_n_required(
    n: usize,
    fields: &[&str],
) -> Result<impl Constraint, ConstraintError> {
    check_arity("exactly_n_required", n, fields)?;
    let fields = owned(fields);
    Ok(record_fn(move |ctx, record| {
        let presence = presence(ctx, record, &fields)?;
        if presence.set.len() != n {
            let details = detail_map([
                ("actual", Value::from(presence.set.len())),
                ("expected", Value::from(n)),
                ("fields", Value::from(presence.names)),
            ]);
            return Ok(vec![ctx.violation(
                "exact number of required fields not met",
                Some(details),
            )]);
        }
        Ok(Vec::new())
    }))
}
