//! Type introspection shared by every constraint.
//!
//! These primitives define what "absent" means ([`is_empty`]), when a value can be nil
//! ([`is_nillable`]), how pointer and interface layers are looked through
//! ([`unwrap_value`], [`unwrap_type`], [`kind_of`]), and how constraints guard against
//! values of the wrong shape ([`must_be`], [`should_be`]). [`field_name`] resolves the
//! display name of a record field under the context's struct tag.

use serde_json::Value;
use tracing::trace;

use crate::error::{ConstraintError, Details, Violation};
use crate::node::{Kind, Node, Type};
use crate::validation::Context;

/// The struct-tag value that suppresses a field's path segment.
pub const SUPPRESS_TAG: &str = "-";

/// True if `node` is invalid, the zero value of its type, or a zero-length array,
/// slice or map.
///
/// Nearly every leaf constraint skips empty values, which makes them optional unless
/// paired with a presence constraint such as [`rules::required`](crate::rules::required).
pub fn is_empty(node: &Node) -> bool {
    node.is_zero() || node.len() == Some(0)
}

/// True if the node's kind can meaningfully be nil.
pub fn is_nillable(node: &Node) -> bool {
    matches!(
        node.kind(),
        Kind::Array | Kind::Slice | Kind::Map | Kind::Pointer | Kind::Interface
    )
}

/// Strips pointer and interface layers, stopping at the first nil layer.
///
/// Unwrapping is idempotent, and a nil at any depth is returned as-is rather than
/// failing.
pub fn unwrap_value(node: &Node) -> &Node {
    let mut current = node;
    loop {
        match current {
            Node::Pointer {
                target: Some(inner),
                ..
            }
            | Node::Interface(Some(inner)) => current = inner,
            _ => return current,
        }
    }
}

/// Strips pointer layers from a type.
pub fn unwrap_type(ty: &Type) -> &Type {
    let mut current = ty;
    while let Type::Pointer(elem) = current {
        current = elem;
    }
    current
}

/// Returns the kind guards compare against: the kind of the fully unwrapped type of the
/// fully unwrapped value.
///
/// A nil `Option<HashMap<..>>` therefore reports [`Kind::Map`], while an invalid node
/// reports [`Kind::Invalid`].
pub fn kind_of(node: &Node) -> Kind {
    unwrap_value(node)
        .type_of()
        .map_or(Kind::Invalid, |ty| unwrap_type(&ty).kind())
}

/// Fails unless `kind` is one of `allowed`.
///
/// # Errors
///
/// [`ConstraintError::NoKinds`] if `allowed` is empty, [`ConstraintError::KindMismatch`]
/// if `kind` is not allowed.
pub fn must_be(kind: Kind, allowed: &[Kind]) -> Result<(), ConstraintError> {
    if allowed.is_empty() {
        return Err(ConstraintError::NoKinds);
    }

    if allowed.contains(&kind) {
        Ok(())
    } else {
        Err(ConstraintError::KindMismatch {
            allowed: allowed.to_vec(),
            actual: kind,
        })
    }
}

/// Applies the context's strict-types policy to a kind check.
///
/// With strict types this is [`must_be`]. Otherwise a mismatch is returned as a single
/// violation carrying the allowed kinds, and validation carries on.
///
/// # Example
///
/// ```rust
/// use waymark::{should_be, Context, Kind, Node};
///
/// let node = Node::String("hello".into());
/// let ctx = Context::new(&node).with_strict_types(false);
///
/// let violations = should_be(&ctx, Kind::String, &[Kind::Map]).unwrap();
/// assert_eq!(violations.len(), 1);
///
/// let strict = Context::new(&node);
/// assert!(should_be(&strict, Kind::String, &[Kind::Map]).is_err());
/// ```
pub fn should_be(
    ctx: &Context<'_>,
    kind: Kind,
    allowed: &[Kind],
) -> Result<Vec<Violation>, ConstraintError> {
    if ctx.strict_types() {
        must_be(kind, allowed)?;
        return Ok(Vec::new());
    }

    match must_be(kind, allowed) {
        Ok(()) => Ok(Vec::new()),
        Err(ConstraintError::KindMismatch { .. }) => {
            trace!(path = %ctx.path(), %kind, "permissive kind mismatch");
            Ok(vec![kind_violation(ctx, allowed)])
        }
        Err(err) => Err(err),
    }
}

/// Builds the violation reported for a value outside the allowed kinds.
pub(crate) fn kind_violation(ctx: &Context<'_>, allowed: &[Kind]) -> Violation {
    let mut details = Details::new();
    details.insert(
        "allowed_kinds".into(),
        Value::from(allowed.iter().map(|k| k.name()).collect::<Vec<_>>()),
    );
    ctx.violation("value must be one of the allowed kinds", Some(details))
}

/// Resolves the display name of a field of the record at the current node.
///
/// The field's tag under the context's struct tag is read as comma-separated values;
/// the first value is the name. An empty first value leaves the declared name in place,
/// and [`SUPPRESS_TAG`] resolves to the empty name, which path rendering skips.
///
/// # Errors
///
/// [`ConstraintError::NotARecord`] if the current node does not unwrap to a record,
/// [`ConstraintError::NoSuchField`] if the record has no such field.
///
/// # Example
///
/// ```rust
/// use waymark::{field_name, Context, Node, RecordType};
///
/// let ty = RecordType::builder("Subject")
///     .field("Plain")
///     .field("Tagged")
///     .tag("json", "tagged,omitempty")
///     .build();
/// let node = Node::record(ty, [Node::Int(0), Node::Int(0)]);
/// let ctx = Context::new(&node).with_struct_tag("json");
///
/// assert_eq!(field_name(&ctx, "Plain").unwrap(), "Plain");
/// assert_eq!(field_name(&ctx, "Tagged").unwrap(), "tagged");
/// ```
pub fn field_name(ctx: &Context<'_>, field: &str) -> Result<String, ConstraintError> {
    let record = match unwrap_value(ctx.node()).type_of() {
        Some(ty) => match unwrap_type(&ty) {
            Type::Record(record) => record.clone(),
            other => return Err(ConstraintError::NotARecord(other.kind())),
        },
        None => return Err(ConstraintError::NotARecord(Kind::Invalid)),
    };

    let def = record
        .field(field)
        .ok_or_else(|| ConstraintError::NoSuchField {
            record: record.name().to_owned(),
            field: field.to_owned(),
        })?;

    let alias = def
        .tag(ctx.struct_tag())
        .and_then(|tag| tag.split(',').next())
        .unwrap_or("");

    Ok(match alias {
        "" => def.name().to_owned(),
        SUPPRESS_TAG => String::new(),
        alias => alias.to_owned(),
    })
}
