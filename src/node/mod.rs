//! Dynamic value model walked by the validation engine.
//!
//! Rust has no runtime reflection, so values are projected into a [`Node`] tree
//! before validation. A node knows its own shape ([`Kind`]) and, for containers and
//! pointers, the declared [`Type`] of what it holds. That declared type survives a nil
//! pointer, which is what lets a guard accept a nil `Option<HashMap<..>>` as a map.
//!
//! Values enter the model through the [`Reflect`] trait, the [`reflect_record!`]
//! macro for plain structs, or [`Node::from_json`] for `serde_json` documents.
//!
//! [`reflect_record!`]: crate::reflect_record

mod json;
mod reflect;

use std::fmt::{self, Display};
use std::sync::Arc;

use indexmap::IndexMap;

pub use reflect::Reflect;

/// The flat shape of a type or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// No value at all. Only [`Node::Invalid`] has this kind.
    Invalid,
    Bool,
    Int,
    Uint,
    Float,
    String,
    /// Fixed-length sequence.
    Array,
    /// Growable sequence.
    Slice,
    Map,
    /// A struct-like value with named fields.
    Record,
    /// `Option`, `Box`, `Rc`, `Arc` and other single-value indirections.
    Pointer,
    /// A dynamically typed slot, e.g. a `serde_json::Value` or a `Node`.
    Interface,
}

impl Kind {
    /// Returns the lowercase name used in messages and violation details.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Invalid => "invalid",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Record => "record",
            Kind::Pointer => "pointer",
            Kind::Interface => "interface",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A declared type.
///
/// Nested types are `Arc`-shared so that asking a node for its type never deep-copies.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Array(Arc<Type>, usize),
    Slice(Arc<Type>),
    Map(Arc<Type>, Arc<Type>),
    Record(Arc<RecordType>),
    Pointer(Arc<Type>),
    Interface,
}

impl Type {
    /// Returns the kind of this type, without looking through pointers.
    pub fn kind(&self) -> Kind {
        match self {
            Type::Bool => Kind::Bool,
            Type::Int => Kind::Int,
            Type::Uint => Kind::Uint,
            Type::Float => Kind::Float,
            Type::String => Kind::String,
            Type::Array(..) => Kind::Array,
            Type::Slice(_) => Kind::Slice,
            Type::Map(..) => Kind::Map,
            Type::Record(_) => Kind::Record,
            Type::Pointer(_) => Kind::Pointer,
            Type::Interface => Kind::Interface,
        }
    }
}

/// A declared record field: its name and its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    tags: IndexMap<String, String>,
}

impl FieldDef {
    /// Returns the declared field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw value of the tag called `tag`, if the field carries one.
    pub fn tag(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }
}

/// The shape of a record: a name and its ordered field declarations.
///
/// Field types are not part of the descriptor; every field value carries its own.
/// This keeps self-referential records representable.
///
/// # Example
///
/// ```rust
/// use waymark::RecordType;
///
/// let user = RecordType::builder("User")
///     .field("Name")
///     .tag("validation", "name")
///     .field("Email")
///     .build();
///
/// assert_eq!(user.field("Name").unwrap().tag("validation"), Some("name"));
/// assert_eq!(user.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    name: String,
    fields: Vec<FieldDef>,
}

impl RecordType {
    /// Starts building a record type called `name`.
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field declaration by its declared name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the position of a field by its declared name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Builder for [`RecordType`]. Tags attach to the most recently added field.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl RecordTypeBuilder {
    /// Declares the next field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            tags: IndexMap::new(),
        });
        self
    }

    /// Adds a tag to the last declared field. Ignored if no field is declared yet.
    pub fn tag(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.tags.insert(tag.into(), value.into());
        }
        self
    }

    pub fn build(self) -> Arc<RecordType> {
        Arc::new(RecordType {
            name: self.name,
            fields: self.fields,
        })
    }
}

/// A dynamic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An untyped absence of value. It cannot be introspected and is rejected as a
    /// validation root.
    Invalid,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Array {
        elem: Arc<Type>,
        items: Vec<Node>,
    },
    Slice {
        elem: Arc<Type>,
        items: Vec<Node>,
    },
    /// Map entries, in insertion order.
    Map {
        key: Arc<Type>,
        value: Arc<Type>,
        entries: Vec<(Node, Node)>,
    },
    /// Field values, positionally matching `ty.fields()`.
    Record {
        ty: Arc<RecordType>,
        values: Vec<Node>,
    },
    /// An indirection. A `None` target is a nil pointer that still knows its element type.
    Pointer {
        elem: Arc<Type>,
        target: Option<Box<Node>>,
    },
    /// A dynamically typed slot, possibly nil.
    Interface(Option<Box<Node>>),
}

/// A shared, always-invalid node, handed out for lookups that find nothing.
pub(crate) static INVALID: Node = Node::Invalid;

impl Node {
    /// Builds a record node. Missing trailing values are filled with `Node::Invalid`
    /// and surplus values are dropped, so `values` always matches the field list.
    pub fn record(ty: Arc<RecordType>, values: impl IntoIterator<Item = Node>) -> Node {
        let mut values: Vec<Node> = values.into_iter().collect();
        values.resize(ty.fields().len(), Node::Invalid);
        Node::Record { ty, values }
    }

    /// Builds a non-nil pointer to `target`.
    pub fn pointer(elem: Type, target: Node) -> Node {
        Node::Pointer {
            elem: Arc::new(elem),
            target: Some(Box::new(target)),
        }
    }

    /// Builds a nil pointer to a value of type `elem`.
    pub fn nil_pointer(elem: Type) -> Node {
        Node::Pointer {
            elem: Arc::new(elem),
            target: None,
        }
    }

    /// Builds a slice node with the given element type.
    pub fn slice(elem: Type, items: impl IntoIterator<Item = Node>) -> Node {
        Node::Slice {
            elem: Arc::new(elem),
            items: items.into_iter().collect(),
        }
    }

    /// Builds a map node with the given key and value types.
    pub fn map(key: Type, value: Type, entries: impl IntoIterator<Item = (Node, Node)>) -> Node {
        Node::Map {
            key: Arc::new(key),
            value: Arc::new(value),
            entries: entries.into_iter().collect(),
        }
    }

    /// Returns the kind of this node, without looking through pointers.
    pub fn kind(&self) -> Kind {
        match self {
            Node::Invalid => Kind::Invalid,
            Node::Bool(_) => Kind::Bool,
            Node::Int(_) => Kind::Int,
            Node::Uint(_) => Kind::Uint,
            Node::Float(_) => Kind::Float,
            Node::String(_) => Kind::String,
            Node::Array { .. } => Kind::Array,
            Node::Slice { .. } => Kind::Slice,
            Node::Map { .. } => Kind::Map,
            Node::Record { .. } => Kind::Record,
            Node::Pointer { .. } => Kind::Pointer,
            Node::Interface(_) => Kind::Interface,
        }
    }

    /// Returns the declared type of this node, or `None` for [`Node::Invalid`].
    pub fn type_of(&self) -> Option<Type> {
        let ty = match self {
            Node::Invalid => return None,
            Node::Bool(_) => Type::Bool,
            Node::Int(_) => Type::Int,
            Node::Uint(_) => Type::Uint,
            Node::Float(_) => Type::Float,
            Node::String(_) => Type::String,
            Node::Array { elem, items } => Type::Array(Arc::clone(elem), items.len()),
            Node::Slice { elem, .. } => Type::Slice(Arc::clone(elem)),
            Node::Map { key, value, .. } => Type::Map(Arc::clone(key), Arc::clone(value)),
            Node::Record { ty, .. } => Type::Record(Arc::clone(ty)),
            Node::Pointer { elem, .. } => Type::Pointer(Arc::clone(elem)),
            Node::Interface(_) => Type::Interface,
        };
        Some(ty)
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Node::Invalid)
    }

    /// True for a nil pointer or a nil interface.
    pub fn is_nil(&self) -> bool {
        matches!(
            self,
            Node::Pointer { target: None, .. } | Node::Interface(None)
        )
    }

    /// True if this node holds the zero value of its type.
    ///
    /// Records and arrays are zero when every member is zero. A non-nil pointer is
    /// never zero, whatever it points at.
    pub fn is_zero(&self) -> bool {
        match self {
            Node::Invalid => true,
            Node::Bool(b) => !b,
            Node::Int(i) => *i == 0,
            Node::Uint(u) => *u == 0,
            Node::Float(f) => *f == 0.0,
            Node::String(s) => s.is_empty(),
            Node::Array { items, .. } => items.iter().all(Node::is_zero),
            Node::Slice { items, .. } => items.is_empty(),
            Node::Map { entries, .. } => entries.is_empty(),
            Node::Record { values, .. } => values.iter().all(Node::is_zero),
            Node::Pointer { target, .. } => target.is_none(),
            Node::Interface(inner) => inner.is_none(),
        }
    }

    /// Returns the element/entry count of arrays, slices and maps, or the character
    /// count of strings.
    pub fn len(&self) -> Option<usize> {
        match self {
            Node::String(s) => Some(s.chars().count()),
            Node::Array { items, .. } | Node::Slice { items, .. } => Some(items.len()),
            Node::Map { entries, .. } => Some(entries.len()),
            _ => None,
        }
    }

    /// Returns the value of a record field by its declared name.
    pub fn field(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Record { ty, values } => ty.position(name).and_then(|i| values.get(i)),
            _ => None,
        }
    }

    /// Returns the value stored under `key` in a map.
    pub fn get(&self, key: &Node) -> Option<&Node> {
        match self {
            Node::Map { entries, .. } => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any numeric node as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Int(i) => Some(*i as f64),
            Node::Uint(u) => Some(*u as f64),
            Node::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Formats a node the way map keys are rendered into paths.
impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Invalid => f.write_str("<invalid>"),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Int(i) => write!(f, "{}", i),
            Node::Uint(u) => write!(f, "{}", u),
            Node::Float(x) => write!(f, "{}", x),
            Node::String(s) => f.write_str(s),
            Node::Array { items, .. } | Node::Slice { items, .. } => {
                f.write_str("[")?;
                write_spaced(f, items.iter())?;
                f.write_str("]")
            }
            Node::Map { entries, .. } => {
                f.write_str("map[")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", k, v)?;
                }
                f.write_str("]")
            }
            Node::Record { values, .. } => {
                f.write_str("{")?;
                write_spaced(f, values.iter())?;
                f.write_str("}")
            }
            Node::Pointer { target: None, .. } | Node::Interface(None) => f.write_str("nil"),
            Node::Pointer {
                target: Some(inner),
                ..
            }
            | Node::Interface(Some(inner)) => inner.fmt(f),
        }
    }
}

fn write_spaced<'a>(
    f: &mut fmt::Formatter<'_>,
    nodes: impl Iterator<Item = &'a Node>,
) -> fmt::Result {
    for (i, node) in nodes.enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

// Contexts borrow nodes across rayon workers.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Node>();
    assert_sync::<Node>();
};
