//! Conversions between [`Node`] and `serde_json::Value`.

use serde_json::{Map as JsonMap, Number, Value};

use super::{Node, Type};

impl Node {
    /// Builds a node from a JSON document.
    ///
    /// Objects become string-keyed maps of interface values, arrays become slices of
    /// interface values and `null` becomes a nil interface. Integers that fit an `i64`
    /// become [`Node::Int`], larger ones [`Node::Uint`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use waymark::{Kind, Node};
    /// use serde_json::json;
    ///
    /// let node = Node::from_json(&json!({"name": "Alice", "tags": []}));
    /// assert_eq!(node.kind(), Kind::Map);
    /// assert_eq!(node.get(&Node::String("name".into())), Some(&Node::String("Alice".into())));
    /// ```
    pub fn from_json(value: &Value) -> Node {
        match value {
            Value::Null => Node::Interface(None),
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => from_number(n),
            Value::String(s) => Node::String(s.clone()),
            Value::Array(items) => Node::slice(Type::Interface, items.iter().map(Node::from_json)),
            Value::Object(fields) => Node::map(
                Type::String,
                Type::Interface,
                fields
                    .iter()
                    .map(|(k, v)| (Node::String(k.clone()), Node::from_json(v))),
            ),
        }
    }

    /// Renders this node as JSON.
    ///
    /// Records become objects keyed by declared field name, maps become objects keyed
    /// by their display form, nil pointers and interfaces become `null`, and pointers
    /// render their target. Non-finite floats and invalid nodes become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Node::Invalid => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Int(i) => Value::from(*i),
            Node::Uint(u) => Value::from(*u),
            Node::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Node::String(s) => Value::String(s.clone()),
            Node::Array { items, .. } | Node::Slice { items, .. } => {
                Value::Array(items.iter().map(Node::to_json).collect())
            }
            Node::Map { entries, .. } => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
            Node::Record { ty, values } => Value::Object(
                ty.fields()
                    .iter()
                    .zip(values)
                    .map(|(f, v)| (f.name().to_owned(), v.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
            Node::Pointer { target: None, .. } | Node::Interface(None) => Value::Null,
            Node::Pointer {
                target: Some(inner),
                ..
            }
            | Node::Interface(Some(inner)) => inner.to_json(),
        }
    }
}

fn from_number(n: &Number) -> Node {
    if let Some(i) = n.as_i64() {
        Node::Int(i)
    } else if let Some(u) = n.as_u64() {
        Node::Uint(u)
    } else {
        Node::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        Node::from_json(value)
    }
}
