//! Projection of Rust values into [`Node`] trees.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{Node, Type};

/// Converts a Rust value into a [`Node`] the engine can walk.
///
/// `reflect_type` describes the declared type without needing a value. Containers
/// and pointers use it so that empty collections and `None` still report what they
/// would have held.
///
/// Plain structs implement this trait with [`reflect_record!`](crate::reflect_record).
pub trait Reflect {
    fn reflect(&self) -> Node;

    fn reflect_type() -> Type
    where
        Self: Sized;
}

macro_rules! reflect_scalar {
    ($variant:ident as $repr:ty: $($t:ty),+) => {
        $(
            impl Reflect for $t {
                fn reflect(&self) -> Node {
                    Node::$variant(*self as $repr)
                }

                fn reflect_type() -> Type {
                    Type::$variant
                }
            }
        )+
    };
}

reflect_scalar!(Int as i64: i8, i16, i32, i64, isize);
reflect_scalar!(Uint as u64: u8, u16, u32, u64, usize);
reflect_scalar!(Float as f64: f32, f64);

impl Reflect for bool {
    fn reflect(&self) -> Node {
        Node::Bool(*self)
    }

    fn reflect_type() -> Type {
        Type::Bool
    }
}

impl Reflect for String {
    fn reflect(&self) -> Node {
        Node::String(self.clone())
    }

    fn reflect_type() -> Type {
        Type::String
    }
}

impl Reflect for &str {
    fn reflect(&self) -> Node {
        Node::String((*self).to_owned())
    }

    fn reflect_type() -> Type {
        Type::String
    }
}

impl Reflect for Node {
    fn reflect(&self) -> Node {
        self.clone()
    }

    fn reflect_type() -> Type {
        Type::Interface
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Node {
        Node::Pointer {
            elem: Arc::new(T::reflect_type()),
            target: self.as_ref().map(|v| Box::new(v.reflect())),
        }
    }

    fn reflect_type() -> Type {
        Type::Pointer(Arc::new(T::reflect_type()))
    }
}

macro_rules! reflect_pointer {
    ($($ptr:ident),+) => {
        $(
            impl<T: Reflect> Reflect for $ptr<T> {
                fn reflect(&self) -> Node {
                    Node::pointer(T::reflect_type(), (**self).reflect())
                }

                fn reflect_type() -> Type {
                    Type::Pointer(Arc::new(T::reflect_type()))
                }
            }
        )+
    };
}

reflect_pointer!(Box, Rc, Arc);

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Node {
        Node::slice(T::reflect_type(), self.iter().map(Reflect::reflect))
    }

    fn reflect_type() -> Type {
        Type::Slice(Arc::new(T::reflect_type()))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Node {
        Node::Array {
            elem: Arc::new(T::reflect_type()),
            items: self.iter().map(Reflect::reflect).collect(),
        }
    }

    fn reflect_type() -> Type {
        Type::Array(Arc::new(T::reflect_type()), N)
    }
}

macro_rules! reflect_map {
    ($($map:ident),+) => {
        $(
            impl<K: Reflect, V: Reflect, S> Reflect for $map<K, V, S> {
                fn reflect(&self) -> Node {
                    Node::map(
                        K::reflect_type(),
                        V::reflect_type(),
                        self.iter().map(|(k, v)| (k.reflect(), v.reflect())),
                    )
                }

                fn reflect_type() -> Type {
                    Type::Map(Arc::new(K::reflect_type()), Arc::new(V::reflect_type()))
                }
            }
        )+
    };
}

reflect_map!(HashMap, IndexMap);

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect(&self) -> Node {
        Node::map(
            K::reflect_type(),
            V::reflect_type(),
            self.iter().map(|(k, v)| (k.reflect(), v.reflect())),
        )
    }

    fn reflect_type() -> Type {
        Type::Map(Arc::new(K::reflect_type()), Arc::new(V::reflect_type()))
    }
}

impl Reflect for serde_json::Value {
    fn reflect(&self) -> Node {
        Node::from_json(self)
    }

    fn reflect_type() -> Type {
        Type::Interface
    }
}

/// Implements [`Reflect`] for a plain struct, projecting it into a record node.
///
/// Each listed field becomes a record field named after the Rust identifier. Tags go in
/// square brackets after the field and are looked up by the context's struct tag when
/// paths are rendered.
///
/// # Example
///
/// ```rust
/// use waymark::{reflect_record, Reflect, Node};
///
/// struct Account {
///     email: String,
///     age: u32,
/// }
///
/// reflect_record!(Account {
///     email ["validation" = "email_address"],
///     age,
/// });
///
/// let node = Account { email: "a@b.c".into(), age: 30 }.reflect();
/// assert_eq!(node.field("age"), Some(&Node::Uint(30)));
/// ```
#[macro_export]
macro_rules! reflect_record {
    ($name:ident { $( $field:ident $( [ $( $tag:literal = $value:literal ),* $(,)? ] )? ),* $(,)? }) => {
        const _: () = {
            static RECORD_TYPE: ::std::sync::OnceLock<::std::sync::Arc<$crate::RecordType>> =
                ::std::sync::OnceLock::new();

            fn record_type() -> ::std::sync::Arc<$crate::RecordType> {
                ::std::sync::Arc::clone(RECORD_TYPE.get_or_init(|| {
                    $crate::RecordType::builder(stringify!($name))
                        $( .field(stringify!($field)) $( $( .tag($tag, $value) )* )? )*
                        .build()
                }))
            }

            impl $crate::Reflect for $name {
                fn reflect(&self) -> $crate::Node {
                    $crate::Node::record(
                        record_type(),
                        ::std::vec![ $( $crate::Reflect::reflect(&self.$field) ),* ],
                    )
                }

                fn reflect_type() -> $crate::Type {
                    $crate::Type::Record(record_type())
                }
            }
        };
    };
}
