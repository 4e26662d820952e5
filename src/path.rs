//! Named value stacks and dotted path rendering.
//!
//! This module provides [`ValueNode`], one named step from the validation root to the
//! value under inspection, and [`PathStack`], the persistent stack of those steps that
//! every [`Context`](crate::Context) carries.

use std::fmt::{self, Display};
use std::sync::Arc;

use crate::node::Node;

/// One step on the path from the validation root to the current value.
///
/// `name` is empty for the root, and for record fields whose tag suppresses the
/// path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueNode<'a> {
    pub name: &'a str,
    pub node: &'a Node,
}

#[derive(Debug)]
struct Frame<'a> {
    name: Box<str>,
    node: &'a Node,
    parent: Option<Arc<Frame<'a>>>,
}

/// A persistent, append-only stack of named nodes.
///
/// Pushing returns a new stack that shares every existing frame with the old one;
/// nothing already on a stack is ever changed. The stack always holds at least the
/// root frame.
///
/// # Example
///
/// ```rust
/// use waymark::{Node, PathStack};
///
/// let root = Node::Int(0);
/// let child = Node::Int(1);
///
/// let base = PathStack::root(&root).push("users", &root);
/// let first = base.push("[0]", &child);
/// let second = base.push("[1]", &child);
///
/// assert_eq!(base.to_string(), ".users");
/// assert_eq!(first.to_string(), ".users.[0]");
/// assert_eq!(second.to_string(), ".users.[1]");
/// ```
#[derive(Debug, Clone)]
pub struct PathStack<'a> {
    top: Arc<Frame<'a>>,
    depth: usize,
}

impl<'a> PathStack<'a> {
    /// Creates a stack holding only the unnamed root.
    pub fn root(node: &'a Node) -> Self {
        Self {
            top: Arc::new(Frame {
                name: Box::from(""),
                node,
                parent: None,
            }),
            depth: 1,
        }
    }

    /// Returns a new stack with `node` pushed under `name`.
    ///
    /// This method does not modify the original stack; it returns a new one.
    pub fn push(&self, name: impl Into<Box<str>>, node: &'a Node) -> Self {
        Self {
            top: Arc::new(Frame {
                name: name.into(),
                node,
                parent: Some(Arc::clone(&self.top)),
            }),
            depth: self.depth + 1,
        }
    }

    /// Returns the most recently pushed value.
    pub fn current(&self) -> ValueNode<'_> {
        ValueNode {
            name: &self.top.name,
            node: self.top.node,
        }
    }

    /// Returns the node of the most recently pushed value, borrowed for the lifetime of
    /// the validated tree rather than of the stack.
    pub fn node(&self) -> &'a Node {
        self.top.node
    }

    /// Returns the root value.
    pub fn root_node(&self) -> &'a Node {
        let mut frame = &self.top;
        while let Some(parent) = &frame.parent {
            frame = parent;
        }
        frame.node
    }

    /// Returns the number of frames, root included.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the frames from the root to the current value.
    pub fn values(&self) -> Vec<ValueNode<'_>> {
        let mut values = Vec::with_capacity(self.depth);
        let mut frame = Some(&self.top);
        while let Some(f) = frame {
            values.push(ValueNode {
                name: &f.name,
                node: f.node,
            });
            frame = f.parent.as_ref();
        }
        values.reverse();
        values
    }
}

/// Renders the dotted path: a leading `.` followed by every non-empty name below the
/// root, joined with `.`. A root-only stack renders as `.`.
impl Display for PathStack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .values()
            .into_iter()
            .skip(1)
            .map(|v| v.name)
            .filter(|name| !name.is_empty())
            .collect();

        write!(f, ".{}", names.join("."))
    }
}
