//! # Parse Trees and the Tree Flattener
//!
//! `ParseNode` is the external grammar engine's output: a kind label with
//! ordered children, each either a nested node or a raw token. The
//! flattener rewrites it into `FlatNode`, a kind-keyed structure the schema
//! compiler can destructure without caring how the grammar spelled things.
//!
//! ## Shape
//!
//! ```text
//! ParseNode(class, [ParseNode(class_name, ["User"]), ParseNode(attribute, [...])])
//!   ──flatten──▶
//! { "class": [ { "class_name": ["User"] }, { "attribute": [...] } ] }
//! ```
//!
//! The flattener is pure and deterministic. It is deliberately ignorant of
//! schema semantics so dialects can change the shapes they expect without
//! touching it.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::StructuralError;

/// A node of the external parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseNode {
    /// Grammar rule that produced this node.
    pub kind: String,
    /// Ordered children.
    #[serde(default)]
    pub children: Vec<ParseChild>,
}

/// A child of a `ParseNode`: a raw token or another node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParseChild {
    Token(String),
    Node(ParseNode),
}

impl ParseNode {
    pub fn new(kind: impl Into<String>, children: Vec<ParseChild>) -> Self {
        Self {
            kind: kind.into(),
            children,
        }
    }

    /// Flattens this node. Infallible because `self` is already a node.
    pub fn flatten(&self) -> FlatNode {
        let items = self
            .children
            .iter()
            .map(|child| match child {
                ParseChild::Token(token) => FlatItem::Leaf(token.clone()),
                ParseChild::Node(node) => FlatItem::Node(node.flatten()),
            })
            .collect();
        FlatNode {
            kind: self.kind.clone(),
            items,
        }
    }
}

impl From<ParseNode> for ParseChild {
    fn from(node: ParseNode) -> Self {
        ParseChild::Node(node)
    }
}

impl From<&str> for ParseChild {
    fn from(token: &str) -> Self {
        ParseChild::Token(token.to_string())
    }
}

/// Flattens an arbitrary parse-tree item.
///
/// # Errors
///
/// Returns [`StructuralError::LeafAtRoot`] when `item` is a bare token.
pub fn flatten(item: &ParseChild) -> Result<FlatNode, StructuralError> {
    match item {
        ParseChild::Node(node) => Ok(node.flatten()),
        ParseChild::Token(token) => Err(StructuralError::LeafAtRoot {
            token: token.clone(),
        }),
    }
}

/// One entry in a flattened node's sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatItem {
    Leaf(String),
    Node(FlatNode),
}

impl Serialize for FlatItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FlatItem::Leaf(token) => serializer.serialize_str(token),
            FlatItem::Node(node) => node.serialize(serializer),
        }
    }
}

/// A flattened node: its kind mapped to the ordered sequence of its
/// children. Serializes as the single-entry map `{kind: [...]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    kind: String,
    items: Vec<FlatItem>,
}

impl Serialize for FlatNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.kind, &self.items)?;
        map.end()
    }
}

impl FlatNode {
    /// The node-kind label this node is keyed by.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn items(&self) -> &[FlatItem] {
        &self.items
    }

    /// Returns the item sequence if this node has kind `kind`.
    pub fn get(&self, kind: &str) -> Option<&[FlatItem]> {
        (self.kind == kind).then_some(self.items.as_slice())
    }

    /// Nested nodes, in order.
    pub fn nodes(&self) -> impl Iterator<Item = &FlatNode> {
        self.items.iter().filter_map(|item| match item {
            FlatItem::Node(node) => Some(node),
            FlatItem::Leaf(_) => None,
        })
    }

    /// Leaf tokens, in order.
    pub fn leaves(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            FlatItem::Leaf(token) => Some(token.as_str()),
            FlatItem::Node(_) => None,
        })
    }

    /// Nested nodes of the given kind, in order.
    pub fn children_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a FlatNode> + 'a {
        self.nodes().filter(move |node| node.kind == kind)
    }

    /// The first nested node of the given kind.
    pub fn child(&self, kind: &str) -> Option<&FlatNode> {
        self.nodes().find(|node| node.kind == kind)
    }

    pub fn first_leaf(&self) -> Option<&str> {
        self.leaves().next()
    }

    pub fn first_node(&self) -> Option<&FlatNode> {
        self.nodes().next()
    }

    /// First leaf of the first nested node of the given kind.
    ///
    /// This is the `{kind: [value]}` lookup every dialect uses for names.
    pub fn leaf_of(&self, kind: &str) -> Option<&str> {
        self.nodes()
            .filter(|node| node.kind == kind)
            .find_map(FlatNode::first_leaf)
    }
}
