//! Capability traits for the structures procxd can draw
//!
//! Layouts depend on these narrow contracts instead of concrete input types:
//! anything that can list its children is a tree, anything that can list
//! node ids and edges is a graph, and anything that can list keyed entries
//! is a configuration.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::geometry::Point;
use super::types::{EdgeType, NodeShape};

/// A labelled node with ordered children
pub trait TreeLike {
    fn label(&self) -> Cow<'_, str>;

    fn children(&self) -> impl Iterator<Item = &Self>;

    fn is_leaf(&self) -> bool {
        self.children().next().is_none()
    }
}

/// A nodes-and-edges structure.
///
/// Node ids are opaque; labels and shapes are looked up through the graph.
pub trait GraphLike {
    type NodeId: Clone + Eq + Hash + Debug;

    /// Node ids in a stable order
    fn node_ids(&self) -> impl Iterator<Item = Self::NodeId>;

    /// Text drawn inside the node; may contain newlines
    fn node_label(&self, id: &Self::NodeId) -> String;

    fn node_shape(&self, _id: &Self::NodeId) -> NodeShape {
        NodeShape::Ellipse
    }

    /// Coordinate already known for the node, in graph space (y up)
    fn node_position(&self, _id: &Self::NodeId) -> Option<Point> {
        None
    }

    fn edges(&self) -> impl Iterator<Item = (Self::NodeId, Self::NodeId)>;

    /// How the edge from `from` to `to` is drawn
    fn edge_type(&self, _from: &Self::NodeId, _to: &Self::NodeId) -> EdgeType {
        EdgeType::Arrow
    }

    fn is_directed(&self) -> bool {
        true
    }

    fn node_count(&self) -> usize {
        self.node_ids().count()
    }
}

/// A nested key-value structure
pub trait ConfigLike {
    /// Keyed children in document order, `None` for a leaf value
    fn entries(&self) -> Option<Vec<(String, &Self)>>;

    /// How a leaf value is shown in a box
    fn display_value(&self) -> String;
}

impl ConfigLike for serde_json::Value {
    fn entries(&self) -> Option<Vec<(String, &Self)>> {
        self.as_object()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v)).collect())
    }

    fn display_value(&self) -> String {
        self.to_string()
    }
}

/// Strategy computing node coordinates for a graph.
///
/// Coordinates are in graph space: roughly unit scale with y pointing up.
/// Closures `Fn(&G) -> Result<HashMap<G::NodeId, Point>>` are assigners too.
pub trait CoordinateAssigner<G: GraphLike> {
    fn assign(&self, graph: &G) -> Result<HashMap<G::NodeId, Point>>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<G, F> CoordinateAssigner<G> for F
where
    G: GraphLike,
    F: Fn(&G) -> Result<HashMap<G::NodeId, Point>>,
{
    fn assign(&self, graph: &G) -> Result<HashMap<G::NodeId, Point>> {
        self(graph)
    }
}

/// Layout algorithm turning an input structure into positioned output
pub trait LayoutAlgorithm<T: ?Sized> {
    type Output;

    fn layout(&self, input: &T) -> Result<Self::Output>;

    fn name(&self) -> &'static str;
}

/// Owned tree of labels, deserializable from `{"label": .., "children": [..]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTree {
    pub label: String,
    #[serde(default)]
    pub children: Vec<LabelTree>,
}

impl LabelTree {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn new(label: impl Into<String>, children: Vec<LabelTree>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(LabelTree::size).sum::<usize>()
    }
}

impl TreeLike for LabelTree {
    fn label(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.label)
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_tree_from_json() {
        let tree: LabelTree = serde_json::from_value(json!({
            "label": "A",
            "children": [{"label": "B"}, {"label": "C", "children": [{"label": "D"}]}]
        }))
        .unwrap();
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.label(), "A");
        assert!(tree.children[0].is_leaf());
        assert!(!tree.is_leaf());
    }

    #[test]
    fn test_json_config_entries_keep_order() {
        let value = json!({"z": 1, "a": {"b": "text"}});
        let entries = value.entries().unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(entries[0].1.display_value(), "1");
        assert!(entries[0].1.entries().is_none());
        let inner = entries[1].1.entries().unwrap();
        assert_eq!(inner[0].1.display_value(), "\"text\"");
    }
}
