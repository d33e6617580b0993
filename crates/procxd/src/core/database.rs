//! Graph storage
//!
//! [`Database`] is the storage seam for node/edge data; [`GraphDatabase`] is
//! the in-memory graph used by the CLI and by callers without a graph
//! library of their own.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, trace};

use super::error::{Result, SketchError};
use super::geometry::Point;
use super::structure::GraphLike;
use super::types::{EdgeData, EdgeType, NodeData, NodeShape};

/// Storage for nodes and edges
///
/// The associated types let each store pick its own node and edge records.
pub trait Database {
    type Node: Clone;

    type Edge: Clone;

    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    fn clear(&mut self);

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;
}

/// In-memory graph keeping nodes in insertion order
#[derive(Debug, Clone)]
pub struct GraphDatabase {
    directed: bool,
    nodes: HashMap<String, NodeData>,
    node_order: Vec<String>,
    edges: Vec<EdgeData>,
}

impl Default for GraphDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphDatabase {
    /// Create an empty directed graph
    pub fn new() -> Self {
        Self {
            directed: true,
            nodes: HashMap::new(),
            node_order: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Create an empty undirected graph
    pub fn undirected() -> Self {
        Self {
            directed: false,
            ..Self::new()
        }
    }

    pub fn set_directed(&mut self, directed: bool) {
        self.directed = directed;
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Add a node whose label is its id
    pub fn add_simple_node(&mut self, id: &str) -> Result<()> {
        self.add_node(NodeData::new(id, id))
    }

    pub fn add_labeled_node(&mut self, id: &str, label: &str) -> Result<()> {
        self.add_node(NodeData::new(id, label))
    }

    pub fn add_simple_edge(&mut self, from: &str, to: &str) -> Result<()> {
        self.add_edge(EdgeData::new(from, to))
    }

    /// Ensure a node exists, creating it with its id as label if not
    pub fn ensure_node(&mut self, id: &str) -> Result<()> {
        if !self.has_node(id) {
            self.add_simple_node(id)?;
        }
        Ok(())
    }

    /// Parse a graph from its JSON description.
    ///
    /// ```json
    /// {"directed": true,
    ///  "nodes": [{"id": "a", "label": "A", "shape": "diamond", "x": 0.0, "y": 1.0}],
    ///  "edges": [{"from": "a", "to": "b", "type": "dotted_arrow"}]}
    /// ```
    ///
    /// Nodes may also be plain strings. Edges naming an undeclared node are
    /// rejected.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let document: GraphDocument = serde_json::from_value(value)
            .map_err(|e| SketchError::malformed_input(format!("invalid graph: {}", e)))?;

        let mut database = if document.directed {
            Self::new()
        } else {
            Self::undirected()
        };
        for node in document.nodes {
            let data = match node {
                NodeEntry::Id(id) => NodeData::new(id.clone(), id),
                NodeEntry::Full {
                    id,
                    label,
                    shape,
                    x,
                    y,
                } => {
                    let label = label.unwrap_or_else(|| id.clone());
                    let mut data = NodeData::with_shape(id, label, shape.unwrap_or(NodeShape::Ellipse));
                    if let (Some(x), Some(y)) = (x, y) {
                        data = data.at(x, y);
                    }
                    data
                }
            };
            database.add_node(data)?;
        }
        for edge in document.edges {
            database.add_edge(EdgeData::with_type(edge.from, edge.to, edge.edge_type))?;
        }
        Ok(database)
    }
}

#[derive(Debug, Deserialize)]
struct GraphDocument {
    #[serde(default = "default_directed")]
    directed: bool,
    #[serde(default)]
    nodes: Vec<NodeEntry>,
    #[serde(default)]
    edges: Vec<EdgeEntry>,
}

fn default_directed() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeEntry {
    Id(String),
    Full {
        id: String,
        label: Option<String>,
        shape: Option<NodeShape>,
        x: Option<f64>,
        y: Option<f64>,
    },
}

#[derive(Debug, Deserialize)]
struct EdgeEntry {
    from: String,
    to: String,
    #[serde(default, rename = "type")]
    edge_type: EdgeType,
}

impl Database for GraphDatabase {
    type Node = NodeData;
    type Edge = EdgeData;

    fn add_node(&mut self, node: NodeData) -> Result<()> {
        trace!(node_id = %node.id, node_label = %node.label, node_shape = ?node.shape, "Adding node to database");
        if !self.nodes.contains_key(&node.id) {
            self.node_order.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
        debug!(node_count = self.nodes.len(), "Node added");
        Ok(())
    }

    fn add_edge(&mut self, edge: EdgeData) -> Result<()> {
        trace!(edge_from = %edge.from, edge_to = %edge.to, edge_type = ?edge.edge_type, "Adding edge to database");
        for endpoint in [&edge.from, &edge.to] {
            if !self.has_node(endpoint) {
                return Err(SketchError::invalid_reference(
                    format!("{} -> {}", edge.from, edge.to),
                    endpoint.as_str(),
                ));
            }
        }
        self.edges.push(edge);
        debug!(edge_count = self.edges.len(), "Edge added");
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    fn edges(&self) -> impl Iterator<Item = &EdgeData> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.node_order.clear();
        self.edges.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl GraphLike for GraphDatabase {
    type NodeId = String;

    fn node_ids(&self) -> impl Iterator<Item = String> {
        self.node_order.iter().cloned()
    }

    fn node_label(&self, id: &String) -> String {
        self.nodes
            .get(id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.clone())
    }

    fn node_shape(&self, id: &String) -> NodeShape {
        self.nodes.get(id).map(|n| n.shape).unwrap_or_default()
    }

    fn node_position(&self, id: &String) -> Option<Point> {
        self.nodes.get(id).and_then(|n| n.position)
    }

    fn edges(&self) -> impl Iterator<Item = (String, String)> {
        self.edges.iter().map(|e| (e.from.clone(), e.to.clone()))
    }

    /// Style of the first edge from `from` to `to`
    fn edge_type(&self, from: &String, to: &String) -> EdgeType {
        self.edges
            .iter()
            .find(|e| &e.from == from && &e.to == to)
            .map(|e| e.edge_type)
            .unwrap_or_default()
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insertion_order() {
        let mut db = GraphDatabase::new();
        db.add_simple_node("b").unwrap();
        db.add_simple_node("a").unwrap();
        db.add_simple_node("b").unwrap();
        let ids: Vec<String> = db.node_ids().collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_edge_to_missing_node_is_rejected() {
        let mut db = GraphDatabase::new();
        db.add_simple_node("a").unwrap();
        let err = db.add_simple_edge("a", "ghost").unwrap_err();
        assert!(matches!(err, SketchError::InvalidReference { .. }));
        assert_eq!(db.edge_count(), 0);
    }

    #[test]
    fn test_from_json() {
        let db = GraphDatabase::from_json(json!({
            "directed": false,
            "nodes": ["a", {"id": "b", "label": "Node\nB", "shape": "diamond", "x": 1.0, "y": 0.5}],
            "edges": [{"from": "a", "to": "b", "type": "thick_line"}, {"from": "b", "to": "a"}]
        }))
        .unwrap();
        assert!(!db.is_directed());
        assert_eq!(db.node_label(&"b".to_string()), "Node\nB");
        assert_eq!(db.node_shape(&"b".to_string()), NodeShape::Diamond);
        assert_eq!(db.node_position(&"b".to_string()), Some(Point::new(1.0, 0.5)));
        let (a, b) = ("a".to_string(), "b".to_string());
        assert_eq!(db.edge_type(&a, &b), EdgeType::ThickLine);
        assert_eq!(db.edge_type(&b, &a), EdgeType::Arrow);
    }

    #[test]
    fn test_from_json_rejects_non_graph() {
        assert!(matches!(
            GraphDatabase::from_json(json!([1, 2, 3])),
            Err(SketchError::MalformedInput { .. })
        ));
    }
}
