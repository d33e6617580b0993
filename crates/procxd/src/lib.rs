//! procXD - Procedurally generate Excalidraw sketches
//!
//! A library for turning trees, graphs and configuration files into
//! `.excalidraw` documents: labelled boxes, bound arrows and groups laid out
//! by simple layout algorithms, ready to be refined in Excalidraw.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let document = procxd::render_config(&json!({"lr": 0.1, "model": {"layers": 4}}), "cfg").unwrap();
//! assert!(document.contains("\"type\": \"excalidraw\""));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, drive a [`SketchBuilder`](sketch::SketchBuilder)
//! directly:
//!
//! ```rust
//! use procxd::prelude::*;
//!
//! let mut graph = GraphDatabase::new();
//! graph.add_simple_node("a").unwrap();
//! graph.add_simple_node("b").unwrap();
//! graph.add_simple_edge("a", "b").unwrap();
//!
//! let mut builder = SketchBuilder::with_config(SketchConfig::seeded(7));
//! let sketch = render_graph(&mut builder, &graph, &CircularLayout).unwrap();
//! assert_eq!(sketch.edges.len(), 1);
//!
//! let tree = LabelTree::new("A", vec![LabelTree::leaf("B"), LabelTree::leaf("C")]);
//! render_tree(&mut builder, &tree, &TreeLayoutAlgorithm::new()).unwrap();
//!
//! let document = builder.to_document().unwrap();
//! assert_eq!(document.elements.len(), builder.len());
//! ```

pub mod core;
pub mod layout;
#[cfg(feature = "petgraph")]
mod petgraph_support;
pub mod sketch;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        ArrowOptions, Bounds, ConfigLike, CoordinateAssigner, Database, Element, ElementId,
        GraphDatabase, GraphLike, Group, LabelTree, LayoutAlgorithm, NodeShape, Placeable, Point,
        Result, Shape, SketchError, Stacking, Style, TreeLike,
    };
    pub use crate::layout::{
        render_comparative_stack_sketch, render_graph, render_nested_stack_sketch,
        render_stack_sketch, render_tree, CircularLayout, FixedLayout, SpringLayout,
        TreeLayoutAlgorithm, TreeLayoutConfig,
    };
    pub use crate::sketch::{SketchBuilder, SketchConfig};
}

/// Render a configuration as a stack sketch and return the document JSON
///
/// # Example
/// ```rust
/// let json = procxd::render_config(&serde_json::json!({"a": 1}), "cfg").unwrap();
/// assert!(json.contains("a = 1"));
/// ```
pub fn render_config<C: ConfigLike>(config: &C, name: &str) -> Result<String> {
    let mut builder = sketch::SketchBuilder::new();
    layout::render_stack_sketch(&mut builder, config, name)?;
    builder.to_json_string()
}

/// Render two configurations side by side and return the document JSON
///
/// # Example
/// ```rust
/// use serde_json::json;
///
/// let json = procxd::render_comparison(&json!({"a": 1}), &json!({"a": 2}), "old", "new").unwrap();
/// assert!(json.contains("#ffc9c9"));
/// ```
pub fn render_comparison<L: ConfigLike, R: ConfigLike>(
    left: &L,
    right: &R,
    left_name: &str,
    right_name: &str,
) -> Result<String> {
    let mut builder = sketch::SketchBuilder::new();
    layout::render_comparative_stack_sketch(&mut builder, left, right, left_name, right_name)?;
    builder.to_json_string()
}
