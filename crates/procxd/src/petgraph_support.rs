//! [`GraphLike`] for petgraph graphs
//!
//! Node weights are drawn with their `Display` text. Edge weights are
//! ignored.

use std::fmt::Display;

use petgraph::graph::{Graph, IndexType, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::core::GraphLike;

impl<N, E, Ty, Ix> GraphLike for Graph<N, E, Ty, Ix>
where
    N: Display,
    Ty: petgraph::EdgeType,
    Ix: IndexType,
{
    type NodeId = NodeIndex<Ix>;

    fn node_ids(&self) -> impl Iterator<Item = NodeIndex<Ix>> {
        self.node_indices()
    }

    fn node_label(&self, id: &NodeIndex<Ix>) -> String {
        self.node_weight(*id)
            .map(|weight| weight.to_string())
            .unwrap_or_default()
    }

    fn edges(&self) -> impl Iterator<Item = (NodeIndex<Ix>, NodeIndex<Ix>)> {
        self.edge_references().map(|e| (e.source(), e.target()))
    }

    fn is_directed(&self) -> bool {
        Graph::is_directed(self)
    }

    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{render_graph, CircularLayout, SpringLayout};
    use crate::sketch::{SketchBuilder, SketchConfig};
    use petgraph::graph::UnGraph;

    #[test]
    fn test_petgraph_renders() {
        let mut graph = Graph::<&str, ()>::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        graph.extend_with_edges([(a, b), (b, c), (c, a)]);

        let mut builder = SketchBuilder::with_config(SketchConfig::seeded(6));
        let sketch = render_graph(&mut builder, &graph, &SpringLayout::default().with_seed(1)).unwrap();
        assert_eq!(sketch.nodes.len(), 3);
        assert_eq!(sketch.edges.len(), 3);
        assert!(builder.to_document().is_ok());
    }

    #[test]
    fn test_undirected_petgraph() {
        let mut graph = UnGraph::<u32, ()>::new_undirected();
        let a = graph.add_node(1);
        let b = graph.add_node(2);
        graph.add_edge(a, b, ());
        assert!(!GraphLike::is_directed(&graph));
        assert_eq!(graph.node_label(&b), "2");

        let mut builder = SketchBuilder::with_config(SketchConfig::seeded(6));
        let sketch = render_graph(&mut builder, &graph, &CircularLayout).unwrap();
        let arrow = builder.element(&sketch.edges[0]).unwrap();
        assert_eq!(arrow.linear_data().unwrap().end_arrowhead, None);
    }
}
