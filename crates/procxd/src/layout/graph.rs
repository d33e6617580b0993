//! Graph rendering
//!
//! Coordinates come from a [`CoordinateAssigner`]; this module only turns
//! them into shapes. Each node becomes a text block inside a coloured
//! bounding shape, each edge an arrow bound to the two bounding shapes.

use std::collections::HashMap;

use tracing::{debug, span, warn, Level};

use crate::core::{
    ArrowOptions, CoordinateAssigner, ElementId, GraphLike, Group, Placeable, Point, Result,
    Shape, SketchError,
};
use crate::sketch::SketchBuilder;

/// Ids of what [`render_graph`] put on the canvas
#[derive(Debug, Clone)]
pub struct GraphSketch<Id> {
    /// Bounding shape of every node
    pub nodes: HashMap<Id, ElementId>,
    /// Arrows in edge order
    pub edges: Vec<ElementId>,
}

/// Canvas position for a graph-space point: scaled, y flipped, truncated
pub fn to_canvas(point: Point, scale: f64) -> Point {
    Point::new((point.x * scale).trunc(), (-point.y * scale).trunc())
}

pub(super) fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Draw `graph` with coordinates from `assigner` and add it to the canvas.
///
/// Arrows are added before nodes so they render underneath. Undirected
/// graphs and line edges get arrows without heads; dotted edges are dashed
/// and thick edges twice as wide. Self-loops cannot be drawn straight and
/// are skipped with a warning.
pub fn render_graph<G, A>(
    builder: &mut SketchBuilder,
    graph: &G,
    assigner: &A,
) -> Result<GraphSketch<G::NodeId>>
where
    G: GraphLike,
    A: CoordinateAssigner<G> + ?Sized,
{
    let render_span = span!(
        Level::INFO,
        "render_graph",
        node_count = graph.node_count(),
        assigner = assigner.name()
    );
    let _enter = render_span.enter();

    let positions = assigner.assign(graph)?;
    let scale = builder.config().graph_scale;

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<G::NodeId, usize> = HashMap::new();
    for id in graph.node_ids() {
        let position = positions.get(&id).copied().ok_or_else(|| {
            SketchError::malformed_input(format!("no coordinate assigned to node {:?}", id))
        })?;
        let label = graph.node_label(&id);
        let lines: Vec<&str> = label.split('\n').collect();
        let block = builder.create_text_block(&lines, Point::default());
        let color = builder.fill_color(None)?;
        let mut group = builder.bounding_group(block, graph.node_shape(&id), &color);
        let target = to_canvas(position, scale);
        group.move_to(target.x, target.y);

        index.insert(id, groups.len());
        groups.push(group);
    }
    debug!(node_count = groups.len(), "Created node shapes");

    let directed = graph.is_directed();
    let mut arrows = Vec::new();
    for (from, to) in graph.edges() {
        let (Some(&i), Some(&j)) = (index.get(&from), index.get(&to)) else {
            let missing = if index.contains_key(&from) { &to } else { &from };
            return Err(SketchError::invalid_reference(
                format!("edge {:?} -> {:?}", from, to),
                format!("{:?}", missing),
            ));
        };
        if i == j {
            warn!(node = ?from, "Skipping self-loop");
            continue;
        }
        let (start_group, end_group) = pair_mut(&mut groups, i, j);
        let (Some(start), Some(end)) = (
            start_group.elements_mut().first_mut(),
            end_group.elements_mut().first_mut(),
        ) else {
            continue;
        };
        let edge_type = graph.edge_type(&from, &to);
        let options = if directed && edge_type.has_arrow() {
            ArrowOptions::default()
        } else {
            ArrowOptions::headless()
        };
        let mut arrow = builder.create_binding_arrow(start, end, &options);
        arrow.style = edge_type.apply(arrow.style);
        arrows.push(arrow);
    }
    debug!(edge_count = arrows.len(), "Created edge arrows");

    let nodes = index
        .into_iter()
        .filter_map(|(id, i)| groups[i].first().map(|e| (id, e.id.clone())))
        .collect();
    let edges = arrows.iter().map(|a| a.id.clone()).collect();

    let mut shapes: Vec<Shape> = arrows.into_iter().map(Into::into).collect();
    shapes.extend(groups.into_iter().map(Into::into));
    builder.extend(shapes)?;

    Ok(GraphSketch { nodes, edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GraphDatabase, SketchError, StrokeStyle};
    use crate::layout::CircularLayout;
    use crate::sketch::SketchConfig;

    fn builder() -> SketchBuilder {
        SketchBuilder::with_config(SketchConfig::seeded(9))
    }

    #[test]
    fn test_arrows_precede_nodes() {
        let mut db = GraphDatabase::new();
        db.add_labeled_node("a", "first\nnode").unwrap();
        db.add_simple_node("b").unwrap();
        db.add_simple_edge("a", "b").unwrap();

        let mut sketch = builder();
        let result = render_graph(&mut sketch, &db, &CircularLayout).unwrap();
        assert_eq!(result.edges.len(), 1);
        let elements = sketch.canvas().elements();
        assert_eq!(elements[0].type_name(), "arrow");
        // a: ellipse + 2 lines, b: ellipse + 1 line, plus the arrow
        assert_eq!(elements.len(), 6);
        assert!(sketch.to_document().is_ok());
    }

    #[test]
    fn test_positions_are_scaled_and_flipped() {
        assert_eq!(to_canvas(Point::new(0.5, 0.5), 500.0), Point::new(250.0, -250.0));
        assert_eq!(to_canvas(Point::new(0.0011, -0.0011), 500.0), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_undirected_graph_has_headless_arrows() {
        let mut db = GraphDatabase::undirected();
        db.add_simple_node("a").unwrap();
        db.add_simple_node("b").unwrap();
        db.add_simple_edge("a", "b").unwrap();

        let mut sketch = builder();
        let result = render_graph(&mut sketch, &db, &CircularLayout).unwrap();
        let arrow = sketch.element(&result.edges[0]).unwrap();
        assert_eq!(arrow.linear_data().unwrap().end_arrowhead, None);
    }

    #[test]
    fn test_edge_types_style_arrows() {
        let db = GraphDatabase::from_json(serde_json::json!({
            "nodes": ["a", "b", "c"],
            "edges": [
                {"from": "a", "to": "b"},
                {"from": "b", "to": "c", "type": "thick_arrow"},
                {"from": "c", "to": "a", "type": "dotted_line"}
            ]
        }))
        .unwrap();

        let mut sketch = builder();
        let result = render_graph(&mut sketch, &db, &CircularLayout).unwrap();
        let arrows: Vec<_> = result
            .edges
            .iter()
            .map(|id| sketch.element(id).unwrap())
            .collect();

        let plain = &arrows[0].style;
        assert!(arrows[0].linear_data().unwrap().end_arrowhead.is_some());

        assert!(arrows[1].linear_data().unwrap().end_arrowhead.is_some());
        assert_eq!(arrows[1].style.stroke_width, plain.stroke_width * 2.0);
        assert_eq!(arrows[1].style.stroke_style, StrokeStyle::Solid);

        assert_eq!(arrows[2].linear_data().unwrap().end_arrowhead, None);
        assert_eq!(arrows[2].style.stroke_style, StrokeStyle::Dashed);
        assert_eq!(arrows[2].style.stroke_width, plain.stroke_width);
    }

    #[test]
    fn test_missing_coordinate_leaves_canvas_empty() {
        let mut db = GraphDatabase::new();
        db.add_simple_node("a").unwrap();
        let assigner = |_: &GraphDatabase| -> Result<HashMap<String, Point>> { Ok(HashMap::new()) };
        let mut sketch = builder();
        let err = render_graph(&mut sketch, &db, &assigner).unwrap_err();
        assert!(matches!(err, SketchError::MalformedInput { .. }));
        assert!(sketch.is_empty());
    }
}
