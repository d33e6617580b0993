//! Nested stack sketch
//!
//! Every mapping becomes a coloured box holding a text block of its scalar
//! entries, with the boxes of its nested mappings laid out underneath. Child
//! colours are derived from the parent's.

use tracing::{debug, span, trace, Level};

use super::config::ConfigNode;
use crate::core::{ConfigLike, ElementId, Group, NodeShape, Point, Result, Stacking};
use crate::sketch::{order_sequence, Ordering, SketchBuilder};

/// Ids of what [`render_nested_stack_sketch`] put on the canvas
#[derive(Debug, Clone)]
pub struct NestedSketch {
    /// Outermost box
    pub root: ElementId,
    /// Box of every mapping keyed by its dotted path, the root under ""
    pub boxes: Vec<(String, ElementId)>,
}

impl NestedSketch {
    pub fn box_for(&self, dotted_path: &str) -> Option<&ElementId> {
        self.boxes
            .iter()
            .find(|(path, _)| path == dotted_path)
            .map(|(_, id)| id)
    }
}

struct Nesting<'a> {
    name: &'a str,
    stacking: Stacking,
    boxes: Vec<(String, ElementId)>,
}

impl Nesting<'_> {
    fn qualified(&self, path: &[String]) -> String {
        std::iter::once(self.name)
            .chain(path.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn render(&mut self, builder: &mut SketchBuilder, node: &ConfigNode, color: &str) -> Result<Group> {
        let padding = builder.config().padding;

        let mut lines: Vec<String> = node
            .children
            .iter()
            .filter_map(|child| {
                child
                    .value
                    .as_ref()
                    .map(|value| format!("{} = {}", self.qualified(&child.path), value))
            })
            .collect();

        let mut successors = Vec::new();
        for child in node.children.iter().filter(|c| c.is_mapping()) {
            let child_color = builder.fill_color(Some(color))?;
            successors.push(self.render(builder, child, &child_color)?);
        }
        let ordering = match self.stacking {
            Stacking::Horizontal => Ordering::RightOf,
            Stacking::Vertical => Ordering::Below,
        };
        order_sequence(&mut successors, ordering, padding);

        if lines.is_empty() && successors.is_empty() {
            lines.push(format!("{} = {{}}", self.qualified(&node.path)));
        }

        let mut content = builder.create_group();
        let text = (!lines.is_empty()).then(|| builder.create_text_block(&lines, Point::default()));
        match (text, successors.is_empty()) {
            (Some(text), false) => {
                let mut nested = builder.create_group();
                for successor in successors {
                    nested.add(successor);
                }
                let mut parts = [text, nested];
                order_sequence(&mut parts, Ordering::Below, padding);
                let [text, nested] = parts;
                content.add(text);
                content.add(nested);
            }
            (Some(text), true) => content.add(text),
            (None, _) => {
                for successor in successors {
                    content.add(successor);
                }
            }
        }

        let group = builder.bounding_group(content, NodeShape::Rectangle, color);
        if let Some(bounding) = group.first() {
            trace!(path = %node.path.join("."), id = %bounding.id, "Nested box created");
            self.boxes.push((node.path.join("."), bounding.id.clone()));
        }
        Ok(group)
    }
}

/// Draw `config` as boxes nested inside their parent mapping's box.
///
/// Scalar entries are listed as `name.path.key = value` lines; nested
/// mappings are placed side by side (`Horizontal`) or one below the other
/// (`Vertical`) under those lines.
pub fn render_nested_stack_sketch<C: ConfigLike>(
    builder: &mut SketchBuilder,
    config: &C,
    stacking: Stacking,
    name: &str,
) -> Result<NestedSketch> {
    let render_span = span!(
        Level::INFO,
        "render_nested_stack_sketch",
        config_name = name,
        stacking = %stacking
    );
    let _enter = render_span.enter();

    let tree = ConfigNode::from_config(name, config)?;
    let color = builder.fill_color(None)?;
    let mut nesting = Nesting {
        name,
        stacking,
        boxes: Vec::new(),
    };
    let group = nesting.render(builder, &tree, &color)?;
    let root = group
        .first()
        .map(|e| e.id.clone())
        .ok_or_else(|| crate::core::SketchError::malformed_input("nested sketch produced no shapes"))?;

    debug!(
        box_count = nesting.boxes.len(),
        element_count = group.len(),
        "Created nested stack"
    );
    builder.add(group)?;

    Ok(NestedSketch {
        root,
        boxes: nesting.boxes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Placeable;
    use crate::sketch::SketchConfig;
    use serde_json::json;

    fn render(stacking: Stacking) -> (SketchBuilder, NestedSketch) {
        let mut builder = SketchBuilder::with_config(SketchConfig::seeded(11));
        let sketch = render_nested_stack_sketch(
            &mut builder,
            &json!({
                "lr": 0.1,
                "model": {"layers": 4, "act": "relu"},
                "data": {"path": "/tmp"}
            }),
            stacking,
            "cfg",
        )
        .unwrap();
        (builder, sketch)
    }

    #[test]
    fn test_children_inside_parent() {
        let (builder, sketch) = render(Stacking::Horizontal);
        let root = builder.element(&sketch.root).unwrap().bounds();
        for path in ["model", "data"] {
            let child = builder.element(sketch.box_for(path).unwrap()).unwrap().bounds();
            assert!(child.min_x() > root.min_x() && child.max_x() < root.max_x());
            assert!(child.min_y() > root.min_y() && child.max_y() < root.max_y());
        }
        assert_eq!(sketch.box_for(""), Some(&sketch.root));
    }

    #[test]
    fn test_stacking_direction() {
        let (builder, sketch) = render(Stacking::Horizontal);
        let model = builder.element(sketch.box_for("model").unwrap()).unwrap().bounds();
        let data = builder.element(sketch.box_for("data").unwrap()).unwrap().bounds();
        assert!(data.min_x() >= model.max_x());

        let (builder, sketch) = render(Stacking::Vertical);
        let model = builder.element(sketch.box_for("model").unwrap()).unwrap().bounds();
        let data = builder.element(sketch.box_for("data").unwrap()).unwrap().bounds();
        assert!(data.min_y() >= model.max_y());
    }

    #[test]
    fn test_scalar_lines_are_qualified() {
        let (builder, _) = render(Stacking::Horizontal);
        let texts: Vec<&str> = builder
            .canvas()
            .elements()
            .iter()
            .filter_map(|e| e.text_data().map(|t| t.text.as_str()))
            .collect();
        assert!(texts.contains(&"cfg.lr = 0.1"));
        assert!(texts.contains(&"cfg.model.act = \"relu\""));
        assert!(builder.to_document().is_ok());
    }
}
