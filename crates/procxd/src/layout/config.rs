//! Configuration stacks
//!
//! A configuration is flattened into rows, one per key in document order.
//! The stack sketch lays the rows out with the indented tree layout, draws a
//! labelled box per row and an elbow line from every box to its parent.

use std::borrow::Cow;

use tracing::{debug, span, Level};

use super::tree::{TreeLayoutAlgorithm, TreeLayoutConfig, TreeOrientation};
use crate::core::{
    Bounds, ConfigLike, Element, ElementId, LayoutAlgorithm, NodeShape, Point, Result, SketchError,
    Style, TreeLike,
};
use crate::sketch::{SketchBuilder, SketchConfig};

/// One key of a flattened configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRow {
    /// Keys from the top-level mapping down to this one
    pub path: Vec<String>,
    /// 0 for top-level keys
    pub depth: usize,
    pub key: String,
    /// Displayed value, `None` for a nested mapping
    pub value: Option<String>,
}

impl ConfigRow {
    pub fn is_mapping(&self) -> bool {
        self.value.is_none()
    }

    /// Dotted path, e.g. `model.layers`
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    /// Text drawn in the row's box
    pub fn label(&self) -> String {
        match &self.value {
            Some(value) => format!("{} = {}", self.key, value),
            None => self.key.clone(),
        }
    }
}

/// A configuration converted to an owned tree of keys
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNode {
    pub key: String,
    pub value: Option<String>,
    pub path: Vec<String>,
    pub children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Convert `config` into a tree whose root is labelled `name`.
    ///
    /// The top level must be a mapping.
    pub fn from_config<C: ConfigLike>(name: &str, config: &C) -> Result<Self> {
        let entries = config.entries().ok_or_else(|| {
            SketchError::malformed_input(format!(
                "configuration '{}' must be a mapping, found the value {}",
                name,
                config.display_value()
            ))
        })?;
        Ok(Self {
            key: name.to_string(),
            value: None,
            path: Vec::new(),
            children: Self::collect(&entries, &[]),
        })
    }

    fn collect<C: ConfigLike>(entries: &[(String, &C)], prefix: &[String]) -> Vec<ConfigNode> {
        entries
            .iter()
            .map(|(key, value)| {
                let mut path = prefix.to_vec();
                path.push(key.clone());
                match value.entries() {
                    Some(nested) => {
                        let children = Self::collect(&nested, &path);
                        ConfigNode {
                            key: key.clone(),
                            value: None,
                            path,
                            children,
                        }
                    }
                    None => ConfigNode {
                        key: key.clone(),
                        value: Some(value.display_value()),
                        path,
                        children: Vec::new(),
                    },
                }
            })
            .collect()
    }

    pub fn is_mapping(&self) -> bool {
        self.value.is_none()
    }

    pub fn child(&self, key: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|c| c.key == key)
    }

    /// The row for this node; the root has depth 0 and an empty path
    pub fn row(&self) -> ConfigRow {
        ConfigRow {
            path: self.path.clone(),
            depth: self.path.len().saturating_sub(1),
            key: self.key.clone(),
            value: self.value.clone(),
        }
    }

    /// Rows of every descendant in pre-order
    pub fn rows(&self) -> Vec<ConfigRow> {
        let mut rows = Vec::new();
        self.push_rows(&mut rows);
        rows
    }

    fn push_rows(&self, rows: &mut Vec<ConfigRow>) {
        for child in &self.children {
            rows.push(child.row());
            child.push_rows(rows);
        }
    }
}

impl TreeLike for ConfigNode {
    fn label(&self) -> Cow<'_, str> {
        match &self.value {
            Some(value) => Cow::Owned(format!("{} = {}", self.key, value)),
            None => Cow::Borrowed(&self.key),
        }
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }
}

/// Flatten a configuration into rows in document order
pub fn flatten_config<C: ConfigLike>(config: &C) -> Result<Vec<ConfigRow>> {
    Ok(ConfigNode::from_config("config", config)?.rows())
}

/// Indented layout matching the builder's text settings
pub fn stack_layout_config(config: &SketchConfig) -> TreeLayoutConfig {
    TreeLayoutConfig {
        padding: config.padding,
        font_size: config.font_size,
        font_family: config.block_font(),
        orientation: TreeOrientation::Indented,
        ..TreeLayoutConfig::default()
    }
}

/// Elbow from under the parent's box to the left edge of the child's box
pub(crate) fn elbow(parent: &Bounds, child: &Bounds, indent: f64) -> [Point; 3] {
    let x = parent.min_x() + indent / 2.0;
    let y = child.center().y;
    [
        Point::new(x, parent.max_y()),
        Point::new(x, y),
        Point::new(child.min_x(), y),
    ]
}

/// Ids of what [`render_stack_sketch`] put on the canvas
#[derive(Debug, Clone)]
pub struct StackSketch {
    /// Box holding the configuration name
    pub root: ElementId,
    /// Box of every row, in row order
    pub rows: Vec<(ConfigRow, ElementId)>,
    pub connectors: Vec<ElementId>,
}

impl StackSketch {
    pub fn box_for(&self, dotted_path: &str) -> Option<&ElementId> {
        self.rows
            .iter()
            .find(|(row, _)| row.dotted_path() == dotted_path)
            .map(|(_, id)| id)
    }
}

/// Draw `config` as a vertical stack of boxes under a root box titled `name`.
///
/// Nested mappings get a solid fill derived from their parent's colour, leaf
/// values an outline box. Connector lines are added before the boxes so they
/// render underneath.
pub fn render_stack_sketch<C: ConfigLike>(
    builder: &mut SketchBuilder,
    config: &C,
    name: &str,
) -> Result<StackSketch> {
    let render_span = span!(Level::INFO, "render_stack_sketch", config_name = name);
    let _enter = render_span.enter();

    let tree = ConfigNode::from_config(name, config)?;
    let algorithm = TreeLayoutAlgorithm::with_config(stack_layout_config(builder.config()));
    let layout = algorithm.layout(&tree)?;
    let family = algorithm.config().font_family;
    let indent = algorithm.config().indent;

    // Layout nodes are in pre-order, the root first, so node i + 1 is row i.
    let rows = tree.rows();
    let mut colors: Vec<Option<String>> = vec![None; layout.nodes.len()];
    let mut boxes: Vec<Element> = Vec::with_capacity(layout.nodes.len() * 2);
    let mut ids = Vec::with_capacity(layout.nodes.len());
    for node in &layout.nodes {
        let is_mapping = node.index == 0 || rows[node.index - 1].is_mapping();
        let style = if is_mapping {
            let parent_color = node.parent.and_then(|p| colors[p].clone());
            let color = builder.fill_color(parent_color.as_deref())?;
            colors[node.index] = Some(color.clone());
            Style::solid(color)
        } else {
            Style::outline()
        };
        let (container, text) =
            builder.create_labeled_box_in(&node.label, node.bounds(), NodeShape::Rectangle, style, family);
        ids.push(container.id.clone());
        boxes.push(container);
        boxes.push(text);
    }

    let mut connectors = Vec::new();
    for node in &layout.nodes {
        if let Some(parent) = node.parent {
            let points = elbow(&layout.nodes[parent].bounds(), &node.bounds(), indent);
            connectors.push(builder.create_line(&points));
        }
    }
    debug!(
        row_count = rows.len(),
        connector_count = connectors.len(),
        "Created stack shapes"
    );

    let connector_ids = connectors.iter().map(|c| c.id.clone()).collect();
    builder.extend(connectors.into_iter().chain(boxes))?;

    let root = ids[0].clone();
    let rows = rows.into_iter().zip(ids.into_iter().skip(1)).collect();
    Ok(StackSketch {
        root,
        rows,
        connectors: connector_ids,
    })
}
