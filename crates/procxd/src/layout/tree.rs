//! Tree layout
//!
//! Top-down mode is a post-order span layout: every node reserves a
//! horizontal span (its own box for leaves, the sum of its children's spans
//! plus spacing otherwise), children are laid side by side inside it, and a
//! parent is centred over the mean of its children. A parent wider than its
//! children pushes them right and widens its span instead of leaving the
//! mean. Rows sit one level height apart.
//!
//! Indented mode lists nodes in pre-order, one per row, shifted right by
//! depth. It is what configuration stacks use.

use tracing::{debug, span, trace, Level};

use crate::core::{
    estimate_text_size, ArrowOptions, Bounds, Element, ElementId, FontFamily, LayoutAlgorithm,
    NodeShape, Result, Style, TreeLike,
};
use crate::sketch::SketchBuilder;

/// Direction a tree grows in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeOrientation {
    /// Root at the top, children in the row below
    #[default]
    TopDown,
    /// One node per row, children indented under their parent
    Indented,
}

/// Layout configuration
#[derive(Debug, Clone)]
pub struct TreeLayoutConfig {
    /// Horizontal gap between sibling subtrees
    pub sibling_spacing: f64,
    /// Vertical distance between the tops of consecutive levels
    pub level_height: f64,
    /// Horizontal shift per depth level in indented mode
    pub indent: f64,
    /// Vertical gap between rows in indented mode
    pub row_gap: f64,
    /// Space between a label and its box
    pub padding: f64,
    pub font_size: f64,
    pub font_family: FontFamily,
    pub orientation: TreeOrientation,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            sibling_spacing: 40.0,
            level_height: 100.0,
            indent: 40.0,
            row_gap: 20.0,
            padding: 10.0,
            font_size: 20.0,
            font_family: FontFamily::HandDrawn,
            orientation: TreeOrientation::TopDown,
        }
    }
}

/// A laid out tree node. `x` is the centre of the box, `y` its top.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    /// Pre-order index
    pub index: usize,
    pub parent: Option<usize>,
    pub depth: usize,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Horizontal extent reserved for the node's whole subtree
    pub span_left: f64,
    pub span_right: f64,
}

impl PositionedNode {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x - self.width / 2.0, self.y, self.width, self.height)
    }
}

/// Layout output, nodes in pre-order
#[derive(Debug, Clone, Default)]
pub struct TreeLayoutResult {
    pub nodes: Vec<PositionedNode>,
    pub width: f64,
    pub height: f64,
}

impl TreeLayoutResult {
    pub fn children_of(&self, index: usize) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.iter().filter(move |n| n.parent == Some(index))
    }

    pub fn find(&self, label: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.label == label)
    }
}

/// Tree layout algorithm implementation
#[derive(Debug, Clone, Default)]
pub struct TreeLayoutAlgorithm {
    config: TreeLayoutConfig,
}

struct Slot {
    label: String,
    parent: Option<usize>,
    depth: usize,
    children: Vec<usize>,
    width: f64,
    height: f64,
    span: f64,
    /// Centre of the box relative to the left of the span
    center_offset: f64,
    /// Left of the span relative to the parent's span
    left_offset: f64,
}

impl TreeLayoutAlgorithm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeLayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TreeLayoutConfig {
        &self.config
    }

    /// Box size for a label
    pub fn node_size(&self, label: &str) -> (f64, f64) {
        let text = estimate_text_size(label, self.config.font_size, self.config.font_family);
        let padding = self.config.padding.max(0.0);
        (text.width + 2.0 * padding, text.height + 2.0 * padding)
    }

    fn collect<T: TreeLike>(&self, node: &T, parent: Option<usize>, depth: usize, slots: &mut Vec<Slot>) {
        let index = slots.len();
        let label = node.label().into_owned();
        let (width, height) = self.node_size(&label);
        slots.push(Slot {
            label,
            parent,
            depth,
            children: Vec::new(),
            width,
            height,
            span: width,
            center_offset: width / 2.0,
            left_offset: 0.0,
        });
        if let Some(p) = parent {
            slots[p].children.push(index);
        }
        for child in node.children() {
            self.collect(child, Some(index), depth + 1, slots);
        }
    }

    fn layout_top_down(&self, slots: &mut [Slot]) -> Vec<PositionedNode> {
        let spacing = self.config.sibling_spacing.max(0.0);

        // Children always follow their parent in pre-order, so a reverse
        // sweep sees every subtree before its root.
        for index in (0..slots.len()).rev() {
            let children = slots[index].children.clone();
            if children.is_empty() {
                continue;
            }
            let block: f64 = children.iter().map(|&c| slots[c].span).sum::<f64>()
                + spacing * (children.len() - 1) as f64;
            let mut cursor = 0.0;
            let mut centers = 0.0;
            for &child in &children {
                slots[child].left_offset = cursor;
                centers += cursor + slots[child].center_offset;
                cursor += slots[child].span + spacing;
            }
            let mean = centers / children.len() as f64;

            // The parent sits over the mean; shift the children right when
            // its box would stick out on the left, and widen the span when
            // it sticks out on the right.
            let half = slots[index].width / 2.0;
            let shift = (half - mean).max(0.0);
            for &child in &children {
                slots[child].left_offset += shift;
            }
            slots[index].span = (shift + block).max(shift + mean + half);
            slots[index].center_offset = shift + mean;
        }

        let level_height = self.effective_level_height(slots);
        let mut lefts = vec![0.0; slots.len()];
        let mut nodes = Vec::with_capacity(slots.len());
        for (index, slot) in slots.iter().enumerate() {
            let left = match slot.parent {
                Some(p) => lefts[p] + slot.left_offset,
                None => 0.0,
            };
            lefts[index] = left;
            nodes.push(PositionedNode {
                index,
                parent: slot.parent,
                depth: slot.depth,
                label: slot.label.clone(),
                x: left + slot.center_offset,
                y: slot.depth as f64 * level_height,
                width: slot.width,
                height: slot.height,
                span_left: left,
                span_right: left + slot.span,
            });
        }
        nodes
    }

    fn effective_level_height(&self, slots: &[Slot]) -> f64 {
        let tallest = slots.iter().map(|s| s.height).fold(0.0, f64::max);
        self.config.level_height.max(tallest + self.config.row_gap)
    }

    fn layout_indented(&self, slots: &[Slot]) -> Vec<PositionedNode> {
        let mut y = 0.0;
        slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let left = slot.depth as f64 * self.config.indent;
                let node = PositionedNode {
                    index,
                    parent: slot.parent,
                    depth: slot.depth,
                    label: slot.label.clone(),
                    x: left + slot.width / 2.0,
                    y,
                    width: slot.width,
                    height: slot.height,
                    span_left: left,
                    span_right: left + slot.width,
                };
                y += slot.height + self.config.row_gap;
                node
            })
            .collect()
    }
}

impl<T: TreeLike> LayoutAlgorithm<T> for TreeLayoutAlgorithm {
    type Output = TreeLayoutResult;

    fn layout(&self, tree: &T) -> Result<Self::Output> {
        let layout_span = span!(
            Level::INFO,
            "layout_tree",
            orientation = ?self.config.orientation
        );
        let _enter = layout_span.enter();

        let mut slots = Vec::new();
        self.collect(tree, None, 0, &mut slots);
        trace!(node_count = slots.len(), "Collected tree nodes");

        let nodes = match self.config.orientation {
            TreeOrientation::TopDown => self.layout_top_down(&mut slots),
            TreeOrientation::Indented => self.layout_indented(&slots),
        };

        let boxes: Vec<Bounds> = nodes.iter().map(PositionedNode::bounds).collect();
        let (width, height) = Bounds::enclosing(&boxes)
            .map(|b| (b.max_x(), b.max_y()))
            .unwrap_or((0.0, 0.0));
        debug!(node_count = nodes.len(), width, height, "Tree layout completed");

        Ok(TreeLayoutResult {
            nodes,
            width,
            height,
        })
    }

    fn name(&self) -> &'static str {
        "tree"
    }
}

/// Ids of what [`render_tree`] put on the canvas
#[derive(Debug, Clone)]
pub struct TreeSketch {
    /// Box of every node in pre-order
    pub nodes: Vec<ElementId>,
    /// Parent to child arrows
    pub edges: Vec<ElementId>,
}

/// Lay `tree` out with `algorithm` and draw it: a labelled rectangle per
/// node and a bound arrow from every parent to each child.
pub fn render_tree<T: TreeLike>(
    builder: &mut SketchBuilder,
    tree: &T,
    algorithm: &TreeLayoutAlgorithm,
) -> Result<TreeSketch> {
    let render_span = span!(Level::INFO, "render_tree");
    let _enter = render_span.enter();

    let layout = algorithm.layout(tree)?;
    let family = algorithm.config().font_family;

    let mut boxes: Vec<Element> = Vec::with_capacity(layout.nodes.len());
    let mut labels: Vec<Element> = Vec::with_capacity(layout.nodes.len());
    for node in &layout.nodes {
        let (container, text) = builder.create_labeled_box_in(
            &node.label,
            node.bounds(),
            NodeShape::Rectangle,
            Style::outline(),
            family,
        );
        boxes.push(container);
        labels.push(text);
    }

    let options = ArrowOptions::default();
    let mut arrows = Vec::new();
    for node in &layout.nodes {
        let Some(parent) = node.parent else {
            continue;
        };
        // Pre-order puts every parent before its children.
        let (head, tail) = boxes.split_at_mut(node.index);
        let arrow = builder.create_binding_arrow(&mut head[parent], &mut tail[0], &options);
        arrows.push(arrow);
    }
    debug!(node_count = boxes.len(), edge_count = arrows.len(), "Created tree shapes");

    let nodes = boxes.iter().map(|b| b.id.clone()).collect();
    let edges = arrows.iter().map(|a| a.id.clone()).collect();
    let shapes = arrows
        .into_iter()
        .chain(boxes.into_iter().zip(labels).flat_map(|(b, t)| [b, t]));
    builder.extend(shapes)?;

    Ok(TreeSketch { nodes, edges })
}
