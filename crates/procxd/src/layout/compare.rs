//! Side-by-side comparison of two configurations
//!
//! Rows of both configurations are merged by key path. The merged order
//! follows the left configuration; a key only the right one has is placed
//! right after the subtree of its preceding right-hand sibling, or right
//! after its parent when it comes first. Every subtree stays contiguous.

use std::collections::HashMap;

use tracing::{debug, span, Level};

use super::config::{elbow, stack_layout_config, ConfigNode, ConfigRow};
use super::graph::pair_mut;
use super::tree::TreeLayoutAlgorithm;
use crate::core::{
    ArrowOptions, Bounds, ConfigLike, Element, ElementId, FontFamily, NodeShape, Placeable, Point,
    Result, StrokeStyle, Style,
};
use crate::sketch::SketchBuilder;

/// Fill of rows whose value differs between the two sides
pub const CHANGED_COLOR: &str = "#ffc9c9";
/// Fill of rows present on one side only
pub const ONE_SIDED_COLOR: &str = "#b2f2bb";
/// Font size of the configuration titles
pub const TITLE_FONT_SIZE: f64 = 24.0;

/// How a key compares across the two configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Same,
    Changed,
    LeftOnly,
    RightOnly,
}

impl RowStatus {
    pub fn is_difference(&self) -> bool {
        !matches!(self, RowStatus::Same)
    }
}

/// One merged row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparedRow {
    pub path: Vec<String>,
    pub depth: usize,
    pub left: Option<ConfigRow>,
    pub right: Option<ConfigRow>,
    pub status: RowStatus,
}

impl ComparedRow {
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Merge two configurations into aligned rows.
///
/// Leaf values compare by their displayed text, mappings by presence. A key
/// holding a value on one side and a mapping on the other is `Changed`.
pub fn compare_configs<L: ConfigLike, R: ConfigLike>(left: &L, right: &R) -> Result<Vec<ComparedRow>> {
    let left = ConfigNode::from_config("left", left)?;
    let right = ConfigNode::from_config("right", right)?;
    let mut rows = Vec::new();
    merge_into(Some(&left), Some(&right), &mut rows);
    Ok(rows)
}

fn merge_into(left: Option<&ConfigNode>, right: Option<&ConfigNode>, rows: &mut Vec<ComparedRow>) {
    for (l, r) in merge_children(left, right) {
        let Some(node) = l.or(r) else {
            continue;
        };
        rows.push(ComparedRow {
            path: node.path.clone(),
            depth: node.path.len().saturating_sub(1),
            left: l.map(ConfigNode::row),
            right: r.map(ConfigNode::row),
            status: status(l, r),
        });
        merge_into(l, r, rows);
    }
}

type NodePair<'a> = (Option<&'a ConfigNode>, Option<&'a ConfigNode>);

fn merge_children<'a>(left: Option<&'a ConfigNode>, right: Option<&'a ConfigNode>) -> Vec<NodePair<'a>> {
    let left_children = left.map(|n| n.children.as_slice()).unwrap_or(&[]);
    let right_children = right.map(|n| n.children.as_slice()).unwrap_or(&[]);

    let mut keys: Vec<&str> = left_children.iter().map(|c| c.key.as_str()).collect();
    for (i, child) in right_children.iter().enumerate() {
        if keys.contains(&child.key.as_str()) {
            continue;
        }
        let at = match i.checked_sub(1) {
            Some(previous) => keys
                .iter()
                .position(|k| *k == right_children[previous].key)
                .map_or(keys.len(), |p| p + 1),
            None => 0,
        };
        keys.insert(at, &child.key);
    }

    keys.into_iter()
        .map(|key| {
            (
                left_children.iter().find(|c| c.key == key),
                right_children.iter().find(|c| c.key == key),
            )
        })
        .collect()
}

fn status(left: Option<&ConfigNode>, right: Option<&ConfigNode>) -> RowStatus {
    match (left, right) {
        (Some(l), Some(r)) if l.value == r.value => RowStatus::Same,
        (Some(_), Some(_)) => RowStatus::Changed,
        (Some(_), None) => RowStatus::LeftOnly,
        (None, Some(_)) => RowStatus::RightOnly,
        (None, None) => RowStatus::Same,
    }
}

fn row_style(status: RowStatus) -> Style {
    match status {
        RowStatus::Same => Style::outline(),
        RowStatus::Changed => Style::solid(CHANGED_COLOR),
        RowStatus::LeftOnly | RowStatus::RightOnly => Style::solid(ONE_SIDED_COLOR),
    }
}

fn placeholder_style() -> Style {
    Style::outline()
        .with_background("transparent")
        .with_stroke_style(StrokeStyle::Dashed)
}

/// A box in one column: the row's labelled box or an empty placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub id: ElementId,
    pub placeholder: bool,
}

/// A merged row and the cells drawn for it
#[derive(Debug, Clone)]
pub struct RenderedRow {
    pub row: ComparedRow,
    pub left: Cell,
    pub right: Cell,
}

/// Ids of what [`render_comparative_stack_sketch`] put on the canvas
#[derive(Debug, Clone)]
pub struct ComparisonSketch {
    pub rows: Vec<RenderedRow>,
    /// Dashed outer boxes, left then right
    pub frames: [ElementId; 2],
    pub titles: [ElementId; 2],
    pub connectors: Vec<ElementId>,
    /// Arrows from the left box to the right box of each changed row
    pub match_arrows: Vec<ElementId>,
}

impl ComparisonSketch {
    pub fn row(&self, dotted_path: &str) -> Option<&RenderedRow> {
        self.rows.iter().find(|r| r.row.dotted_path() == dotted_path)
    }

    pub fn differences(&self) -> impl Iterator<Item = &RenderedRow> {
        self.rows.iter().filter(|r| r.row.status.is_difference())
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Draw two configurations as aligned stacks, left and right.
///
/// Matching keys share a row. Rows are filled by status: outline when equal,
/// red when the value changed, green when only one side has the key, which
/// gets a dashed placeholder on the other side. A changed row also gets an
/// arrow bound to its left and right boxes. Each stack is framed by a dashed
/// box with its name above it.
pub fn render_comparative_stack_sketch<L: ConfigLike, R: ConfigLike>(
    builder: &mut SketchBuilder,
    left: &L,
    right: &R,
    left_name: &str,
    right_name: &str,
) -> Result<ComparisonSketch> {
    let render_span = span!(
        Level::INFO,
        "render_comparative_stack_sketch",
        left = left_name,
        right = right_name
    );
    let _enter = render_span.enter();

    let rows = compare_configs(left, right)?;
    let algorithm = TreeLayoutAlgorithm::with_config(stack_layout_config(builder.config()));
    let layout_config = algorithm.config().clone();
    let indent = layout_config.indent;

    let label_of = |row: &Option<ConfigRow>| row.as_ref().map(ConfigRow::label);
    let sizes: Vec<[Option<(f64, f64)>; 2]> = rows
        .iter()
        .map(|r| {
            [
                label_of(&r.left).map(|l| algorithm.node_size(&l)),
                label_of(&r.right).map(|l| algorithm.node_size(&l)),
            ]
        })
        .collect();
    let cell_width = |size: &[Option<(f64, f64)>; 2]| {
        size.iter().flatten().map(|s| s.0).fold(0.0, f64::max)
    };
    let column_width = rows
        .iter()
        .zip(&sizes)
        .map(|(r, s)| r.depth as f64 * indent + cell_width(s))
        .fold(0.0, f64::max);
    let right_offset = column_width + 2.0 * indent;

    let mut cells: Vec<Element> = Vec::with_capacity(rows.len() * 4);
    let mut rendered: Vec<RenderedRow> = Vec::with_capacity(rows.len());
    let mut cell_bounds: Vec<[Bounds; 2]> = Vec::with_capacity(rows.len());
    // Positions in `cells` of each row's two labelled boxes
    let mut boxes: Vec<[Option<usize>; 2]> = Vec::with_capacity(rows.len());
    let mut y = 0.0;
    for (row, size) in rows.into_iter().zip(&sizes) {
        let height = size.iter().flatten().map(|s| s.1).fold(0.0, f64::max);
        let mut make_cell = |builder: &mut SketchBuilder, side: Side| {
            let (data, own, other, offset) = match side {
                Side::Left => (&row.left, size[0], size[1], 0.0),
                Side::Right => (&row.right, size[1], size[0], right_offset),
            };
            let x = offset + row.depth as f64 * indent;
            match (data, own) {
                (Some(data), Some((width, _))) => {
                    let bounds = Bounds::new(x, y, width, height);
                    let (container, text) = builder.create_labeled_box_in(
                        &data.label(),
                        bounds,
                        NodeShape::Rectangle,
                        row_style(row.status),
                        layout_config.font_family,
                    );
                    let cell = Cell {
                        id: container.id.clone(),
                        placeholder: false,
                    };
                    let at = cells.len();
                    cells.push(container);
                    cells.push(text);
                    (cell, bounds, Some(at))
                }
                _ => {
                    let width = other.map(|s| s.0).unwrap_or(0.0);
                    let bounds = Bounds::new(x, y, width, height);
                    let placeholder = builder.create_rectangle(bounds, placeholder_style());
                    let cell = Cell {
                        id: placeholder.id.clone(),
                        placeholder: true,
                    };
                    cells.push(placeholder);
                    (cell, bounds, None)
                }
            }
        };
        let (left_cell, left_bounds, left_box) = make_cell(&mut *builder, Side::Left);
        let (right_cell, right_bounds, right_box) = make_cell(&mut *builder, Side::Right);
        cell_bounds.push([left_bounds, right_bounds]);
        boxes.push([left_box, right_box]);
        rendered.push(RenderedRow {
            row,
            left: left_cell,
            right: right_cell,
        });
        y += height + layout_config.row_gap;
    }

    let index: HashMap<Vec<String>, usize> = rendered
        .iter()
        .enumerate()
        .map(|(i, r)| (r.row.path.clone(), i))
        .collect();
    let mut connectors = Vec::new();
    for (i, row) in rendered.iter().enumerate() {
        let Some((_, parent_path)) = row.row.path.split_last() else {
            continue;
        };
        let Some(&parent) = index.get(parent_path) else {
            continue;
        };
        for (side, cell) in [(0, &row.left), (1, &row.right)] {
            let parent_cell = if side == 0 { &rendered[parent].left } else { &rendered[parent].right };
            if cell.placeholder || parent_cell.placeholder {
                continue;
            }
            let points = elbow(&cell_bounds[parent][side], &cell_bounds[i][side], indent);
            connectors.push(builder.create_line(&points));
        }
    }

    let mut match_arrows = Vec::new();
    for (row, pair) in rendered.iter().zip(&boxes) {
        let (RowStatus::Changed, [Some(l), Some(r)]) = (row.row.status, *pair) else {
            continue;
        };
        let (left_box, right_box) = pair_mut(&mut cells, l, r);
        match_arrows.push(builder.create_binding_arrow(left_box, right_box, &ArrowOptions::default()));
    }

    let [left_frame, left_title] = decorate(builder, &cell_bounds, 0, left_name, 0.0);
    let [right_frame, right_title] = decorate(builder, &cell_bounds, 1, right_name, right_offset);
    let frames = [left_frame.id.clone(), right_frame.id.clone()];
    let titles = [left_title.id.clone(), right_title.id.clone()];

    let differences = rendered.iter().filter(|r| r.row.status.is_difference()).count();
    debug!(
        row_count = rendered.len(),
        differences,
        connector_count = connectors.len(),
        match_count = match_arrows.len(),
        "Created comparison shapes"
    );

    let connector_ids = connectors.iter().map(|c| c.id.clone()).collect();
    let match_ids = match_arrows.iter().map(|a| a.id.clone()).collect();
    let decoration = [left_frame, left_title, right_frame, right_title];
    builder.extend(
        decoration
            .into_iter()
            .chain(connectors)
            .chain(match_arrows)
            .chain(cells),
    )?;

    Ok(ComparisonSketch {
        rows: rendered,
        frames,
        titles,
        connectors: connector_ids,
        match_arrows: match_ids,
    })
}

/// Dashed frame around one column plus its title centred above it
fn decorate(
    builder: &mut SketchBuilder,
    cell_bounds: &[[Bounds; 2]],
    side: usize,
    name: &str,
    offset: f64,
) -> [Element; 2] {
    let padding = builder.config().padding;
    let boxes: Vec<Bounds> = cell_bounds.iter().map(|b| b[side]).collect();
    let frame_bounds = Bounds::enclosing(&boxes)
        .unwrap_or(Bounds::new(offset, 0.0, 0.0, 0.0))
        .inflate(padding);
    let frame = builder.create_rectangle(frame_bounds, placeholder_style());
    let mut title =
        builder.create_text_sized(name, Point::default(), FontFamily::HandDrawn, TITLE_FONT_SIZE);
    title.move_to(
        frame_bounds.center().x - title.width / 2.0,
        frame_bounds.min_y() - title.height - padding,
    );
    [frame, title]
}
