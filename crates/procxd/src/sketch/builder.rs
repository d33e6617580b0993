//! The sketch builder
//!
//! Creating an element never touches the canvas; only [`SketchBuilder::add`],
//! [`SketchBuilder::extend`], [`SketchBuilder::connect`] and
//! [`SketchBuilder::group_existing`] change it, and each either succeeds
//! completely or leaves the canvas as it was.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::arrange::{order_sequence, Ordering};
use super::{ColorTechnique, SketchConfig};
use crate::core::color::{palette_color, random_hex_color, sample_color};
use crate::core::export::{self, Document};
use crate::core::{
    bind_arrow, estimate_text_size, ArrowOptions, Bounds, BoundElement, BoundElementKind, Canvas,
    Element, ElementId, ElementKind, FontFamily, Group, GroupId, IdGenerator, LinearData,
    NodeShape, Placeable, Point, Result, Shape, Style, TextAlign, TextData, VerticalAlign,
};

/// Accumulates elements and exports them as one document
#[derive(Debug, Clone)]
pub struct SketchBuilder {
    config: SketchConfig,
    canvas: Canvas,
    ids: IdGenerator,
}

impl Default for SketchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchBuilder {
    pub fn new() -> Self {
        Self::with_config(SketchConfig::default())
    }

    pub fn with_config(config: SketchConfig) -> Self {
        let ids = IdGenerator::new(config.seed);
        Self {
            config,
            canvas: Canvas::new(),
            ids,
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.canvas.get(id)
    }

    pub fn len(&self) -> usize {
        self.canvas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canvas.is_empty()
    }

    fn fresh_id(&mut self) -> ElementId {
        loop {
            let id = self.ids.element_id();
            if !self.canvas.contains(&id) {
                return id;
            }
        }
    }

    pub fn create_rectangle(&mut self, bounds: Bounds, style: Style) -> Element {
        self.create_shape(NodeShape::Rectangle, bounds, style)
    }

    pub fn create_ellipse(&mut self, bounds: Bounds, style: Style) -> Element {
        self.create_shape(NodeShape::Ellipse, bounds, style)
    }

    pub fn create_diamond(&mut self, bounds: Bounds, style: Style) -> Element {
        self.create_shape(NodeShape::Diamond, bounds, style)
    }

    /// Create a closed shape of the given kind
    pub fn create_shape(&mut self, shape: NodeShape, bounds: Bounds, style: Style) -> Element {
        let kind = match shape {
            NodeShape::Rectangle => ElementKind::Rectangle,
            NodeShape::Ellipse => ElementKind::Ellipse,
            NodeShape::Diamond => ElementKind::Diamond,
        };
        let id = self.fresh_id();
        let seed = self.ids.seed();
        Element::shape(id, kind, bounds, style, seed)
    }

    /// Create free-standing text with its top-left corner at `origin`
    pub fn create_text(&mut self, text: &str, origin: Point, family: FontFamily) -> Element {
        let font_size = self.config.font_size;
        self.create_text_sized(text, origin, family, font_size)
    }

    /// Like [`create_text`](Self::create_text) with an explicit font size
    pub fn create_text_sized(
        &mut self,
        text: &str,
        origin: Point,
        family: FontFamily,
        font_size: f64,
    ) -> Element {
        let data = TextData {
            text: text.to_string(),
            font_size,
            font_family: family,
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            container_id: None,
        };
        let id = self.fresh_id();
        let seed = self.ids.seed();
        Element::text(id, origin, data, Style::text(), seed)
    }

    /// Create an unbound polyline through absolute points
    pub fn create_line(&mut self, points: &[Point]) -> Element {
        let data = LinearData {
            points: Vec::new(),
            start_binding: None,
            end_binding: None,
            start_arrowhead: None,
            end_arrowhead: None,
        };
        let id = self.fresh_id();
        let seed = self.ids.seed();
        Element::linear(id, points, data, false, Style::linear(), seed)
    }

    /// Create an unbound arrow between two points
    pub fn create_arrow(&mut self, start: Point, end: Point, options: &ArrowOptions) -> Element {
        let data = LinearData {
            points: Vec::new(),
            start_binding: None,
            end_binding: None,
            start_arrowhead: options.start_arrowhead,
            end_arrowhead: options.end_arrowhead,
        };
        let id = self.fresh_id();
        let seed = self.ids.seed();
        Element::linear(id, &[start, end], data, true, Style::linear(), seed)
    }

    /// Create an arrow bound to two shapes.
    ///
    /// Both shapes get a back-reference to the arrow; all three must end up
    /// in the same export.
    pub fn create_binding_arrow(
        &mut self,
        start: &mut Element,
        end: &mut Element,
        options: &ArrowOptions,
    ) -> Element {
        let id = self.fresh_id();
        let seed = self.ids.seed();
        bind_arrow(id, seed, start, end, options, Style::linear())
    }

    /// An empty group with a fresh id
    pub fn create_group(&mut self) -> Group {
        Group::new(self.ids.group_id())
    }

    /// One text element per line, stacked top to bottom `padding` apart and grouped
    pub fn create_text_block<S: AsRef<str>>(&mut self, lines: &[S], origin: Point) -> Group {
        let family = self.config.block_font();
        let padding = self.config.padding;
        let mut texts: Vec<Element> = lines
            .iter()
            .map(|line| self.create_text(line.as_ref(), origin, family))
            .collect();
        order_sequence(&mut texts, Ordering::Below, padding);

        let mut group = self.create_group();
        for text in texts {
            group.push(text);
        }
        group
    }

    /// A solid shape surrounding `target` with `padding` on every side
    pub fn create_bounding_element(
        &mut self,
        target: &impl Placeable,
        shape: NodeShape,
        background: &str,
    ) -> Element {
        let bounds = target.bounds().inflate(self.config.padding);
        // An ellipse through the corners of the box needs sqrt(2) more room.
        let bounds = match shape {
            NodeShape::Rectangle => bounds,
            NodeShape::Ellipse | NodeShape::Diamond => {
                let scale = if shape == NodeShape::Ellipse { std::f64::consts::SQRT_2 } else { 2.0 };
                let (w, h) = (bounds.width * scale, bounds.height * scale);
                let center = bounds.center();
                Bounds::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
            }
        };
        self.create_shape(shape, bounds, Style::solid(background))
    }

    /// Wrap `content` in a bounding shape; the bounding shape comes first so
    /// it renders underneath
    pub fn bounding_group(
        &mut self,
        content: impl Into<Shape>,
        shape: NodeShape,
        background: &str,
    ) -> Group {
        let content = content.into();
        let bounding = self.create_bounding_element(&content, shape, background);
        let mut group = self.create_group();
        group.add(content);
        group.push_front(bounding);
        group
    }

    /// A box of the given shape with its label bound inside it.
    ///
    /// The box is sized around the label; `origin` is its top-left corner.
    /// Returns `(box, label)`.
    pub fn create_labeled_box(
        &mut self,
        label: &str,
        origin: Point,
        shape: NodeShape,
        style: Style,
        family: FontFamily,
    ) -> (Element, Element) {
        let padding = self.config.padding;
        let size = estimate_text_size(label, self.config.font_size, family);
        let bounds = Bounds::new(
            origin.x,
            origin.y,
            size.width + 2.0 * padding,
            size.height + 2.0 * padding,
        );
        self.create_labeled_box_in(label, bounds, shape, style, family)
    }

    /// Like [`create_labeled_box`](Self::create_labeled_box) with a fixed box
    pub fn create_labeled_box_in(
        &mut self,
        label: &str,
        bounds: Bounds,
        shape: NodeShape,
        style: Style,
        family: FontFamily,
    ) -> (Element, Element) {
        let mut container = self.create_shape(shape, bounds, style);
        let size = estimate_text_size(label, self.config.font_size, family);
        let center = bounds.center();
        let data = TextData {
            text: label.to_string(),
            font_size: self.config.font_size,
            font_family: family,
            text_align: TextAlign::Center,
            vertical_align: VerticalAlign::Middle,
            container_id: Some(container.id.clone()),
        };
        let id = self.fresh_id();
        let seed = self.ids.seed();
        let origin = Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0);
        let text = Element::text(id, origin, data, Style::text(), seed);
        container.bound_elements.push(BoundElement {
            id: text.id.clone(),
            kind: BoundElementKind::Text,
        });
        (container, text)
    }

    /// Fill colour for a new box, derived from its parent's colour if any
    pub fn fill_color(&mut self, parent: Option<&str>) -> Result<String> {
        let rng = self.ids.rng();
        match (self.config.color_technique, parent) {
            (ColorTechnique::Palette, parent) => Ok(palette_color(rng, parent)),
            (ColorTechnique::Sampled, Some(parent)) => sample_color(parent, rng),
            (ColorTechnique::Sampled, None) => Ok(random_hex_color(rng)),
        }
    }

    /// Append one element or group to the canvas
    pub fn add(&mut self, shape: impl Into<Shape>) -> Result<()> {
        self.canvas.add(shape)
    }

    /// Append several shapes; nothing is appended if any id is already taken
    pub fn extend<I, S>(&mut self, shapes: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<Shape>,
    {
        self.canvas.extend(shapes)
    }

    /// Bind a new arrow between two elements already on the canvas
    pub fn connect(
        &mut self,
        start: &ElementId,
        end: &ElementId,
        options: &ArrowOptions,
    ) -> Result<ElementId> {
        let id = self.fresh_id();
        let seed = self.ids.seed();
        let (start, end) = self.canvas.get_pair_mut(start, end)?;
        let arrow = bind_arrow(id.clone(), seed, start, end, options, Style::linear());
        self.canvas.add(arrow)?;
        Ok(id)
    }

    /// Group elements already on the canvas under a new group id
    pub fn group_existing(&mut self, members: &[ElementId]) -> Result<GroupId> {
        let group_id = self.ids.group_id();
        self.canvas.group_existing(group_id.clone(), members)?;
        Ok(group_id)
    }

    pub fn to_document(&self) -> Result<Document> {
        export::to_document(&self.canvas)
    }

    pub fn to_json_string(&self) -> Result<String> {
        export::to_json_string(&self.canvas)
    }

    /// Write the canvas to `path` (`.excalidraw` is appended when missing)
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let written = export::write_to_file(&self.canvas, path)?;
        info!(path = %written.display(), element_count = self.canvas.len(), "Sketch exported");
        Ok(written)
    }

    /// Drop everything on the canvas
    pub fn refresh(&mut self) {
        debug!(element_count = self.canvas.len(), "Clearing canvas");
        self.canvas.clear();
    }
}
