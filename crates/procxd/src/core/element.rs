//! Shape primitives
//!
//! An [`Element`] is one drawable item of the output file. Elements refer to
//! each other only through ids (arrow bindings, group membership, text
//! containers); those references are checked when the canvas is exported.
//! A [`Group`] is a staged collection of elements that move together until
//! it is placed on the canvas.

use std::fmt;

use super::geometry::{Bounds, Point};
use super::text::{estimate_text_size, BASELINE_RATIO, LINE_HEIGHT};
use super::types::{Arrowhead, FontFamily, Style};

/// Identifier of an element; unique within one export
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier shared by all members of a group
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text content and typography
#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    pub text: String,
    pub font_size: f64,
    pub font_family: FontFamily,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    /// Shape this text is bound inside, if any
    pub container_id: Option<ElementId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextAlign::Left => write!(f, "left"),
            TextAlign::Center => write!(f, "center"),
            TextAlign::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
}

impl fmt::Display for VerticalAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalAlign::Top => write!(f, "top"),
            VerticalAlign::Middle => write!(f, "middle"),
        }
    }
}

/// Attachment of one end of a linear element to a shape
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub element_id: ElementId,
    /// -1..=1, where 0 aims at the centre of the bound shape
    pub focus: f64,
    /// Distance kept between the line end and the shape outline
    pub gap: f64,
}

/// Points and bindings of a line or arrow
#[derive(Debug, Clone, PartialEq)]
pub struct LinearData {
    /// Points relative to the element origin; the first point is always (0, 0)
    pub points: Vec<Point>,
    pub start_binding: Option<Binding>,
    pub end_binding: Option<Binding>,
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
}

/// Kind of a back-reference stored on a bound shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundElementKind {
    Arrow,
    Text,
}

impl fmt::Display for BoundElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundElementKind::Arrow => write!(f, "arrow"),
            BoundElementKind::Text => write!(f, "text"),
        }
    }
}

/// Back-reference from a shape to an element bound to it
#[derive(Debug, Clone, PartialEq)]
pub struct BoundElement {
    pub id: ElementId,
    pub kind: BoundElementKind,
}

/// Kind-specific payload of an element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Diamond,
    Text(TextData),
    Line(LinearData),
    Arrow(LinearData),
}

impl ElementKind {
    /// Type tag written to the output file
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Rectangle => "rectangle",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Diamond => "diamond",
            ElementKind::Text(_) => "text",
            ElementKind::Line(_) => "line",
            ElementKind::Arrow(_) => "arrow",
        }
    }
}

/// One drawable element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in radians around the element centre
    pub angle: f64,
    pub style: Style,
    /// Seed for the host application's hand-drawn stroke jitter
    pub seed: u32,
    /// Groups this element belongs to, innermost first
    pub group_ids: Vec<GroupId>,
    pub bound_elements: Vec<BoundElement>,
}

impl Element {
    /// Create a closed shape (rectangle, ellipse or diamond)
    pub fn shape(id: ElementId, kind: ElementKind, bounds: Bounds, style: Style, seed: u32) -> Self {
        Self {
            id,
            kind,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width.max(0.0),
            height: bounds.height.max(0.0),
            angle: 0.0,
            style,
            seed,
            group_ids: Vec::new(),
            bound_elements: Vec::new(),
        }
    }

    /// Create a text element sized by the bounding-box estimator
    pub fn text(id: ElementId, origin: Point, data: TextData, style: Style, seed: u32) -> Self {
        let size = estimate_text_size(&data.text, data.font_size, data.font_family);
        Self {
            id,
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
            kind: ElementKind::Text(data),
            angle: 0.0,
            style,
            seed,
            group_ids: Vec::new(),
            bound_elements: Vec::new(),
        }
    }

    /// Create a line or arrow from absolute points.
    ///
    /// The element origin is moved to the first point and the stored points
    /// become relative to it, which is how the host application stores them.
    pub fn linear(
        id: ElementId,
        absolute_points: &[Point],
        data: LinearData,
        is_arrow: bool,
        style: Style,
        seed: u32,
    ) -> Self {
        let origin = absolute_points.first().copied().unwrap_or_default();
        let mut data = data;
        data.points = if absolute_points.is_empty() {
            vec![Point::default()]
        } else {
            absolute_points
                .iter()
                .map(|p| Point::new(p.x - origin.x, p.y - origin.y))
                .collect()
        };
        let (width, height) = points_extent(&data.points);
        let kind = if is_arrow {
            ElementKind::Arrow(data)
        } else {
            ElementKind::Line(data)
        };
        Self {
            id,
            kind,
            x: origin.x,
            y: origin.y,
            width,
            height,
            angle: 0.0,
            style,
            seed,
            group_ids: Vec::new(),
            bound_elements: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_linear(&self) -> bool {
        matches!(self.kind, ElementKind::Line(_) | ElementKind::Arrow(_))
    }

    pub fn is_closed_shape(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Rectangle | ElementKind::Ellipse | ElementKind::Diamond
        )
    }

    pub fn text_data(&self) -> Option<&TextData> {
        match &self.kind {
            ElementKind::Text(data) => Some(data),
            _ => None,
        }
    }

    pub fn linear_data(&self) -> Option<&LinearData> {
        match &self.kind {
            ElementKind::Line(data) | ElementKind::Arrow(data) => Some(data),
            _ => None,
        }
    }

    pub fn linear_data_mut(&mut self) -> Option<&mut LinearData> {
        match &mut self.kind {
            ElementKind::Line(data) | ElementKind::Arrow(data) => Some(data),
            _ => None,
        }
    }

    /// Absolute coordinates of a line's points
    pub fn absolute_points(&self) -> Vec<Point> {
        self.linear_data()
            .map(|data| {
                data.points
                    .iter()
                    .map(|p| Point::new(self.x + p.x, self.y + p.y))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True for a line whose points all coincide
    pub fn is_degenerate(&self) -> bool {
        self.is_linear() && self.width <= f64::EPSILON && self.height <= f64::EPSILON
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Baseline offset reported for text elements
    pub fn baseline(&self) -> f64 {
        match &self.kind {
            ElementKind::Text(data) => {
                let lines = data.text.split('\n').count() as f64;
                (lines - 1.0) * LINE_HEIGHT * data.font_size + BASELINE_RATIO * data.font_size
            }
            _ => 0.0,
        }
    }

    /// Every id this element refers to
    pub fn references(&self) -> Vec<&ElementId> {
        let mut refs: Vec<&ElementId> = self.bound_elements.iter().map(|b| &b.id).collect();
        match &self.kind {
            ElementKind::Line(data) | ElementKind::Arrow(data) => {
                refs.extend(data.start_binding.iter().map(|b| &b.element_id));
                refs.extend(data.end_binding.iter().map(|b| &b.element_id));
            }
            ElementKind::Text(data) => refs.extend(data.container_id.iter()),
            _ => {}
        }
        refs
    }
}

fn points_extent(points: &[Point]) -> (f64, f64) {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if points.is_empty() {
        (0.0, 0.0)
    } else {
        (max_x - min_x, max_y - min_y)
    }
}

/// Anything that can be measured and moved on the canvas
pub trait Placeable {
    fn bounds(&self) -> Bounds;

    fn translate(&mut self, dx: f64, dy: f64);

    /// Move so the top-left corner of the bounds lands on (x, y)
    fn move_to(&mut self, x: f64, y: f64) {
        let current = self.bounds();
        self.translate(x - current.x, y - current.y);
    }
}

impl Placeable for Element {
    fn bounds(&self) -> Bounds {
        if let Some(data) = self.linear_data() {
            let min_x = data.points.iter().map(|p| p.x).fold(0.0, f64::min);
            let min_y = data.points.iter().map(|p| p.y).fold(0.0, f64::min);
            return Bounds::new(self.x + min_x, self.y + min_y, self.width, self.height);
        }
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

/// A set of elements sharing a group id.
///
/// Members are flattened: adding a group to another group absorbs its
/// members, which keep their earlier group ids as well.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    id: GroupId,
    elements: Vec<Element>,
}

impl Group {
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            elements: Vec::new(),
        }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.iter().any(|e| &e.id == id)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &ElementId> {
        self.elements.iter().map(|e| &e.id)
    }

    /// Add an element at the end; members already present are ignored
    pub fn push(&mut self, mut element: Element) {
        if self.contains(&element.id) {
            return;
        }
        if !element.group_ids.contains(&self.id) {
            element.group_ids.push(self.id.clone());
        }
        self.elements.push(element);
    }

    /// Add an element in front of every current member
    pub fn push_front(&mut self, mut element: Element) {
        if self.contains(&element.id) {
            return;
        }
        if !element.group_ids.contains(&self.id) {
            element.group_ids.push(self.id.clone());
        }
        self.elements.insert(0, element);
    }

    /// Add any shape; groups are flattened into this one
    pub fn add(&mut self, shape: impl Into<Shape>) {
        match shape.into() {
            Shape::Element(element) => self.push(element),
            Shape::Group(group) => {
                for element in group.elements {
                    self.push(element);
                }
            }
        }
    }

    /// Look up a member by id
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| &e.id == id)
    }

    pub fn first(&self) -> Option<&Element> {
        self.elements.first()
    }
}

impl Placeable for Group {
    fn bounds(&self) -> Bounds {
        let boxes: Vec<Bounds> = self.elements.iter().map(Placeable::bounds).collect();
        Bounds::enclosing(&boxes).unwrap_or_default()
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for element in &mut self.elements {
            element.translate(dx, dy);
        }
    }
}

/// Either a single element or a group of elements
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Element(Element),
    Group(Group),
}

impl Shape {
    pub fn into_elements(self) -> Vec<Element> {
        match self {
            Shape::Element(element) => vec![element],
            Shape::Group(group) => group.into_elements(),
        }
    }
}

impl From<Element> for Shape {
    fn from(element: Element) -> Self {
        Shape::Element(element)
    }
}

impl From<Group> for Shape {
    fn from(group: Group) -> Self {
        Shape::Group(group)
    }
}

impl Placeable for Shape {
    fn bounds(&self) -> Bounds {
        match self {
            Shape::Element(element) => element.bounds(),
            Shape::Group(group) => group.bounds(),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Element(element) => element.translate(dx, dy),
            Shape::Group(group) => group.translate(dx, dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::shape(
            ElementId::new(id),
            ElementKind::Rectangle,
            Bounds::new(x, y, w, h),
            Style::outline(),
            1,
        )
    }

    fn linear_data() -> LinearData {
        LinearData {
            points: Vec::new(),
            start_binding: None,
            end_binding: None,
            start_arrowhead: None,
            end_arrowhead: Some(Arrowhead::Arrow),
        }
    }

    #[test]
    fn test_linear_points_are_relative_to_first() {
        let points = [Point::new(10.0, 10.0), Point::new(40.0, -10.0), Point::new(5.0, 30.0)];
        let line = Element::linear(ElementId::new("l"), &points, linear_data(), false, Style::linear(), 1);
        assert_eq!(line.x, 10.0);
        assert_eq!(line.y, 10.0);
        assert_eq!(line.linear_data().unwrap().points[0], Point::new(0.0, 0.0));
        assert_eq!(line.width, 35.0);
        assert_eq!(line.height, 40.0);
        assert_eq!(line.bounds(), Bounds::new(5.0, -10.0, 35.0, 40.0));
        assert_eq!(line.absolute_points(), points.to_vec());
    }

    #[test]
    fn test_degenerate_line() {
        let p = Point::new(3.0, 3.0);
        let arrow = Element::linear(ElementId::new("a"), &[p, p], linear_data(), true, Style::linear(), 1);
        assert!(arrow.is_degenerate());
        assert_eq!(arrow.type_name(), "arrow");
    }

    #[test]
    fn test_group_move_translates_members() {
        let mut group = Group::new(GroupId::new("g"));
        group.push(rect("a", 0.0, 0.0, 10.0, 10.0));
        group.push(rect("b", 20.0, 5.0, 10.0, 10.0));
        assert_eq!(group.bounds(), Bounds::new(0.0, 0.0, 30.0, 15.0));

        group.move_to(100.0, 50.0);
        assert_eq!(group.bounds(), Bounds::new(100.0, 50.0, 30.0, 15.0));
        assert_eq!(group.get(&ElementId::new("b")).unwrap().x, 120.0);
    }

    #[test]
    fn test_group_flattening_keeps_membership() {
        let mut inner = Group::new(GroupId::new("inner"));
        inner.push(rect("a", 0.0, 0.0, 1.0, 1.0));
        let mut outer = Group::new(GroupId::new("outer"));
        outer.add(inner);
        outer.add(rect("b", 0.0, 0.0, 1.0, 1.0));

        assert_eq!(outer.len(), 2);
        let a = outer.get(&ElementId::new("a")).unwrap();
        assert_eq!(a.group_ids, vec![GroupId::new("inner"), GroupId::new("outer")]);
    }

    #[test]
    fn test_group_ignores_duplicates() {
        let mut group = Group::new(GroupId::new("g"));
        group.push(rect("a", 0.0, 0.0, 1.0, 1.0));
        group.push(rect("a", 5.0, 5.0, 1.0, 1.0));
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_text_is_sized_by_estimator() {
        let data = TextData {
            text: "hello".to_string(),
            font_size: 20.0,
            font_family: FontFamily::Code,
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            container_id: None,
        };
        let text = Element::text(ElementId::new("t"), Point::new(1.0, 2.0), data, Style::text(), 1);
        let expected = estimate_text_size("hello", 20.0, FontFamily::Code);
        assert_eq!(text.width, expected.width);
        assert_eq!(text.height, expected.height);
        assert_eq!(text.baseline(), 18.0);
    }
}
