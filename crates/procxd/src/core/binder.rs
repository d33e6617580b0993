//! Arrow binding
//!
//! Computes where an arrow between two shapes starts and ends, and records
//! the binding metadata the host application uses to keep the arrow attached
//! when either shape moves. Arrows are always straight; nothing is routed
//! around obstacles.

use std::f64::consts::PI;

use tracing::{trace, warn};

use super::element::{
    Binding, BoundElement, BoundElementKind, Element, ElementId, ElementKind, LinearData,
    Placeable,
};
use super::geometry::Point;
use super::types::{Arrowhead, Style};

/// Where on a shape an arrow end is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorMode {
    /// Midpoint of the bounding-box edge facing the other shape
    #[default]
    EdgeMidpoint,
    /// Point where the centre-to-centre line crosses the shape's outline
    Boundary,
}

/// Parameters for binding an arrow between two shapes
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowOptions {
    /// Gap recorded in the binding metadata
    pub gap: f64,
    /// Extra distance pushing each end away from its shape
    pub offset: f64,
    pub anchor: AnchorMode,
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
}

impl Default for ArrowOptions {
    fn default() -> Self {
        Self {
            gap: 10.0,
            offset: 0.0,
            anchor: AnchorMode::EdgeMidpoint,
            start_arrowhead: None,
            end_arrowhead: Some(Arrowhead::Arrow),
        }
    }
}

impl ArrowOptions {
    /// Options for an arrow drawn without heads
    pub fn headless() -> Self {
        Self {
            end_arrowhead: None,
            ..Self::default()
        }
    }

    pub fn with_anchor(mut self, anchor: AnchorMode) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

/// Computed endpoints of an arrow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowGeometry {
    pub start: Point,
    pub end: Point,
    /// Set when the shapes overlap or the arrow has no length
    pub degenerate: bool,
}

/// Anchor point on `shape` for an arrow leaving at `angle` (radians, y down)
pub fn anchor_point(shape: &Element, angle: f64, options: &ArrowOptions) -> Point {
    let bounds = shape.bounds();
    let center = bounds.center();
    let (cos, sin) = (angle.cos(), angle.sin());

    match options.anchor {
        AnchorMode::EdgeMidpoint => {
            let limit = bounds.height.atan2(bounds.width);
            if angle.abs() <= limit {
                Point::new(bounds.max_x() + options.offset, center.y)
            } else if angle.abs() >= PI - limit {
                Point::new(bounds.min_x() - options.offset, center.y)
            } else if angle > 0.0 {
                Point::new(center.x, bounds.max_y() + options.offset)
            } else {
                Point::new(center.x, bounds.min_y() - options.offset)
            }
        }
        AnchorMode::Boundary => {
            let (a, b) = (bounds.width / 2.0, bounds.height / 2.0);
            let reach = match shape.kind {
                ElementKind::Ellipse => {
                    let denom = ((cos / a).powi(2) + (sin / b).powi(2)).sqrt();
                    if a > 0.0 && b > 0.0 && denom > 0.0 {
                        1.0 / denom
                    } else {
                        0.0
                    }
                }
                ElementKind::Diamond => {
                    let denom = cos.abs() / a + sin.abs() / b;
                    if a > 0.0 && b > 0.0 && denom > 0.0 {
                        1.0 / denom
                    } else {
                        0.0
                    }
                }
                _ => {
                    let tx = if cos.abs() > f64::EPSILON { a / cos.abs() } else { f64::INFINITY };
                    let ty = if sin.abs() > f64::EPSILON { b / sin.abs() } else { f64::INFINITY };
                    let t = tx.min(ty);
                    if t.is_finite() {
                        t
                    } else {
                        0.0
                    }
                }
            };
            let reach = reach + options.offset;
            Point::new(center.x + reach * cos, center.y + reach * sin)
        }
    }
}

/// Compute the endpoints of an arrow from `start` to `end`
pub fn arrow_geometry(start: &Element, end: &Element, options: &ArrowOptions) -> ArrowGeometry {
    let (from, to) = (start.center(), end.center());
    let angle = (to.y - from.y).atan2(to.x - from.x);

    let start_point = anchor_point(start, angle, options);
    let end_point = anchor_point(end, angle + PI, options);
    let overlapping = start.bounds().intersects(&end.bounds());
    let degenerate = overlapping || start_point.distance(end_point) <= f64::EPSILON;

    trace!(
        start = %start.id,
        end = %end.id,
        angle,
        degenerate,
        "Computed arrow geometry"
    );

    ArrowGeometry {
        start: start_point,
        end: end_point,
        degenerate,
    }
}

/// Build an arrow bound to `start` and `end`, and record it on both shapes.
pub fn bind_arrow(
    id: ElementId,
    seed: u32,
    start: &mut Element,
    end: &mut Element,
    options: &ArrowOptions,
    style: Style,
) -> Element {
    let geometry = arrow_geometry(start, end, options);
    if geometry.degenerate {
        warn!(
            start = %start.id,
            end = %end.id,
            "Arrow endpoints overlap; arrow is degenerate"
        );
    }

    let data = LinearData {
        points: Vec::new(),
        start_binding: Some(Binding {
            element_id: start.id.clone(),
            focus: 0.0,
            gap: options.gap,
        }),
        end_binding: Some(Binding {
            element_id: end.id.clone(),
            focus: 0.0,
            gap: options.gap,
        }),
        start_arrowhead: options.start_arrowhead,
        end_arrowhead: options.end_arrowhead,
    };
    let arrow = Element::linear(id, &[geometry.start, geometry.end], data, true, style, seed);

    for shape in [start, end] {
        if !shape.bound_elements.iter().any(|b| b.id == arrow.id) {
            shape.bound_elements.push(BoundElement {
                id: arrow.id.clone(),
                kind: BoundElementKind::Arrow,
            });
        }
    }
    arrow
}
