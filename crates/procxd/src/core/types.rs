//! Core type definitions for sketch construction
//!
//! This module contains the small value types shared across procxd:
//! style attributes, font families, node shapes, edge types, stacking
//! direction and the node/edge records stored in a graph database.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::geometry::Point;

/// Font family of a text element, using the host application's numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FontFamily {
    /// Hand-drawn font (Virgil)
    #[default]
    HandDrawn,
    /// Normal sans-serif font (Helvetica)
    Normal,
    /// Monospace code font (Cascadia)
    Code,
}

impl FontFamily {
    /// Numeric identifier written to the output file
    pub fn code(&self) -> u8 {
        match self {
            FontFamily::HandDrawn => 1,
            FontFamily::Normal => 2,
            FontFamily::Code => 3,
        }
    }

    /// Average glyph advance as a fraction of the font size.
    ///
    /// These are deliberately generous; the host application re-measures
    /// text when a file is opened.
    pub fn char_width_ratio(&self) -> f64 {
        match self {
            FontFamily::HandDrawn => 0.65,
            FontFamily::Normal => 0.6,
            FontFamily::Code => 0.62,
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFamily::HandDrawn => write!(f, "hand-drawn"),
            FontFamily::Normal => write!(f, "normal"),
            FontFamily::Code => write!(f, "code"),
        }
    }
}

/// Fill pattern for closed shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
}

impl fmt::Display for FillStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillStyle::Hachure => write!(f, "hachure"),
            FillStyle::CrossHatch => write!(f, "cross-hatch"),
            FillStyle::Solid => write!(f, "solid"),
        }
    }
}

/// Stroke pattern for outlines and lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl fmt::Display for StrokeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrokeStyle::Solid => write!(f, "solid"),
            StrokeStyle::Dashed => write!(f, "dashed"),
            StrokeStyle::Dotted => write!(f, "dotted"),
        }
    }
}

/// Arrowhead drawn at either end of a linear element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Arrowhead {
    #[default]
    Arrow,
    Bar,
    Dot,
    Triangle,
}

impl fmt::Display for Arrowhead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arrowhead::Arrow => write!(f, "arrow"),
            Arrowhead::Bar => write!(f, "bar"),
            Arrowhead::Dot => write!(f, "dot"),
            Arrowhead::Triangle => write!(f, "triangle"),
        }
    }
}

/// Visual attributes shared by every element
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: FillStyle,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    /// 0 = architect, 1 = artist, 2 = cartoonist
    pub roughness: u8,
    /// 0..=100
    pub opacity: u8,
    /// Corner rounding type, `None` for sharp corners
    pub roundness: Option<u8>,
}

impl Default for Style {
    fn default() -> Self {
        Self::outline()
    }
}

impl Style {
    /// Black outline over a white hachure fill with rounded corners
    pub fn outline() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            fill_style: FillStyle::Hachure,
            stroke_width: 1.0,
            stroke_style: StrokeStyle::Solid,
            roughness: 1,
            opacity: 100,
            roundness: Some(3),
        }
    }

    /// Solid fill with the given background colour and sharp corners
    pub fn solid(background_color: impl Into<String>) -> Self {
        Self {
            background_color: background_color.into(),
            fill_style: FillStyle::Solid,
            roundness: None,
            ..Self::outline()
        }
    }

    /// Style used for text elements
    pub fn text() -> Self {
        Self {
            background_color: "transparent".to_string(),
            roundness: None,
            ..Self::outline()
        }
    }

    /// Style used for lines and arrows
    pub fn linear() -> Self {
        Self {
            background_color: "transparent".to_string(),
            roundness: Some(2),
            ..Self::outline()
        }
    }

    pub fn with_stroke_color(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = color.into();
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_stroke_style(mut self, stroke_style: StrokeStyle) -> Self {
        self.stroke_style = stroke_style;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }
}

/// Node shapes available for graph and tree nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rectangle,
    Ellipse,
    Diamond,
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeShape::Rectangle => write!(f, "rectangle"),
            NodeShape::Ellipse => write!(f, "ellipse"),
            NodeShape::Diamond => write!(f, "diamond"),
        }
    }
}

/// How an edge between two nodes is drawn.
///
/// Deserialized from snake case names such as `"dotted_arrow"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    #[default]
    Arrow,
    Line,
    DottedArrow,
    DottedLine,
    ThickArrow,
    ThickLine,
}

impl EdgeType {
    /// Returns true if this edge type has an arrowhead
    pub fn has_arrow(&self) -> bool {
        matches!(
            self,
            EdgeType::Arrow | EdgeType::DottedArrow | EdgeType::ThickArrow
        )
    }

    pub fn is_dotted(&self) -> bool {
        matches!(self, EdgeType::DottedArrow | EdgeType::DottedLine)
    }

    pub fn is_thick(&self) -> bool {
        matches!(self, EdgeType::ThickArrow | EdgeType::ThickLine)
    }

    /// `style` with this edge's stroke: dashed when dotted, double width when thick
    pub fn apply(&self, style: Style) -> Style {
        let style = if self.is_dotted() {
            style.with_stroke_style(StrokeStyle::Dashed)
        } else {
            style
        };
        if self.is_thick() {
            let width = style.stroke_width * 2.0;
            style.with_stroke_width(width)
        } else {
            style
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeType::Arrow => write!(f, "arrow"),
            EdgeType::Line => write!(f, "line"),
            EdgeType::DottedArrow => write!(f, "dotted_arrow"),
            EdgeType::DottedLine => write!(f, "dotted_line"),
            EdgeType::ThickArrow => write!(f, "thick_arrow"),
            EdgeType::ThickLine => write!(f, "thick_line"),
        }
    }
}

/// Direction in which sibling boxes are placed next to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Stacking {
    /// Siblings left to right
    #[default]
    Horizontal,
    /// Siblings top to bottom
    Vertical,
}

impl FromStr for Stacking {
    type Err = String;

    /// Parse a stacking direction ("horizontal"/"h", "vertical"/"v")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "horizontal" | "h" => Ok(Stacking::Horizontal),
            "vertical" | "v" => Ok(Stacking::Vertical),
            _ => Err(format!("Unknown stacking direction: {}", s)),
        }
    }
}

impl fmt::Display for Stacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stacking::Horizontal => write!(f, "horizontal"),
            Stacking::Vertical => write!(f, "vertical"),
        }
    }
}

/// A graph node with its display metadata
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Unique identifier for the node
    pub id: String,
    /// Display label, may span several lines
    pub label: String,
    /// Shape drawn around the label
    pub shape: NodeShape,
    /// Precomputed layout coordinate, if the caller already has one
    pub position: Option<Point>,
}

impl NodeData {
    /// Create a new node with the default ellipse shape
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape: NodeShape::Ellipse,
            position: None,
        }
    }

    /// Create a new node with a specific shape
    pub fn with_shape(id: impl Into<String>, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            shape,
            ..Self::new(id, label)
        }
    }

    /// Attach a precomputed coordinate to the node
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeData {
    /// Source node ID
    pub from: String,
    /// Target node ID
    pub to: String,
    /// Visual type of the edge
    pub edge_type: EdgeType,
}

impl EdgeData {
    /// Create a new edge with default arrow type
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            edge_type: EdgeType::Arrow,
        }
    }

    /// Create a new edge with a specific type
    pub fn with_type(from: impl Into<String>, to: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            edge_type,
        }
    }
}
