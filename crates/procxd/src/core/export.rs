//! Serialization of a canvas into the host application's JSON document
//!
//! The document layout is fixed: a `type`/`version`/`source` header, the
//! element list in rendering order, a minimal `appState` and an empty `files`
//! map. Nothing time-dependent is written, so exporting the same canvas twice
//! produces identical bytes.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, span, Level};

use super::canvas::Canvas;
use super::element::{Binding, BoundElement, Element, ElementKind};
use super::error::{Result, SketchError};

/// File extension appended to export paths that lack it
pub const FILE_EXTENSION: &str = "excalidraw";

/// Top-level exported document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: u32,
    pub source: &'static str,
    pub elements: Vec<ExportedElement>,
    pub app_state: AppState,
    pub files: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub view_background_color: String,
    pub grid_size: Option<u32>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view_background_color: "#ffffff".to_string(),
            grid_size: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Roundness {
    #[serde(rename = "type")]
    pub kind: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedBinding {
    pub element_id: String,
    pub focus: f64,
    pub gap: f64,
}

impl From<&Binding> for ExportedBinding {
    fn from(binding: &Binding) -> Self {
        Self {
            element_id: binding.element_id.to_string(),
            focus: binding.focus,
            gap: binding.gap,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportedBoundElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&BoundElement> for ExportedBoundElement {
    fn from(bound: &BoundElement) -> Self {
        Self {
            id: bound.id.to_string(),
            kind: bound.kind.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFields {
    pub text: String,
    pub original_text: String,
    pub font_size: f64,
    pub font_family: u8,
    pub text_align: String,
    pub vertical_align: String,
    pub baseline: f64,
    pub container_id: Option<String>,
    pub line_height: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearFields {
    pub points: Vec<[f64; 2]>,
    pub last_committed_point: Option<[f64; 2]>,
    pub start_binding: Option<ExportedBinding>,
    pub end_binding: Option<ExportedBinding>,
    pub start_arrowhead: Option<String>,
    pub end_arrowhead: Option<String>,
}

/// One element as written to the file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: String,
    pub stroke_width: f64,
    pub stroke_style: String,
    pub roughness: u8,
    pub opacity: u8,
    pub group_ids: Vec<String>,
    pub frame_id: Option<String>,
    pub roundness: Option<Roundness>,
    pub seed: u32,
    pub version: u32,
    pub version_nonce: u32,
    pub is_deleted: bool,
    pub bound_elements: Vec<ExportedBoundElement>,
    pub updated: u64,
    pub link: Option<String>,
    pub locked: bool,
    #[serde(flatten)]
    pub text: Option<TextFields>,
    #[serde(flatten)]
    pub linear: Option<LinearFields>,
}

impl From<&Element> for ExportedElement {
    fn from(element: &Element) -> Self {
        let text = element.text_data().map(|data| TextFields {
            text: data.text.clone(),
            original_text: data.text.clone(),
            font_size: data.font_size,
            font_family: data.font_family.code(),
            text_align: data.text_align.to_string(),
            vertical_align: data.vertical_align.to_string(),
            baseline: element.baseline(),
            container_id: data.container_id.as_ref().map(ToString::to_string),
            line_height: super::text::LINE_HEIGHT,
        });
        let linear = match &element.kind {
            ElementKind::Line(data) | ElementKind::Arrow(data) => Some(LinearFields {
                points: data.points.iter().map(|p| [p.x, p.y]).collect(),
                last_committed_point: None,
                start_binding: data.start_binding.as_ref().map(ExportedBinding::from),
                end_binding: data.end_binding.as_ref().map(ExportedBinding::from),
                start_arrowhead: data.start_arrowhead.map(|a| a.to_string()),
                end_arrowhead: data.end_arrowhead.map(|a| a.to_string()),
            }),
            _ => None,
        };
        let style = &element.style;

        Self {
            id: element.id.to_string(),
            kind: element.type_name(),
            x: element.x,
            y: element.y,
            width: element.width,
            height: element.height,
            angle: element.angle,
            stroke_color: style.stroke_color.clone(),
            background_color: style.background_color.clone(),
            fill_style: style.fill_style.to_string(),
            stroke_width: style.stroke_width,
            stroke_style: style.stroke_style.to_string(),
            roughness: style.roughness,
            opacity: style.opacity,
            group_ids: element.group_ids.iter().map(ToString::to_string).collect(),
            frame_id: None,
            roundness: style.roundness.map(|kind| Roundness { kind }),
            seed: element.seed,
            version: 1,
            version_nonce: element.seed,
            is_deleted: false,
            bound_elements: element
                .bound_elements
                .iter()
                .map(ExportedBoundElement::from)
                .collect(),
            updated: 1,
            link: None,
            locked: false,
            text,
            linear,
        }
    }
}

/// Validate the canvas and convert it into a document
pub fn to_document(canvas: &Canvas) -> Result<Document> {
    canvas.validate()?;
    Ok(Document {
        kind: "excalidraw",
        version: 2,
        source: "procxd",
        elements: canvas.elements().iter().map(ExportedElement::from).collect(),
        app_state: AppState::default(),
        files: serde_json::Map::new(),
    })
}

/// Pretty-printed JSON for the canvas
pub fn to_json_string(canvas: &Canvas) -> Result<String> {
    let document = to_document(canvas)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Path actually written for a requested export path
pub fn export_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == FILE_EXTENSION) {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(FILE_EXTENSION);
    PathBuf::from(name)
}

/// Write the canvas to `path`, returning the path written.
///
/// Nothing is written when validation fails.
pub fn write_to_file(canvas: &Canvas, path: impl AsRef<Path>) -> Result<PathBuf> {
    let target = export_path(path.as_ref());
    let export_span = span!(Level::INFO, "export", path = %target.display());
    let _enter = export_span.enter();

    let json = to_json_string(canvas)?;
    debug!(element_count = canvas.len(), bytes = json.len(), "Serialized canvas");
    fs::write(&target, json).map_err(|e| SketchError::io(&target, e))?;

    info!("Export completed");
    Ok(target)
}
