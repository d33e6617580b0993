//! Sketch construction
//!
//! [`SketchBuilder`] is the composition root: it creates elements, owns the
//! canvas they are added to, and exports it.

mod arrange;
mod builder;

pub use arrange::*;
pub use builder::*;

use crate::core::FontFamily;

/// How fill colours are picked for generated boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorTechnique {
    /// Random readable colours, children sampled away from the parent's hue
    #[default]
    Sampled,
    /// Colours drawn from a fixed palette, never repeating the parent's
    Palette,
}

/// Builder configuration
#[derive(Debug, Clone)]
pub struct SketchConfig {
    /// Space between content and the box drawn around it
    pub padding: f64,
    pub font_size: f64,
    /// Use the monospace font for generated text blocks
    pub code_font_for_blocks: bool,
    /// Seed for ids, element seeds and colours; `None` draws one from the OS
    pub seed: Option<u64>,
    pub color_technique: ColorTechnique,
    /// Canvas units per graph-space unit
    pub graph_scale: f64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            font_size: 20.0,
            code_font_for_blocks: true,
            seed: None,
            color_technique: ColorTechnique::Sampled,
            graph_scale: 500.0,
        }
    }
}

impl SketchConfig {
    /// Same configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn block_font(&self) -> FontFamily {
        if self.code_font_for_blocks {
            FontFamily::Code
        } else {
            FontFamily::HandDrawn
        }
    }
}
