//! Core building blocks shared by every layout
//!
//! Elements and their geometry, the canvas arena, arrow binding, export,
//! and the capability traits layouts are written against.

mod binder;
mod canvas;
pub mod color;
mod database;
mod element;
mod error;
pub mod export;
mod geometry;
mod ids;
pub mod logging;
mod structure;
mod text;
mod types;

pub use binder::*;
pub use canvas::*;
pub use database::*;
pub use element::*;
pub use error::*;
pub use geometry::*;
pub use ids::*;
pub use logging::*;
pub use structure::*;
pub use text::*;
pub use types::*;
