//! Layout algorithms and the renderers built on them
//!
//! Layouts compute positions; renderers turn positions into elements and add
//! them to a [`SketchBuilder`](crate::sketch::SketchBuilder).

mod compare;
mod config;
mod graph;
mod nested;
mod strategies;
mod tree;

pub use compare::*;
pub use config::*;
pub use graph::*;
pub use nested::*;
pub use strategies::*;
pub use tree::*;
