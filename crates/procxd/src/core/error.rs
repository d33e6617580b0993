//! Core error types for sketch construction and export
//!
//! Every failure is surfaced to the caller immediately; nothing in the
//! library retries or partially applies an operation.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, SketchError>;

/// Core error types for building and exporting sketches
#[derive(Error, Debug)]
pub enum SketchError {
    #[error("Invalid reference: element {element_id} refers to missing element {missing_id}")]
    InvalidReference {
        element_id: String,
        missing_id: String,
    },

    #[error("Duplicate element: id {id} is already on the canvas")]
    DuplicateElement { id: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl SketchError {
    /// Create a new invalid-reference error
    pub fn invalid_reference(element_id: impl Into<String>, missing_id: impl Into<String>) -> Self {
        Self::InvalidReference {
            element_id: element_id.into(),
            missing_id: missing_id.into(),
        }
    }

    /// Create a new duplicate-element error
    pub fn duplicate_element(id: impl Into<String>) -> Self {
        Self::DuplicateElement { id: id.into() }
    }

    /// Create a new IO error for `path`
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a new malformed-input error
    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}
