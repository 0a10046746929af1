//! Error types for the extraction and composition pipeline.
//!
//! Decode, precondition and geometry failures are fatal: they abort the
//! whole composition before any output file is written. An empty bucket is
//! never an error; the composer renders a placeholder block instead.
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`CollageError`].
pub type Result<T> = std::result::Result<T, CollageError>;

#[derive(Debug, Error)]
pub enum CollageError {
    #[error("failed to decode image {}: {source}", path.display())]
    InputDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed OCR result: {0}")]
    Precondition(String),

    #[error("degenerate collage geometry: {0}")]
    Geometry(String),

    #[error("OCR engine failed: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("failed to encode image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("font error: {0}")]
    Font(String),

    #[error("composition cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CollageError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry(message.into())
    }

    pub fn ocr(message: impl Into<String>) -> Self {
        Self::Ocr {
            message: message.into(),
            source: None,
        }
    }

    pub fn ocr_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Ocr {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
