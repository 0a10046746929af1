pub mod bridge;
pub mod json_source;
pub mod tsv;

use std::path::Path;

use crate::core::error::Result;
use crate::core::model::RawOcrResult;

pub use bridge::TesseractBridge;
pub use json_source::JsonOcrSource;
pub use tsv::parse_tsv;

/// A source of per-element text boxes for a raster image.
///
/// Implementations are interchangeable; the rest of the pipeline only sees
/// the index-aligned [`RawOcrResult`].
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    fn extract_text_and_boxes(&self, image_path: &Path) -> Result<RawOcrResult>;
}
