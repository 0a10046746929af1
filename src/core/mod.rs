pub mod cancel;
pub mod error;
pub mod geometry;
pub mod model;
pub mod raster;

pub use cancel::CancellationToken;
pub use error::{CollageError, Result};
pub use geometry::{compute_canvas_geometry, scaled_width, CanvasGeometry, CanvasSpec, CropRect};
pub use model::{Granularity, RawOcrResult, TextElement};
pub use raster::{decode_image, decode_rgb};
