use serde::{Deserialize, Serialize};

use crate::core::error::{CollageError, Result};
use crate::core::model::TextElement;

/// Number of rows in a collage, one per bucket letter.
pub const ALPHABET_ROWS: i64 = 26;

/// Default upper bound on canvas area, about 3 GiB of RGB pixels.
pub const DEFAULT_MAX_CANVAS_PIXELS: u64 = 1 << 30;

fn default_max_canvas_pixels() -> u64 {
    DEFAULT_MAX_CANVAS_PIXELS
}

/// Rectangle in source-image pixels, `x1`/`y1` exclusive. May extend past
/// the image on any side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl CropRect {
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box of `element` grown by `margin` pixels on the right and bottom.
    pub fn around(element: &TextElement, margin: u32) -> Self {
        let x = i64::from(element.x);
        let y = i64::from(element.y);
        Self {
            x0: x,
            y0: y,
            x1: x + i64::from(element.width) + i64::from(margin),
            y1: y + i64::from(element.height) + i64::from(margin),
        }
    }

    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }

    /// Part of the rectangle that lies inside a `width` x `height` image.
    pub fn clip(&self, width: u32, height: u32) -> Option<CropRect> {
        let clipped = CropRect {
            x0: self.x0.max(0),
            y0: self.y0.max(0),
            x1: self.x1.min(i64::from(width)),
            y1: self.y1.min(i64::from(height)),
        };
        if clipped.x0 >= clipped.x1 || clipped.y0 >= clipped.y1 {
            None
        } else {
            Some(clipped)
        }
    }
}

/// Heuristic sizing constants of the juxtaposed canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanvasSpec {
    pub middle_column_width: u32,
    pub margin: u32,
    pub slack_width: u32,
    pub height_trim: i64,
    /// Canvases with more pixels than this are rejected before allocation.
    #[serde(default = "default_max_canvas_pixels")]
    pub max_canvas_pixels: u64,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            middle_column_width: 100,
            margin: 50,
            slack_width: 4000,
            height_trim: 1800,
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    pub width: u32,
    pub height: u32,
    /// Tallest element height times the row count, before trimming.
    pub max_element_height: i64,
}

/// Canvas size for a juxtaposed collage.
///
/// The formulas are tuned for one corpus scale: small inputs produce a
/// non-positive height, which is reported as [`CollageError::Geometry`].
pub fn compute_canvas_geometry(
    image_a_width: u32,
    tallest_element: i32,
    spec: &CanvasSpec,
) -> Result<CanvasGeometry> {
    let max_element_height = i64::from(tallest_element) * ALPHABET_ROWS;
    let width = u64::from(image_a_width)
        + u64::from(spec.middle_column_width)
        + 2 * u64::from(spec.margin)
        + u64::from(spec.slack_width);
    let height = max_element_height - spec.height_trim;

    if height <= 0 {
        return Err(CollageError::geometry(format!(
            "canvas height {height} (tallest element {tallest_element}px x {ALPHABET_ROWS} - {})",
            spec.height_trim
        )));
    }
    let area = width.saturating_mul(height as u64);
    if width > u64::from(u32::MAX)
        || height > i64::from(u32::MAX)
        || area > spec.max_canvas_pixels
    {
        return Err(CollageError::geometry(format!(
            "canvas {width}x{height} exceeds {} pixels",
            spec.max_canvas_pixels
        )));
    }

    Ok(CanvasGeometry {
        width: width as u32,
        height: height as u32,
        max_element_height,
    })
}

/// Width that keeps the aspect ratio of a `width` x `height` image scaled to
/// `target_height`, rounded to the nearest pixel and never below 1.
pub fn scaled_width(width: u32, height: u32, target_height: u32) -> u32 {
    if height == 0 {
        return width.max(1);
    }
    let scaled = f64::from(target_height) * f64::from(width) / f64::from(height);
    (scaled.round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canvas_matches_heuristic_formula() {
        let geometry = compute_canvas_geometry(800, 120, &CanvasSpec::default()).unwrap();
        assert_eq!(geometry.width, 800 + 100 + 100 + 4000);
        assert_eq!(geometry.max_element_height, 3120);
        assert_eq!(geometry.height, 3120 - 1800);
    }

    #[test]
    fn small_elements_yield_geometry_error() {
        // 69 * 26 = 1794 < 1800
        let err = compute_canvas_geometry(800, 69, &CanvasSpec::default()).unwrap_err();
        assert!(matches!(err, CollageError::Geometry(_)));
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let err = compute_canvas_geometry(800, 1_000_000, &CanvasSpec::default()).unwrap_err();
        assert!(matches!(err, CollageError::Geometry(_)));
    }

    #[test]
    fn large_page_fits_default_cap() {
        let geometry = compute_canvas_geometry(20_000, 500, &CanvasSpec::default()).unwrap();
        assert_eq!((geometry.width, geometry.height), (24_200, 11_200));
    }

    #[test]
    fn pixel_cap_is_configurable() {
        let spec = CanvasSpec {
            max_canvas_pixels: 1 << 20,
            ..CanvasSpec::default()
        };
        let err = compute_canvas_geometry(800, 120, &spec).unwrap_err();
        assert!(err.to_string().contains("exceeds 1048576 pixels"));

        let roomy = CanvasSpec {
            max_canvas_pixels: u64::MAX,
            ..CanvasSpec::default()
        };
        assert!(compute_canvas_geometry(800, 120, &roomy).is_ok());
    }

    #[test]
    fn crop_rect_adds_margin_right_and_bottom() {
        let element = TextElement {
            content: "a".to_string(),
            x: 5,
            y: 7,
            width: 20,
            height: 30,
            confidence: 90.0,
        };
        let rect = CropRect::around(&element, 10);
        assert_eq!(rect, CropRect::new(5, 7, 35, 47));
        assert_eq!((rect.width(), rect.height()), (30, 40));
    }

    #[test]
    fn clip_handles_out_of_range() {
        let rect = CropRect::new(90, -5, 120, 20);
        assert_eq!(rect.clip(100, 100), Some(CropRect::new(90, 0, 100, 20)));
        assert_eq!(CropRect::new(150, 0, 160, 10).clip(100, 100), None);
    }

    #[test]
    fn scaled_width_preserves_aspect() {
        assert_eq!(scaled_width(40, 20, 300), 600);
        assert_eq!(scaled_width(10, 300, 300), 10);
        // 300 * 7 / 9 = 233.33
        assert_eq!(scaled_width(7, 9, 300), 233);
        assert_eq!(scaled_width(1, 1000, 300), 1);
    }
}
