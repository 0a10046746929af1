use serde::{Deserialize, Serialize};

use crate::core::geometry::CanvasSpec;

/// Fixed dimensions of a juxtaposed collage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CollageLayout {
    pub canvas: CanvasSpec,
    /// Height every crop is scaled to.
    pub row_height: u32,
    /// Gap between crops and between rows.
    pub padding: u32,
    /// Extra pixels cropped to the right and below each element box.
    pub crop_margin: u32,
    pub label_size: f32,
    pub placeholder_width: u32,
}

impl Default for CollageLayout {
    fn default() -> Self {
        Self {
            canvas: CanvasSpec::default(),
            row_height: 300,
            padding: 30,
            crop_margin: 10,
            label_size: 24.0 * 8.0,
            placeholder_width: 10,
        }
    }
}

impl CollageLayout {
    pub fn row_pitch(&self) -> i64 {
        i64::from(self.row_height) + i64::from(self.padding)
    }

    pub fn row_offset(&self, row: usize) -> i64 {
        row as i64 * self.row_pitch()
    }
}

/// X offsets for a left-justified row starting at `margin`, one per width,
/// in bucket order.
pub fn left_placements(widths: &[u32], margin: u32, padding: u32) -> Vec<i64> {
    let mut x = i64::from(margin);
    widths
        .iter()
        .map(|&width| {
            let at = x;
            x += i64::from(width) + i64::from(padding);
            at
        })
        .collect()
}

/// X offsets for a right-justified row ending at `canvas_width - margin`.
///
/// The last item of the bucket sits flush against the right edge and
/// earlier items extend leftwards, separated by `padding`. Offsets are
/// returned in bucket order.
pub fn right_placements(widths: &[u32], canvas_width: u32, margin: u32, padding: u32) -> Vec<i64> {
    let mut placements = vec![0; widths.len()];
    let mut right_edge = i64::from(canvas_width) - i64::from(margin);
    for (idx, &width) in widths.iter().enumerate().rev() {
        let x = right_edge - i64::from(width);
        placements[idx] = x;
        right_edge = x - i64::from(padding);
    }
    placements
}
