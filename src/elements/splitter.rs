use tracing::debug;

use crate::core::error::Result;
use crate::core::model::{Granularity, RawOcrResult, TextElement};

/// Turns an index-aligned OCR result into element records.
///
/// Whitespace-only entries are skipped. In character mode each run is split
/// into evenly sized boxes of `width / len` pixels (floor), so the split
/// boxes may fall short of the run's right edge by up to `len - 1` pixels.
pub fn split(raw: &RawOcrResult, granularity: Granularity) -> Result<Vec<TextElement>> {
    raw.validate()?;

    let mut elements = Vec::with_capacity(raw.len());
    for (idx, text) in raw.text.iter().enumerate() {
        if text.trim().is_empty() {
            continue;
        }
        let (x, y) = (raw.left[idx], raw.top[idx]);
        let (width, height) = (raw.width[idx], raw.height[idx]);
        let confidence = raw.conf[idx];

        match granularity {
            Granularity::Character => {
                let count = text.chars().count();
                let char_width = width / count.max(1) as i32;
                for (offset, ch) in text.chars().enumerate() {
                    elements.push(TextElement {
                        content: ch.to_string(),
                        x: x + offset as i32 * char_width,
                        y,
                        width: char_width,
                        height,
                        confidence,
                    });
                }
            }
            Granularity::Word => elements.push(TextElement {
                content: text.clone(),
                x,
                y,
                width,
                height,
                confidence,
            }),
        }
    }

    debug!(
        entries = raw.len(),
        elements = elements.len(),
        mode = granularity.label(),
        "split OCR result"
    );
    Ok(elements)
}
