use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, info};

use crate::core::error::{CollageError, Result};

const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font used for the printed labels in the middle column.
pub struct LabelFont {
    font: FontVec,
    source: PathBuf,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("source", &self.source)
            .finish()
    }
}

impl LabelFont {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .map_err(|err| CollageError::Font(format!("cannot read {}: {err}", path.display())))?;
        let font = FontVec::try_from_vec(data)
            .map_err(|_| CollageError::Font(format!("cannot parse {}", path.display())))?;
        Ok(Self {
            font,
            source: path.to_path_buf(),
        })
    }

    /// First loadable font from the usual system locations.
    pub fn system() -> Option<Self> {
        for path in SYSTEM_FONT_PATHS {
            match Self::from_path(Path::new(path)) {
                Ok(font) => {
                    info!("loaded system font: {path}");
                    return Some(font);
                }
                Err(err) => debug!("{err}"),
            }
        }
        None
    }

    /// An explicitly requested font must load; otherwise fall back to a
    /// system font, or none at all.
    pub fn resolve(explicit: Option<&Path>) -> Result<Option<Self>> {
        match explicit {
            Some(path) => Self::from_path(path).map(Some),
            None => Ok(Self::system()),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let scaled = self.font.as_scaled(size);
        text.chars()
            .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
            .sum()
    }

    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, size: f32, text: &str, color: Rgb<u8>) {
        draw_text_mut(canvas, color, x, y, size, &self.font, text);
    }

    /// Draws `text` horizontally centred on `center_x`.
    pub fn draw_centered(
        &self,
        canvas: &mut RgbImage,
        center_x: i32,
        y: i32,
        size: f32,
        text: &str,
        color: Rgb<u8>,
    ) {
        let half = (self.text_width(text, size) / 2.0).round() as i32;
        self.draw(canvas, center_x - half, y, size, text, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_font_is_an_error() {
        let err = LabelFont::resolve(Some(Path::new("/no/such/font.ttf"))).unwrap_err();
        assert!(matches!(err, CollageError::Font(_)));
    }

    #[test]
    fn garbage_font_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        fs::write(&path, b"not a font").unwrap();
        assert!(LabelFont::from_path(&path).is_err());
    }

    #[test]
    fn system_font_measures_text_when_available() {
        let Some(font) = LabelFont::system() else {
            return;
        };
        let narrow = font.text_width("I", 192.0);
        let wide = font.text_width("WW", 192.0);
        assert!(narrow > 0.0);
        assert!(wide > narrow);
    }
}
