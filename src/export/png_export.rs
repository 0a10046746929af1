use std::path::PathBuf;

use image::{ImageFormat, RgbImage};

use crate::core::error::{CollageError, Result};
use crate::export::{write_atomic, Exporter};

/// Encodes a canvas as PNG under a fixed file name, replacing any earlier
/// file of that name.
#[derive(Debug, Clone)]
pub struct PngExporter {
    out_dir: PathBuf,
    file_name: String,
}

impl PngExporter {
    pub fn new(out_dir: PathBuf, file_name: impl Into<String>) -> Self {
        Self {
            out_dir,
            file_name: file_name.into(),
        }
    }
}

impl Exporter<RgbImage> for PngExporter {
    fn export(&self, canvas: &RgbImage) -> Result<PathBuf> {
        write_atomic(&self.out_dir, &self.file_name, |file, target| {
            canvas
                .write_to(file, ImageFormat::Png)
                .map_err(|source| CollageError::Encode {
                    path: target.to_path_buf(),
                    source,
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PngExporter::new(dir.path().to_path_buf(), "out.png");

        exporter
            .export(&RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])))
            .unwrap();
        let path = exporter
            .export(&RgbImage::from_pixel(6, 2, Rgb([9, 9, 9])))
            .unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (6, 2));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([9, 9, 9]));

        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }
}
