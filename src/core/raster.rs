use std::path::Path;

use image::{DynamicImage, ImageError, ImageReader, RgbImage};

use crate::core::error::{CollageError, Result};

/// Decodes a raster, trusting its content over its file extension so that
/// staged uploads without a suffix still open.
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    let decode_error = |source: ImageError| CollageError::InputDecode {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| decode_error(ImageError::IoError(err)))?
        .decode()
        .map_err(decode_error)
}

pub fn decode_rgb(path: &Path) -> Result<RgbImage> {
    decode_image(path).map(|image| image.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn decodes_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("upload.png");
        RgbImage::from_pixel(3, 2, Rgb([10, 20, 30])).save(&png).unwrap();
        let bare = dir.path().join("upload");
        std::fs::rename(&png, &bare).unwrap();

        let image = decode_rgb(&bare).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = decode_image(Path::new("/missing/file.png")).unwrap_err();
        assert!(matches!(err, CollageError::InputDecode { .. }));
    }

    #[test]
    fn garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(
            decode_image(&path).unwrap_err(),
            CollageError::InputDecode { .. }
        ));
    }
}
