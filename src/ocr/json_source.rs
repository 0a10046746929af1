use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::error::{CollageError, Result};
use crate::core::model::RawOcrResult;
use crate::ocr::OcrEngine;

const DEFAULT_SIDECAR_SUFFIX: &str = ".ocr.json";

#[derive(Debug, Clone)]
enum Location {
    Sidecar(String),
    Fixed(PathBuf),
}

/// Replays OCR output recorded as a pytesseract-style JSON dictionary.
///
/// By default the data for `page.png` is read from `page.png.ocr.json`.
#[derive(Debug, Clone)]
pub struct JsonOcrSource {
    location: Location,
}

impl Default for JsonOcrSource {
    fn default() -> Self {
        Self::sidecar()
    }
}

impl JsonOcrSource {
    pub fn sidecar() -> Self {
        Self {
            location: Location::Sidecar(DEFAULT_SIDECAR_SUFFIX.to_string()),
        }
    }

    /// Always reads `path`, whatever image is passed in.
    pub fn from_file(path: PathBuf) -> Self {
        Self {
            location: Location::Fixed(path),
        }
    }

    pub fn data_path(&self, image_path: &Path) -> PathBuf {
        match &self.location {
            Location::Sidecar(suffix) => {
                let mut name = image_path.as_os_str().to_os_string();
                name.push(suffix);
                PathBuf::from(name)
            }
            Location::Fixed(path) => path.clone(),
        }
    }
}

impl OcrEngine for JsonOcrSource {
    fn name(&self) -> &str {
        "json"
    }

    fn extract_text_and_boxes(&self, image_path: &Path) -> Result<RawOcrResult> {
        let data_path = self.data_path(image_path);
        let contents = fs::read_to_string(&data_path).map_err(|err| {
            CollageError::ocr_with_source(
                format!("cannot read recorded OCR data {}", data_path.display()),
                err,
            )
        })?;
        let raw: RawOcrResult = serde_json::from_str(&contents)?;
        raw.validate()?;
        info!(data = %data_path.display(), entries = raw.len(), "loaded recorded OCR result");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sidecar_path_appends_suffix() {
        let source = JsonOcrSource::sidecar();
        assert_eq!(
            source.data_path(Path::new("scans/page.png")),
            PathBuf::from("scans/page.png.ocr.json")
        );
    }

    #[test]
    fn reads_and_validates_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("a.png");
        fs::write(
            dir.path().join("a.png.ocr.json"),
            r#"{"text":["cat"],"left":[0],"top":[0],"width":[30],"height":[10],"conf":[90]}"#,
        )
        .unwrap();

        let raw = JsonOcrSource::sidecar()
            .extract_text_and_boxes(&image_path)
            .unwrap();
        assert_eq!(raw.text, vec!["cat"]);
        assert_eq!(raw.conf, vec![90.0]);
    }

    #[test]
    fn misaligned_recording_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.json");
        fs::write(
            &data,
            r#"{"text":["a","b"],"left":[0],"top":[0,0],"width":[1,1],"height":[1,1],"conf":[1,1]}"#,
        )
        .unwrap();

        let err = JsonOcrSource::from_file(data)
            .extract_text_and_boxes(Path::new("ignored.png"))
            .unwrap_err();
        assert!(matches!(err, CollageError::Precondition(_)));
    }

    #[test]
    fn missing_recording_is_an_ocr_error() {
        let err = JsonOcrSource::sidecar()
            .extract_text_and_boxes(Path::new("/nope/x.png"))
            .unwrap_err();
        assert!(matches!(err, CollageError::Ocr { .. }));
    }
}
