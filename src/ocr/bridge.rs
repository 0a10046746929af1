use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::ImageFormat;
use tracing::{debug, info};

use crate::core::error::{CollageError, Result};
use crate::core::model::RawOcrResult;
use crate::core::raster::decode_image;
use crate::ocr::tsv::parse_tsv;
use crate::ocr::OcrEngine;

/// Runs the `tesseract` command line tool on a grayscale copy of the input.
#[derive(Debug, Clone)]
pub struct TesseractBridge {
    command: PathBuf,
    work_dir: PathBuf,
    lang: String,
    psm: Option<u8>,
}

impl Default for TesseractBridge {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl TesseractBridge {
    pub fn new(work_dir: PathBuf) -> Self {
        Self {
            command: PathBuf::from("tesseract"),
            work_dir,
            lang: "eng".to_string(),
            psm: None,
        }
    }

    pub fn with_command(mut self, command: PathBuf) -> Self {
        self.command = command;
        self
    }

    pub fn with_lang(mut self, lang: String) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = Some(psm);
        self
    }

    fn arguments(&self, staged: &Path) -> Vec<String> {
        let mut args = vec![
            staged.to_string_lossy().into_owned(),
            "stdout".to_string(),
            "-l".to_string(),
            self.lang.clone(),
        ];
        if let Some(psm) = self.psm {
            args.push("--psm".to_string());
            args.push(psm.to_string());
        }
        args.push("tsv".to_string());
        args
    }
}

impl OcrEngine for TesseractBridge {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn extract_text_and_boxes(&self, image_path: &Path) -> Result<RawOcrResult> {
        let gray = decode_image(image_path)?.to_luma8();

        fs::create_dir_all(&self.work_dir)?;
        // Removed when dropped, on success and on every error path below.
        let staged = tempfile::Builder::new()
            .prefix("glyphcollage-ocr-")
            .suffix(".png")
            .tempfile_in(&self.work_dir)?;
        let mut file = staged.as_file();
        gray.write_to(&mut file, ImageFormat::Png)
            .map_err(|source| CollageError::Encode {
                path: staged.path().to_path_buf(),
                source,
            })?;

        let args = self.arguments(staged.path());
        debug!(command = %self.command.display(), ?args, "invoking tesseract");
        let output = Command::new(&self.command)
            .args(&args)
            .output()
            .map_err(|err| {
                CollageError::ocr_with_source(
                    format!(
                        "failed to invoke {}; is tesseract installed?",
                        self.command.display()
                    ),
                    err,
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollageError::ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let raw = parse_tsv(&stdout)?;
        info!(image = %image_path.display(), entries = raw.len(), "tesseract finished");
        Ok(raw)
    }
}
