use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;

use tempfile::NamedTempFile;
use tracing::info;

use crate::collage::{self, CollageComposer, CollageLayout, ElementTile, LabelFont};
use crate::core::cancel::CancellationToken;
use crate::core::error::Result;
use crate::core::model::{Granularity, TextElement};
use crate::elements::{self, BucketMap};
use crate::export::{Exporter, PngExporter};
use crate::ocr::OcrEngine;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub granularity: Granularity,
    pub output_dir: PathBuf,
    pub layout: CollageLayout,
    pub font_path: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn new(granularity: Granularity, output_dir: PathBuf) -> Self {
        Self {
            granularity,
            output_dir,
            layout: CollageLayout::default(),
            font_path: None,
        }
    }

    pub fn with_layout(mut self, layout: CollageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_font(mut self, font_path: PathBuf) -> Self {
        self.font_path = Some(font_path);
        self
    }

    fn label_font(&self) -> Result<Option<LabelFont>> {
        LabelFont::resolve(self.font_path.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonOutput {
    pub collage: PathBuf,
    pub elements_a: usize,
    pub elements_b: usize,
    /// Font the middle-column labels were drawn with; `None` when no font
    /// was found and the labels were left out.
    pub label_font: Option<PathBuf>,
}

/// Runs OCR on one image and splits the result at the given granularity.
pub fn extract_text_and_boxes(
    engine: &dyn OcrEngine,
    image_path: &Path,
    granularity: Granularity,
) -> Result<Vec<TextElement>> {
    let raw = engine.extract_text_and_boxes(image_path)?;
    let elements = elements::split(&raw, granularity)?;
    info!(
        engine = engine.name(),
        image = %image_path.display(),
        elements = elements.len(),
        "extracted text elements"
    );
    Ok(elements)
}

/// Renders printed tiles for one author's elements, grouped by bucket key.
pub fn generate_element_images(
    elements: &[TextElement],
    author: &str,
    config: &PipelineConfig,
) -> Result<BucketMap<ElementTile>> {
    let font = config.label_font()?;
    Ok(collage::render_element_images(
        elements,
        author,
        config.granularity,
        font.as_ref(),
    ))
}

/// Packs grouped tiles into the single-author gallery and writes it.
pub fn create_collage(buckets: &BucketMap<ElementTile>, config: &PipelineConfig) -> Result<PathBuf> {
    let canvas = collage::create_collage(buckets);
    let exporter = PngExporter::new(
        config.output_dir.clone(),
        config.granularity.gallery_filename(),
    );
    exporter.export(&canvas)
}

/// Composes two authors' elements into the juxtaposed collage and writes it.
pub fn create_juxtaposed_collage(
    elements_a: &[TextElement],
    elements_b: &[TextElement],
    path_a: &Path,
    path_b: &Path,
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    let composer =
        CollageComposer::new(config.granularity, config.layout).with_font(config.label_font()?);
    composer.compose_files(
        elements_a,
        elements_b,
        path_a,
        path_b,
        &config.output_dir,
        cancel,
    )
}

/// Extracts both images, then composes them. The two extractions run on
/// separate threads and only meet at composition.
pub fn run_comparison(
    engine: &dyn OcrEngine,
    path_a: &Path,
    path_b: &Path,
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<ComparisonOutput> {
    let granularity = config.granularity;
    let (elements_a, elements_b) = thread::scope(|scope| {
        let author_a = scope.spawn(|| extract_text_and_boxes(engine, path_a, granularity));
        let elements_b = extract_text_and_boxes(engine, path_b, granularity);
        let elements_a = match author_a.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        (elements_a, elements_b)
    });
    let (elements_a, elements_b) = (elements_a?, elements_b?);

    let font = config.label_font()?;
    let label_font = font.as_ref().map(|font| font.source().to_path_buf());
    let collage = CollageComposer::new(config.granularity, config.layout)
        .with_font(font)
        .compose_files(
            &elements_a,
            &elements_b,
            path_a,
            path_b,
            &config.output_dir,
            cancel,
        )?;
    Ok(ComparisonOutput {
        collage,
        elements_a: elements_a.len(),
        elements_b: elements_b.len(),
        label_font,
    })
}

/// Uploaded image bytes staged on disk for the OCR engine. The file is
/// removed when the value is dropped.
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
}

impl StagedImage {
    pub fn from_bytes(bytes: &[u8], work_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(work_dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("glyphcollage-upload-")
            .tempfile_in(work_dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// [`run_comparison`] for in-memory uploads. Both staged files are deleted
/// on every exit path.
pub fn run_comparison_from_bytes(
    engine: &dyn OcrEngine,
    bytes_a: &[u8],
    bytes_b: &[u8],
    work_dir: &Path,
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<ComparisonOutput> {
    let staged_a = StagedImage::from_bytes(bytes_a, work_dir)?;
    let staged_b = StagedImage::from_bytes(bytes_b, work_dir)?;
    run_comparison(engine, staged_a.path(), staged_b.path(), config, cancel)
}
