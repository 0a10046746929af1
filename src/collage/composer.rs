use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tracing::{debug, info, warn};

use crate::collage::crop::{crop_buckets, placeholder, resize_to_row};
use crate::collage::font::LabelFont;
use crate::collage::layout::{left_placements, right_placements, CollageLayout};
use crate::core::cancel::CancellationToken;
use crate::core::error::{CollageError, Result};
use crate::core::geometry::compute_canvas_geometry;
use crate::core::model::{Granularity, TextElement};
use crate::core::raster::decode_rgb;
use crate::elements::{BucketMap, ALPHABET};
use crate::export::{Exporter, PngExporter};

const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

const PLACEHOLDER_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Lays out two authors' crops side by side, one row per letter `a..z`.
///
/// Author A's crops are left-justified from the left margin, author B's are
/// right-justified against the right margin, and the printed uppercase
/// letter sits in between. A missing bucket renders a grey placeholder.
#[derive(Debug)]
pub struct CollageComposer {
    granularity: Granularity,
    layout: CollageLayout,
    font: Option<LabelFont>,
}

impl CollageComposer {
    pub fn new(granularity: Granularity, layout: CollageLayout) -> Self {
        Self {
            granularity,
            layout,
            font: None,
        }
    }

    pub fn with_font(mut self, font: Option<LabelFont>) -> Self {
        self.font = font;
        self
    }

    pub fn compose(
        &self,
        elements_a: &[TextElement],
        elements_b: &[TextElement],
        image_a: &RgbImage,
        image_b: &RgbImage,
        cancel: &CancellationToken,
    ) -> Result<RgbImage> {
        let margin = self.layout.crop_margin;
        let crops_a = crop_buckets(elements_a, image_a, self.granularity, margin);
        let crops_b = crop_buckets(elements_b, image_b, self.granularity, margin);
        debug!(
            author_a = crops_a.item_count(),
            author_b = crops_b.item_count(),
            "cropped elements"
        );

        let tallest = elements_a
            .iter()
            .chain(elements_b)
            .map(|element| element.height)
            .max()
            .ok_or_else(|| CollageError::geometry("neither author has any text elements"))?;
        let geometry = compute_canvas_geometry(image_a.width(), tallest, &self.layout.canvas)?;
        info!(
            width = geometry.width,
            height = geometry.height,
            mode = self.granularity.label(),
            "allocating collage canvas"
        );

        let mut canvas = RgbImage::from_pixel(geometry.width, geometry.height, BACKGROUND_COLOR);
        if self.font.is_none() {
            warn!("no label font available, middle column stays blank");
        }

        for (row, letter) in ALPHABET.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(CollageError::Cancelled);
            }
            let y = self.layout.row_offset(row);
            let key = letter.to_string();

            if let Some(font) = &self.font {
                font.draw_centered(
                    &mut canvas,
                    (geometry.width / 2) as i32,
                    y as i32,
                    self.layout.label_size,
                    &letter.to_ascii_uppercase().to_string(),
                    LABEL_COLOR,
                );
            }

            let row_a = self.row_images(&crops_a, &key);
            let row_b = self.row_images(&crops_b, &key);

            let widths_a: Vec<u32> = row_a.iter().map(RgbImage::width).collect();
            for (image, x) in row_a
                .iter()
                .zip(left_placements(&widths_a, self.layout.canvas.margin, self.layout.padding))
            {
                image::imageops::replace(&mut canvas, image, x, y);
            }

            let widths_b: Vec<u32> = row_b.iter().map(RgbImage::width).collect();
            let placements_b = right_placements(
                &widths_b,
                geometry.width,
                self.layout.canvas.margin,
                self.layout.padding,
            );
            for (image, x) in row_b.iter().zip(placements_b).rev() {
                image::imageops::replace(&mut canvas, image, x, y);
            }
        }

        Ok(canvas)
    }

    /// Decodes both sources, composes, and writes the granularity's fixed
    /// output file into `output_dir`. Nothing is written on failure.
    pub fn compose_files(
        &self,
        elements_a: &[TextElement],
        elements_b: &[TextElement],
        path_a: &Path,
        path_b: &Path,
        output_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let image_a = decode_rgb(path_a)?;
        let image_b = decode_rgb(path_b)?;
        let canvas = self.compose(elements_a, elements_b, &image_a, &image_b, cancel)?;

        let exporter = PngExporter::new(
            output_dir.to_path_buf(),
            self.granularity.juxtaposed_filename(),
        );
        let written = exporter.export(&canvas)?;
        info!(output = %written.display(), "juxtaposed collage written");
        Ok(written)
    }

    /// Crops for `key` scaled to the row height, or a single placeholder.
    fn row_images(&self, crops: &BucketMap<RgbImage>, key: &str) -> Vec<RgbImage> {
        let images = crops.get(key);
        if images.is_empty() {
            let block = placeholder(
                self.layout.placeholder_width,
                self.layout.row_height,
                PLACEHOLDER_COLOR,
            );
            return vec![resize_to_row(&block, self.layout.row_height)];
        }
        images
            .iter()
            .map(|image| resize_to_row(image, self.layout.row_height))
            .collect()
    }
}
