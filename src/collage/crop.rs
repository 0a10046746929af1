use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::core::geometry::{scaled_width, CropRect};
use crate::core::model::{Granularity, TextElement};
use crate::elements::BucketMap;

/// Crops the element's box grown by `margin` on the right and bottom.
///
/// The crop always has the requested size; any part outside `image` is
/// left black.
pub fn crop_element(image: &RgbImage, element: &TextElement, margin: u32) -> RgbImage {
    let rect = CropRect::around(element, margin);
    let mut crop = RgbImage::new(rect.width().max(1), rect.height().max(1));

    if let Some(inside) = rect.clip(image.width(), image.height()) {
        let view = imageops::crop_imm(
            image,
            inside.x0 as u32,
            inside.y0 as u32,
            inside.width(),
            inside.height(),
        )
        .to_image();
        imageops::replace(&mut crop, &view, inside.x0 - rect.x0, inside.y0 - rect.y0);
    }

    crop
}

/// Crops every alphabetic element and groups the crops by bucket key,
/// preserving element order within each bucket.
pub fn crop_buckets(
    elements: &[TextElement],
    image: &RgbImage,
    granularity: Granularity,
    margin: u32,
) -> BucketMap<RgbImage> {
    let mut crops = BucketMap::new();
    for element in elements {
        if let Some(key) = granularity.crop_key(element) {
            crops.insert(key, crop_element(image, element, margin));
        }
    }
    crops
}

pub fn placeholder(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width.max(1), height.max(1), color)
}

/// Scales `image` to exactly `row_height` pixels tall, keeping its aspect.
pub fn resize_to_row(image: &RgbImage, row_height: u32) -> RgbImage {
    let width = scaled_width(image.width(), image.height(), row_height);
    if image.width() == width && image.height() == row_height {
        return image.clone();
    }
    imageops::resize(image, width, row_height, FilterType::Lanczos3)
}
