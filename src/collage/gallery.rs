use image::{Rgb, RgbImage};

use crate::collage::font::LabelFont;
use crate::core::model::{Granularity, TextElement};
use crate::elements::{BucketMap, ALPHABET};

pub const GALLERY_WIDTH: u32 = 1000;
pub const GALLERY_HEIGHT: u32 = 1000;
pub const GALLERY_GAP: u32 = 50;

const TILE_WIDTH: u32 = 100;
const TILE_HEIGHT: u32 = 50;
const TILE_TEXT_OFFSET: i32 = 10;
const TILE_TEXT_SIZE: f32 = 16.0;

const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// A machine-rendered stand-in for one element, tagged with its author.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTile {
    pub author: String,
    pub content: String,
    pub image: RgbImage,
}

/// Renders a small white tile with the text of every element and groups the
/// tiles by bucket key.
pub fn render_element_images(
    elements: &[TextElement],
    author: &str,
    granularity: Granularity,
    font: Option<&LabelFont>,
) -> BucketMap<ElementTile> {
    let mut tiles = BucketMap::new();
    for element in elements {
        let Some(key) = granularity.bucket_key(element) else {
            continue;
        };
        let mut image = RgbImage::from_pixel(TILE_WIDTH, TILE_HEIGHT, BACKGROUND_COLOR);
        if let Some(font) = font {
            font.draw(
                &mut image,
                TILE_TEXT_OFFSET,
                TILE_TEXT_OFFSET,
                TILE_TEXT_SIZE,
                &element.content,
                TEXT_COLOR,
            );
        }
        tiles.insert(
            key,
            ElementTile {
                author: author.to_string(),
                content: element.content.clone(),
                image,
            },
        );
    }
    tiles
}

/// One bucket per letter `a..z` holding author A's tiles followed by
/// author B's. Letters neither author wrote get an empty bucket.
pub fn merge_author_buckets(
    author_a: &BucketMap<ElementTile>,
    author_b: &BucketMap<ElementTile>,
) -> BucketMap<ElementTile> {
    let mut merged = BucketMap::new();
    for letter in ALPHABET {
        let key = letter.to_string();
        let tiles = author_a
            .get(&key)
            .iter()
            .chain(author_b.get(&key))
            .cloned();
        merged.extend(key, tiles);
    }
    merged
}

/// Packs tiles left to right into a fixed white canvas, wrapping to a new
/// row when the next tile would not fit. Tiles past the bottom are clipped.
pub fn create_collage(buckets: &BucketMap<ElementTile>) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(GALLERY_WIDTH, GALLERY_HEIGHT, BACKGROUND_COLOR);
    let (mut x, mut y) = (0i64, 0i64);
    let gap = i64::from(GALLERY_GAP);

    for (_, tiles) in buckets.iter() {
        for tile in tiles {
            let (width, height) = (i64::from(tile.image.width()), i64::from(tile.image.height()));
            image::imageops::replace(&mut canvas, &tile.image, x, y);
            x += width + gap;
            if x > i64::from(GALLERY_WIDTH) - width {
                x = 0;
                y += height + gap;
            }
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(content: &str) -> TextElement {
        TextElement {
            content: content.to_string(),
            x: 0,
            y: 0,
            width: 10,
            height: 10,
            confidence: 50.0,
        }
    }

    #[test]
    fn tiles_group_by_bucket_key() {
        let elements = vec![element("Apple"), element("art"), element("9lives")];
        let tiles = render_element_images(&elements, "alice", Granularity::Word, None);
        assert_eq!(tiles.get("a").len(), 2);
        assert_eq!(tiles.get("9").len(), 1);
        let first = &tiles.get("a")[0];
        assert_eq!(first.author, "alice");
        assert_eq!(first.content, "Apple");
        assert_eq!(first.image.dimensions(), (TILE_WIDTH, TILE_HEIGHT));
    }

    #[test]
    fn merge_covers_whole_alphabet() {
        let a = render_element_images(&[element("x")], "a", Granularity::Character, None);
        let b = render_element_images(
            &[element("X"), element("1")],
            "b",
            Granularity::Character,
            None,
        );
        let merged = merge_author_buckets(&a, &b);
        assert_eq!(merged.len(), 26);
        let authors: Vec<&str> = merged.get("x").iter().map(|t| t.author.as_str()).collect();
        assert_eq!(authors, vec!["a", "b"]);
        assert!(merged.get("q").is_empty());
        assert!(!merged.contains_key("1"));
    }

    #[test]
    fn collage_wraps_rows() {
        let mut buckets = BucketMap::new();
        for idx in 0..8 {
            buckets.insert(
                "a",
                ElementTile {
                    author: "a".to_string(),
                    content: idx.to_string(),
                    image: RgbImage::from_pixel(100, 50, Rgb([idx as u8, 0, 0])),
                },
            );
        }
        let canvas = create_collage(&buckets);
        assert_eq!(canvas.dimensions(), (GALLERY_WIDTH, GALLERY_HEIGHT));
        // 150px pitch: tile 6 still starts at x=900, tile 7 wraps.
        assert_eq!(canvas.get_pixel(750, 0), &Rgb([5, 0, 0]));
        assert_eq!(canvas.get_pixel(900, 0), &Rgb([6, 0, 0]));
        assert_eq!(canvas.get_pixel(0, 100), &Rgb([7, 0, 0]));
        assert_eq!(canvas.get_pixel(150, 100), &BACKGROUND_COLOR);
    }
}
