pub mod composer;
pub mod crop;
pub mod font;
pub mod gallery;
pub mod layout;

pub use composer::CollageComposer;
pub use crop::{crop_buckets, crop_element};
pub use font::LabelFont;
pub use gallery::{create_collage, merge_author_buckets, render_element_images, ElementTile};
pub use layout::{left_placements, right_placements, CollageLayout};
