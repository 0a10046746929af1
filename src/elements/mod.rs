pub mod bucket;
pub mod splitter;

pub use bucket::{index, index_by, BucketMap, ALPHABET};
pub use splitter::split;
