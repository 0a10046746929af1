pub mod collage;
pub mod core;
pub mod elements;
pub mod export;
pub mod ocr;
pub mod pipeline;

pub use self::core::error::{CollageError, Result};
pub use self::core::model::{Granularity, RawOcrResult, TextElement};
