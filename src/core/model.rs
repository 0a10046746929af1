use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::{CollageError, Result};

/// Flat, index-aligned output of an OCR engine.
///
/// Entry `i` of every sequence describes the same detected region. The JSON
/// shape matches a pytesseract `image_to_data` dictionary; extra keys such as
/// `level` or `block_num` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOcrResult {
    pub text: Vec<String>,
    pub left: Vec<i32>,
    pub top: Vec<i32>,
    pub width: Vec<i32>,
    pub height: Vec<i32>,
    #[serde(deserialize_with = "deserialize_confidences")]
    pub conf: Vec<f32>,
}

impl RawOcrResult {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn push(&mut self, text: impl Into<String>, bbox: (i32, i32, i32, i32), conf: f32) {
        let (left, top, width, height) = bbox;
        self.text.push(text.into());
        self.left.push(left);
        self.top.push(top);
        self.width.push(width);
        self.height.push(height);
        self.conf.push(conf);
    }

    /// Checks index alignment and non-negative box dimensions.
    pub fn validate(&self) -> Result<()> {
        let expected = self.text.len();
        let columns: [(&str, usize); 5] = [
            ("left", self.left.len()),
            ("top", self.top.len()),
            ("width", self.width.len()),
            ("height", self.height.len()),
            ("conf", self.conf.len()),
        ];
        for (name, len) in columns {
            if len != expected {
                return Err(CollageError::precondition(format!(
                    "`{name}` has {len} entries but `text` has {expected}"
                )));
            }
        }

        for idx in 0..expected {
            if self.width[idx] < 0 || self.height[idx] < 0 {
                return Err(CollageError::precondition(format!(
                    "entry {idx} has negative dimensions {}x{}",
                    self.width[idx], self.height[idx]
                )));
            }
        }

        Ok(())
    }
}

/// One OCR-detected region, either a single character or a whole word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub content: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f32,
}

/// Whether elements are compared per letter or per word initial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Character,
    Word,
}

impl Granularity {
    pub fn label(self) -> &'static str {
        match self {
            Granularity::Character => "letter",
            Granularity::Word => "word",
        }
    }

    /// Bucket key for grouping: the lowercased character, or the lowercased
    /// initial of a word. Keys outside `a..z` are still returned.
    pub fn bucket_key(self, element: &TextElement) -> Option<String> {
        match self {
            Granularity::Character => Some(element.content.to_lowercase()),
            Granularity::Word => element
                .content
                .chars()
                .next()
                .map(|initial| initial.to_lowercase().collect()),
        }
    }

    /// Bucket key for cropping. Only purely alphabetic content is cropped; a
    /// word such as `don't` or `b2` is skipped entirely.
    pub fn crop_key(self, element: &TextElement) -> Option<String> {
        let lowered = element.content.to_lowercase();
        if lowered.is_empty() || !lowered.chars().all(char::is_alphabetic) {
            return None;
        }
        match self {
            Granularity::Character => Some(lowered),
            Granularity::Word => lowered.chars().next().map(String::from),
        }
    }

    pub fn juxtaposed_filename(self) -> &'static str {
        match self {
            Granularity::Character => "juxtaposed_letter_collage_final.png",
            Granularity::Word => "juxtaposed_word_collage_final.png",
        }
    }

    pub fn gallery_filename(self) -> &'static str {
        match self {
            Granularity::Character => "collage.png",
            Granularity::Word => "word_collage.png",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Confidence {
    Number(f32),
    Text(String),
}

fn deserialize_confidences<'de, D>(deserializer: D) -> std::result::Result<Vec<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Confidence>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|value| match value {
            Confidence::Number(n) => Ok(n),
            Confidence::Text(s) => s
                .trim()
                .parse::<f32>()
                .map_err(|_| serde::de::Error::custom(format!("invalid confidence `{s}`"))),
        })
        .collect()
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
            confidence: 90.0,
        }
    }

    #[test]
    fn validate_rejects_misaligned_columns() {
        let mut raw = RawOcrResult::default();
        raw.push("cat", (0, 0, 30, 10), 90.0);
        raw.left.push(5);

        let err = raw.validate().unwrap_err();
        assert!(matches!(err, CollageError::Precondition(_)));
        assert!(err.to_string().contains("`left` has 2 entries"));
    }

    #[test]
    fn validate_rejects_negative_dimensions() {
        let mut raw = RawOcrResult::default();
        raw.push("cat", (0, 0, -1, 10), 90.0);
        assert!(raw.validate().is_err());
    }

    #[test]
    fn deserializes_pytesseract_dict() {
        let json = r#"{
            "level": [1, 5],
            "text": ["", "Hello"],
            "left": [0, 12],
            "top": [0, 4],
            "width": [200, 40],
            "height": [50, 16],
            "conf": ["-1", 96]
        }"#;
        let raw: RawOcrResult = serde_json::from_str(json).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.conf, vec![-1.0, 96.0]);
        assert_eq!(raw.text[1], "Hello");
    }

    #[test]
    fn bucket_keys_are_case_insensitive() {
        assert_eq!(
            Granularity::Character.bucket_key(&element("A")),
            Granularity::Character.bucket_key(&element("a"))
        );
        assert_eq!(
            Granularity::Word.bucket_key(&element("Apple")),
            Some("a".to_string())
        );
        assert_eq!(
            Granularity::Word.bucket_key(&element("apple")),
            Some("a".to_string())
        );
    }

    #[test]
    fn non_letter_keys_are_kept_for_indexing() {
        assert_eq!(
            Granularity::Character.bucket_key(&element("7")),
            Some("7".to_string())
        );
        assert_eq!(Granularity::Character.crop_key(&element("7")), None);
    }

    #[test]
    fn word_crop_key_requires_whole_word_alphabetic() {
        assert_eq!(
            Granularity::Word.crop_key(&element("Hello")),
            Some("h".to_string())
        );
        assert_eq!(Granularity::Word.crop_key(&element("don't")), None);
        assert_eq!(Granularity::Word.crop_key(&element("b2")), None);
    }
}
