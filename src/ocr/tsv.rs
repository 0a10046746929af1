use std::str::FromStr;

use tracing::debug;

use crate::core::error::{CollageError, Result};
use crate::core::model::RawOcrResult;

const TSV_MIN_FIELDS: usize = 11;
const TSV_LEFT: usize = 6;
const TSV_TOP: usize = 7;
const TSV_WIDTH: usize = 8;
const TSV_HEIGHT: usize = 9;
const TSV_CONF: usize = 10;
const TSV_TEXT: usize = 11;

/// Parses `tesseract ... tsv` output into an index-aligned result.
///
/// Every row is kept, including page/block/line rows with empty text, the
/// same way pytesseract's dictionary output does. Rows with too few columns
/// are skipped.
pub fn parse_tsv(tsv: &str) -> Result<RawOcrResult> {
    let mut lines = tsv.lines().enumerate();
    match lines.next() {
        Some((_, header)) if header.starts_with("level") => {}
        _ => return Err(CollageError::precondition("TSV output is missing its header row")),
    }

    let mut raw = RawOcrResult::default();
    for (line_num, line) in lines {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < TSV_MIN_FIELDS {
            debug!(line = line_num + 1, columns = fields.len(), "skipping short TSV row");
            continue;
        }

        let text = fields.get(TSV_TEXT).copied().unwrap_or("");
        let bbox = (
            field::<i32>(&fields, TSV_LEFT, line_num)?,
            field::<i32>(&fields, TSV_TOP, line_num)?,
            field::<i32>(&fields, TSV_WIDTH, line_num)?,
            field::<i32>(&fields, TSV_HEIGHT, line_num)?,
        );
        let conf = field::<f32>(&fields, TSV_CONF, line_num)?;
        raw.push(text, bbox, conf);
    }

    Ok(raw)
}

fn field<T: FromStr>(fields: &[&str], idx: usize, line_num: usize) -> Result<T> {
    let value = fields[idx].trim();
    value.parse::<T>().map_err(|_| {
        CollageError::precondition(format!(
            "TSV line {}: column {idx} is not numeric (`{value}`)",
            line_num + 1
        ))
    })
}
