use std::path::PathBuf;

use serde::Serialize;

use crate::core::error::Result;
use crate::core::model::{Granularity, TextElement};
use crate::export::{write_atomic, Exporter};

#[derive(Serialize)]
struct ElementRecords<'a> {
    granularity: Granularity,
    count: usize,
    elements: &'a [TextElement],
}

/// Writes one author's element records as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
    file_name: String,
    granularity: Granularity,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf, file_name: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            out_dir,
            file_name: file_name.into(),
            granularity,
        }
    }
}

impl Exporter<[TextElement]> for JsonExporter {
    fn export(&self, elements: &[TextElement]) -> Result<PathBuf> {
        let records = ElementRecords {
            granularity: self.granularity,
            count: elements.len(),
            elements,
        };
        write_atomic(&self.out_dir, &self.file_name, |file, _| {
            serde_json::to_writer_pretty(file, &records)?;
            Ok(())
        })
    }
}
