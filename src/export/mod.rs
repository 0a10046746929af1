pub mod json_export;
pub mod png_export;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::error::Result;

pub use json_export::JsonExporter;
pub use png_export::PngExporter;

pub trait Exporter<T: ?Sized> {
    /// Writes `item` and returns the path of the written file.
    fn export(&self, item: &T) -> Result<PathBuf>;
}

/// Writes through a temporary file in `out_dir` and renames it into place,
/// so a failed write never leaves a partial `file_name` behind.
pub(crate) fn write_atomic<F>(out_dir: &Path, file_name: &str, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut fs::File, &Path) -> Result<()>,
{
    fs::create_dir_all(out_dir)?;
    let target = out_dir.join(file_name);
    let mut staged = tempfile::Builder::new()
        .prefix(".glyphcollage-")
        .tempfile_in(out_dir)?;
    write(staged.as_file_mut(), &target)?;
    staged.as_file_mut().flush()?;
    staged.persist(&target).map_err(|err| err.error)?;
    Ok(target)
}
