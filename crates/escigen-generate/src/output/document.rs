use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write `content` to a new uniquely named `<prefix>-*.xml` file in `target_dir`.
pub fn write_document(target_dir: &Path, prefix: &str, content: &str) -> io::Result<PathBuf> {
    let file_prefix = format!("{prefix}-");
    let mut file = tempfile::Builder::new()
        .prefix(&file_prefix)
        .suffix(".xml")
        .tempfile_in(target_dir)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    let (_, path) = file.keep().map_err(|err| err.error)?;
    Ok(path)
}
