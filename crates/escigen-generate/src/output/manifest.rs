use std::fs::File;
use std::io::Write;
use std::path::Path;

use escigen_config::ManifestLocation;
use serde::{Deserialize, Serialize};

/// Mime type recorded for every generated document.
pub const DOCUMENT_MIME_TYPE: &str = "text/xml";

/// One manifest line: where the document lives, its file name and mime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub location: String,
    pub file_name: String,
    pub mime_type: String,
}

impl ManifestRow {
    pub fn for_document(path: &Path, location: &ManifestLocation) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let location = match location {
            ManifestLocation::Absolute => std::path::absolute(path)
                .unwrap_or_else(|_| path.to_path_buf())
                .to_string_lossy()
                .into_owned(),
            ManifestLocation::Prefixed(prefix) => format!("{prefix}{file_name}"),
        };
        Self {
            location,
            file_name,
            mime_type: DOCUMENT_MIME_TYPE.to_string(),
        }
    }
}

/// Write `rows` as header-less CSV, replacing any previous file at `path`.
///
/// Each row is flushed as soon as it is written. Returns the bytes written.
pub fn write_manifest(path: &Path, rows: &[ManifestRow]) -> Result<u64, csv::Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let counting = CountingWriter::new(File::create(path)?);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    for row in rows {
        writer.write_record([
            row.location.as_str(),
            row.file_name.as_str(),
            row.mime_type.as_str(),
        ])?;
        writer.flush()?;
    }

    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_file(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("escigen_manifest_{}", uuid::Uuid::new_v4()));
        dir.join(format!("{label}.csv"))
    }

    #[test]
    fn prefixed_rows_use_file_name() {
        let row = ManifestRow::for_document(
            Path::new("/out/item-abc.xml"),
            &ManifestLocation::Prefixed("testdaten/daten/".to_string()),
        );
        assert_eq!(row.location, "testdaten/daten/item-abc.xml");
        assert_eq!(row.file_name, "item-abc.xml");
        assert_eq!(row.mime_type, "text/xml");
    }

    #[test]
    fn absolute_rows_use_full_path() {
        let row = ManifestRow::for_document(
            Path::new("/out/context-1.xml"),
            &ManifestLocation::Absolute,
        );
        assert_eq!(row.location, "/out/context-1.xml");
    }

    #[test]
    fn manifest_is_replaced_not_appended() {
        let path = temp_file("rows");
        let row = ManifestRow::for_document(Path::new("/out/a.xml"), &ManifestLocation::Absolute);

        write_manifest(&path, &[row.clone(), row.clone()]).expect("first write");
        let bytes = write_manifest(&path, &[row]).expect("second write");

        let content = std::fs::read_to_string(&path).expect("read manifest");
        assert_eq!(content, "/out/a.xml,a.xml,text/xml\n");
        assert_eq!(bytes, content.len() as u64);
    }

    #[test]
    fn empty_manifest_is_still_written() {
        let path = temp_file("empty");
        assert_eq!(write_manifest(&path, &[]).expect("write"), 0);
        assert!(path.is_file());
    }
}
