//! Payload files for generated items.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::GenerationError;

/// Largest single write issued while producing random payloads.
pub const CHUNK_SIZE: usize = 1024;

/// Writes random payload files and collects existing ones from a source tree.
#[derive(Debug)]
pub struct ContentMaterializer<R: RngCore = ChaCha8Rng> {
    rng: R,
}

impl ContentMaterializer<ChaCha8Rng> {
    /// Materializer seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> ContentMaterializer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Create a uniquely named `item-*.content` file of exactly `size` random bytes.
    pub fn materialize_random(
        &mut self,
        target_dir: &Path,
        size: u64,
    ) -> Result<PathBuf, GenerationError> {
        let mut file = tempfile::Builder::new()
            .prefix("item-")
            .suffix(".content")
            .tempfile_in(target_dir)?;
        write_random(&mut file, &mut self.rng, size)?;
        file.flush()?;
        let (_, path) = file.keep().map_err(|err| err.error)?;
        debug!(path = %path.display(), size, "payload written");
        Ok(path)
    }

    /// `size` random bytes held in memory, for inline content streams.
    pub fn random_bytes(&mut self, size: u64) -> Result<Vec<u8>, GenerationError> {
        let mut bytes = Vec::new();
        write_random(&mut bytes, &mut self.rng, size)?;
        Ok(bytes)
    }

    /// Every regular file below `source_dir` whose name matches `file_types`.
    ///
    /// Symlinks are followed. Entries that cannot be read are skipped; files
    /// are returned in walk order with siblings sorted by name.
    pub fn materialize_from_source(
        &self,
        source_dir: &Path,
        file_types: &[String],
    ) -> Result<Vec<PathBuf>, GenerationError> {
        if !source_dir.is_dir() {
            return Err(GenerationError::Source(format!(
                "{} is not a directory",
                source_dir.display()
            )));
        }

        let filter = FileTypeFilter::new(file_types);
        let mut files = Vec::new();
        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !filter.matches(entry.path()) {
                continue;
            }
            if let Err(err) = File::open(entry.path()) {
                debug!(
                    path = %entry.path().display(),
                    error = %err,
                    "skipping unreadable file"
                );
                continue;
            }
            files.push(entry.into_path());
        }
        Ok(files)
    }
}

/// Write `size` random bytes to `writer` in chunks of at most [`CHUNK_SIZE`].
pub fn write_random<W: Write, R: RngCore>(
    writer: &mut W,
    rng: &mut R,
    size: u64,
) -> io::Result<u64> {
    let mut buffer = [0_u8; CHUNK_SIZE];
    let mut written = 0_u64;
    while written < size {
        let len = (size - written).min(CHUNK_SIZE as u64) as usize;
        rng.fill_bytes(&mut buffer[..len]);
        writer.write_all(&buffer[..len])?;
        written += len as u64;
    }
    Ok(written)
}

/// File name filter built from extensions such as `txt` or `.pdf`; `*` matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypeFilter {
    any: bool,
    suffixes: Vec<String>,
}

impl FileTypeFilter {
    pub fn new(file_types: &[String]) -> Self {
        let any = file_types.iter().any(|value| value.trim() == "*");
        let suffixes = file_types
            .iter()
            .map(|value| value.trim().trim_start_matches('.'))
            .filter(|value| !value.is_empty() && *value != "*")
            .map(|value| format!(".{value}"))
            .collect();
        Self { any, suffixes }
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.any {
            return true;
        }
        let Some(name) = path.file_name().map(|name| name.to_string_lossy()) else {
            return false;
        };
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    struct RecordingWriter {
        writes: Vec<usize>,
    }

    impl Write for RecordingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.push(buf.len());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("escigen_content_{label}_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn random_writes_are_chunked() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut writer = RecordingWriter { writes: Vec::new() };
        let written = write_random(&mut writer, &mut rng, 2500).expect("write");
        assert_eq!(written, 2500);
        assert_eq!(writer.writes, vec![1024, 1024, 452]);
    }

    #[test]
    fn zero_size_issues_no_writes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut writer = RecordingWriter { writes: Vec::new() };
        write_random(&mut writer, &mut rng, 0).expect("write");
        assert!(writer.writes.is_empty());
    }

    #[test]
    fn materialized_files_have_requested_size() {
        let dir = temp_dir("sizes");
        let mut materializer = ContentMaterializer::seeded(1);
        for size in [0_u64, 10, 1024, 2500] {
            let path = materializer.materialize_random(&dir, size).expect("materialize");
            let name = path.file_name().expect("file name").to_string_lossy();
            assert!(name.starts_with("item-"));
            assert!(name.ends_with(".content"));
            assert_eq!(fs::metadata(&path).expect("metadata").len(), size);
        }
        assert_eq!(fs::read_dir(&dir).expect("read dir").count(), 4);
    }

    #[test]
    fn same_seed_gives_same_bytes() {
        let mut a = ContentMaterializer::seeded(42);
        let mut b = ContentMaterializer::seeded(42);
        assert_eq!(
            a.random_bytes(3000).expect("bytes"),
            b.random_bytes(3000).expect("bytes")
        );
    }

    #[test]
    fn source_walk_filters_by_extension() {
        let dir = temp_dir("walk");
        fs::create_dir_all(dir.join("nested/deeper")).expect("create nested");
        fs::write(dir.join("a.txt"), "a").expect("write");
        fs::write(dir.join("b.pdf"), "b").expect("write");
        fs::write(dir.join("nested/c.txt"), "c").expect("write");
        fs::write(dir.join("nested/deeper/d.bin"), "d").expect("write");
        fs::write(dir.join("nested/notxt"), "e").expect("write");

        let materializer = ContentMaterializer::seeded(0);
        let all = materializer
            .materialize_from_source(&dir, &["*".to_string()])
            .expect("walk");
        assert_eq!(all.len(), 5);

        let text = materializer
            .materialize_from_source(&dir, &["txt".to_string()])
            .expect("walk");
        assert_eq!(text, vec![dir.join("a.txt"), dir.join("nested/c.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn source_walk_skips_unreadable_files() {
        use std::os::unix::fs::PermissionsExt;

        let dir = temp_dir("unreadable");
        fs::write(dir.join("ok.txt"), "ok").expect("write");
        let secret = dir.join("secret.txt");
        fs::write(&secret, "secret").expect("write");
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).expect("chmod");
        if File::open(&secret).is_ok() {
            // Permission bits are not enforced for this user.
            return;
        }

        let files = ContentMaterializer::seeded(0)
            .materialize_from_source(&dir, &["*".to_string()])
            .expect("walk");
        assert_eq!(files, vec![dir.join("ok.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn source_walk_follows_file_symlinks() {
        let root = temp_dir("symlink");
        let source = root.join("source");
        let outside = root.join("outside");
        fs::create_dir_all(&source).expect("create source");
        fs::create_dir_all(&outside).expect("create outside");
        fs::write(source.join("plain.txt"), "plain").expect("write");
        fs::write(outside.join("real.txt"), "real").expect("write");
        std::os::unix::fs::symlink(outside.join("real.txt"), source.join("linked.txt"))
            .expect("symlink");

        let files = ContentMaterializer::seeded(0)
            .materialize_from_source(&source, &["*".to_string()])
            .expect("walk");
        assert_eq!(files, vec![source.join("linked.txt"), source.join("plain.txt")]);
    }

    #[test]
    fn missing_source_is_rejected() {
        let dir = temp_dir("missing").join("absent");
        let result = ContentMaterializer::seeded(0).materialize_from_source(&dir, &[]);
        assert!(matches!(result, Err(GenerationError::Source(_))));
    }

    #[test]
    fn filter_accepts_dotted_extensions() {
        let filter = FileTypeFilter::new(&[".pdf".to_string(), " xml ".to_string()]);
        assert!(filter.matches(Path::new("/data/report.pdf")));
        assert!(filter.matches(Path::new("doc.xml")));
        assert!(!filter.matches(Path::new("archive.pdf.gz")));
        assert!(!filter.matches(Path::new("pdf")));
    }
}
