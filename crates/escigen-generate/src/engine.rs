use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use escigen_config::{GeneratorConfig, Properties};
use escigen_core::{EntityKind, ObjectSerializer, XmlSerializer};
use rand::RngCore;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::content::ContentMaterializer;
use crate::errors::GenerationError;
use crate::generators::ObjectSource;
use crate::model::{GenerationReport, GeneratorReport};
use crate::output::document::write_document;
use crate::output::manifest::{ManifestRow, write_manifest};
use crate::progress::ProgressReporter;

/// Result of a single generator run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub files: Vec<PathBuf>,
    pub manifest_path: PathBuf,
    pub report: GeneratorReport,
}

/// Runs generators: builds objects, writes one document per object and the manifest.
pub struct GenerationEngine<R: RngCore = ChaCha8Rng> {
    serializer: Box<dyn ObjectSerializer>,
    materializer: ContentMaterializer<R>,
    progress: ProgressReporter<Box<dyn Write>>,
}

impl GenerationEngine<ChaCha8Rng> {
    /// XML documents, entropy-seeded payloads, progress on stdout.
    pub fn new() -> Self {
        Self::with_parts(
            XmlSerializer::default(),
            ContentMaterializer::from_entropy(),
            std::io::stdout(),
        )
    }

    /// Like [`GenerationEngine::new`] with reproducible payload bytes.
    pub fn seeded(seed: u64) -> Self {
        Self::with_parts(
            XmlSerializer::default(),
            ContentMaterializer::seeded(seed),
            std::io::stdout(),
        )
    }
}

impl Default for GenerationEngine<ChaCha8Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> GenerationEngine<R> {
    pub fn with_parts(
        serializer: impl ObjectSerializer + 'static,
        materializer: ContentMaterializer<R>,
        progress: impl Write + 'static,
    ) -> Self {
        Self {
            serializer: Box::new(serializer),
            materializer,
            progress: ProgressReporter::new(Box::new(progress)),
        }
    }

    pub fn with_serializer(mut self, serializer: impl ObjectSerializer + 'static) -> Self {
        self.serializer = Box::new(serializer);
        self
    }

    pub fn with_progress(mut self, progress: impl Write + 'static) -> Self {
        self.progress = ProgressReporter::new(Box::new(progress));
        self
    }

    /// Run every generator in `kinds` against `props`.
    ///
    /// A failing generator is logged and recorded; the remaining generators
    /// still run.
    pub fn run(&mut self, kinds: &[EntityKind], props: &Properties) -> GenerationReport {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut report = GenerationReport::new(run_id.clone());

        info!(run_id = %run_id, generators = kinds.len(), "generation started");

        for &kind in kinds {
            let generator = match GeneratorConfig::from_properties(kind, props) {
                Ok(config) => self.run_generator(&config),
                Err(err) => {
                    let err = GenerationError::from(err);
                    warn!(kind = %kind, error = %err, "generator not configured");
                    let mut generator = GeneratorReport::new(kind);
                    generator.record_failure(&err);
                    generator
                }
            };
            report.record(generator);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            generators = report.generators.len(),
            failed = report.failed_count(),
            objects = report.objects_total,
            duration_ms = report.duration_ms,
            "generation completed"
        );
        report
    }

    /// Run one generator, capturing failure in the returned report.
    pub fn run_generator(&mut self, config: &GeneratorConfig) -> GeneratorReport {
        let mut report = GeneratorReport::new(config.kind());
        let mut files = Vec::new();
        if let Err(err) = self.generate_tracked(config, &mut files, &mut report) {
            warn!(
                kind = %config.kind(),
                error = %err,
                files_written = files.len(),
                "generator failed"
            );
            report.record_failure(&err);
        }
        report
    }

    /// Generate the documents and manifest described by `config`.
    pub fn generate_files(
        &mut self,
        config: &GeneratorConfig,
    ) -> Result<GenerationResult, GenerationError> {
        let mut report = GeneratorReport::new(config.kind());
        let mut files = Vec::new();
        self.generate_tracked(config, &mut files, &mut report)?;
        Ok(GenerationResult {
            files,
            manifest_path: config.output().result_path.clone(),
            report,
        })
    }

    /// [`Self::generate_into`], closing the progress line when it fails.
    fn generate_tracked(
        &mut self,
        config: &GeneratorConfig,
        files: &mut Vec<PathBuf>,
        report: &mut GeneratorReport,
    ) -> Result<(), GenerationError> {
        let result = self.generate_into(config, files, report);
        if result.is_err() {
            self.progress
                .abort()
                .unwrap_or_else(|err| debug!(error = %err, "progress line not closed"));
        }
        result
    }

    fn generate_into(
        &mut self,
        config: &GeneratorConfig,
        files: &mut Vec<PathBuf>,
        report: &mut GeneratorReport,
    ) -> Result<(), GenerationError> {
        let start = Instant::now();
        let kind = config.kind();
        let output = config.output();
        std::fs::create_dir_all(&output.target_dir)?;

        let source = ObjectSource::prepare(config, &self.materializer)?;
        let total = source.total();
        report.objects_requested = total;

        info!(
            kind = %kind,
            target_dir = %output.target_dir.display(),
            objects = total,
            "generator started"
        );

        for index in 0..total {
            let object = source.build(index, &mut self.materializer, report)?;
            let document = self.serializer.serialize(&object)?;
            let path = write_document(&output.target_dir, kind.file_prefix(), &document)?;
            report.bytes_written += document.len() as u64;
            report.objects_generated += 1;
            files.push(path);
            self.progress.update(index, total)?;
        }

        let rows: Vec<ManifestRow> = files
            .iter()
            .map(|path| ManifestRow::for_document(path, &output.manifest_location))
            .collect();
        report.bytes_written += write_manifest(&output.result_path, &rows)?;
        report.manifest_path = Some(output.result_path.clone());
        self.progress.finish()?;

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            kind = %kind,
            objects_generated = report.objects_generated,
            content_files = report.content_files,
            manifest = %output.result_path.display(),
            duration_ms = report.duration_ms,
            "generator finished"
        );
        Ok(())
    }
}
