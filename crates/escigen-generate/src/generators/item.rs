use std::path::PathBuf;

use escigen_config::{ContentKind, ItemConfig, ItemSource};
use escigen_core::{
    DEFAULT_STREAM_NAME, Item, ItemContent, create_component, create_content_stream_from_uri,
    create_content_stream_inline, create_item, file_uri,
};
use rand::RngCore;
use tracing::info;
use uuid::Uuid;

use crate::content::ContentMaterializer;
use crate::errors::GenerationError;
use crate::model::GeneratorReport;

/// Items with one content entry each, backed by random or sourced payloads.
pub(crate) struct ItemGenerator<'a> {
    config: &'a ItemConfig,
    sources: Vec<PathBuf>,
}

impl<'a> ItemGenerator<'a> {
    pub(crate) fn prepare<R: RngCore>(
        config: &'a ItemConfig,
        materializer: &ContentMaterializer<R>,
    ) -> Result<Self, GenerationError> {
        let sources = match &config.source {
            ItemSource::Random { .. } => Vec::new(),
            ItemSource::Directory {
                input_dir,
                file_types,
            } => {
                let files = materializer.materialize_from_source(input_dir, file_types)?;
                info!(
                    source_dir = %input_dir.display(),
                    files = files.len(),
                    "source files collected"
                );
                files
            }
        };
        Ok(Self { config, sources })
    }

    pub(crate) fn total(&self) -> u64 {
        match &self.config.source {
            ItemSource::Random { count, .. } => *count,
            ItemSource::Directory { .. } => self.sources.len() as u64,
        }
    }

    pub(crate) fn build<R: RngCore>(
        &self,
        index: u64,
        materializer: &mut ContentMaterializer<R>,
        report: &mut GeneratorReport,
    ) -> Result<Item, GenerationError> {
        let storage = self.config.storage_type;
        let content: ItemContent = match self.config.content_kind {
            ContentKind::Component => {
                let path = self.payload_file(index, materializer, report)?;
                let pid = format!("component-{}", Uuid::new_v4());
                create_component(pid, &path, storage).into()
            }
            ContentKind::ContentStream => {
                let path = self.payload_file(index, materializer, report)?;
                create_content_stream_from_uri(file_uri(&path), storage).into()
            }
            ContentKind::InlineStream => {
                let bytes = self.payload_bytes(index, materializer)?;
                create_content_stream_inline(DEFAULT_STREAM_NAME, &bytes, storage).into()
            }
        };

        Ok(create_item(
            &self.config.context_id,
            &self.config.content_model_id,
            vec![content],
            Vec::new(),
        ))
    }

    /// Absolute path of the payload referenced by item `index`.
    fn payload_file<R: RngCore>(
        &self,
        index: u64,
        materializer: &mut ContentMaterializer<R>,
        report: &mut GeneratorReport,
    ) -> Result<PathBuf, GenerationError> {
        match &self.config.source {
            ItemSource::Random { size_bytes, .. } => {
                let path = materializer
                    .materialize_random(&self.config.output.target_dir, *size_bytes)?;
                report.content_files += 1;
                report.bytes_written += size_bytes;
                Ok(std::path::absolute(path)?)
            }
            ItemSource::Directory { .. } => Ok(std::path::absolute(self.source(index)?)?),
        }
    }

    fn payload_bytes<R: RngCore>(
        &self,
        index: u64,
        materializer: &mut ContentMaterializer<R>,
    ) -> Result<Vec<u8>, GenerationError> {
        match &self.config.source {
            ItemSource::Random { size_bytes, .. } => materializer.random_bytes(*size_bytes),
            ItemSource::Directory { .. } => Ok(std::fs::read(self.source(index)?)?),
        }
    }

    fn source(&self, index: u64) -> Result<&PathBuf, GenerationError> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.sources.get(index))
            .ok_or_else(|| GenerationError::Source(format!("no source file for item {index}")))
    }
}
