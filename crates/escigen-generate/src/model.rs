use std::path::{Path, PathBuf};

use escigen_core::EntityKind;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GeneratorStatus {
    Completed,
    Failed,
}

/// Summary of one generator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorReport {
    pub kind: EntityKind,
    pub status: GeneratorStatus,
    pub objects_requested: u64,
    pub objects_generated: u64,
    pub content_files: u64,
    pub bytes_written: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<PathBuf>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeneratorReport {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            status: GeneratorStatus::Completed,
            objects_requested: 0,
            objects_generated: 0,
            content_files: 0,
            bytes_written: 0,
            manifest_path: None,
            duration_ms: 0,
            error: None,
        }
    }

    pub fn record_failure(&mut self, error: &GenerationError) {
        self.status = GeneratorStatus::Failed;
        self.error = Some(error.to_string());
    }

    pub fn is_failed(&self) -> bool {
        self.status == GeneratorStatus::Failed
    }
}

/// Report for a run over several generators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub started_at: String,
    pub generators: Vec<GeneratorReport>,
    pub objects_total: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            started_at: chrono::Utc::now().to_rfc3339(),
            generators: Vec::new(),
            objects_total: 0,
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record(&mut self, generator: GeneratorReport) {
        self.objects_total += generator.objects_generated;
        self.bytes_written += generator.bytes_written;
        self.generators.push(generator);
    }

    pub fn failed_count(&self) -> usize {
        self.generators
            .iter()
            .filter(|generator| generator.is_failed())
            .count()
    }

    pub fn write_json(&self, path: &Path) -> Result<(), GenerationError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}
