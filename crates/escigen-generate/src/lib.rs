//! Test-fixture generation for escigen.
//!
//! Each generator run builds repository objects, serializes them into one XML
//! document per object inside the target directory and records every
//! document in a CSV manifest. Item payloads are either random files written
//! next to the documents or files collected from a source directory.

pub mod content;
pub mod engine;
pub mod errors;
mod generators;
pub mod model;
pub mod output;
pub mod progress;

pub use content::{CHUNK_SIZE, ContentMaterializer, FileTypeFilter, write_random};
pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use model::{GenerationReport, GeneratorReport, GeneratorStatus};
pub use output::manifest::{DOCUMENT_MIME_TYPE, ManifestRow, write_manifest};
pub use progress::{ProgressReporter, render_bar};
