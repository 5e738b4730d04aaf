//! Generator configuration for escigen.
//!
//! Configuration arrives as a flat string-keyed map (`generator.item.random.num
//! = 10`). Each generator turns the keys it needs into a typed configuration
//! once, collecting every problem into a [`ValidationReport`] instead of
//! failing on the first one.

pub mod errors;
pub mod model;
pub mod properties;

pub use errors::{ConfigError, IssueSeverity, Result, ValidationIssue, ValidationReport};
pub use model::{
    ContentKind, ContentModelConfig, ContentRelationConfig, ContextConfig, GeneratorConfig,
    ItemConfig, ItemSource, ManifestLocation, OrganizationalUnitConfig, OutputSettings,
    DEFAULT_MANIFEST_PREFIX, TARGET_DIRECTORY_KEY,
};
pub use properties::Properties;
