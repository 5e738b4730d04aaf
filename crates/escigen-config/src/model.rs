use std::path::{Path, PathBuf};
use std::str::FromStr;

use escigen_core::{DEFAULT_RELATION_TYPE, EntityKind, StorageType};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{ConfigError, IssueSeverity, Result, ValidationIssue, ValidationReport};
use crate::properties::Properties;

/// Shared target directory used when a generator has no directory of its own.
pub const TARGET_DIRECTORY_KEY: &str = "generator.target.directory";

/// Relative location prefix written to item and organizational unit manifests.
pub const DEFAULT_MANIFEST_PREFIX: &str = "testdaten/daten/";

/// How a manifest row refers to a generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", content = "prefix", rename_all = "snake_case")]
pub enum ManifestLocation {
    /// The file's absolute path.
    Absolute,
    /// A fixed prefix followed by the file name.
    Prefixed(String),
}

/// Where a generator writes its documents and manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub target_dir: PathBuf,
    pub result_path: PathBuf,
    pub manifest_location: ManifestLocation,
}

/// Content descriptor attached to each generated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    /// A component referencing the payload file.
    #[default]
    Component,
    /// A content stream linking to the payload file.
    ContentStream,
    /// A content stream embedding the payload as base64; no payload file is written.
    InlineStream,
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "component" => Ok(ContentKind::Component),
            "content-stream" => Ok(ContentKind::ContentStream),
            "inline-stream" => Ok(ContentKind::InlineStream),
            other => Err(format!("unknown content kind '{other}'")),
        }
    }
}

/// Source of item payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ItemSource {
    /// `count` items, each with a freshly generated payload of `size_bytes`.
    Random { count: u64, size_bytes: u64 },
    /// One item per file under `input_dir` matching `file_types`.
    Directory {
        input_dir: PathBuf,
        file_types: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub output: OutputSettings,
    pub context_id: String,
    pub content_model_id: String,
    pub storage_type: StorageType,
    pub content_kind: ContentKind,
    pub source: ItemSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    pub output: OutputSettings,
    pub count: u64,
    pub organizational_unit_ids: Vec<String>,
    pub context_type: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModelConfig {
    pub output: OutputSettings,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRelationConfig {
    pub output: OutputSettings,
    pub count: u64,
    pub subject_id: String,
    pub relation_type: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationalUnitConfig {
    pub output: OutputSettings,
    pub count: u64,
}

/// Typed configuration for one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorConfig {
    Item(ItemConfig),
    Context(ContextConfig),
    ContentModel(ContentModelConfig),
    ContentRelation(ContentRelationConfig),
    OrganizationalUnit(OrganizationalUnitConfig),
}

impl GeneratorConfig {
    /// Build and validate the configuration of `kind` from flat properties.
    pub fn from_properties(kind: EntityKind, props: &Properties) -> Result<Self> {
        match kind {
            EntityKind::Item => ItemConfig::from_properties(props).map(GeneratorConfig::Item),
            EntityKind::Context => {
                ContextConfig::from_properties(props).map(GeneratorConfig::Context)
            }
            EntityKind::ContentModel => {
                ContentModelConfig::from_properties(props).map(GeneratorConfig::ContentModel)
            }
            EntityKind::ContentRelation => {
                ContentRelationConfig::from_properties(props).map(GeneratorConfig::ContentRelation)
            }
            EntityKind::OrganizationalUnit => OrganizationalUnitConfig::from_properties(props)
                .map(GeneratorConfig::OrganizationalUnit),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            GeneratorConfig::Item(_) => EntityKind::Item,
            GeneratorConfig::Context(_) => EntityKind::Context,
            GeneratorConfig::ContentModel(_) => EntityKind::ContentModel,
            GeneratorConfig::ContentRelation(_) => EntityKind::ContentRelation,
            GeneratorConfig::OrganizationalUnit(_) => EntityKind::OrganizationalUnit,
        }
    }

    pub fn output(&self) -> &OutputSettings {
        match self {
            GeneratorConfig::Item(config) => &config.output,
            GeneratorConfig::Context(config) => &config.output,
            GeneratorConfig::ContentModel(config) => &config.output,
            GeneratorConfig::ContentRelation(config) => &config.output,
            GeneratorConfig::OrganizationalUnit(config) => &config.output,
        }
    }
}

impl ItemConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let mut reader = PropertyReader::new(EntityKind::Item, props);
        let output = reader.output();
        let context_id = reader.required_string(&reader.key("context.id"));
        let content_model_id = reader.required_string(&reader.key("contentmodel.id"));
        let storage_type = reader
            .parse_or(&reader.key("storage.type"), StorageType::InternalManaged, |value| {
                value.parse::<StorageType>().map_err(|err| err.to_string())
            });
        let content_kind =
            reader.parse_or(&reader.key("content.kind"), ContentKind::Component, |value| {
                value.parse::<ContentKind>()
            });

        let random = reader.parse_or(&reader.key("random.data"), true, |value| {
            value
                .parse::<bool>()
                .map_err(|_| format!("expected true or false, got '{value}'"))
        });
        let source = if random {
            let count = reader.count(&reader.key("random.num"));
            let size_bytes = reader.required_u64(&reader.key("random.size"));
            ItemSource::Random { count, size_bytes }
        } else {
            let input_dir = reader.existing_dir(&reader.key("input.directory"));
            let file_types = reader
                .string_list(&reader.key("input.types"))
                .unwrap_or_else(|| vec!["*".to_string()]);
            ItemSource::Directory {
                input_dir,
                file_types,
            }
        };

        reader.finish(ItemConfig {
            output,
            context_id,
            content_model_id,
            storage_type,
            content_kind,
            source,
        })
    }
}

impl ContextConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let mut reader = PropertyReader::new(EntityKind::Context, props);
        let output = reader.output();
        let count = reader.count(&reader.key("num"));
        let organizational_unit_ids = reader.string_list(&reader.key("ou.ids")).unwrap_or_default();
        let context_type = reader.string_or(&reader.key("type"), "test");
        let description = reader.string_or(&reader.key("description"), "test context");

        reader.finish(ContextConfig {
            output,
            count,
            organizational_unit_ids,
            context_type,
            description,
        })
    }
}

impl ContentModelConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let mut reader = PropertyReader::new(EntityKind::ContentModel, props);
        let output = reader.output();
        let count = reader.count(&reader.key("num"));
        reader.finish(ContentModelConfig { output, count })
    }
}

impl ContentRelationConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let mut reader = PropertyReader::new(EntityKind::ContentRelation, props);
        let output = reader.output();
        let count = reader.count(&reader.key("num"));
        let subject_id = reader.required_string(&reader.key("subject.id"));
        let relation_type = reader.string_or(&reader.key("type"), DEFAULT_RELATION_TYPE);
        let description = reader.string_or(&reader.key("description"), "test");

        reader.finish(ContentRelationConfig {
            output,
            count,
            subject_id,
            relation_type,
            description,
        })
    }
}

impl OrganizationalUnitConfig {
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let mut reader = PropertyReader::new(EntityKind::OrganizationalUnit, props);
        let output = reader.output();
        let count = reader.count(&reader.key("num"));
        reader.finish(OrganizationalUnitConfig { output, count })
    }
}

/// Reads typed values for one generator, recording every problem it meets.
struct PropertyReader<'a> {
    kind: EntityKind,
    props: &'a Properties,
    report: ValidationReport,
}

impl<'a> PropertyReader<'a> {
    fn new(kind: EntityKind, props: &'a Properties) -> Self {
        Self {
            kind,
            props,
            report: ValidationReport::default(),
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("generator.{}.{suffix}", self.kind.config_key())
    }

    fn output(&mut self) -> OutputSettings {
        let dir_key = self.key("target.directory");
        let target_dir = match self
            .props
            .get(&dir_key)
            .or_else(|| self.props.get(TARGET_DIRECTORY_KEY))
        {
            Some(dir) => PathBuf::from(dir),
            None => {
                self.error(
                    "missing_value",
                    TARGET_DIRECTORY_KEY,
                    "no target directory configured",
                    Some(format!("set {TARGET_DIRECTORY_KEY} or {dir_key}")),
                );
                PathBuf::new()
            }
        };
        if target_dir.is_file() {
            self.error(
                "unusable_path",
                &dir_key,
                format!("{} is a file, not a directory", target_dir.display()),
                None,
            );
        }

        let result_path = self
            .props
            .get(&self.key("result.path"))
            .map(PathBuf::from)
            .unwrap_or_else(|| default_result_path(&target_dir, self.kind));

        let prefix_key = self.key("manifest.prefix");
        let manifest_location = match self.props.get_raw(&prefix_key) {
            Some(prefix) if prefix.trim().is_empty() => ManifestLocation::Absolute,
            Some(prefix) => ManifestLocation::Prefixed(prefix.trim().to_string()),
            None => default_manifest_location(self.kind),
        };

        OutputSettings {
            target_dir,
            result_path,
            manifest_location,
        }
    }

    fn required_string(&mut self, key: &str) -> String {
        match self.props.get(key) {
            Some(value) => value.to_string(),
            None => {
                self.missing(key);
                String::new()
            }
        }
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.props.get(key).unwrap_or(default).to_string()
    }

    fn string_list(&self, key: &str) -> Option<Vec<String>> {
        let values: Vec<String> = self
            .props
            .get(key)?
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        if values.is_empty() { None } else { Some(values) }
    }

    fn required_u64(&mut self, key: &str) -> u64 {
        let Some(value) = self.props.get(key) else {
            self.missing(key);
            return 0;
        };
        match value.parse::<u64>() {
            Ok(number) => number,
            Err(_) => {
                self.error(
                    "invalid_value",
                    key,
                    format!("expected a non-negative integer, got '{value}'"),
                    None,
                );
                0
            }
        }
    }

    fn count(&mut self, key: &str) -> u64 {
        let count = self.required_u64(key);
        if count == 0 && self.props.get(key).is_some() {
            self.report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "empty_run",
                key,
                "count is zero, only an empty manifest will be written",
                None,
            ));
        }
        count
    }

    fn parse_or<T, F>(&mut self, key: &str, default: T, parse: F) -> T
    where
        F: FnOnce(&str) -> std::result::Result<T, String>,
    {
        let Some(value) = self.props.get(key) else {
            return default;
        };
        match parse(value) {
            Ok(parsed) => parsed,
            Err(message) => {
                self.error("invalid_value", key, message, None);
                default
            }
        }
    }

    fn existing_dir(&mut self, key: &str) -> PathBuf {
        let Some(value) = self.props.get(key) else {
            self.missing(key);
            return PathBuf::new();
        };
        let dir = PathBuf::from(value);
        if !dir.is_dir() {
            self.error(
                "unusable_path",
                key,
                format!("{} is not a readable directory", dir.display()),
                None,
            );
        } else if let Err(err) = std::fs::read_dir(&dir) {
            self.error(
                "unusable_path",
                key,
                format!("{} cannot be read: {err}", dir.display()),
                None,
            );
        }
        dir
    }

    fn missing(&mut self, key: &str) {
        self.error("missing_value", key, "required value is missing", None);
    }

    fn error(&mut self, code: &str, key: &str, message: impl Into<String>, hint: Option<String>) {
        self.report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            code,
            key,
            message,
            hint,
        ));
    }

    fn finish<T>(self, value: T) -> Result<T> {
        for issue in &self.report.warnings {
            warn!(kind = %self.kind, key = %issue.key, code = %issue.code, "{}", issue.message);
        }
        if self.report.is_ok() {
            Ok(value)
        } else {
            Err(ConfigError::Invalid {
                kind: self.kind,
                report: self.report,
            })
        }
    }
}

fn default_result_path(target_dir: &Path, kind: EntityKind) -> PathBuf {
    let suffix = match kind {
        EntityKind::Item => "i",
        EntityKind::Context => "ctx",
        EntityKind::ContentModel => "cm",
        EntityKind::ContentRelation => "cr",
        EntityKind::OrganizationalUnit => "ou",
    };
    target_dir.join(format!("testdaten-{suffix}.csv"))
}

fn default_manifest_location(kind: EntityKind) -> ManifestLocation {
    match kind {
        EntityKind::Item | EntityKind::OrganizationalUnit => {
            ManifestLocation::Prefixed(DEFAULT_MANIFEST_PREFIX.to_string())
        }
        EntityKind::Context | EntityKind::ContentModel | EntityKind::ContentRelation => {
            ManifestLocation::Absolute
        }
    }
}
