use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Entity types the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Item,
    Context,
    ContentModel,
    ContentRelation,
    OrganizationalUnit,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Item,
        EntityKind::Context,
        EntityKind::ContentModel,
        EntityKind::ContentRelation,
        EntityKind::OrganizationalUnit,
    ];

    /// Segment used in configuration keys (`generator.<key>.num`).
    pub fn config_key(self) -> &'static str {
        match self {
            EntityKind::Item => "item",
            EntityKind::Context => "context",
            EntityKind::ContentModel => "contentmodel",
            EntityKind::ContentRelation => "contentrelation",
            EntityKind::OrganizationalUnit => "organizationalunit",
        }
    }

    /// Prefix of generated document file names.
    pub fn file_prefix(self) -> &'static str {
        match self {
            EntityKind::OrganizationalUnit => "ou",
            other => other.config_key(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Item => "item",
            EntityKind::Context => "context",
            EntityKind::ContentModel => "content-model",
            EntityKind::ContentRelation => "content-relation",
            EntityKind::OrganizationalUnit => "organizational-unit",
        };
        f.write_str(name)
    }
}

/// Public status of a repository object; generated objects start out pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicStatus {
    Pending,
}

impl PublicStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublicStatus::Pending => "pending",
        }
    }
}

/// How the repository stores the binary content of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    #[default]
    InternalManaged,
    ExternalManaged,
    ExternalUrl,
}

impl StorageType {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageType::InternalManaged => "internal-managed",
            StorageType::ExternalManaged => "external-managed",
            StorageType::ExternalUrl => "external-url",
        }
    }
}

impl FromStr for StorageType {
    type Err = Error;

    /// Accepts both the property form (`INTERNAL_MANAGED`) and the XML form
    /// (`internal-managed`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "internal-managed" => Ok(StorageType::InternalManaged),
            "external-managed" => Ok(StorageType::ExternalManaged),
            "external-url" => Ok(StorageType::ExternalUrl),
            _ => Err(Error::InvalidValue(format!("unknown storage type '{value}'"))),
        }
    }
}

/// A namespaced element inside a metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataElement {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub name: String,
    pub text: Option<String>,
    pub children: Vec<MetadataElement>,
}

impl MetadataElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            name: name.into(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: MetadataElement) -> Self {
        self.children.push(child);
        self
    }

    /// Qualified name as written to XML (`prefix:name` or `name`).
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub name: String,
    pub last_modification_date: Option<DateTime<Utc>>,
    pub content: MetadataElement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProperties {
    pub pid: String,
    pub file_name: String,
    pub mime_type: String,
    pub content_category: String,
    pub valid_status: String,
    pub visibility: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentContent {
    pub href: String,
    pub storage: StorageType,
}

/// A binary part of an item with its own properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub properties: ComponentProperties,
    pub content: ComponentContent,
}

/// Payload of a content stream: a link or base64 encoded inline bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStreamSource {
    Href(String),
    Inline(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStream {
    pub name: String,
    pub storage: StorageType,
    pub mime_type: String,
    pub source: ContentStreamSource,
}

/// One entry of an item's ordered content list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemContent {
    Component(Component),
    ContentStream(ContentStream),
}

impl From<Component> for ItemContent {
    fn from(component: Component) -> Self {
        ItemContent::Component(component)
    }
}

impl From<ContentStream> for ItemContent {
    fn from(stream: ContentStream) -> Self {
        ItemContent::ContentStream(stream)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub status: PublicStatus,
    pub context_id: String,
    pub content_model_id: String,
    pub contents: Vec<ItemContent>,
    pub md_records: Vec<MetadataRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminDescriptor {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub status: PublicStatus,
    pub context_type: String,
    pub description: String,
    pub organizational_unit_ids: Vec<String>,
    pub admin_descriptors: Vec<AdminDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModel {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRelation {
    pub description: String,
    pub relation_type: String,
    pub subject_id: String,
    pub object_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationalUnit {
    pub name: String,
    pub status: PublicStatus,
    pub md_records: Vec<MetadataRecord>,
}

/// A fully constructed object graph handed to the serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepositoryObject {
    Item(Item),
    Context(Context),
    ContentModel(ContentModel),
    ContentRelation(ContentRelation),
    OrganizationalUnit(OrganizationalUnit),
}

impl RepositoryObject {
    pub fn kind(&self) -> EntityKind {
        match self {
            RepositoryObject::Item(_) => EntityKind::Item,
            RepositoryObject::Context(_) => EntityKind::Context,
            RepositoryObject::ContentModel(_) => EntityKind::ContentModel,
            RepositoryObject::ContentRelation(_) => EntityKind::ContentRelation,
            RepositoryObject::OrganizationalUnit(_) => EntityKind::OrganizationalUnit,
        }
    }
}
