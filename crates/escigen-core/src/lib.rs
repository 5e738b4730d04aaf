//! Core contracts and helpers for escigen.
//!
//! This crate defines the repository object model, the factory functions that
//! assemble structurally complete object graphs, and the serializer boundary
//! that turns them into XML documents.

pub mod error;
pub mod factory;
pub mod model;
pub mod serializer;

pub use error::{Error, Result};
pub use factory::{
    DEFAULT_MIME_TYPE, DEFAULT_RELATION_TYPE, DEFAULT_STREAM_NAME, create_component,
    create_content_model, create_content_relation, create_content_stream_from_uri,
    create_content_stream_inline, create_context, create_item, create_organizational_unit,
    default_metadata_record, file_uri,
};
pub use model::{
    AdminDescriptor, Component, ComponentContent, ComponentProperties, ContentModel,
    ContentRelation, ContentStream, ContentStreamSource, Context, EntityKind, Item, ItemContent,
    MetadataElement, MetadataRecord, OrganizationalUnit, PublicStatus, RepositoryObject,
    StorageType,
};
pub use serializer::{ObjectSerializer, XmlSerializer};

/// Dublin Core elements namespace used by default metadata records.
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
