//! Construction functions for repository objects.
//!
//! Every function returns a structurally complete object: repeatable sections
//! the repository requires (metadata records, admin descriptors) receive one
//! synthetic default entry when the caller supplies none. Identifiers are
//! carried as given and never resolved.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;

use crate::DC_NAMESPACE;
use crate::model::{
    AdminDescriptor, Component, ComponentContent, ComponentProperties, ContentModel,
    ContentRelation, ContentStream, ContentStreamSource, Context, Item, ItemContent,
    MetadataElement, MetadataRecord, OrganizationalUnit, PublicStatus, StorageType,
};

/// Mime type recorded for generated and sourced payloads.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Relation written by the content-relation generator unless configured.
pub const DEFAULT_RELATION_TYPE: &str =
    "http://www.escidoc.de/ontologies/mpdl-ontologies/content-relations#isConstituentOf";

const DEFAULT_RECORD_NAME: &str = "escidoc";
/// Name given to content streams created by the generator.
pub const DEFAULT_STREAM_NAME: &str = "test-content";
const EMPTY_ADMIN_DESCRIPTOR: &str = "empty";

/// Build an item in `pending` state referencing the given context and content model.
pub fn create_item(
    context_id: impl Into<String>,
    content_model_id: impl Into<String>,
    contents: Vec<ItemContent>,
    md_records: Vec<MetadataRecord>,
) -> Item {
    let md_records = if md_records.is_empty() {
        vec![default_metadata_record("test", "test-title")]
    } else {
        md_records
    };

    Item {
        status: PublicStatus::Pending,
        context_id: context_id.into(),
        content_model_id: content_model_id.into(),
        contents,
        md_records,
    }
}

/// The `escidoc` record injected when an object would otherwise have none.
pub fn default_metadata_record(root: &str, title: &str) -> MetadataRecord {
    let title = MetadataElement::new("title")
        .with_namespace("dc", DC_NAMESPACE)
        .with_text(title);

    MetadataRecord {
        name: DEFAULT_RECORD_NAME.to_string(),
        last_modification_date: Some(Utc::now()),
        content: MetadataElement::new(root).with_child(title),
    }
}

/// Wrap a payload file into a component; the file name is the path's last segment.
pub fn create_component(pid: impl Into<String>, path: &Path, storage: StorageType) -> Component {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Component {
        properties: ComponentProperties {
            pid: pid.into(),
            file_name,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            content_category: "pre-print".to_string(),
            valid_status: "valid".to_string(),
            visibility: "public".to_string(),
        },
        content: ComponentContent {
            href: file_uri(path),
            storage,
        },
    }
}

/// Content stream pointing at `href`, typically a `file://` URI.
pub fn create_content_stream_from_uri(href: impl Into<String>, storage: StorageType) -> ContentStream {
    ContentStream {
        name: DEFAULT_STREAM_NAME.to_string(),
        storage,
        mime_type: DEFAULT_MIME_TYPE.to_string(),
        source: ContentStreamSource::Href(href.into()),
    }
}

/// Content stream carrying `bytes` inline as base64.
pub fn create_content_stream_inline(
    name: impl Into<String>,
    bytes: &[u8],
    storage: StorageType,
) -> ContentStream {
    ContentStream {
        name: name.into(),
        storage,
        mime_type: DEFAULT_MIME_TYPE.to_string(),
        source: ContentStreamSource::Inline(STANDARD.encode(bytes)),
    }
}

/// Pending context with a single `empty` admin descriptor.
pub fn create_context(
    name: impl Into<String>,
    organizational_unit_ids: Vec<String>,
    context_type: impl Into<String>,
    description: impl Into<String>,
) -> Context {
    Context {
        name: name.into(),
        status: PublicStatus::Pending,
        context_type: context_type.into(),
        description: description.into(),
        organizational_unit_ids,
        admin_descriptors: vec![AdminDescriptor {
            name: EMPTY_ADMIN_DESCRIPTOR.to_string(),
            content: EMPTY_ADMIN_DESCRIPTOR.to_string(),
        }],
    }
}

/// Content model carrying only a name.
pub fn create_content_model(name: impl Into<String>) -> ContentModel {
    ContentModel { name: name.into() }
}

/// Relation of `relation_type` from `subject_id` to `object_id`.
pub fn create_content_relation(
    description: impl Into<String>,
    relation_type: impl Into<String>,
    subject_id: impl Into<String>,
    object_id: impl Into<String>,
) -> ContentRelation {
    ContentRelation {
        description: description.into(),
        relation_type: relation_type.into(),
        subject_id: subject_id.into(),
        object_id: object_id.into(),
    }
}

/// Pending organizational unit; a default record titled `name` is added when none is given.
pub fn create_organizational_unit(
    name: impl Into<String>,
    md_records: Vec<MetadataRecord>,
) -> OrganizationalUnit {
    let name = name.into();
    let md_records = if md_records.is_empty() {
        vec![default_metadata_record("organizational-unit", &name)]
    } else {
        md_records
    };

    OrganizationalUnit {
        name,
        status: PublicStatus::Pending,
        md_records,
    }
}

/// `file://` URI for a local path.
pub fn file_uri(path: &Path) -> String {
    let display = path.to_string_lossy().replace('\\', "/");
    if display.starts_with('/') {
        format!("file://{display}")
    } else {
        format!("file:///{display}")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn item_without_records_gets_default_escidoc_record() {
        let item = create_item("ctx-1", "cm-1", Vec::new(), Vec::new());
        assert_eq!(item.status, PublicStatus::Pending);
        assert_eq!(item.md_records.len(), 1);
        let record = &item.md_records[0];
        assert_eq!(record.name, "escidoc");
        assert_eq!(record.content.children[0].name, "title");
        assert_eq!(
            record.content.children[0].namespace.as_deref(),
            Some(DC_NAMESPACE)
        );
    }

    #[test]
    fn item_keeps_caller_records() {
        let records = vec![
            default_metadata_record("a", "first"),
            default_metadata_record("b", "second"),
        ];
        let item = create_item("ctx", "cm", Vec::new(), records.clone());
        assert_eq!(item.md_records, records);
    }

    #[test]
    fn organizational_unit_without_records_gets_one() {
        let ou = create_organizational_unit("ou-1", Vec::new());
        assert_eq!(ou.md_records.len(), 1);
        assert_eq!(ou.md_records[0].content.children[0].text.as_deref(), Some("ou-1"));
    }

    #[test]
    fn context_always_has_an_admin_descriptor() {
        let ctx = create_context("ctx", Vec::new(), "test", "description");
        assert_eq!(ctx.admin_descriptors.len(), 1);
        assert_eq!(ctx.admin_descriptors[0].content, "empty");
        assert_eq!(ctx.status, PublicStatus::Pending);
    }

    #[test]
    fn component_takes_file_name_from_path() {
        let path = PathBuf::from("/tmp/data/item-123.content");
        let component = create_component("component-1", &path, StorageType::ExternalUrl);
        assert_eq!(component.properties.file_name, "item-123.content");
        assert_eq!(component.properties.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(component.content.href, "file:///tmp/data/item-123.content");
        assert_eq!(component.content.storage, StorageType::ExternalUrl);
    }

    #[test]
    fn inline_stream_is_base64() {
        let stream =
            create_content_stream_inline("test-content1", b"it's a test", StorageType::ExternalUrl);
        assert_eq!(
            stream.source,
            ContentStreamSource::Inline("aXQncyBhIHRlc3Q=".to_string())
        );
        assert_eq!(stream.storage, StorageType::ExternalUrl);
    }
}
