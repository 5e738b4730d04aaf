use std::fmt::Display;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};
use crate::model::{
    Component, ContentModel, ContentRelation, ContentStream, ContentStreamSource, Context, Item,
    ItemContent, MetadataElement, MetadataRecord, OrganizationalUnit, RepositoryObject,
};

const NS_ITEM: &str = "http://www.escidoc.de/schemas/item/0.10";
const NS_COMPONENTS: &str = "http://www.escidoc.de/schemas/components/0.9";
const NS_CONTENT_STREAMS: &str = "http://www.escidoc.de/schemas/contentstreams/0.7";
const NS_MD_RECORDS: &str = "http://www.escidoc.de/schemas/metadatarecords/0.5";
const NS_CONTEXT: &str = "http://www.escidoc.de/schemas/context/0.7";
const NS_CONTENT_MODEL: &str = "http://www.escidoc.de/schemas/contentmodel/0.1";
const NS_CONTENT_RELATION: &str = "http://www.escidoc.de/schemas/contentrelation/0.1";
const NS_ORGANIZATIONAL_UNIT: &str = "http://www.escidoc.de/schemas/organizationalunit/0.8";
const NS_PROPERTIES: &str = "http://escidoc.de/core/01/properties/";
const NS_STRUCTURAL_RELATIONS: &str = "http://escidoc.de/core/01/structural-relations/";
const NS_XLINK: &str = "http://www.w3.org/1999/xlink";

/// Converts a completed object graph into its canonical document text.
pub trait ObjectSerializer {
    fn serialize(&self, object: &RepositoryObject) -> Result<String>;
}

/// Serializer producing eSciDoc-style XML documents.
#[derive(Debug, Clone)]
pub struct XmlSerializer {
    indent: Option<usize>,
}

impl Default for XmlSerializer {
    fn default() -> Self {
        Self { indent: Some(2) }
    }
}

impl XmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializer writing everything on a single line.
    pub fn compact() -> Self {
        Self { indent: None }
    }
}

impl ObjectSerializer for XmlSerializer {
    fn serialize(&self, object: &RepositoryObject) -> Result<String> {
        let mut doc = XmlDocument::new(self.indent);
        doc.declaration()?;
        match object {
            RepositoryObject::Item(item) => write_item(&mut doc, item)?,
            RepositoryObject::Context(context) => write_context(&mut doc, context)?,
            RepositoryObject::ContentModel(model) => write_content_model(&mut doc, model)?,
            RepositoryObject::ContentRelation(relation) => {
                write_content_relation(&mut doc, relation)?
            }
            RepositoryObject::OrganizationalUnit(ou) => write_organizational_unit(&mut doc, ou)?,
        }
        doc.finish()
    }
}

fn write_item(doc: &mut XmlDocument, item: &Item) -> Result<()> {
    let root = "escidocItem:item";
    doc.start(
        root,
        &[
            ("xmlns:escidocItem", NS_ITEM),
            ("xmlns:escidocMetadataRecords", NS_MD_RECORDS),
            ("xmlns:escidocComponents", NS_COMPONENTS),
            ("xmlns:escidocContentStreams", NS_CONTENT_STREAMS),
            ("xmlns:prop", NS_PROPERTIES),
            ("xmlns:srel", NS_STRUCTURAL_RELATIONS),
            ("xmlns:xlink", NS_XLINK),
        ],
    )?;

    let context_href = format!("/ir/context/{}", item.context_id);
    let content_model_href = format!("/cmm/content-model/{}", item.content_model_id);
    doc.start("escidocItem:properties", &[])?;
    doc.empty("srel:context", &[("xlink:href", context_href.as_str())])?;
    doc.empty(
        "srel:content-model",
        &[("xlink:href", content_model_href.as_str())],
    )?;
    doc.text_element("prop:public-status", item.status.as_str())?;
    doc.end("escidocItem:properties")?;

    write_md_records(doc, &item.md_records)?;

    let components: Vec<&Component> = item
        .contents
        .iter()
        .filter_map(|content| match content {
            ItemContent::Component(component) => Some(component),
            ItemContent::ContentStream(_) => None,
        })
        .collect();
    if !components.is_empty() {
        doc.start("escidocComponents:components", &[])?;
        for component in components {
            write_component(doc, component)?;
        }
        doc.end("escidocComponents:components")?;
    }

    let streams: Vec<&ContentStream> = item
        .contents
        .iter()
        .filter_map(|content| match content {
            ItemContent::ContentStream(stream) => Some(stream),
            ItemContent::Component(_) => None,
        })
        .collect();
    if !streams.is_empty() {
        doc.start("escidocContentStreams:content-streams", &[])?;
        for stream in streams {
            write_content_stream(doc, stream)?;
        }
        doc.end("escidocContentStreams:content-streams")?;
    }

    doc.end(root)
}

fn write_component(doc: &mut XmlDocument, component: &Component) -> Result<()> {
    let props = &component.properties;
    doc.start("escidocComponents:component", &[])?;
    doc.start("escidocComponents:properties", &[])?;
    doc.text_element("prop:pid", &props.pid)?;
    doc.text_element("prop:file-name", &props.file_name)?;
    doc.text_element("prop:mime-type", &props.mime_type)?;
    doc.text_element("prop:content-category", &props.content_category)?;
    doc.text_element("prop:valid-status", &props.valid_status)?;
    doc.text_element("prop:visibility", &props.visibility)?;
    doc.end("escidocComponents:properties")?;
    doc.empty(
        "escidocComponents:content",
        &[
            ("xlink:href", component.content.href.as_str()),
            ("storage", component.content.storage.as_str()),
        ],
    )?;
    doc.end("escidocComponents:component")
}

fn write_content_stream(doc: &mut XmlDocument, stream: &ContentStream) -> Result<()> {
    let name = "escidocContentStreams:content-stream";
    let mut attrs = vec![
        ("name", stream.name.as_str()),
        ("storage", stream.storage.as_str()),
        ("mime-type", stream.mime_type.as_str()),
    ];
    match &stream.source {
        ContentStreamSource::Href(href) => {
            attrs.push(("xlink:href", href.as_str()));
            doc.empty(name, &attrs)
        }
        ContentStreamSource::Inline(content) => {
            doc.start(name, &attrs)?;
            doc.text(content)?;
            doc.end(name)
        }
    }
}

fn write_md_records(doc: &mut XmlDocument, records: &[MetadataRecord]) -> Result<()> {
    doc.start("escidocMetadataRecords:md-records", &[])?;
    for record in records {
        let modified = record
            .last_modification_date
            .map(|date| date.to_rfc3339_opts(chrono::SecondsFormat::Millis, true));
        let mut attrs = vec![("name", record.name.as_str())];
        if let Some(modified) = modified.as_deref() {
            attrs.push(("last-modification-date", modified));
        }
        doc.start("escidocMetadataRecords:md-record", &attrs)?;
        write_metadata_element(doc, &record.content)?;
        doc.end("escidocMetadataRecords:md-record")?;
    }
    doc.end("escidocMetadataRecords:md-records")
}

fn write_metadata_element(doc: &mut XmlDocument, element: &MetadataElement) -> Result<()> {
    let name = element.qualified_name();
    let ns_attr = element.namespace.as_deref().map(|ns| {
        let key = match &element.prefix {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        (key, ns)
    });
    let attrs: Vec<(&str, &str)> = ns_attr
        .as_ref()
        .map(|(key, ns)| vec![(key.as_str(), *ns)])
        .unwrap_or_default();

    if element.text.is_none() && element.children.is_empty() {
        return doc.empty(&name, &attrs);
    }

    doc.start(&name, &attrs)?;
    if let Some(text) = &element.text {
        doc.text(text)?;
    }
    for child in &element.children {
        write_metadata_element(doc, child)?;
    }
    doc.end(&name)
}

fn write_context(doc: &mut XmlDocument, context: &Context) -> Result<()> {
    let root = "escidocContext:context";
    doc.start(
        root,
        &[
            ("xmlns:escidocContext", NS_CONTEXT),
            ("xmlns:prop", NS_PROPERTIES),
            ("xmlns:srel", NS_STRUCTURAL_RELATIONS),
            ("xmlns:xlink", NS_XLINK),
        ],
    )?;

    doc.start("escidocContext:properties", &[])?;
    doc.text_element("prop:name", &context.name)?;
    doc.text_element("prop:public-status", context.status.as_str())?;
    doc.text_element("prop:description", &context.description)?;
    doc.text_element("prop:type", &context.context_type)?;
    if context.organizational_unit_ids.is_empty() {
        doc.empty("prop:organizational-units", &[])?;
    } else {
        doc.start("prop:organizational-units", &[])?;
        for ou_id in &context.organizational_unit_ids {
            let href = format!("/oum/organizational-unit/{ou_id}");
            doc.empty("srel:organizational-unit", &[("xlink:href", href.as_str())])?;
        }
        doc.end("prop:organizational-units")?;
    }
    doc.end("escidocContext:properties")?;

    doc.start("escidocContext:admin-descriptors", &[])?;
    for descriptor in &context.admin_descriptors {
        doc.start(
            "escidocContext:admin-descriptor",
            &[("name", descriptor.name.as_str())],
        )?;
        doc.text(&descriptor.content)?;
        doc.end("escidocContext:admin-descriptor")?;
    }
    doc.end("escidocContext:admin-descriptors")?;

    doc.end(root)
}

fn write_content_model(doc: &mut XmlDocument, model: &ContentModel) -> Result<()> {
    let root = "escidocContentModel:content-model";
    doc.start(
        root,
        &[
            ("xmlns:escidocContentModel", NS_CONTENT_MODEL),
            ("xmlns:prop", NS_PROPERTIES),
        ],
    )?;
    doc.start("escidocContentModel:properties", &[])?;
    doc.text_element("prop:name", &model.name)?;
    doc.end("escidocContentModel:properties")?;
    doc.end(root)
}

fn write_content_relation(doc: &mut XmlDocument, relation: &ContentRelation) -> Result<()> {
    let root = "escidocContentRelation:content-relation";
    doc.start(
        root,
        &[
            ("xmlns:escidocContentRelation", NS_CONTENT_RELATION),
            ("xmlns:prop", NS_PROPERTIES),
            ("xmlns:xlink", NS_XLINK),
        ],
    )?;
    doc.start("escidocContentRelation:properties", &[])?;
    doc.text_element("prop:description", &relation.description)?;
    doc.end("escidocContentRelation:properties")?;
    let subject_href = format!("/ir/context/{}", relation.subject_id);
    let object_href = format!("/ir/context/{}", relation.object_id);
    doc.text_element("escidocContentRelation:type", &relation.relation_type)?;
    doc.empty(
        "escidocContentRelation:subject",
        &[("xlink:href", subject_href.as_str())],
    )?;
    doc.empty(
        "escidocContentRelation:object",
        &[("xlink:href", object_href.as_str())],
    )?;
    doc.end(root)
}

fn write_organizational_unit(doc: &mut XmlDocument, ou: &OrganizationalUnit) -> Result<()> {
    let root = "organizational-unit:organizational-unit";
    doc.start(
        root,
        &[
            ("xmlns:organizational-unit", NS_ORGANIZATIONAL_UNIT),
            ("xmlns:escidocMetadataRecords", NS_MD_RECORDS),
            ("xmlns:prop", NS_PROPERTIES),
        ],
    )?;
    doc.start("organizational-unit:properties", &[])?;
    doc.text_element("prop:name", &ou.name)?;
    doc.text_element("prop:public-status", ou.status.as_str())?;
    doc.end("organizational-unit:properties")?;
    write_md_records(doc, &ou.md_records)?;
    doc.end(root)
}

struct XmlDocument {
    writer: Writer<Vec<u8>>,
}

impl XmlDocument {
    fn new(indent: Option<usize>) -> Self {
        let writer = match indent {
            Some(size) => Writer::new_with_indent(Vec::new(), b' ', size),
            None => Writer::new(Vec::new()),
        };
        Self { writer }
    }

    fn declaration(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.write(Event::Start(element(name, attrs)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.write(Event::Empty(element(name, attrs)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.write(Event::Text(BytesText::new(text)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(serialization_error)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(serialization_error)
    }
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for attr in attrs {
        start.push_attribute(*attr);
    }
    start
}

fn serialization_error(err: impl Display) -> Error {
    Error::Serialization(err.to_string())
}
