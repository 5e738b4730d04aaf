use std::fs;
use std::path::PathBuf;

use escigen_config::{
    ConfigError, ContentKind, GeneratorConfig, ItemSource, ManifestLocation, Properties,
};
use escigen_core::{EntityKind, StorageType};

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("escigen_config_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn item_random_mode_uses_defaults() {
    let props = Properties::from_pairs([
        ("generator.target.directory", "/tmp/escigen-out"),
        ("generator.item.random.num", "3"),
        ("generator.item.random.size", "10240"),
        ("generator.item.context.id", "escidoc:ctx"),
        ("generator.item.contentmodel.id", "escidoc:cm"),
    ]);

    let config = GeneratorConfig::from_properties(EntityKind::Item, &props).expect("valid config");
    let GeneratorConfig::Item(item) = config else {
        panic!("expected item config");
    };

    assert_eq!(item.storage_type, StorageType::InternalManaged);
    assert_eq!(item.content_kind, ContentKind::Component);
    assert_eq!(
        item.source,
        ItemSource::Random {
            count: 3,
            size_bytes: 10240
        }
    );
    assert_eq!(
        item.output.result_path,
        PathBuf::from("/tmp/escigen-out/testdaten-i.csv")
    );
    assert_eq!(
        item.output.manifest_location,
        ManifestLocation::Prefixed("testdaten/daten/".to_string())
    );
}

#[test]
fn missing_values_are_reported_together() {
    let props = Properties::from_pairs([
        ("generator.item.random.num", "many"),
        ("generator.item.storage.type", "S3"),
    ]);

    let err = GeneratorConfig::from_properties(EntityKind::Item, &props).unwrap_err();
    let ConfigError::Invalid { kind, report } = err else {
        panic!("expected validation error");
    };

    assert_eq!(kind, EntityKind::Item);
    let keys: Vec<&str> = report.errors.iter().map(|issue| issue.key.as_str()).collect();
    assert!(keys.contains(&"generator.target.directory"));
    assert!(keys.contains(&"generator.item.context.id"));
    assert!(keys.contains(&"generator.item.contentmodel.id"));
    assert!(keys.contains(&"generator.item.storage.type"));
    assert!(keys.contains(&"generator.item.random.num"));
    assert!(keys.contains(&"generator.item.random.size"));
}

#[test]
fn item_directory_mode_requires_readable_source() {
    let source = temp_dir("source");
    let props = Properties::from_pairs([
        ("generator.target.directory", "/tmp/escigen-out".to_string()),
        ("generator.item.random.data", "false".to_string()),
        ("generator.item.input.directory", source.display().to_string()),
        ("generator.item.input.types", "txt, pdf".to_string()),
        ("generator.item.context.id", "ctx".to_string()),
        ("generator.item.contentmodel.id", "cm".to_string()),
        ("generator.item.storage.type", "EXTERNAL_URL".to_string()),
    ]);

    let GeneratorConfig::Item(item) =
        GeneratorConfig::from_properties(EntityKind::Item, &props).expect("valid config")
    else {
        panic!("expected item config");
    };
    assert_eq!(item.storage_type, StorageType::ExternalUrl);
    assert_eq!(
        item.source,
        ItemSource::Directory {
            input_dir: source.clone(),
            file_types: vec!["txt".to_string(), "pdf".to_string()],
        }
    );

    let mut props = props;
    props.set(
        "generator.item.input.directory",
        source.join("missing").display().to_string(),
    );
    let err = GeneratorConfig::from_properties(EntityKind::Item, &props).unwrap_err();
    match err {
        ConfigError::Invalid { report, .. } => {
            assert_eq!(report.errors.len(), 1);
            assert_eq!(report.errors[0].code, "unusable_path");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn per_type_directory_overrides_shared_one() {
    let props = Properties::from_pairs([
        ("generator.target.directory", "/tmp/shared"),
        ("generator.context.target.directory", "/tmp/contexts"),
        ("generator.context.num", "2"),
        ("generator.context.ou.ids", "ou-1,ou-2"),
        ("generator.contentmodel.num", "1"),
    ]);

    let GeneratorConfig::Context(context) =
        GeneratorConfig::from_properties(EntityKind::Context, &props).expect("context config")
    else {
        panic!("expected context config");
    };
    assert_eq!(context.output.target_dir, PathBuf::from("/tmp/contexts"));
    assert_eq!(context.output.manifest_location, ManifestLocation::Absolute);
    assert_eq!(context.organizational_unit_ids, vec!["ou-1", "ou-2"]);
    assert_eq!(context.context_type, "test");

    let model = GeneratorConfig::from_properties(EntityKind::ContentModel, &props)
        .expect("content model config");
    assert_eq!(model.output().target_dir, PathBuf::from("/tmp/shared"));
    assert_eq!(
        model.output().result_path,
        PathBuf::from("/tmp/shared/testdaten-cm.csv")
    );
}

#[test]
fn blank_manifest_prefix_selects_absolute_paths() {
    let props = Properties::from_pairs([
        ("generator.target.directory", "/tmp/out"),
        ("generator.organizationalunit.num", "5"),
        ("generator.organizationalunit.manifest.prefix", ""),
    ]);

    let config = GeneratorConfig::from_properties(EntityKind::OrganizationalUnit, &props)
        .expect("ou config");
    assert_eq!(config.output().manifest_location, ManifestLocation::Absolute);
}

#[test]
fn content_relation_defaults_to_constituent_relation() {
    let props = Properties::from_pairs([
        ("generator.target.directory", "/tmp/out"),
        ("generator.contentrelation.num", "1"),
        ("generator.contentrelation.subject.id", "escidoc:1"),
    ]);

    let GeneratorConfig::ContentRelation(relation) =
        GeneratorConfig::from_properties(EntityKind::ContentRelation, &props)
            .expect("relation config")
    else {
        panic!("expected relation config");
    };
    assert_eq!(relation.relation_type, escigen_core::DEFAULT_RELATION_TYPE);
    assert_eq!(relation.description, "test");
}

#[test]
fn resolved_config_serializes_with_kind_tag() {
    let props = Properties::from_pairs([
        ("generator.target.directory", "/tmp/out"),
        ("generator.contentmodel.num", "4"),
    ]);
    let config =
        GeneratorConfig::from_properties(EntityKind::ContentModel, &props).expect("config");
    let json = serde_json::to_value(&config).expect("serialize config");
    assert_eq!(json["kind"], "content_model");
    assert_eq!(json["count"], 4);
    assert_eq!(json["output"]["manifest_location"]["style"], "absolute");
}
