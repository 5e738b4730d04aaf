//! Per-type object builders.

mod item;

use escigen_config::{
    ContentModelConfig, ContentRelationConfig, ContextConfig, GeneratorConfig,
    OrganizationalUnitConfig,
};
use escigen_core::{
    RepositoryObject, create_content_model, create_content_relation, create_context,
    create_organizational_unit,
};
use rand::RngCore;
use uuid::Uuid;

use crate::content::ContentMaterializer;
use crate::errors::GenerationError;
use crate::model::GeneratorReport;

use item::ItemGenerator;

/// Builds the objects of one generator run, one index at a time.
pub(crate) enum ObjectSource<'a> {
    Item(ItemGenerator<'a>),
    Context(&'a ContextConfig),
    ContentModel(&'a ContentModelConfig),
    ContentRelation(&'a ContentRelationConfig),
    OrganizationalUnit(&'a OrganizationalUnitConfig),
}

impl<'a> ObjectSource<'a> {
    pub(crate) fn prepare<R: RngCore>(
        config: &'a GeneratorConfig,
        materializer: &ContentMaterializer<R>,
    ) -> Result<Self, GenerationError> {
        let source = match config {
            GeneratorConfig::Item(config) => {
                ObjectSource::Item(ItemGenerator::prepare(config, materializer)?)
            }
            GeneratorConfig::Context(config) => ObjectSource::Context(config),
            GeneratorConfig::ContentModel(config) => ObjectSource::ContentModel(config),
            GeneratorConfig::ContentRelation(config) => ObjectSource::ContentRelation(config),
            GeneratorConfig::OrganizationalUnit(config) => {
                ObjectSource::OrganizationalUnit(config)
            }
        };
        Ok(source)
    }

    pub(crate) fn total(&self) -> u64 {
        match self {
            ObjectSource::Item(generator) => generator.total(),
            ObjectSource::Context(config) => config.count,
            ObjectSource::ContentModel(config) => config.count,
            ObjectSource::ContentRelation(config) => config.count,
            ObjectSource::OrganizationalUnit(config) => config.count,
        }
    }

    pub(crate) fn build<R: RngCore>(
        &self,
        index: u64,
        materializer: &mut ContentMaterializer<R>,
        report: &mut GeneratorReport,
    ) -> Result<RepositoryObject, GenerationError> {
        let object = match self {
            ObjectSource::Item(generator) => {
                RepositoryObject::Item(generator.build(index, materializer, report)?)
            }
            ObjectSource::Context(config) => RepositoryObject::Context(create_context(
                unique_name("context"),
                config.organizational_unit_ids.clone(),
                &config.context_type,
                &config.description,
            )),
            ObjectSource::ContentModel(_) => {
                RepositoryObject::ContentModel(create_content_model(unique_name("contentmodel")))
            }
            // Subject and object are the same configured object.
            ObjectSource::ContentRelation(config) => {
                RepositoryObject::ContentRelation(create_content_relation(
                    &config.description,
                    &config.relation_type,
                    &config.subject_id,
                    &config.subject_id,
                ))
            }
            ObjectSource::OrganizationalUnit(_) => RepositoryObject::OrganizationalUnit(
                create_organizational_unit(unique_name("ou"), Vec::new()),
            ),
        };
        Ok(object)
    }
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}
