use autorm_core::domain::{DomainModel, ModelDef};
use autorm_core::{err, CompiledModel, Registry, Result, UserType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A model document: the domain model plus the custom column types and
/// identifier generators its overrides may name.
///
/// Row filters are code, so they are registered on the [`Registry`]
/// returned by [`ModelConfig::registry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub model: ModelDef,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_types: Vec<UserType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub id_generators: Vec<String>,
}

impl ModelConfig {
    pub fn new(model: ModelDef) -> ModelConfig {
        ModelConfig {
            model,
            ..ModelConfig::default()
        }
    }

    pub fn from_json(json: &str) -> Result<ModelConfig> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a model document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<ModelConfig> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading model document");

        let json = std::fs::read_to_string(path)
            .map_err(|e| autorm_core::Error::from(e).context(err!("failed to read `{}`", path.display())))?;

        ModelConfig::from_json(&json)
            .map_err(|e| e.context(err!("invalid model document `{}`", path.display())))
    }

    pub fn name(&self) -> &str {
        &self.model.name
    }

    /// Resolves the type names of the document into a [`DomainModel`].
    pub fn build(&self) -> Result<DomainModel> {
        self.model.build()
    }

    /// A registry knowing the document's column types and generators, plus
    /// the built-in filters.
    pub fn registry(&self) -> Registry {
        let mut registry = Registry::new();
        self.register(&mut registry);
        registry
    }

    /// Adds the document's column types and generators to `registry`.
    pub fn register(&self, registry: &mut Registry) {
        for ty in &self.column_types {
            registry.register_column_type(ty.clone());
        }
        for generator in &self.id_generators {
            registry.register_id_generator(generator.clone());
        }
    }

    /// Builds and compiles the model with [`ModelConfig::registry`].
    pub fn compile(&self) -> Result<CompiledModel> {
        self.compile_with(&self.registry())
    }

    pub fn compile_with(&self, registry: &Registry) -> Result<CompiledModel> {
        let model = self.build()?;
        autorm_core::compile(&model, registry)
    }
}
