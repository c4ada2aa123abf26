//! Process-wide store of compiled models.

use crate::ModelConfig;
use autorm_core::{bail, err, CompiledModel, Registry, Result};
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Compiled models keyed by model name.
///
/// Models are compiled once, typically at startup, and handed out as shared
/// read-only values. A single lock guards loading and clearing; readers
/// only hold it long enough to clone an `Arc`.
#[derive(Debug, Default)]
pub struct MappingCache {
    models: Mutex<IndexMap<String, Arc<CompiledModel>>>,
}

impl MappingCache {
    pub fn new() -> MappingCache {
        MappingCache::default()
    }

    /// The cache shared by the whole process.
    pub fn global() -> &'static MappingCache {
        static GLOBAL: OnceLock<MappingCache> = OnceLock::new();
        GLOBAL.get_or_init(MappingCache::new)
    }

    /// Compiles every model and stores it, replacing any model already
    /// loaded under the same name.
    ///
    /// Nothing is stored unless every model compiles.
    pub fn load<'a>(&self, configs: impl IntoIterator<Item = &'a ModelConfig>) -> Result<()> {
        let compiled = configs
            .into_iter()
            .map(|config| {
                config
                    .compile()
                    .map_err(|e| e.context(err!("failed to compile model `{}`", config.name())))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut models = self.lock();
        for model in compiled {
            tracing::debug!(model = %model.name, "loaded model");
            models.insert(model.name.clone(), Arc::new(model));
        }
        Ok(())
    }

    /// Drops every model, then loads `configs`.
    pub fn reload<'a>(&self, configs: impl IntoIterator<Item = &'a ModelConfig>) -> Result<()> {
        self.clear();
        self.load(configs)
    }

    /// Compiles a model with an explicit registry and adds it. Adding a
    /// name that is already loaded is an error.
    pub fn add(&self, config: &ModelConfig, registry: &Registry) -> Result<Arc<CompiledModel>> {
        if self.lock().contains_key(config.name()) {
            bail!("model `{}` is already registered", config.name());
        }

        let model = Arc::new(config.compile_with(registry)?);

        let mut models = self.lock();
        if models.contains_key(config.name()) {
            bail!("model `{}` is already registered", config.name());
        }
        models.insert(model.name.clone(), model.clone());
        Ok(model)
    }

    /// The model loaded under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<CompiledModel>> {
        self.try_get(name)
            .ok_or_else(|| err!("model `{name}` was not found among the loaded models"))
    }

    pub fn try_get(&self, name: &str) -> Option<Arc<CompiledModel>> {
        self.lock().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Compiled models are immutable, so a panic while the lock was held
    // cannot leave an entry half written.
    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Arc<CompiledModel>>> {
        self.models.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
