//! Name -> factory lookup for entity types, standing in for loading a model by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::DbOptions;
use crate::error::EntityError;

use super::{Entity, EntityMeta, Model};

type Factory = Arc<dyn Fn(&DbOptions) -> Model + Send + Sync>;

/// Registry of entity factories, keyed by lower-cased entity name.
///
/// Populate it once at startup, then load models by name:
///
/// ```rust,no_run
/// use sql_entity::prelude::*;
///
/// struct Widgets;
/// impl Entity for Widgets {
///     const NAME: &'static str = "Widgets";
/// }
///
/// # fn demo() -> Result<(), EntityError> {
/// let mut registry = EntityRegistry::new();
/// registry.register::<Widgets>();
/// let model = registry.load("widgets", &DbOptions::new("app.db"))?;
/// assert_eq!(model.table(), "widgets");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct EntityRegistry {
    factories: BTreeMap<String, (EntityMeta, Factory)>,
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.names())
            .finish()
    }
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }

    /// Register a concrete entity type under [`Entity::NAME`].
    pub fn register<E: Entity>(&mut self) -> &mut Self {
        self.register_meta(E::meta())
    }

    /// Register an entity described only by its metadata.
    pub fn register_meta(&mut self, meta: EntityMeta) -> &mut Self {
        let factory_meta = meta.clone();
        self.register_with(meta, move |opts| Model::new(factory_meta.clone(), opts))
    }

    /// Register a custom factory. Re-registering a name replaces the earlier entry.
    pub fn register_with<F>(&mut self, meta: EntityMeta, factory: F) -> &mut Self
    where
        F: Fn(&DbOptions) -> Model + Send + Sync + 'static,
    {
        let key = Self::key(&meta.name);
        let factory: Factory = Arc::new(factory);
        tracing::debug!(entity = %key, table = %meta.table, "entity registered");
        if self
            .factories
            .insert(key.clone(), (meta, factory))
            .is_some()
        {
            tracing::warn!(entity = %key, "entity registration replaced");
        }
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&Self::key(name))
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn meta(&self, name: &str) -> Option<&EntityMeta> {
        self.factories.get(&Self::key(name)).map(|(meta, _)| meta)
    }

    /// Build the model registered under `name` (case-insensitive).
    ///
    /// # Errors
    /// Returns `EntityError::UnknownEntity` if nothing is registered under `name`.
    pub fn load(&self, name: &str, opts: &DbOptions) -> Result<Model, EntityError> {
        let (_, factory) = self
            .factories
            .get(&Self::key(name))
            .ok_or_else(|| EntityError::UnknownEntity(name.to_string()))?;
        Ok(factory(opts))
    }

    /// [`load`](EntityRegistry::load) with the process-wide [`DbOptions::global`].
    ///
    /// # Errors
    /// Returns `EntityError::UnknownEntity` or a configuration error.
    pub fn load_default(&self, name: &str) -> Result<Model, EntityError> {
        self.load(name, &DbOptions::global()?)
    }
}
