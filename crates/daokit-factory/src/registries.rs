//! Composition root for producers, DAOs and factories.

use crate::SingletonDaoFactory;
use daokit_config::{ConfigProducerRegistry, Producer};
use daokit_core::DaoResult;
use daokit_dao::{Dao, DaoRegistry, SharedDao};
use std::sync::Arc;

/// Owns the config producer registry and the DAO registry.
///
/// Build one at startup, register producers and DAOs under matching names,
/// then create factories with [`Registries::factory`]. Clones share the same
/// registries.
#[derive(Debug, Clone, Default)]
pub struct Registries {
    producers: Arc<ConfigProducerRegistry>,
    daos: Arc<DaoRegistry>,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn producers(&self) -> &Arc<ConfigProducerRegistry> {
        &self.producers
    }

    pub fn daos(&self) -> &Arc<DaoRegistry> {
        &self.daos
    }

    /// Registers the config producer for the DAO called `name`.
    pub fn register_producer(&self, name: impl Into<String>, producer: Producer) -> DaoResult<()> {
        self.producers.register(name, producer)
    }

    /// Registers a DAO implementation under `name`.
    pub fn register_dao<D: Dao + 'static>(&self, name: impl Into<String>, dao: D) -> DaoResult<()> {
        self.daos.register(name, dao)
    }

    /// Registers an already shared DAO under `name`.
    pub fn register_shared_dao<K, T, F>(
        &self,
        name: impl Into<String>,
        dao: SharedDao<K, T, F>,
    ) -> DaoResult<()>
    where
        K: 'static,
        T: 'static,
        F: 'static,
    {
        self.daos.register_shared(name, dao)
    }

    /// Creates a new, unbound factory over these registries.
    pub fn factory<K, T, F>(&self) -> SingletonDaoFactory<K, T, F>
    where
        K: 'static,
        T: 'static,
        F: 'static,
    {
        SingletonDaoFactory::new(Arc::clone(&self.producers), Arc::clone(&self.daos))
    }
}
