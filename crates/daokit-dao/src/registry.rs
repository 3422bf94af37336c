//! Registry of pluggable DAO implementations.

use crate::dao::{Dao, SharedDao};
use daokit_core::{AnyRegistry, DaoResult};
use std::sync::Arc;

/// DAO implementations keyed by name.
///
/// Registration accepts any [`Dao`] and erases its key, entity and filter
/// types. [`DaoRegistry::get`] checks the requested types and fails with
/// `TypeMismatch` when they differ from the registered ones.
#[derive(Debug)]
pub struct DaoRegistry {
    inner: AnyRegistry,
}

impl DaoRegistry {
    pub fn new() -> Self {
        Self {
            inner: AnyRegistry::new("dao"),
        }
    }

    /// Registers `dao` under `name`.
    pub fn register<D: Dao + 'static>(&self, name: impl Into<String>, dao: D) -> DaoResult<()> {
        let shared: SharedDao<D::Key, D::Entity, D::Filter> = Arc::new(dao);
        self.register_shared(name, shared)
    }

    /// Registers an already shared DAO, keeping the caller's handle usable.
    pub fn register_shared<K, T, F>(
        &self,
        name: impl Into<String>,
        dao: SharedDao<K, T, F>,
    ) -> DaoResult<()>
    where
        K: 'static,
        T: 'static,
        F: 'static,
    {
        self.inner.register(name, dao)
    }

    /// Returns the DAO registered under `name` with the given key, entity and
    /// filter types.
    pub fn get<K, T, F>(&self, name: &str) -> DaoResult<SharedDao<K, T, F>>
    where
        K: 'static,
        T: 'static,
        F: 'static,
    {
        self.inner.get::<SharedDao<K, T, F>>(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.inner.names()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for DaoRegistry {
    fn default() -> Self {
        Self::new()
    }
}
