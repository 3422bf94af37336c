//! Config producers and their registry.

use crate::{Config, SharedConfig};
use daokit_core::{Context, DaoResult, Registry};
use std::sync::Arc;
use tracing::debug;

/// Produces the config of one DAO implementation.
///
/// A producer may run any number of times; only the factory guarantees
/// that its output is applied once.
pub type Producer = Arc<dyn Fn(&Context) -> DaoResult<SharedConfig> + Send + Sync>;

/// Wraps an infallible closure into a [`Producer`].
pub fn producer<C, F>(f: F) -> Producer
where
    C: Config,
    F: Fn(&Context) -> C + Send + Sync + 'static,
{
    Arc::new(move |ctx: &Context| -> DaoResult<SharedConfig> { Ok(Arc::new(f(ctx))) })
}

/// Wraps a fallible closure into a [`Producer`].
pub fn try_producer<C, F>(f: F) -> Producer
where
    C: Config,
    F: Fn(&Context) -> DaoResult<C> + Send + Sync + 'static,
{
    Arc::new(move |ctx: &Context| -> DaoResult<SharedConfig> {
        let config = f(ctx)?;
        Ok(Arc::new(config))
    })
}

/// Registry of config producers, keyed by the name of the DAO they
/// configure.
#[derive(Debug)]
pub struct ConfigProducerRegistry {
    inner: Registry<Producer>,
}

impl ConfigProducerRegistry {
    pub fn new() -> Self {
        Self {
            inner: Registry::new("config producer"),
        }
    }

    /// Registers `producer` under `name`.
    ///
    /// Fails with `DuplicateName` if a producer already uses `name`.
    pub fn register(&self, name: impl Into<String>, producer: Producer) -> DaoResult<()> {
        self.inner.register(name, producer)
    }

    /// Returns the producer registered under `name`.
    pub fn get(&self, name: &str) -> DaoResult<Producer> {
        self.inner.get(name)
    }

    /// Looks up the producer for `name` and runs it.
    pub fn produce(&self, name: &str, ctx: &Context) -> DaoResult<SharedConfig> {
        let producer = self.get(name)?;
        let config = producer(ctx)?;
        debug!(
            name = %name,
            config_type = Config::config_type_name(&*config),
            "Config produced"
        );
        Ok(config)
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

impl Default for ConfigProducerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
