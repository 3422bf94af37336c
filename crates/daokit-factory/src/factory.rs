//! DAO factories.

use async_trait::async_trait;
use daokit_config::ConfigProducerRegistry;
use daokit_core::{Context, DaoError, DaoResult};
use daokit_dao::{DaoRegistry, SharedDao};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Produces configured DAOs by name.
#[async_trait]
pub trait DaoFactory<K, T, F>: Send + Sync {
    /// Returns the configured DAO registered under `name`.
    async fn make(&self, ctx: &Context, name: &str) -> DaoResult<SharedDao<K, T, F>>;
}

struct Bound<K, T, F> {
    name: String,
    dao: SharedDao<K, T, F>,
}

/// Factory holding at most one configured DAO.
///
/// The first successful [`DaoFactory::make`] looks up the producer and the
/// DAO registered under the requested name, configures the DAO and caches
/// it. The factory is then bound to that name: later calls with the same
/// name return the cached instance, and calls with another name fail with
/// [`DaoError::FactoryBound`].
///
/// A single async lock guards the cache slot for the whole slow path, so
/// concurrent callers run `configure` at most once and all observe the same
/// instance. Failures are never cached.
pub struct SingletonDaoFactory<K, T, F> {
    producers: Arc<ConfigProducerRegistry>,
    daos: Arc<DaoRegistry>,
    slot: Mutex<Option<Bound<K, T, F>>>,
}

impl<K, T, F> SingletonDaoFactory<K, T, F>
where
    K: 'static,
    T: 'static,
    F: 'static,
{
    /// Creates an empty factory over the given registries.
    pub fn new(producers: Arc<ConfigProducerRegistry>, daos: Arc<DaoRegistry>) -> Self {
        Self {
            producers,
            daos,
            slot: Mutex::new(None),
        }
    }

    /// Name the factory is bound to, once a `make` has succeeded.
    pub async fn bound_name(&self) -> Option<String> {
        self.slot.lock().await.as_ref().map(|bound| bound.name.clone())
    }

    /// Returns true once a configured DAO is cached.
    pub async fn is_cached(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    async fn configure_new(&self, ctx: &Context, name: &str) -> DaoResult<SharedDao<K, T, F>> {
        let producer = self.producers.get(name)?;
        let config = producer(ctx)?;
        let dao = self.daos.get::<K, T, F>(name)?;

        if let Err(err) = dao.configure(ctx, config).await {
            warn!(name = %name, error = %err, "DAO configuration failed");
            return Err(err);
        }

        info!(name = %name, "DAO configured");
        Ok(dao)
    }
}

#[async_trait]
impl<K, T, F> DaoFactory<K, T, F> for SingletonDaoFactory<K, T, F>
where
    K: 'static,
    T: 'static,
    F: 'static,
{
    async fn make(&self, ctx: &Context, name: &str) -> DaoResult<SharedDao<K, T, F>> {
        let mut slot = self.slot.lock().await;

        if let Some(bound) = slot.as_ref() {
            if bound.name == name {
                debug!(name = %name, "Returning cached DAO");
                return Ok(Arc::clone(&bound.dao));
            }
            warn!(
                bound = %bound.name,
                requested = %name,
                "Factory is bound to another DAO"
            );
            return Err(DaoError::FactoryBound {
                bound: bound.name.clone(),
                requested: name.to_string(),
            });
        }

        let dao = self.configure_new(ctx, name).await?;
        *slot = Some(Bound {
            name: name.to_string(),
            dao: Arc::clone(&dao),
        });
        Ok(dao)
    }
}

impl<K, T, F> fmt::Debug for SingletonDaoFactory<K, T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = self
            .slot
            .try_lock()
            .map(|slot| slot.as_ref().map(|bound| bound.name.clone()))
            .ok()
            .flatten();
        f.debug_struct("SingletonDaoFactory")
            .field("bound", &bound)
            .finish_non_exhaustive()
    }
}
