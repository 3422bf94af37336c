//! The `Config` marker and the `Configurable` capability.

use async_trait::async_trait;
use daokit_core::{Context, DaoError, DaoResult};
use std::any::{type_name, Any};
use std::fmt::Debug;
use std::sync::Arc;

/// Configuration of a DAO.
///
/// Opaque to daokit: each DAO implementation defines its own config type
/// and recovers it with [`downcast_config`]. Every `Debug + Send + Sync`
/// type is a `Config`.
pub trait Config: Any + Debug + Send + Sync {
    /// Borrows the config as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Type name of the concrete config.
    fn config_type_name(&self) -> &'static str;
}

impl<T: Any + Debug + Send + Sync> Config for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn config_type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Shared, type-erased configuration as handed to [`Configurable::configure`].
pub type SharedConfig = Arc<dyn Config>;

/// Wraps a concrete config into a [`SharedConfig`].
pub fn shared<C: Config>(config: C) -> SharedConfig {
    Arc::new(config)
}

/// Views a shared config as its concrete type `T`.
///
/// Fails with [`DaoError::TypeMismatch`] when the config is of another type,
/// which lets DAO implementations reject wrong-shaped configuration.
pub fn downcast_config<T: Any>(config: &SharedConfig) -> DaoResult<&T> {
    let inner: &dyn Config = config.as_ref();
    Config::as_any(inner).downcast_ref::<T>().ok_or_else(|| {
        DaoError::type_mismatch("config", Config::config_type_name(inner), type_name::<T>())
    })
}

/// Something that must be configured once before use.
#[async_trait]
pub trait Configurable: Send + Sync {
    /// Applies `config`. Called once per instance, before any other
    /// operation. Implementations should honor the deadline of `ctx`.
    async fn configure(&self, ctx: &Context, config: SharedConfig) -> DaoResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct BatchConfig {
        max_batch_size: usize,
    }

    #[test]
    fn test_downcast_matching_type() {
        let config = shared(BatchConfig { max_batch_size: 10 });
        let batch = downcast_config::<BatchConfig>(&config).unwrap();
        assert_eq!(batch.max_batch_size, 10);
    }

    #[test]
    fn test_downcast_wrong_type() {
        let config = shared(String::from("not a batch config"));
        let err = downcast_config::<BatchConfig>(&config).unwrap_err();
        match err {
            DaoError::TypeMismatch {
                actual, expected, ..
            } => {
                assert_eq!(actual, type_name::<String>());
                assert_eq!(expected, type_name::<BatchConfig>());
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
    }
}
