//! # Daokit Config
//!
//! Configuration contracts for DAOs: the opaque [`Config`] value, the
//! [`Configurable`] capability, the [`ConfigProducerRegistry`] that maps a
//! DAO name to the producer of its config, and a layered [`ConfigLoader`].

mod config;
mod loader;
mod producer;

pub use self::config::{downcast_config, shared, Config, Configurable, SharedConfig};
pub use self::loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use self::producer::{producer, try_producer, ConfigProducerRegistry, Producer};
