//! Layered configuration loading for DAO configs.

use crate::{try_producer, Config, Producer};
use config::{ConfigError, Environment, File};
use daokit_core::{DaoError, DaoResult};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Default prefix of environment variables read by [`ConfigLoader`].
pub const DEFAULT_ENV_PREFIX: &str = "DAOKIT";

/// Path of the `.env` file applied to the process, once the first load ran.
static DOTENV: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Applies `.env` to the process environment on the first call only.
fn load_dotenv_once() {
    DOTENV.get_or_init(|| match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "Loaded .env file");
            Some(path)
        }
        Err(e) => {
            debug!("No .env file found or error loading it: {}", e);
            None
        }
    });
}

/// Loads typed configuration from files and environment variables.
///
/// Sources are applied in order, later ones overriding earlier ones:
/// 1. `{dir}/default.toml`
/// 2. `{dir}/{environment}.toml`
/// 3. `{dir}/local.toml` (not meant to be committed)
/// 4. environment variables `{PREFIX}_{SECTION}__{KEY}`
///
/// The environment name comes from [`ConfigLoader::with_environment`], or
/// from `{PREFIX}_ENVIRONMENT`, defaulting to `development`. Missing files
/// are skipped.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    env_prefix: String,
    environment: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            environment: None,
        }
    }

    /// Loader reading from `./config`.
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Overrides the environment variable prefix.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Pins the environment name instead of reading it from the process
    /// environment.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Directory the loader reads from.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads and deserializes the whole configuration tree into `T`.
    pub fn load<T: DeserializeOwned>(&self) -> DaoResult<T> {
        self.build()?
            .try_deserialize()
            .map_err(config_error_to_dao_error)
    }

    /// Loads and deserializes the table `section` into `T`.
    ///
    /// A DAO registered as `mem` would typically read its settings from a
    /// `[mem]` table.
    pub fn load_section<T: DeserializeOwned>(&self, section: &str) -> DaoResult<T> {
        self.build()?
            .get::<T>(section)
            .map_err(config_error_to_dao_error)
    }

    /// Returns a producer that loads `section` into `T` each time it runs.
    pub fn producer<T>(&self, section: impl Into<String>) -> Producer
    where
        T: DeserializeOwned + Config,
    {
        let loader = self.clone();
        let section = section.into();
        try_producer(move |ctx| {
            ctx.check()?;
            loader.load_section::<T>(&section)
        })
    }

    fn environment(&self) -> String {
        self.environment.clone().unwrap_or_else(|| {
            std::env::var(format!("{}_ENVIRONMENT", self.env_prefix))
                .unwrap_or_else(|_| "development".to_string())
        })
    }

    fn build(&self) -> DaoResult<config::Config> {
        load_dotenv_once();

        let environment = self.environment();
        info!(
            config_dir = %self.config_dir.display(),
            environment = %environment,
            "Loading DAO configuration"
        );

        let mut builder = config::Config::builder();

        for stem in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{stem}.toml"));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build().map_err(config_error_to_dao_error)
    }
}

fn config_error_to_dao_error(err: ConfigError) -> DaoError {
    DaoError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Settings {
        max_batch_size: usize,
    }

    #[test]
    fn test_missing_directory_yields_configuration_error() {
        let loader = ConfigLoader::new("/definitely/not/here")
            .with_env_prefix("DAOKIT_LOADER_UNIT_MISSING")
            .with_environment("test");
        let err = loader.load_section::<Settings>("mem").unwrap_err();
        assert!(matches!(err, DaoError::Configuration(_)));
    }

    #[test]
    fn test_builder_settings() {
        let loader = ConfigLoader::new("conf")
            .with_env_prefix("APP")
            .with_environment("staging");
        assert_eq!(loader.config_dir(), Path::new("conf"));
        assert_eq!(loader.environment(), "staging");
    }

    #[test]
    fn test_dotenv_applied_once() {
        let loader = ConfigLoader::new("/definitely/not/here")
            .with_env_prefix("DAOKIT_LOADER_UNIT_DOTENV")
            .with_environment("test");
        let _ = loader.load_section::<Settings>("mem");
        let first = DOTENV.get().cloned();
        assert!(first.is_some());

        let _ = loader.load_section::<Settings>("mem");
        assert_eq!(DOTENV.get().cloned(), first);
    }
}
