//! Tracing bootstrap for applications embedding daokit.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the composition root, which can call [`init_tracing`].

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::DaoResult;
use serde::{Deserialize, Serialize};

/// Tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Filter directives used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// Include the event target (module path) in output.
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

fn default_filter() -> String {
    "info,daokit=debug".to_string()
}

fn default_with_target() -> bool {
    true
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
            with_target: default_with_target(),
        }
    }
}

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`. Calling this more than
/// once is harmless: when a global subscriber already exists the call is a
/// no-op.
#[cfg(feature = "telemetry")]
pub fn init_tracing(config: &TracingConfig) -> DaoResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| crate::DaoError::configuration(format!("invalid tracing filter: {e}")))?;

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(config.with_target),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(config.with_target))
            .try_init()
    };

    match result {
        Ok(()) => {
            tracing::info!(json = config.json, filter = %config.filter, "Tracing initialized");
        }
        Err(e) => {
            tracing::debug!("Tracing subscriber already installed: {}", e);
        }
    }

    Ok(())
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_config: &TracingConfig) -> DaoResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.filter, "info,daokit=debug");
        assert!(!config.json);
        assert!(config.with_target);
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = TracingConfig::default();
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: TracingConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert!(config.json);
        assert_eq!(config.filter, "info,daokit=debug");
    }
}
