//! Unified error types for every daokit layer.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for daokit.
///
/// Registry, factory, filter and context errors share this enum so that
/// callers can propagate them with `?` across crate boundaries. DAO
/// implementations are expected to report their own failures through
/// [`DaoError::Configuration`], [`DaoError::Validation`],
/// [`DaoError::Conflict`] or [`DaoError::Other`].
#[derive(Error, Debug)]
pub enum DaoError {
    // ============ Registry Errors ============
    /// A value is already registered under this name.
    #[error("{name} instance is already registered")]
    DuplicateName { name: String },

    /// Lookup miss.
    #[error("{kind} '{name}' wasn't found")]
    NotFound { kind: &'static str, name: String },

    /// A stored value could not be viewed as the requested type.
    #[error("{name} instance has unexpected type {actual}, expected type {expected}")]
    TypeMismatch {
        name: String,
        actual: &'static str,
        expected: &'static str,
    },

    // ============ Factory / Configuration Errors ============
    /// Configuration was rejected or could not be produced.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The factory is already bound to another DAO name.
    #[error("factory is bound to '{bound}', refusing to make '{requested}'")]
    FactoryBound { bound: String, requested: String },

    // ============ Filter Errors ============
    /// Integer code outside the closed operation enumeration.
    #[error("there is no operation for code {0}")]
    UnknownOperation(i64),

    // ============ Context Errors ============
    /// The context deadline passed before the operation completed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    // ============ Implementation Errors ============
    /// Invalid request data.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflicting state (e.g. create without upsert on an existing key).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DaoError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateName { .. } => "DUPLICATE_NAME",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::FactoryBound { .. } => "FACTORY_BOUND",
            Self::UnknownOperation(_) => "UNKNOWN_OPERATION",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found<T: ToString>(kind: &'static str, name: T) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate<T: ToString>(name: T) -> Self {
        Self::DuplicateName {
            name: name.to_string(),
        }
    }

    /// Creates a type mismatch error for a value stored under `name`.
    #[must_use]
    pub fn type_mismatch<T: ToString>(name: T, actual: &'static str, expected: &'static str) -> Self {
        Self::TypeMismatch {
            name: name.to_string(),
            actual,
            expected,
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    ///
    /// The core never retries on its own; this only tells DAO
    /// implementations which errors are transient.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::DeadlineExceeded)
    }

    /// Returns true for lookup misses.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for DaoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error description, handy for DAO metadata and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&DaoError> for ErrorReport {
    fn from(error: &DaoError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}
