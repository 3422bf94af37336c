//! Result type aliases for daokit.

use crate::DaoError;

/// A specialized `Result` type for daokit operations.
pub type DaoResult<T> = Result<T, DaoError>;
