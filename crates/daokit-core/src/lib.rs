//! # Daokit Core
//!
//! Core types shared by every daokit crate: the unified error, the
//! name-keyed registries, the call [`Context`], pagination and the tracing
//! bootstrap.

pub mod context;
pub mod error;
pub mod pagination;
pub mod registry;
pub mod result;
pub mod telemetry;

pub use context::*;
pub use error::*;
pub use pagination::*;
pub use registry::*;
pub use result::*;
pub use telemetry::{init_tracing, TracingConfig};
