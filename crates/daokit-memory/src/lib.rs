//! # Daokit Memory
//!
//! A [`MemoryDao`] keeping records in process memory. It implements the full
//! DAO contract, evaluates [`daokit_filter::Filter`] trees against the JSON
//! form of each record and pages results with opaque offset tokens. Useful
//! as a test double and as a template for real implementations.

mod dao;
mod matcher;
mod page;
mod record;

pub use dao::{MemoryDao, FAILED_METADATA_KEY};
pub use record::{MemoryConfig, Record};
