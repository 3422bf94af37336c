//! # Daokit DAO
//!
//! The DAO contract: the async [`Dao`] trait with its request and response
//! types, the [`DaoRegistry`] of pluggable implementations, and
//! context-carried transactions.

pub mod dao;
pub mod registry;
pub mod tx;
pub mod types;

pub use dao::{Dao, SharedDao};
pub use registry::DaoRegistry;
pub use tx::{get_tx, new_tx, SharedTx, Tx, TxConfig, TxProducer, TX_CONTEXT_KEY};
pub use types::*;
