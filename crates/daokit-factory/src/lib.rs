//! # Daokit Factory
//!
//! Binds a DAO registered under a name to the config produced under the same
//! name. A [`SingletonDaoFactory`] configures its DAO at most once and hands
//! out the same instance afterwards. [`Registries`] is the composition root
//! that owns both registries and builds factories over them.

mod factory;
mod registries;

pub use factory::{DaoFactory, SingletonDaoFactory};
pub use registries::Registries;
