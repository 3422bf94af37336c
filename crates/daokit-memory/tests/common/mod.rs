//! Shared fixtures for the in-memory DAO tests.

#![allow(dead_code)]

use daokit_config::shared;
use daokit_core::Context;
use daokit_memory::{MemoryConfig, MemoryDao, Record};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub age: u32,
    pub hobbies: Vec<String>,
}

impl User {
    pub fn new(name: &str, age: u32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            age,
            hobbies: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_hobbies(mut self, hobbies: &[&str]) -> Self {
        self.hobbies = hobbies.iter().map(|h| (*h).to_string()).collect();
        self
    }
}

impl Record for User {
    fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_key(&mut self, key: String) {
        self.id = Some(key);
    }
}

/// A DAO configured with the given batch size.
pub async fn configured(max_batch_size: usize) -> MemoryDao<User> {
    use daokit_config::Configurable;

    let dao = MemoryDao::new();
    dao.configure(&Context::background(), shared(MemoryConfig::new(max_batch_size)))
        .await
        .expect("configure failed");
    dao
}
