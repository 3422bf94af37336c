//! Stored records and the DAO configuration.

use serde::{Deserialize, Serialize};

/// An entity the in-memory DAO can store.
///
/// Records are matched against filters through their JSON form, so field
/// names in filters are the serialized field names.
pub trait Record: Serialize + Clone + Send + Sync + 'static {
    /// The record's key, if it has been assigned one.
    fn key(&self) -> Option<&str>;

    /// Assigns a generated key to a record created without one.
    fn set_key(&mut self, key: String);
}

/// Configuration of a [`crate::MemoryDao`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Largest batch accepted by bulk operations. Also the default page size.
    pub max_batch_size: usize,
}

impl MemoryConfig {
    pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

    #[must_use]
    pub fn new(max_batch_size: usize) -> Self {
        Self { max_batch_size }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_batch_size() {
        assert_eq!(MemoryConfig::default().max_batch_size, 100);

        let parsed: MemoryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, MemoryConfig::default());

        let parsed: MemoryConfig = serde_json::from_str(r#"{"max_batch_size": 10}"#).unwrap();
        assert_eq!(parsed.max_batch_size, 10);
    }
}
