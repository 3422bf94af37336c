//! Request and response types of the DAO operations.
//!
//! Optional flags (`upsert`, `partial`) are `Option<bool>`: `None` means the
//! caller did not ask for the behavior, and implementations treat it as
//! `false`.

use daokit_core::Pagination;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Additional information an implementation may hand back to the caller.
pub type Metadata = HashMap<String, serde_json::Value>;

// ============ Create ============

/// Creates a single entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest<T> {
    /// Entity to create.
    pub data: T,
    /// Update instead of failing when the entity already exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsert: Option<bool>,
}

impl<T> CreateRequest<T> {
    #[must_use]
    pub fn new(data: T) -> Self {
        Self { data, upsert: None }
    }

    #[must_use]
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }

    pub fn is_upsert(&self) -> bool {
        self.upsert.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse<T> {
    /// Entity as stored, if the implementation returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<bool>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
}

impl<T> CreateResponse<T> {
    /// Response for an entity that did not exist before.
    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            created: Some(true),
            updated: Some(false),
            metadata: Metadata::new(),
        }
    }

    /// Response for an entity that was overwritten by an upsert.
    pub fn updated(data: T) -> Self {
        Self {
            data: Some(data),
            created: Some(false),
            updated: Some(true),
            metadata: Metadata::new(),
        }
    }
}

/// Creates several entities at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateRequest<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsert: Option<bool>,
    /// Allow the operation to succeed for a subset of `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

impl<T> BulkCreateRequest<T> {
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            upsert: None,
            partial: None,
        }
    }

    #[must_use]
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }

    #[must_use]
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }

    pub fn is_upsert(&self) -> bool {
        self.upsert.unwrap_or(false)
    }

    pub fn is_partial(&self) -> bool {
        self.partial.unwrap_or(false)
    }
}

/// Result of a bulk create.
///
/// For a partial request, `data` holds only the entities that were stored;
/// a shorter sequence than requested signals partial success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
}

impl<T> BulkCreateResponse<T> {
    /// Returns true if fewer than `requested` entities were stored.
    pub fn is_partial_success(&self, requested: usize) -> bool {
        self.data.as_ref().is_some_and(|data| data.len() < requested)
    }
}

// ============ Read ============

/// Reads entities matching an optional filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest<F> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<F>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<F> ReadRequest<F> {
    /// A request without filter or pagination.
    #[must_use]
    pub fn all() -> Self {
        Self {
            filter: None,
            pagination: None,
        }
    }

    /// A request filtered by `filter`.
    #[must_use]
    pub fn filtered(filter: F) -> Self {
        Self {
            filter: Some(filter),
            pagination: None,
        }
    }

    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<F> Default for ReadRequest<F> {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResponse<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Keyed batch read; same shape as [`ReadRequest`].
pub type BulkReadRequest<F> = ReadRequest<F>;
pub type BulkReadResponse<T> = ReadResponse<T>;

/// Ordered window read; same shape as [`ReadRequest`].
pub type RangeReadRequest<F> = ReadRequest<F>;
pub type RangeReadResponse<T> = ReadResponse<T>;

// ============ Update ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequest<T> {
    pub data: T,
    /// Create instead of failing when the entity does not exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsert: Option<bool>,
}

impl<T> UpdateRequest<T> {
    #[must_use]
    pub fn new(data: T) -> Self {
        Self { data, upsert: None }
    }

    #[must_use]
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }

    pub fn is_upsert(&self) -> bool {
        self.upsert.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<bool>,
}

impl<T> UpdateResponse<T> {
    pub fn updated(data: T) -> Self {
        Self {
            data: Some(data),
            created: Some(false),
            updated: Some(true),
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            created: Some(true),
            updated: Some(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateRequest<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsert: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

impl<T> BulkUpdateRequest<T> {
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            upsert: None,
            partial: None,
        }
    }

    #[must_use]
    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }

    #[must_use]
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }

    pub fn is_upsert(&self) -> bool {
        self.upsert.unwrap_or(false)
    }

    pub fn is_partial(&self) -> bool {
        self.partial.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
}

impl<T> BulkUpdateResponse<T> {
    /// Returns true if fewer than `requested` entities were updated.
    pub fn is_partial_success(&self, requested: usize) -> bool {
        self.data.as_ref().is_some_and(|data| data.len() < requested)
    }
}

// ============ Delete ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest<K> {
    pub key: K,
}

impl<K> DeleteRequest<K> {
    #[must_use]
    pub fn new(key: K) -> Self {
        Self { key }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse<K> {
    /// Key of the removed entity.
    pub key: K,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteRequest<K> {
    pub keys: Vec<K>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

impl<K> BulkDeleteRequest<K> {
    #[must_use]
    pub fn new(keys: Vec<K>) -> Self {
        Self {
            keys,
            partial: None,
        }
    }

    #[must_use]
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }

    pub fn is_partial(&self) -> bool {
        self.partial.unwrap_or(false)
    }
}

/// Keys that were removed. Equal in length to the request keys unless the
/// request was partial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponse<K> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Vec<K>>,
}

impl<K> BulkDeleteResponse<K> {
    /// Returns true if fewer than `requested` keys were removed.
    pub fn is_partial_success(&self, requested: usize) -> bool {
        self.deleted.as_ref().is_some_and(|keys| keys.len() < requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_default_to_false() {
        let create = CreateRequest::new("a");
        assert!(!create.is_upsert());

        let bulk = BulkCreateRequest::new(vec!["a", "b"]);
        assert!(!bulk.is_upsert());
        assert!(!bulk.is_partial());

        let bulk = bulk.with_upsert(true).with_partial(true);
        assert!(bulk.is_upsert());
        assert!(bulk.is_partial());
    }

    #[test]
    fn test_partial_success_detection() {
        let response = BulkCreateResponse {
            data: Some(vec![1, 2]),
            metadata: Metadata::new(),
        };
        assert!(response.is_partial_success(3));
        assert!(!response.is_partial_success(2));

        let unknown: BulkCreateResponse<i32> = BulkCreateResponse {
            data: None,
            metadata: Metadata::new(),
        };
        assert!(!unknown.is_partial_success(3));

        let deleted = BulkDeleteResponse {
            deleted: Some(vec!["k1"]),
        };
        assert!(deleted.is_partial_success(2));
    }

    #[test]
    fn test_create_request_json_shape() {
        let json = serde_json::to_value(CreateRequest::new(5)).unwrap();
        assert_eq!(json, serde_json::json!({ "data": 5 }));

        let request: CreateRequest<i32> =
            serde_json::from_value(serde_json::json!({ "data": 1, "upsert": true })).unwrap();
        assert!(request.is_upsert());
    }

    #[test]
    fn test_read_request_builders() {
        let request: ReadRequest<String> =
            ReadRequest::filtered("name".to_string()).with_pagination(Pagination::with_size(5));
        assert_eq!(request.filter.as_deref(), Some("name"));
        assert_eq!(request.pagination.unwrap().size, Some(5));

        let all: ReadRequest<String> = ReadRequest::default();
        assert!(all.filter.is_none());
    }
}
