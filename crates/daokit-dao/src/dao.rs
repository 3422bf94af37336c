//! The DAO contract.

use crate::types::{
    BulkCreateRequest, BulkCreateResponse, BulkDeleteRequest, BulkDeleteResponse,
    BulkReadRequest, BulkReadResponse, BulkUpdateRequest, BulkUpdateResponse, CreateRequest,
    CreateResponse, DeleteRequest, DeleteResponse, RangeReadRequest, RangeReadResponse,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
use async_trait::async_trait;
use daokit_config::Configurable;
use daokit_core::{Context, DaoResult};
use std::sync::Arc;

/// Data Access Object over one entity type.
///
/// - `Key` uniquely identifies an entity.
/// - `Entity` is the stored object.
/// - `Filter` is whatever predicate type the implementation accepts in read
///   requests, typically `daokit_filter::Filter`.
///
/// [`Configurable::configure`] must be called once before any other
/// operation. Transactions are not part of the contract; they travel in the
/// [`Context`] (see [`crate::tx`]).
#[async_trait]
pub trait Dao: Configurable {
    type Key: Send + Sync + 'static;
    type Entity: Send + Sync + 'static;
    type Filter: Send + Sync + 'static;

    /// Releases resources held by the implementation.
    async fn close(&self) -> DaoResult<()>;

    /// Creates an entity.
    async fn create(
        &self,
        ctx: &Context,
        request: CreateRequest<Self::Entity>,
    ) -> DaoResult<CreateResponse<Self::Entity>>;

    /// Creates several entities.
    async fn bulk_create(
        &self,
        ctx: &Context,
        request: BulkCreateRequest<Self::Entity>,
    ) -> DaoResult<BulkCreateResponse<Self::Entity>>;

    /// Returns the entities matching the request.
    async fn read(
        &self,
        ctx: &Context,
        request: ReadRequest<Self::Filter>,
    ) -> DaoResult<ReadResponse<Self::Entity>>;

    /// Keyed batch read. Keys without an entity are simply absent from the
    /// response.
    async fn bulk_read(
        &self,
        ctx: &Context,
        request: BulkReadRequest<Self::Filter>,
    ) -> DaoResult<BulkReadResponse<Self::Entity>>;

    /// Returns an ordered window of entities.
    async fn range_read(
        &self,
        ctx: &Context,
        request: RangeReadRequest<Self::Filter>,
    ) -> DaoResult<RangeReadResponse<Self::Entity>>;

    /// Updates an entity.
    async fn update(
        &self,
        ctx: &Context,
        request: UpdateRequest<Self::Entity>,
    ) -> DaoResult<UpdateResponse<Self::Entity>>;

    /// Updates several entities.
    async fn bulk_update(
        &self,
        ctx: &Context,
        request: BulkUpdateRequest<Self::Entity>,
    ) -> DaoResult<BulkUpdateResponse<Self::Entity>>;

    /// Removes an entity.
    async fn delete(
        &self,
        ctx: &Context,
        request: DeleteRequest<Self::Key>,
    ) -> DaoResult<DeleteResponse<Self::Key>>;

    /// Removes several entities.
    async fn bulk_delete(
        &self,
        ctx: &Context,
        request: BulkDeleteRequest<Self::Key>,
    ) -> DaoResult<BulkDeleteResponse<Self::Key>>;
}

/// A shared, type-erased DAO as stored in the registry and handed out by
/// factories.
pub type SharedDao<K, T, F> = Arc<dyn Dao<Key = K, Entity = T, Filter = F>>;
