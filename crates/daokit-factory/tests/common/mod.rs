//! Counting stub DAO shared by the factory tests.

use async_trait::async_trait;
use daokit_config::{downcast_config, Configurable, SharedConfig};
use daokit_core::{Context, DaoError, DaoResult};
use daokit_dao::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct StubConfig {
    pub max_batch_size: usize,
}

/// DAO that records how often it was configured and with what.
#[derive(Default)]
pub struct CountingDao {
    configure_calls: AtomicUsize,
    max_batch_size: AtomicUsize,
    failures_left: AtomicUsize,
    delay: Duration,
}

impl CountingDao {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A stub whose first `failures` configure calls fail.
    pub fn failing(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            failures_left: AtomicUsize::new(failures),
            ..Self::default()
        })
    }

    /// A stub that takes `delay` to configure.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::default()
        })
    }

    pub fn configure_calls(&self) -> usize {
        self.configure_calls.load(Ordering::SeqCst)
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Configurable for CountingDao {
    async fn configure(&self, _ctx: &Context, config: SharedConfig) -> DaoResult<()> {
        self.configure_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(DaoError::configuration("stub configure failure"));
        }

        let stub = downcast_config::<StubConfig>(&config)?;
        self.max_batch_size.store(stub.max_batch_size, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Dao for CountingDao {
    type Key = String;
    type Entity = String;
    type Filter = ();

    async fn close(&self) -> DaoResult<()> {
        Ok(())
    }

    async fn create(
        &self,
        _ctx: &Context,
        request: CreateRequest<String>,
    ) -> DaoResult<CreateResponse<String>> {
        Ok(CreateResponse::created(request.data))
    }

    async fn bulk_create(
        &self,
        _ctx: &Context,
        request: BulkCreateRequest<String>,
    ) -> DaoResult<BulkCreateResponse<String>> {
        Ok(BulkCreateResponse {
            data: Some(request.data),
            metadata: Metadata::new(),
        })
    }

    async fn read(&self, _ctx: &Context, _request: ReadRequest<()>) -> DaoResult<ReadResponse<String>> {
        Ok(ReadResponse {
            data: Vec::new(),
            pagination: None,
        })
    }

    async fn bulk_read(
        &self,
        ctx: &Context,
        request: BulkReadRequest<()>,
    ) -> DaoResult<BulkReadResponse<String>> {
        self.read(ctx, request).await
    }

    async fn range_read(
        &self,
        ctx: &Context,
        request: RangeReadRequest<()>,
    ) -> DaoResult<RangeReadResponse<String>> {
        self.read(ctx, request).await
    }

    async fn update(
        &self,
        _ctx: &Context,
        request: UpdateRequest<String>,
    ) -> DaoResult<UpdateResponse<String>> {
        Ok(UpdateResponse::updated(request.data))
    }

    async fn bulk_update(
        &self,
        _ctx: &Context,
        request: BulkUpdateRequest<String>,
    ) -> DaoResult<BulkUpdateResponse<String>> {
        Ok(BulkUpdateResponse {
            data: Some(request.data),
            metadata: Metadata::new(),
        })
    }

    async fn delete(
        &self,
        _ctx: &Context,
        request: DeleteRequest<String>,
    ) -> DaoResult<DeleteResponse<String>> {
        Ok(DeleteResponse { key: request.key })
    }

    async fn bulk_delete(
        &self,
        _ctx: &Context,
        request: BulkDeleteRequest<String>,
    ) -> DaoResult<BulkDeleteResponse<String>> {
        Ok(BulkDeleteResponse {
            deleted: Some(request.keys),
        })
    }
}
