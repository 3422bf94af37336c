//! In-memory DAO.

use crate::matcher::Matcher;
use crate::page::Window;
use crate::record::{MemoryConfig, Record};
use async_trait::async_trait;
use daokit_config::{downcast_config, Configurable, SharedConfig};
use daokit_core::{Context, DaoError, DaoResult, Pagination};
use daokit_dao::{
    BulkCreateRequest, BulkCreateResponse, BulkDeleteRequest, BulkDeleteResponse, BulkReadRequest,
    BulkReadResponse, BulkUpdateRequest, BulkUpdateResponse, CreateRequest, CreateResponse, Dao,
    DeleteRequest, DeleteResponse, Metadata, RangeReadRequest, RangeReadResponse, ReadRequest,
    ReadResponse, UpdateRequest, UpdateResponse,
};
use daokit_filter::Filter;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Metadata key listing the request indices a partial bulk operation skipped.
pub const FAILED_METADATA_KEY: &str = "failed";

#[derive(Debug, Clone, Copy)]
enum PutMode {
    Create { upsert: bool },
    Update { upsert: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Created,
    Updated,
}

struct Stored<R> {
    seq: u64,
    record: R,
}

struct State<R> {
    records: BTreeMap<String, Stored<R>>,
    next_seq: u64,
}

impl<R> State<R> {
    fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Checks whether `put` would succeed, counting keys in `pending` as
    /// already stored.
    fn check_put(&self, key: &str, mode: PutMode, pending: &HashSet<String>) -> DaoResult<()> {
        let exists = self.records.contains_key(key) || pending.contains(key);
        match mode {
            PutMode::Create { upsert: false } if exists => {
                Err(DaoError::conflict(format!("record '{key}' already exists")))
            }
            PutMode::Update { upsert: false } if !exists => Err(DaoError::not_found("record", key)),
            _ => Ok(()),
        }
    }

    fn put(&mut self, key: String, record: R, mode: PutMode) -> DaoResult<Outcome> {
        self.check_put(&key, mode, &HashSet::new())?;

        if let Some(stored) = self.records.get_mut(&key) {
            stored.record = record;
            return Ok(Outcome::Updated);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.insert(key, Stored { seq, record });
        Ok(Outcome::Created)
    }
}

/// A [`Dao`] storing records of type `R` in memory, keyed by
/// [`Record::key`].
///
/// Must be configured with a [`MemoryConfig`] before use. Records created
/// without a key get a random UUID. `read` and `bulk_read` return matches in
/// insertion order, `range_read` in key order.
pub struct MemoryDao<R> {
    state: RwLock<State<R>>,
    settings: RwLock<Option<MemoryConfig>>,
    configure_calls: AtomicUsize,
}

impl<R: Record> MemoryDao<R> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::new()),
            settings: RwLock::new(None),
            configure_calls: AtomicUsize::new(0),
        }
    }

    /// Number of `configure` calls so far, including rejected ones.
    pub fn configure_calls(&self) -> usize {
        self.configure_calls.load(Ordering::SeqCst)
    }

    /// The applied configuration, once configured.
    pub fn settings(&self) -> Option<MemoryConfig> {
        self.settings.read().clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    fn require_settings(&self) -> DaoResult<MemoryConfig> {
        self.settings()
            .ok_or_else(|| DaoError::configuration("memory dao is not configured"))
    }

    fn check_batch(settings: &MemoryConfig, len: usize) -> DaoResult<()> {
        if len > settings.max_batch_size {
            return Err(DaoError::validation(format!(
                "batch of {len} exceeds max batch size {}",
                settings.max_batch_size
            )));
        }
        Ok(())
    }

    /// Returns the key of `record`, assigning a fresh one if it has none.
    fn ensure_key(record: &mut R) -> String {
        if let Some(key) = record.key() {
            return key.to_string();
        }
        let key = Uuid::new_v4().to_string();
        record.set_key(key.clone());
        key
    }

    fn require_key(record: &R) -> DaoResult<String> {
        record
            .key()
            .map(str::to_string)
            .ok_or_else(|| DaoError::validation("record has no key"))
    }

    /// Stores a batch. Without `partial` the batch is validated up front and
    /// applied all-or-nothing; with it, failing items are skipped and their
    /// indices reported under [`FAILED_METADATA_KEY`].
    fn put_all(
        &self,
        items: Vec<DaoResult<(String, R)>>,
        mode: PutMode,
        partial: bool,
    ) -> DaoResult<(Vec<R>, Metadata)> {
        let mut state = self.state.write();

        if !partial {
            let items = items.into_iter().collect::<DaoResult<Vec<_>>>()?;
            let mut pending = HashSet::new();
            for (key, _) in &items {
                state.check_put(key, mode, &pending)?;
                pending.insert(key.clone());
            }
            let stored = items
                .into_iter()
                .map(|(key, record)| {
                    state.put(key, record.clone(), mode)?;
                    Ok(record)
                })
                .collect::<DaoResult<Vec<_>>>()?;
            return Ok((stored, Metadata::new()));
        }

        let mut stored = Vec::with_capacity(items.len());
        let mut failed = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            let result = item.and_then(|(key, record)| {
                state.put(key, record.clone(), mode)?;
                Ok(record)
            });
            match result {
                Ok(record) => stored.push(record),
                Err(err) => {
                    debug!(index, error = %err, "Skipping item of partial bulk operation");
                    failed.push(index);
                }
            }
        }

        let mut metadata = Metadata::new();
        if !failed.is_empty() {
            warn!(failed = failed.len(), "Partial bulk operation skipped items");
            metadata.insert(FAILED_METADATA_KEY.to_string(), serde_json::json!(failed));
        }
        Ok((stored, metadata))
    }

    /// Records matching `filter`, ordered by insertion or by key.
    fn select(&self, filter: Option<&Filter>, by_key: bool) -> DaoResult<Vec<R>> {
        let matcher = Matcher::compile_optional(filter)?;
        let state = self.state.read();

        let mut matches: Vec<(u64, &R)> = Vec::new();
        for stored in state.records.values() {
            let document = serde_json::to_value(&stored.record)?;
            if matcher.matches(&document) {
                matches.push((stored.seq, &stored.record));
            }
        }
        if !by_key {
            matches.sort_by_key(|(seq, _)| *seq);
        }

        Ok(matches.into_iter().map(|(_, record)| record.clone()).collect())
    }

    fn page(
        matches: Vec<R>,
        pagination: Option<&Pagination>,
        default_size: usize,
    ) -> DaoResult<ReadResponse<R>> {
        let window = Window::resolve(pagination, default_size)?;
        let (data, pagination) = window.apply(matches);
        Ok(ReadResponse {
            data,
            pagination: Some(pagination),
        })
    }
}

impl<R: Record> Default for MemoryDao<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for MemoryDao<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDao")
            .field("records", &self.state.read().records.len())
            .field("settings", &*self.settings.read())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: Record> Configurable for MemoryDao<R> {
    async fn configure(&self, ctx: &Context, config: SharedConfig) -> DaoResult<()> {
        self.configure_calls.fetch_add(1, Ordering::SeqCst);
        ctx.check()?;

        let memory = downcast_config::<MemoryConfig>(&config)?;
        if memory.max_batch_size == 0 {
            return Err(DaoError::configuration("max_batch_size must be at least 1"));
        }

        *self.settings.write() = Some(memory.clone());
        info!(max_batch_size = memory.max_batch_size, "Memory DAO configured");
        Ok(())
    }
}

#[async_trait]
impl<R: Record> Dao for MemoryDao<R> {
    type Key = String;
    type Entity = R;
    type Filter = Filter;

    async fn close(&self) -> DaoResult<()> {
        let mut state = self.state.write();
        let dropped = state.records.len();
        *state = State::new();
        info!(dropped, "Memory DAO closed");
        Ok(())
    }

    async fn create(&self, ctx: &Context, request: CreateRequest<R>) -> DaoResult<CreateResponse<R>> {
        ctx.check()?;
        self.require_settings()?;

        let upsert = request.is_upsert();
        let mut record = request.data;
        let key = Self::ensure_key(&mut record);
        let outcome = self
            .state
            .write()
            .put(key.clone(), record.clone(), PutMode::Create { upsert })?;

        debug!(key = %key, ?outcome, "Record stored");
        Ok(match outcome {
            Outcome::Created => CreateResponse::created(record),
            Outcome::Updated => CreateResponse::updated(record),
        })
    }

    async fn bulk_create(
        &self,
        ctx: &Context,
        request: BulkCreateRequest<R>,
    ) -> DaoResult<BulkCreateResponse<R>> {
        ctx.check()?;
        let settings = self.require_settings()?;
        Self::check_batch(&settings, request.data.len())?;

        let mode = PutMode::Create {
            upsert: request.is_upsert(),
        };
        let partial = request.is_partial();
        let items = request
            .data
            .into_iter()
            .map(|mut record| Ok((Self::ensure_key(&mut record), record)))
            .collect();

        let (data, metadata) = self.put_all(items, mode, partial)?;
        Ok(BulkCreateResponse {
            data: Some(data),
            metadata,
        })
    }

    async fn read(&self, ctx: &Context, request: ReadRequest<Filter>) -> DaoResult<ReadResponse<R>> {
        ctx.check()?;
        let settings = self.require_settings()?;
        let matches = self.select(request.filter.as_ref(), false)?;
        Self::page(matches, request.pagination.as_ref(), settings.max_batch_size)
    }

    async fn bulk_read(
        &self,
        ctx: &Context,
        request: BulkReadRequest<Filter>,
    ) -> DaoResult<BulkReadResponse<R>> {
        ctx.check()?;
        self.require_settings()?;
        let matches = self.select(request.filter.as_ref(), false)?;
        let whole = matches.len();
        Self::page(matches, request.pagination.as_ref(), whole)
    }

    async fn range_read(
        &self,
        ctx: &Context,
        request: RangeReadRequest<Filter>,
    ) -> DaoResult<RangeReadResponse<R>> {
        ctx.check()?;
        let settings = self.require_settings()?;
        let matches = self.select(request.filter.as_ref(), true)?;
        Self::page(matches, request.pagination.as_ref(), settings.max_batch_size)
    }

    async fn update(&self, ctx: &Context, request: UpdateRequest<R>) -> DaoResult<UpdateResponse<R>> {
        ctx.check()?;
        self.require_settings()?;

        let upsert = request.is_upsert();
        let record = request.data;
        let key = Self::require_key(&record)?;
        let outcome = self
            .state
            .write()
            .put(key.clone(), record.clone(), PutMode::Update { upsert })?;

        debug!(key = %key, ?outcome, "Record stored");
        Ok(match outcome {
            Outcome::Created => UpdateResponse::created(record),
            Outcome::Updated => UpdateResponse::updated(record),
        })
    }

    async fn bulk_update(
        &self,
        ctx: &Context,
        request: BulkUpdateRequest<R>,
    ) -> DaoResult<BulkUpdateResponse<R>> {
        ctx.check()?;
        let settings = self.require_settings()?;
        Self::check_batch(&settings, request.data.len())?;

        let mode = PutMode::Update {
            upsert: request.is_upsert(),
        };
        let partial = request.is_partial();
        let items = request
            .data
            .into_iter()
            .map(|record| Self::require_key(&record).map(|key| (key, record)))
            .collect();

        let (data, metadata) = self.put_all(items, mode, partial)?;
        Ok(BulkUpdateResponse {
            data: Some(data),
            metadata,
        })
    }

    async fn delete(
        &self,
        ctx: &Context,
        request: DeleteRequest<String>,
    ) -> DaoResult<DeleteResponse<String>> {
        ctx.check()?;
        self.require_settings()?;

        if self.state.write().records.remove(&request.key).is_none() {
            return Err(DaoError::not_found("record", &request.key));
        }
        debug!(key = %request.key, "Record deleted");
        Ok(DeleteResponse { key: request.key })
    }

    async fn bulk_delete(
        &self,
        ctx: &Context,
        request: BulkDeleteRequest<String>,
    ) -> DaoResult<BulkDeleteResponse<String>> {
        ctx.check()?;
        let settings = self.require_settings()?;
        Self::check_batch(&settings, request.keys.len())?;

        let partial = request.is_partial();
        let mut state = self.state.write();

        if !partial {
            let mut seen = HashSet::new();
            for key in &request.keys {
                if !state.records.contains_key(key) || !seen.insert(key) {
                    return Err(DaoError::not_found("record", key));
                }
            }
        }

        let deleted: Vec<String> = request
            .keys
            .into_iter()
            .filter(|key| state.records.remove(key).is_some())
            .collect();

        debug!(deleted = deleted.len(), "Records deleted");
        Ok(BulkDeleteResponse {
            deleted: Some(deleted),
        })
    }
}
