//! Pagination shared by read requests and responses.
//!
//! The usual flow:
//!
//! 1. Send an empty [`Pagination`] (or one with only `size`) in a request.
//! 2. Take `next_token` from the response pagination.
//! 3. Put it into the next request and repeat until `has_next` is `Some(false)`.
//!
//! Tokens are opaque bytes; only the DAO that issued a token knows its format.

use serde::{Deserialize, Serialize};

/// Page-by-page processing information, used identically on the request and
/// response side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page offset to start from. Lowest priority in requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Page size, at least 1. Implementations pick a default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Token of the next page. Highest priority in requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<Vec<u8>>,

    /// Token of the previous page. Beats `offset`, loses to `next_token`.
    ///
    /// When a request carries it without `next_token`, the read starts at
    /// the token's position plus `size`, which is the page that issued it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_token: Option<Vec<u8>>,

    /// Overall entity count. Response-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Whether at least one more item follows this page. Response-only;
    /// `None` means unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_next: Option<bool>,
}

/// Where a request asks a read to start, after applying token precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor<'a> {
    /// Continue after the page that issued this token.
    Next(&'a [u8]),
    /// Start at the token's position plus the page size, i.e. replay the
    /// page that issued this token.
    Prev(&'a [u8]),
    /// Start at an absolute offset.
    Offset(u64),
    /// Nothing given: start from the beginning.
    Start,
}

impl Pagination {
    /// A request for the first page of `size` items.
    #[must_use]
    pub fn with_size(size: u64) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// A request continuing from `token`.
    #[must_use]
    pub fn after(token: Vec<u8>, size: Option<u64>) -> Self {
        Self {
            next_token: Some(token),
            size,
            ..Self::default()
        }
    }

    /// A request starting at `offset`.
    #[must_use]
    pub fn at_offset(offset: u64, size: Option<u64>) -> Self {
        Self {
            offset: Some(offset),
            size,
            ..Self::default()
        }
    }

    /// Resolves the starting point of a request.
    ///
    /// `next_token` dominates `prev_token`, which dominates `offset`.
    /// Response-only fields are ignored.
    #[must_use]
    pub fn cursor(&self) -> PageCursor<'_> {
        if let Some(token) = &self.next_token {
            return PageCursor::Next(token);
        }
        if let Some(token) = &self.prev_token {
            return PageCursor::Prev(token);
        }
        match self.offset {
            Some(offset) => PageCursor::Offset(offset),
            None => PageCursor::Start,
        }
    }

    /// Page size, falling back to `default` and never below 1.
    #[must_use]
    pub fn size_or(&self, default: u64) -> u64 {
        self.size.unwrap_or(default).max(1)
    }

    /// Copy of this pagination with response-only fields cleared, suitable
    /// for forwarding as a request.
    #[must_use]
    pub fn as_request(&self) -> Self {
        Self {
            total: None,
            has_next: None,
            ..self.clone()
        }
    }

    /// Returns true if the response says another page follows.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_next == Some(true)
    }
}
