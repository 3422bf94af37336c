//! Offset-based paging with opaque tokens.
//!
//! A token is the big-endian start index of the page it points to. Callers
//! must treat it as opaque bytes.

use daokit_core::{DaoError, DaoResult, PageCursor, Pagination};

const TOKEN_LEN: usize = 8;

fn encode_token(start: usize) -> Vec<u8> {
    (start as u64).to_be_bytes().to_vec()
}

fn decode_token(token: &[u8]) -> DaoResult<usize> {
    let bytes: [u8; TOKEN_LEN] = token
        .try_into()
        .map_err(|_| DaoError::validation("malformed page token"))?;
    usize::try_from(u64::from_be_bytes(bytes))
        .map_err(|_| DaoError::validation("page token out of range"))
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub start: usize,
    pub size: usize,
}

impl Window {
    /// Resolves `pagination` into a window. `offset` counts pages of the
    /// requested size; tokens carry an item index. A previous-page token
    /// resolves to its index plus `size`.
    pub fn resolve(pagination: Option<&Pagination>, default_size: usize) -> DaoResult<Self> {
        let Some(pagination) = pagination else {
            return Ok(Self {
                start: 0,
                size: default_size.max(1),
            });
        };

        let size = usize::try_from(pagination.size_or(default_size as u64))
            .map_err(|_| DaoError::validation("page size out of range"))?;
        let start = match pagination.cursor() {
            PageCursor::Next(token) => decode_token(token)?,
            PageCursor::Prev(token) => decode_token(token)?
                .checked_add(size)
                .ok_or_else(|| DaoError::validation("page token out of range"))?,
            PageCursor::Offset(offset) => usize::try_from(offset)
                .ok()
                .and_then(|offset| offset.checked_mul(size))
                .ok_or_else(|| DaoError::validation("page offset out of range"))?,
            PageCursor::Start => 0,
        };

        Ok(Self { start, size })
    }

    /// Cuts this window out of `items` and describes it.
    pub fn apply<T>(self, items: Vec<T>) -> (Vec<T>, Pagination) {
        let total = items.len();
        let end = self.start.saturating_add(self.size).min(total);
        let has_next = end < total;

        let page: Vec<T> = items
            .into_iter()
            .skip(self.start)
            .take(end.saturating_sub(self.start))
            .collect();

        let pagination = Pagination {
            offset: Some((self.start / self.size) as u64),
            size: Some(self.size as u64),
            next_token: has_next.then(|| encode_token(end)),
            prev_token: (self.start > 0).then(|| encode_token(self.start.saturating_sub(self.size))),
            total: Some(total as u64),
            has_next: Some(has_next),
        };
        (page, pagination)
    }
}
