//! Request-scoped context passed to producers, `configure` and DAO calls.
//!
//! A [`Context`] is an immutable bag of named values plus an optional
//! deadline. Deriving a context (`with_value`, `with_timeout`) returns a new
//! value and leaves the parent untouched, so contexts are cheap to clone and
//! safe to share between tasks.

use crate::registry::ErasedValue;
use crate::{DaoError, DaoResult};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Immutable, cheaply clonable call context.
#[derive(Clone, Default)]
pub struct Context {
    values: Arc<HashMap<String, ErasedValue>>,
    deadline: Option<Instant>,
}

impl Context {
    /// An empty context without deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a child context carrying `value` under `key`.
    ///
    /// An existing value under the same key is shadowed in the child.
    #[must_use]
    pub fn with_value<V: Any + Send + Sync>(&self, key: impl Into<String>, value: V) -> Self {
        let mut values = (*self.values).clone();
        values.insert(key.into(), ErasedValue::new(value));
        Self {
            values: Arc::new(values),
            deadline: self.deadline,
        }
    }

    /// Looks up the value stored under `key` as `V`.
    ///
    /// Returns `Ok(None)` when nothing is stored and
    /// [`DaoError::TypeMismatch`] when the stored value has another type.
    pub fn value<V: Any + Clone>(&self, key: &str) -> DaoResult<Option<V>> {
        match self.values.get(key) {
            Some(erased) => erased.cast::<V>(key).map(Some),
            None => Ok(None),
        }
    }

    /// Returns true if a value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns a child context that expires after `timeout`.
    ///
    /// A parent deadline that is already earlier wins. A timeout too large
    /// to represent as an instant leaves the parent deadline in place.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Returns a child context that expires at `deadline`, or at the parent
    /// deadline if that comes first.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };
        Self {
            values: Arc::clone(&self.values),
            deadline: Some(deadline),
        }
    }

    /// The deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` when there is no deadline.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns true once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fails with [`DaoError::DeadlineExceeded`] once the deadline has passed.
    pub fn check(&self) -> DaoResult<()> {
        if self.is_expired() {
            return Err(DaoError::DeadlineExceeded);
        }
        Ok(())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Context")
            .field("keys", &keys)
            .field("deadline", &self.deadline)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_empty() {
        let ctx = Context::background();
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_expired());
        assert!(ctx.check().is_ok());
        assert_eq!(ctx.value::<String>("anything").unwrap(), None);
    }

    #[test]
    fn test_with_value_does_not_touch_parent() {
        let parent = Context::background();
        let child = parent.with_value("tenant", String::from("acme"));

        assert_eq!(child.value::<String>("tenant").unwrap().as_deref(), Some("acme"));
        assert!(!parent.contains("tenant"));
    }

    #[test]
    fn test_value_type_mismatch() {
        let ctx = Context::background().with_value("limit", 10_u32);
        let err = ctx.value::<String>("limit").unwrap_err();
        assert!(matches!(err, DaoError::TypeMismatch { actual: "u32", .. }));
    }

    #[test]
    fn test_shadowing() {
        let ctx = Context::background()
            .with_value("limit", 10_u32)
            .with_value("limit", 20_u32);
        assert_eq!(ctx.value::<u32>("limit").unwrap(), Some(20));
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = Context::background().with_timeout(Duration::ZERO);
        assert!(ctx.is_expired());
        assert!(matches!(ctx.check(), Err(DaoError::DeadlineExceeded)));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_earlier_parent_deadline_wins() {
        let parent = Context::background().with_timeout(Duration::from_secs(1));
        let child = parent.with_timeout(Duration::from_secs(3600));
        assert_eq!(child.deadline(), parent.deadline());

        let tighter = parent.with_timeout(Duration::ZERO);
        assert!(tighter.deadline() < parent.deadline());
    }

    #[test]
    fn test_values_survive_timeout() {
        let ctx = Context::background()
            .with_value("user", String::from("yev"))
            .with_timeout(Duration::from_secs(60));
        assert_eq!(ctx.value::<String>("user").unwrap().as_deref(), Some("yev"));
        assert!(!ctx.is_expired());
    }

    #[test]
    fn test_unrepresentable_timeout_keeps_parent_deadline() {
        let unbounded = Context::background().with_timeout(Duration::MAX);
        assert!(unbounded.deadline().is_none());
        assert!(unbounded.check().is_ok());

        let parent = Context::background().with_timeout(Duration::from_secs(60));
        let child = parent.with_timeout(Duration::MAX);
        assert_eq!(child.deadline(), parent.deadline());
    }
}
