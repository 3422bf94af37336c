//! Name-keyed registries.
//!
//! [`Registry`] stores values of one static type. [`AnyRegistry`] stores
//! heterogeneous values behind an erased box and checks the requested type
//! on every lookup.

use crate::{DaoError, DaoResult};
use parking_lot::Mutex;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A name-keyed store of values of type `T`.
///
/// One exclusive lock guards the whole table, so `register` and `get` are
/// mutually exclusive on the same instance. Neither call re-enters the
/// registry.
pub struct Registry<T> {
    kind: &'static str,
    entries: Mutex<HashMap<String, T>>,
}

impl<T> Registry<T> {
    /// Creates an empty registry. `kind` names the stored values in logs
    /// and lookup errors (e.g. `"dao"`, `"config producer"`).
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the kind of value stored here.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Registers `value` under `name`.
    ///
    /// Fails with [`DaoError::DuplicateName`] when the name is taken; the
    /// existing entry is left untouched.
    pub fn register(&self, name: impl Into<String>, value: T) -> DaoResult<()> {
        let name = name.into();
        let mut entries = self.entries.lock();

        if entries.contains_key(&name) {
            warn!(kind = self.kind, name = %name, "Rejected duplicate registration");
            return Err(DaoError::duplicate(name));
        }

        info!(kind = self.kind, name = %name, "Registered");
        entries.insert(name, value);
        Ok(())
    }

    /// Returns true if a value is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains_key(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered values.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Runs `f` against the value stored under `name`, under the lock.
    fn with_entry<R>(&self, name: &str, f: impl FnOnce(&T) -> DaoResult<R>) -> DaoResult<R> {
        let entries = self.entries.lock();
        match entries.get(name) {
            Some(value) => {
                debug!(kind = self.kind, name = %name, "Registry hit");
                f(value)
            }
            None => {
                debug!(kind = self.kind, name = %name, "Registry miss");
                Err(DaoError::not_found(self.kind, name))
            }
        }
    }
}

impl<T: Clone> Registry<T> {
    /// Returns a clone of the value registered under `name`.
    ///
    /// Fails with [`DaoError::NotFound`] when nothing is registered.
    pub fn get(&self, name: &str) -> DaoResult<T> {
        self.with_entry(name, |value| Ok(value.clone()))
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}

/// A value stored without its static type, tagged with its type name.
#[derive(Clone)]
pub struct ErasedValue {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl ErasedValue {
    /// Erases `value`, remembering its type name for mismatch reports.
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        Self {
            type_name: type_name::<V>(),
            value: Arc::new(value),
        }
    }

    /// Type name of the stored value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrows the stored value as `V`, if it is one.
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.value.downcast_ref::<V>()
    }

    /// Clones the stored value out as `V`, or reports a type mismatch
    /// attributed to `name`.
    pub fn cast<V: Any + Clone>(&self, name: &str) -> DaoResult<V> {
        self.downcast_ref::<V>()
            .cloned()
            .ok_or_else(|| DaoError::type_mismatch(name, self.type_name, type_name::<V>()))
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A registry of heterogeneous values, type-checked at lookup.
#[derive(Debug)]
pub struct AnyRegistry {
    inner: Registry<ErasedValue>,
}

impl AnyRegistry {
    /// Creates an empty registry.
    pub fn new(kind: &'static str) -> Self {
        Self {
            inner: Registry::new(kind),
        }
    }

    /// Registers any value under `name`. The type is not validated here.
    pub fn register<V: Any + Send + Sync>(&self, name: impl Into<String>, value: V) -> DaoResult<()> {
        self.inner.register(name, ErasedValue::new(value))
    }

    /// Returns the value under `name` viewed as `V`.
    ///
    /// Fails with [`DaoError::NotFound`] for unknown names and with
    /// [`DaoError::TypeMismatch`] when the stored value is not a `V`.
    pub fn get<V: Any + Clone>(&self, name: &str) -> DaoResult<V> {
        self.inner.with_entry(name, |erased| {
            erased.cast::<V>(name).map_err(|err| {
                warn!(
                    name = %name,
                    actual = erased.type_name(),
                    expected = type_name::<V>(),
                    "Registered value has unexpected type"
                );
                err
            })
        })
    }

    /// Type name of the value registered under `name`.
    pub fn type_name_of(&self, name: &str) -> DaoResult<&'static str> {
        self.inner.with_entry(name, |erased| Ok(erased.type_name()))
    }

    /// Returns true if a value is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.inner.names()
    }

    /// Number of registered values.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_register_and_get() {
        let registry = Registry::new("number");
        registry.register("one", 1_u32).unwrap();
        registry.register("two", 2_u32).unwrap();

        assert_eq!(registry.get("one").unwrap(), 1);
        assert_eq!(registry.get("two").unwrap(), 2);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_duplicate_registration_keeps_first_value() {
        let registry = Registry::new("number");
        registry.register("one", 1_u32).unwrap();

        let err = registry.register("one", 100_u32).unwrap_err();
        assert!(matches!(err, DaoError::DuplicateName { ref name } if name == "one"));
        assert_eq!(registry.get("one").unwrap(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown_name() {
        let registry: Registry<u32> = Registry::new("number");
        let err = registry.get("missing").unwrap_err();
        assert!(matches!(
            err,
            DaoError::NotFound { kind: "number", ref name } if name == "missing"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_any_registry_type_check() {
        let registry = AnyRegistry::new("value");
        registry.register("text", String::from("hello")).unwrap();

        assert_eq!(registry.get::<String>("text").unwrap(), "hello");

        let err = registry.get::<u64>("text").unwrap_err();
        match err {
            DaoError::TypeMismatch {
                name,
                actual,
                expected,
            } => {
                assert_eq!(name, "text");
                assert_eq!(actual, type_name::<String>());
                assert_eq!(expected, type_name::<u64>());
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_any_registry_not_found_and_duplicate() {
        let registry = AnyRegistry::new("value");
        assert!(registry.get::<String>("nope").unwrap_err().is_not_found());

        registry.register("v", 1_i32).unwrap();
        assert!(matches!(
            registry.register("v", "other"),
            Err(DaoError::DuplicateName { .. })
        ));
        assert_eq!(registry.get::<i32>("v").unwrap(), 1);
        assert_eq!(registry.type_name_of("v").unwrap(), "i32");
    }

    #[test]
    fn test_concurrent_registration_has_single_winner() {
        let registry = Arc::new(Registry::new("number"));
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.register("shared", i).is_ok())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(registry.len(), 1);
    }
}
