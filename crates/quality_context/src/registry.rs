//! Resource registry.
//!
//! One generic get-or-create over every [`Resource`] kind. The registry is an
//! explicitly constructed value owned by a [`DataContext`](crate::DataContext),
//! so tests can run several isolated registries side by side.

use quality_core::{QualityError, Resource, ResourceKey, Result};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

type Entry = Arc<dyn Any + Send + Sync>;

/// Idempotent store of provisioned resources, keyed by [`ResourceKey`].
///
/// Lookups and first-time creation happen under one lock, so concurrent
/// callers for the same key converge on a single instance and a factory runs
/// at most once per key. Factories must not call back into the registry.
///
/// # Example
///
/// ```rust
/// use quality_context::Registry;
/// use quality_core::{Datasource, ResourceKey};
/// use std::sync::Arc;
///
/// let registry = Registry::new();
/// let first = registry
///     .get_or_create(ResourceKey::datasource("my_datasource"), || {
///         Ok(Datasource::new("my_datasource"))
///     })
///     .unwrap();
/// let second = registry.ensure(Datasource::new("my_datasource")).unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Default)]
pub struct Registry {
    resources: Mutex<HashMap<ResourceKey, Entry>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.keys())
            .finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single insert, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<ResourceKey, Entry>> {
        self.resources.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up a resource. A miss is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceConflict` if the key belongs to another kind or the
    /// stored value is not an `R`.
    pub fn get<R: Resource>(&self, key: &ResourceKey) -> Result<Option<Arc<R>>> {
        check_kind::<R>(key)?;
        let resources = self.lock();
        resources.get(key).map(|entry| downcast::<R>(key, entry)).transpose()
    }

    /// Returns the resource stored under `key`, creating it with `factory` on a
    /// miss.
    ///
    /// Calling this twice with the same key never runs the second factory and
    /// returns the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceConflict` if the key belongs to another kind, the
    /// stored value is not an `R`, or the factory builds a resource with a
    /// different key. Factory errors are returned as-is and nothing is stored.
    pub fn get_or_create<R, F>(&self, key: ResourceKey, factory: F) -> Result<Arc<R>>
    where
        R: Resource,
        F: FnOnce() -> Result<R>,
    {
        check_kind::<R>(&key)?;
        let mut resources = self.lock();

        if let Some(entry) = resources.get(&key) {
            debug!("Using existing {}: {}", R::KIND, key);
            return downcast(&key, entry);
        }

        let created = factory()?;
        let created_key = created.key();
        if created_key != key {
            return Err(QualityError::conflict(
                R::KIND,
                key.to_string(),
                format!("factory produced a resource keyed '{created_key}'"),
            ));
        }

        info!("Created new {}: {}", R::KIND, key);
        let created = Arc::new(created);
        resources.insert(key, created.clone());
        Ok(created)
    }

    /// Registers `requested` unless an equivalent resource already exists.
    ///
    /// # Errors
    ///
    /// Returns `ResourceConflict` if a resource with the same key exists but
    /// is incompatible with `requested` (for example an asset of another kind,
    /// or a batch definition with another slicing strategy).
    pub fn ensure<R: Resource>(&self, requested: R) -> Result<Arc<R>> {
        let key = requested.key();
        let mut resources = self.lock();

        if let Some(entry) = resources.get(&key) {
            let existing = downcast::<R>(&key, entry)?;
            if let Some(reason) = existing.incompatibility(&requested) {
                return Err(QualityError::conflict(R::KIND, key.to_string(), reason));
            }
            debug!("Using existing {}: {}", R::KIND, key);
            return Ok(existing);
        }

        info!("Created new {}: {}", R::KIND, key);
        let created = Arc::new(requested);
        resources.insert(key, created.clone());
        Ok(created)
    }

    /// Stores `resource`, replacing any previous version wholesale.
    ///
    /// Returns the previous version. Holders of the old `Arc` keep seeing the
    /// old value.
    ///
    /// # Errors
    ///
    /// Returns `ResourceConflict` if the key is held by a value of another type.
    pub fn replace<R: Resource>(&self, resource: R) -> Result<(Arc<R>, Option<Arc<R>>)> {
        let key = resource.key();
        let mut resources = self.lock();

        let previous = resources
            .get(&key)
            .map(|entry| downcast::<R>(&key, entry))
            .transpose()?;

        let current = Arc::new(resource);
        resources.insert(key.clone(), current.clone());
        if previous.is_some() {
            info!("Updated {}: {}", R::KIND, key);
        } else {
            info!("Created new {}: {}", R::KIND, key);
        }

        Ok((current, previous))
    }

    /// Returns true if any resource is stored under `key`.
    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.lock().contains_key(key)
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<ResourceKey> {
        let mut keys: Vec<ResourceKey> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn check_kind<R: Resource>(key: &ResourceKey) -> Result<()> {
    if key.kind == R::KIND {
        Ok(())
    } else {
        Err(QualityError::conflict(
            R::KIND,
            key.to_string(),
            format!("key addresses a {}", key.kind),
        ))
    }
}

fn downcast<R: Resource>(key: &ResourceKey, entry: &Entry) -> Result<Arc<R>> {
    entry.clone().downcast::<R>().map_err(|_| {
        QualityError::conflict(
            R::KIND,
            key.to_string(),
            "name is already registered with an incompatible type",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quality_core::{Asset, Datasource, ExpectationSuite, FileFormat};

    #[test]
    fn test_get_miss_is_none() {
        let registry = Registry::new();
        let found = registry
            .get::<Datasource>(&ResourceKey::datasource("nope"))
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_kind_mismatch_is_conflict() {
        let registry = Registry::new();
        let err = registry
            .get_or_create(ResourceKey::suite("x"), || Ok(Datasource::new("x")))
            .unwrap_err();
        assert!(matches!(err, QualityError::ResourceConflict { .. }));
    }

    #[test]
    fn test_factory_key_mismatch_is_conflict() {
        let registry = Registry::new();
        let err = registry
            .get_or_create(ResourceKey::datasource("a"), || Ok(Datasource::new("b")))
            .unwrap_err();
        assert!(matches!(err, QualityError::ResourceConflict { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_factory_error_stores_nothing() {
        let registry = Registry::new();
        let result: Result<Arc<Datasource>> =
            registry.get_or_create(ResourceKey::datasource("a"), || {
                Err(QualityError::Configuration("boom".to_string()))
            });
        assert!(result.is_err());
        assert!(!registry.contains(&ResourceKey::datasource("a")));
    }

    #[test]
    fn test_ensure_rejects_incompatible_asset() {
        let registry = Registry::new();
        let datasource = Datasource::new("ds");
        registry
            .ensure(Asset::file(&datasource, "data", FileFormat::Csv))
            .unwrap();

        let err = registry
            .ensure(Asset::file(&datasource, "data", FileFormat::Parquet))
            .unwrap_err();
        assert!(matches!(err, QualityError::ResourceConflict { .. }));

        assert!(registry.ensure(Asset::file(&datasource, "data", FileFormat::Csv)).is_ok());
    }

    #[test]
    fn test_replace_returns_previous() {
        let registry = Registry::new();
        let (first, previous) = registry.replace(ExpectationSuite::new("s")).unwrap();
        assert!(previous.is_none());
        assert!(first.is_empty());

        let mut updated = (*first).clone();
        updated.add(quality_core::ExpectationConfig::unique("id"));
        let (current, previous) = registry.replace(updated).unwrap();

        assert_eq!(current.len(), 1);
        assert!(Arc::ptr_eq(&previous.unwrap(), &first));
        assert!(first.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_keys_sorted() {
        let registry = Registry::new();
        registry.ensure(ExpectationSuite::new("b")).unwrap();
        registry.ensure(Datasource::new("z")).unwrap();
        registry.ensure(ExpectationSuite::new("a")).unwrap();

        assert_eq!(
            registry.keys(),
            vec![
                ResourceKey::datasource("z"),
                ResourceKey::suite("a"),
                ResourceKey::suite("b"),
            ]
        );
    }
}
