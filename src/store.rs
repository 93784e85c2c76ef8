//! Schema persistence collaborator: store trait, in-memory reference
//! implementation, and a time-boxed read-through cache.
//!
//! The store is the one asynchronous boundary of the system; the
//! interpretation engine itself only ever consumes an already-materialized
//! [`UIComponentSchema`]. Create/update run the strict authoring validator,
//! the interpreter's lenient runtime behavior notwithstanding: bad schemas
//! are rejected before they are saved, saved schemas are never crashed on.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use schema_types::UIComponentSchema;

use crate::authoring;

/// Store-level failures. `NotFound` is an expected outcome for `get`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("schema not found: {component_id}")]
    NotFound { component_id: String },
    #[error("schema already exists: {component_id}")]
    AlreadyExists { component_id: String },
    /// The schema failed strict authoring validation; carries the stable
    /// structural error codes.
    #[error("schema failed validation: [{}]", .codes.join(", "))]
    Invalid { codes: Vec<String> },
}

/// Asynchronous schema persistence surface.
///
/// Implementations are agnostic to storage format; the engine requires only
/// fully materialized schema values.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    async fn get(&self, component_id: &str) -> Result<UIComponentSchema, StoreError>;
    /// All stored schemas, ordered by componentId for determinism.
    async fn list(&self) -> Result<Vec<UIComponentSchema>, StoreError>;
    async fn create(&self, schema: UIComponentSchema) -> Result<(), StoreError>;
    async fn update(&self, schema: UIComponentSchema) -> Result<(), StoreError>;
    async fn delete(&self, component_id: &str) -> Result<(), StoreError>;
}

/// In-memory reference store.
#[derive(Debug, Default)]
pub struct InMemorySchemaStore {
    schemas: RwLock<HashMap<String, UIComponentSchema>>,
}

impl InMemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_strict(schema: &UIComponentSchema) -> Result<(), StoreError> {
    let report = authoring::validate_schema(schema);
    if report.is_valid() {
        Ok(())
    } else {
        Err(StoreError::Invalid {
            codes: report.errors.iter().map(|e| e.code().to_string()).collect(),
        })
    }
}

#[async_trait]
impl SchemaStore for InMemorySchemaStore {
    async fn get(&self, component_id: &str) -> Result<UIComponentSchema, StoreError> {
        self.schemas
            .read()
            .await
            .get(component_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                component_id: component_id.to_string(),
            })
    }

    async fn list(&self) -> Result<Vec<UIComponentSchema>, StoreError> {
        let mut schemas: Vec<_> = self.schemas.read().await.values().cloned().collect();
        schemas.sort_by(|a, b| a.component_id.cmp(&b.component_id));
        Ok(schemas)
    }

    async fn create(&self, schema: UIComponentSchema) -> Result<(), StoreError> {
        check_strict(&schema)?;
        let mut schemas = self.schemas.write().await;
        if schemas.contains_key(&schema.component_id) {
            return Err(StoreError::AlreadyExists {
                component_id: schema.component_id,
            });
        }
        schemas.insert(schema.component_id.clone(), schema);
        Ok(())
    }

    async fn update(&self, schema: UIComponentSchema) -> Result<(), StoreError> {
        check_strict(&schema)?;
        let mut schemas = self.schemas.write().await;
        if !schemas.contains_key(&schema.component_id) {
            return Err(StoreError::NotFound {
                component_id: schema.component_id,
            });
        }
        schemas.insert(schema.component_id.clone(), schema);
        Ok(())
    }

    async fn delete(&self, component_id: &str) -> Result<(), StoreError> {
        let mut schemas = self.schemas.write().await;
        schemas
            .remove(component_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                component_id: component_id.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// TTL cache
// ---------------------------------------------------------------------------

/// One cached schema with its insertion timestamp. Entries are immutable
/// value objects: a write fully replaces the entry, so a read returns either
/// a complete prior value or nothing.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub schema: UIComponentSchema,
    pub inserted_at: DateTime<Utc>,
}

/// Pure expiry predicate: an entry is live while it is strictly younger
/// than the time-to-live.
pub fn is_expired(entry: &CacheEntry, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(entry.inserted_at) >= ttl
}

/// Explicit `(key) -> (value, insertedAt)` cache. Time is threaded in by the
/// caller rather than read ambiently, which keeps expiry testable.
#[derive(Debug)]
pub struct SchemaCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl SchemaCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Live value for a key, or `None` when absent or expired.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<&UIComponentSchema> {
        self.entries
            .get(key)
            .filter(|entry| !is_expired(entry, now, self.ttl))
            .map(|entry| &entry.schema)
    }

    pub fn insert(&mut self, key: &str, schema: UIComponentSchema, now: DateTime<Utc>) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                schema,
                inserted_at: now,
            },
        );
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Clock source for the caching wrapper; injected for tests.
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Read-through caching wrapper around a [`SchemaStore`].
///
/// `get` short-circuits to a cached value younger than the TTL; concurrent
/// fetches for the same id are NOT deduplicated (no in-flight sharing) —
/// callers needing at-most-one-fetch semantics add that themselves. `list`
/// bypasses the cache; `update`/`delete` invalidate their entry.
pub struct CachedSchemaStore<S: SchemaStore> {
    inner: S,
    cache: Mutex<SchemaCache>,
    clock: Clock,
}

impl<S: SchemaStore> CachedSchemaStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self::with_clock(inner, ttl, Box::new(Utc::now))
    }

    pub fn with_clock(inner: S, ttl: Duration, clock: Clock) -> Self {
        Self {
            inner,
            cache: Mutex::new(SchemaCache::new(ttl)),
            clock,
        }
    }
}

#[async_trait]
impl<S: SchemaStore> SchemaStore for CachedSchemaStore<S> {
    async fn get(&self, component_id: &str) -> Result<UIComponentSchema, StoreError> {
        let now = (self.clock)();
        if let Some(schema) = self.cache.lock().await.get(component_id, now) {
            tracing::debug!(component_id, "schema cache hit");
            return Ok(schema.clone());
        }
        tracing::debug!(component_id, "schema cache miss");
        let schema = self.inner.get(component_id).await?;
        self.cache
            .lock()
            .await
            .insert(component_id, schema.clone(), now);
        Ok(schema)
    }

    async fn list(&self) -> Result<Vec<UIComponentSchema>, StoreError> {
        self.inner.list().await
    }

    async fn create(&self, schema: UIComponentSchema) -> Result<(), StoreError> {
        self.inner.create(schema).await
    }

    async fn update(&self, schema: UIComponentSchema) -> Result<(), StoreError> {
        let component_id = schema.component_id.clone();
        self.inner.update(schema).await?;
        self.cache.lock().await.invalidate(&component_id);
        Ok(())
    }

    async fn delete(&self, component_id: &str) -> Result<(), StoreError> {
        self.inner.delete(component_id).await?;
        self.cache.lock().await.invalidate(component_id);
        Ok(())
    }
}
