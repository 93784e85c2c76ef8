//! Schema store scenarios: strict create validation and TTL cache behavior
//! under an injected clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use schema_ui::store::{CachedSchemaStore, InMemorySchemaStore, SchemaStore, StoreError};
use schema_ui::UIComponentSchema;

fn sample(id: &str) -> UIComponentSchema {
    serde_json::from_value(json!({
        "componentId": id,
        "name": format!("schema-{id}"),
        "componentType": "Form",
        "title": "Sample",
        "fields": [{"fieldKey": "a", "label": "A", "type": "text"}]
    }))
    .unwrap()
}

/// Counts inner fetches so cache hits are observable.
struct CountingStore {
    inner: InMemorySchemaStore,
    gets: AtomicUsize,
}

impl CountingStore {
    fn new(inner: InMemorySchemaStore) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SchemaStore for CountingStore {
    async fn get(&self, component_id: &str) -> Result<UIComponentSchema, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(component_id).await
    }
    async fn list(&self) -> Result<Vec<UIComponentSchema>, StoreError> {
        self.inner.list().await
    }
    async fn create(&self, schema: UIComponentSchema) -> Result<(), StoreError> {
        self.inner.create(schema).await
    }
    async fn update(&self, schema: UIComponentSchema) -> Result<(), StoreError> {
        self.inner.update(schema).await
    }
    async fn delete(&self, component_id: &str) -> Result<(), StoreError> {
        self.inner.delete(component_id).await
    }
}

/// Orphan-rule-safe wrapper so an `Arc<CountingStore>` can be handed to
/// `CachedSchemaStore` while the test keeps a handle for assertions.
#[derive(Clone)]
struct Shared(Arc<CountingStore>);

#[async_trait]
impl SchemaStore for Shared {
    async fn get(&self, component_id: &str) -> Result<UIComponentSchema, StoreError> {
        self.0.get(component_id).await
    }
    async fn list(&self) -> Result<Vec<UIComponentSchema>, StoreError> {
        self.0.list().await
    }
    async fn create(&self, schema: UIComponentSchema) -> Result<(), StoreError> {
        self.0.create(schema).await
    }
    async fn update(&self, schema: UIComponentSchema) -> Result<(), StoreError> {
        self.0.update(schema).await
    }
    async fn delete(&self, component_id: &str) -> Result<(), StoreError> {
        self.0.delete(component_id).await
    }
}

fn fake_clock(start: DateTime<Utc>) -> (Arc<Mutex<DateTime<Utc>>>, Box<dyn Fn() -> DateTime<Utc> + Send + Sync>) {
    let now = Arc::new(Mutex::new(start));
    let handle = now.clone();
    let clock = Box::new(move || *handle.lock().unwrap());
    (now, clock)
}

#[tokio::test]
async fn cache_short_circuits_fetches_until_ttl() {
    let counting = Arc::new(CountingStore::new(InMemorySchemaStore::new()));
    counting.create(sample("form-1")).await.unwrap();

    let t0 = Utc::now();
    let (now, clock) = fake_clock(t0);
    let store = CachedSchemaStore::with_clock(Shared(counting.clone()), Duration::seconds(60), clock);

    store.get("form-1").await.unwrap();
    store.get("form-1").await.unwrap();
    assert_eq!(counting.gets.load(Ordering::SeqCst), 1);

    // Still younger than the TTL: served from cache.
    *now.lock().unwrap() = t0 + Duration::seconds(59);
    store.get("form-1").await.unwrap();
    assert_eq!(counting.gets.load(Ordering::SeqCst), 1);

    // At the TTL the entry is expired and refetched.
    *now.lock().unwrap() = t0 + Duration::seconds(60);
    store.get("form-1").await.unwrap();
    assert_eq!(counting.gets.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn update_and_delete_invalidate_the_cache() {
    let counting = Arc::new(CountingStore::new(InMemorySchemaStore::new()));
    counting.create(sample("form-1")).await.unwrap();

    let (_, clock) = fake_clock(Utc::now());
    let store = CachedSchemaStore::with_clock(Shared(counting.clone()), Duration::seconds(600), clock);

    store.get("form-1").await.unwrap();
    assert_eq!(counting.gets.load(Ordering::SeqCst), 1);

    let mut updated = sample("form-1");
    updated.title = "Renamed".to_string();
    store.update(updated).await.unwrap();

    // Invalidation forces a refetch that observes the update.
    let fetched = store.get("form-1").await.unwrap();
    assert_eq!(fetched.title, "Renamed");
    assert_eq!(counting.gets.load(Ordering::SeqCst), 2);

    store.delete("form-1").await.unwrap();
    assert_eq!(
        store.get("form-1").await,
        Err(StoreError::NotFound {
            component_id: "form-1".into()
        })
    );
}

#[tokio::test]
async fn failed_fetches_are_not_cached() {
    let counting = Arc::new(CountingStore::new(InMemorySchemaStore::new()));
    let (_, clock) = fake_clock(Utc::now());
    let store = CachedSchemaStore::with_clock(Shared(counting.clone()), Duration::seconds(600), clock);

    assert!(store.get("ghost").await.is_err());
    assert!(store.get("ghost").await.is_err());
    assert_eq!(counting.gets.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn create_runs_strict_validation_before_persisting() {
    let store = InMemorySchemaStore::new();

    let mut bad = sample("bad");
    bad.fields[0].field_key = String::new();
    match store.create(bad).await {
        Err(StoreError::Invalid { codes }) => {
            assert_eq!(codes, vec!["FIELD_MISSING_KEY"]);
        }
        other => panic!("expected Invalid, got {other:?}"),
    }

    // A lenient-at-runtime construct (unknown type) does not block a save.
    let mut forward_compatible = sample("ok");
    forward_compatible.fields = serde_json::from_value(json!([
        {"fieldKey": "sig", "label": "Signature", "type": "signature-pad"}
    ]))
    .unwrap();
    store.create(forward_compatible).await.unwrap();
    assert_eq!(store.list().await.unwrap().len(), 1);
}
