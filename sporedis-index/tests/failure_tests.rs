use async_trait::async_trait;
use pretty_assertions::assert_eq;
use sporedis_index::{search_greedy, Catalog, FacetIndex, Predicate};
use sporedis_keys::KeyNamer;
use sporedis_model::{event_schema, AttributeValue, Record};
use sporedis_store::{
    KvStore, MemoryStore, RecordStore, ScanCursor, ScanPage, StoreClient, StoreConfig, StoreError,
    StoreResult,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    Healthy,
    /// Every operation fails as if the connection dropped.
    Down,
    /// String keys work, set operations fail.
    SetsDown,
    /// GETs hang for a minute.
    Stalled,
}

/// Memory backend that fails or hangs according to `fault`.
struct FaultyStore {
    inner: MemoryStore,
    fault: Mutex<Fault>,
}

impl FaultyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fault: Mutex::new(Fault::Healthy),
        }
    }

    fn set_fault(&self, fault: Fault) {
        *self.fault.lock().unwrap() = fault;
    }

    fn fault(&self) -> Fault {
        *self.fault.lock().unwrap()
    }

    fn check(&self, set_op: bool) -> StoreResult<()> {
        match self.fault() {
            Fault::Down => Err(StoreError::Unavailable("connection reset".into())),
            Fault::SetsDown if set_op => Err(StoreError::Unavailable("connection reset".into())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl KvStore for FaultyStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check(false)?;
        self.inner.set(key, value).await
    }
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check(false)?;
        if self.fault() == Fault::Stalled {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        self.inner.get(key).await
    }
    async fn del(&self, key: &str) -> StoreResult<bool> {
        self.check(false)?;
        self.inner.del(key).await
    }
    async fn scan(&self, pattern: &str, cursor: ScanCursor, count: usize) -> StoreResult<ScanPage> {
        self.check(false)?;
        self.inner.scan(pattern, cursor, count).await
    }
    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check(true)?;
        self.inner.sadd(key, member).await
    }
    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check(true)?;
        self.inner.srem(key, member).await
    }
    async fn sinter(&self, keys: &[String]) -> StoreResult<HashSet<String>> {
        self.check(true)?;
        self.inner.sinter(keys).await
    }
    async fn smembers(&self, key: &str) -> StoreResult<HashSet<String>> {
        self.check(true)?;
        self.inner.smembers(key).await
    }
}

const LOOKUP: [&str; 2] = ["venue", "medal_event"];

fn make_event(sku: &str, venue: &str) -> Record {
    event_schema()
        .build(
            sku,
            [
                ("name", AttributeValue::from("Event")),
                ("venue", venue.into()),
            ],
        )
        .unwrap()
}

fn faulty_catalog() -> (Arc<FaultyStore>, Catalog) {
    let backend = Arc::new(FaultyStore::new());
    let client = StoreClient::from_backend(
        backend.clone(),
        &StoreConfig {
            op_timeout_ms: 100,
            scan_count: 2,
            ..StoreConfig::default()
        },
    );
    let namer = KeyNamer::default();
    let records = RecordStore::new(event_schema(), namer.clone(), client.clone());
    let catalog = Catalog::new(records)
        .with_index(Arc::new(FacetIndex::plain(LOOKUP, namer, client)));
    (backend, catalog)
}

async fn loaded_catalog() -> (Arc<FaultyStore>, Catalog) {
    let (backend, catalog) = faulty_catalog();
    for (sku, venue) in [("e1", "Budokan"), ("e2", "Stadium"), ("e3", "Budokan")] {
        catalog.put(&make_event(sku, venue)).await.unwrap();
    }
    (backend, catalog)
}

fn budokan() -> Vec<Predicate> {
    vec![Predicate::new("venue", "Budokan")]
}

// ── search_greedy ────────────────────────────────────────────────

#[tokio::test]
async fn greedy_search_surfaces_unavailable() {
    let (backend, catalog) = loaded_catalog().await;
    backend.set_fault(Fault::Down);
    let result = search_greedy(catalog.records(), &budokan()).await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}

#[tokio::test(start_paused = true)]
async fn greedy_search_surfaces_timeout() {
    let (backend, catalog) = loaded_catalog().await;
    backend.set_fault(Fault::Stalled);
    let result = catalog.search_greedy(&budokan()).await;
    assert!(matches!(result, Err(StoreError::Timeout)));
}

// ── Catalog writes ───────────────────────────────────────────────

#[tokio::test]
async fn put_surfaces_unavailable_and_writes_nothing() {
    let (backend, catalog) = faulty_catalog();
    backend.set_fault(Fault::Down);
    let result = catalog.put(&make_event("e1", "Budokan")).await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));

    backend.set_fault(Fault::Healthy);
    assert!(matches!(catalog.get("e1").await, Err(StoreError::NotFound(_))));
    assert!(catalog.query("fs", &budokan()).await.unwrap().is_empty());
}

#[tokio::test]
async fn put_surfaces_index_failure_after_record_write() {
    let (backend, catalog) = faulty_catalog();
    backend.set_fault(Fault::SetsDown);
    let result = catalog.put(&make_event("e1", "Budokan")).await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));

    // The record landed before the facet update failed.
    backend.set_fault(Fault::Healthy);
    assert_eq!(catalog.get("e1").await.unwrap().get_str("venue"), Some("Budokan"));
    assert!(catalog.query("fs", &budokan()).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn put_surfaces_timeout() {
    let (backend, catalog) = faulty_catalog();
    backend.set_fault(Fault::Stalled);
    let result = catalog.put(&make_event("e1", "Budokan")).await;
    assert!(matches!(result, Err(StoreError::Timeout)));
}

#[tokio::test]
async fn facet_query_surfaces_unavailable() {
    let (backend, catalog) = loaded_catalog().await;
    backend.set_fault(Fault::SetsDown);
    let result = catalog.query("fs", &budokan()).await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));

    backend.set_fault(Fault::Healthy);
    let expected: HashSet<String> = ["e1", "e3"].iter().map(|s| s.to_string()).collect();
    assert_eq!(catalog.query("fs", &budokan()).await.unwrap(), expected);
}
