use sporedis_store::{KvStore, MemoryStore, ScanCursor, StoreError};
use std::collections::HashSet;

fn set_of(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

async fn scan_all(store: &MemoryStore, pattern: &str, count: usize) -> (Vec<String>, usize) {
    let mut cursor = ScanCursor::Start;
    let mut keys = Vec::new();
    let mut pages = 0;
    loop {
        let page = store.scan(pattern, cursor, count).await.unwrap();
        pages += 1;
        keys.extend(page.keys);
        match page.next {
            Some(next) => cursor = next,
            None => break,
        }
    }
    (keys, pages)
}

// ── Strings ──────────────────────────────────────────────────────

#[tokio::test]
async fn set_and_get() {
    let store = MemoryStore::new();
    store.set("customer:bill", r#"{"id":"bill"}"#).await.unwrap();
    assert_eq!(
        store.get("customer:bill").await.unwrap().as_deref(),
        Some(r#"{"id":"bill"}"#)
    );
    assert_eq!(store.get("customer:mary").await.unwrap(), None);
}

#[tokio::test]
async fn set_overwrites() {
    let store = MemoryStore::new();
    store.set("k", "1").await.unwrap();
    store.set("k", "2").await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("2"));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn del_reports_existence() {
    let store = MemoryStore::new();
    store.set("k", "v").await.unwrap();
    assert!(store.del("k").await.unwrap());
    assert!(!store.del("k").await.unwrap());
    assert!(store.is_empty().await);
}

// ── Sets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn sadd_reports_new_members() {
    let store = MemoryStore::new();
    assert!(store.sadd("fs:venue:A", "e1").await.unwrap());
    assert!(!store.sadd("fs:venue:A", "e1").await.unwrap());
    assert!(store.sadd("fs:venue:A", "e2").await.unwrap());
    assert_eq!(store.smembers("fs:venue:A").await.unwrap(), set_of(&["e1", "e2"]));
}

#[tokio::test]
async fn srem_deletes_empty_set() {
    let store = MemoryStore::new();
    store.sadd("s", "a").await.unwrap();
    assert!(store.srem("s", "a").await.unwrap());
    assert!(!store.srem("s", "a").await.unwrap());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn sinter_intersects_all_sets() {
    let store = MemoryStore::new();
    for m in ["a", "b", "c"] {
        store.sadd("s1", m).await.unwrap();
    }
    for m in ["b", "c", "d"] {
        store.sadd("s2", m).await.unwrap();
    }
    for m in ["c", "b"] {
        store.sadd("s3", m).await.unwrap();
    }
    let keys = vec!["s1".to_string(), "s2".to_string(), "s3".to_string()];
    assert_eq!(store.sinter(&keys).await.unwrap(), set_of(&["b", "c"]));
}

#[tokio::test]
async fn sinter_with_missing_key_is_empty() {
    let store = MemoryStore::new();
    store.sadd("s1", "a").await.unwrap();
    let keys = vec!["s1".to_string(), "nope".to_string()];
    assert!(store.sinter(&keys).await.unwrap().is_empty());
}

#[tokio::test]
async fn single_key_sinter_is_members() {
    let store = MemoryStore::new();
    store.sadd("s1", "a").await.unwrap();
    store.sadd("s1", "b").await.unwrap();
    assert_eq!(
        store.sinter(&["s1".to_string()]).await.unwrap(),
        set_of(&["a", "b"])
    );
}

#[tokio::test]
async fn wrong_type_is_reported() {
    let store = MemoryStore::new();
    store.set("str", "v").await.unwrap();
    store.sadd("set", "m").await.unwrap();

    assert!(matches!(store.get("set").await, Err(StoreError::WrongType(_))));
    assert!(matches!(store.sadd("str", "m").await, Err(StoreError::WrongType(_))));
    assert!(matches!(store.smembers("str").await, Err(StoreError::WrongType(_))));
    assert!(matches!(
        store.sinter(&["set".to_string(), "str".to_string()]).await,
        Err(StoreError::WrongType(_))
    ));
}

// ── Scan ─────────────────────────────────────────────────────────

#[tokio::test]
async fn scan_filters_by_pattern() {
    let store = MemoryStore::new();
    store.set("event:1", "{}").await.unwrap();
    store.set("event:2", "{}").await.unwrap();
    store.set("customer:bill", "{}").await.unwrap();
    store.sadd("fs:venue:x", "1").await.unwrap();

    let (mut keys, _) = scan_all(&store, "event:*", 100).await;
    keys.sort();
    assert_eq!(keys, vec!["event:1", "event:2"]);
}

#[tokio::test]
async fn scan_pages_through_keyspace() {
    let store = MemoryStore::new();
    for i in 0..25 {
        store.set(&format!("event:{i:02}"), "{}").await.unwrap();
    }
    store.set("other", "{}").await.unwrap();

    let (keys, pages) = scan_all(&store, "event:*", 10).await;
    assert_eq!(keys.len(), 25);
    assert_eq!(pages, 3);
    let unique: HashSet<_> = keys.iter().collect();
    assert_eq!(unique.len(), 25);
}

#[tokio::test]
async fn scan_page_can_be_empty_but_not_final() {
    let store = MemoryStore::new();
    store.set("a:1", "{}").await.unwrap();
    store.set("a:2", "{}").await.unwrap();
    store.set("b:1", "{}").await.unwrap();

    let page = store.scan("b:*", ScanCursor::Start, 2).await.unwrap();
    assert!(page.keys.is_empty());
    assert!(page.next.is_some());

    let page = store.scan("b:*", page.next.unwrap(), 2).await.unwrap();
    assert_eq!(page.keys, vec!["b:1"]);
    assert!(page.next.is_none());
}

#[tokio::test]
async fn scan_of_empty_store_finishes_immediately() {
    let store = MemoryStore::new();
    let page = store.scan("*", ScanCursor::Start, 10).await.unwrap();
    assert!(page.keys.is_empty());
    assert!(page.next.is_none());
}
