//! Index-free search by scanning every record of a type.

use crate::Predicate;
use sporedis_store::{RecordStore, StoreError, StoreResult};
use tracing::debug;

/// Returns ids of the records in `store` matching every predicate.
///
/// Walks all `<type>:*` keys page by page and decodes each record, so the
/// cost is linear in the number of stored records regardless of how many
/// match. A record lacking a predicate attribute does not match. Ids come
/// back in scan order. Undecodable records are skipped.
pub async fn search_greedy(store: &RecordStore, predicates: &[Predicate]) -> StoreResult<Vec<String>> {
    if predicates.is_empty() {
        return Err(StoreError::EmptyQuery);
    }

    let mut matches = Vec::new();
    let mut examined = 0usize;
    let mut scanner = store.scan_all();
    while let Some(keys) = scanner.next_page().await? {
        for key in keys {
            let Some(record) = store.get_lenient(&key).await? else {
                continue;
            };
            examined += 1;
            if record.matches_all(predicates.iter().map(|p| (p.attribute.as_str(), &p.value))) {
                matches.push(record.id().to_string());
            }
        }
    }

    debug!(
        "greedy search over {}: {} of {} record(s) matched",
        store.entity_type(),
        matches.len(),
        examined
    );
    Ok(matches)
}
