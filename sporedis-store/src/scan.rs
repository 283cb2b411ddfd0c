//! Resumable key enumeration.

use crate::kv::ScanCursor;
use crate::pool::StoreClient;
use crate::StoreResult;
use tracing::debug;

/// Walks the keys matching a pattern one SCAN page at a time.
///
/// Each page is its own store round-trip under the client's deadline, so a
/// large keyspace never becomes one unbounded call. A failed page leaves the
/// scanner where it was and the same page can be retried.
pub struct KeyScanner {
    client: StoreClient,
    pattern: String,
    cursor: Option<ScanCursor>,
    pages: usize,
}

impl KeyScanner {
    pub(crate) fn new(client: StoreClient, pattern: String) -> Self {
        Self {
            client,
            pattern,
            cursor: Some(ScanCursor::Start),
            pages: 0,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True once the backend reported the end of the keyspace.
    pub fn is_done(&self) -> bool {
        self.cursor.is_none()
    }

    /// Returns the next page of keys, or `None` when the scan is complete.
    /// Pages may be empty.
    pub async fn next_page(&mut self) -> StoreResult<Option<Vec<String>>> {
        let Some(cursor) = self.cursor.clone() else {
            return Ok(None);
        };
        let page = self.client.scan_page(&self.pattern, cursor).await?;
        self.pages += 1;
        self.cursor = page.next;
        if self.cursor.is_none() {
            debug!("scan {} finished after {} page(s)", self.pattern, self.pages);
        }
        Ok(Some(page.keys))
    }

    /// Drains the scan into one list.
    pub async fn collect_all(mut self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        while let Some(page) = self.next_page().await? {
            keys.extend(page);
        }
        Ok(keys)
    }
}
