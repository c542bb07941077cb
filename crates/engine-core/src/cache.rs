use crate::{error::StorageError, state::KvStore};
use model::{
    pagination::{
        cursor::Session,
        page::{CacheKey, PAGE_SIZE, PageSetMeta},
    },
    records::record::Record,
};
use std::{collections::BTreeMap, sync::Arc};
use tracing::debug;

/// Stored form of a page set: page index to the records of that page.
/// Serialised as a JSON object keyed by the decimal page index.
type Pages = BTreeMap<usize, Vec<Record>>;

/// Splits record collections into fixed-size pages, persists each set as a
/// single entry and serves it back page by page.
#[derive(Clone)]
pub struct PageCache {
    store: Arc<dyn KvStore>,
}

impl PageCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        PageCache { store }
    }

    /// Partitions `records` into pages of [`PAGE_SIZE`] and writes them under
    /// `key`, replacing whatever was stored there. The previous entry is left
    /// untouched if the write fails.
    pub fn partition_and_store(
        &self,
        records: &[Record],
        key: &CacheKey,
    ) -> Result<PageSetMeta, StorageError> {
        let pages: BTreeMap<usize, &[Record]> = records.chunks(PAGE_SIZE).enumerate().collect();

        let json = serde_json::to_string(&pages).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key.as_str(), &json)?;

        let meta = PageSetMeta::for_records(records.len());
        debug!(
            "Stored page set '{}': {} records in {} pages",
            key, meta.total_records, meta.total_pages
        );
        Ok(meta)
    }

    /// Records of page `index`; empty when the key is absent or the index is
    /// past the last page.
    pub fn get_page(&self, key: &CacheKey, index: usize) -> Result<Vec<Record>, StorageError> {
        Ok(self
            .load(key)?
            .and_then(|mut pages| pages.remove(&index))
            .unwrap_or_default())
    }

    /// Whole collection in original order.
    pub fn load_all(&self, key: &CacheKey) -> Result<Vec<Record>, StorageError> {
        Ok(self
            .load(key)?
            .map(|pages| pages.into_values().flatten().collect())
            .unwrap_or_default())
    }

    pub fn meta(&self, key: &CacheKey) -> Result<PageSetMeta, StorageError> {
        Ok(match self.load(key)? {
            Some(pages) => PageSetMeta {
                total_records: pages.values().map(Vec::len).sum(),
                total_pages: pages.len(),
            },
            None => PageSetMeta::default(),
        })
    }

    pub fn total_records(&self, key: &CacheKey) -> Result<usize, StorageError> {
        self.meta(key).map(|meta| meta.total_records)
    }

    pub fn total_pages(&self, key: &CacheKey) -> Result<usize, StorageError> {
        self.meta(key).map(|meta| meta.total_pages)
    }

    pub fn contains(&self, key: &CacheKey) -> Result<bool, StorageError> {
        Ok(self.store.get(key.as_str())?.is_some())
    }

    pub fn invalidate(&self, key: &CacheKey) -> Result<(), StorageError> {
        debug!("Invalidating page set '{}'", key);
        self.store.remove(key.as_str())
    }

    /// Moves the session one page forward. Reading the page is left to the
    /// caller.
    pub fn advance_cursor(&self, session: &mut Session) -> usize {
        session.advance_cursor()
    }

    pub fn reset_cursor(&self, session: &mut Session) {
        session.reset_cursor();
    }

    /// Page under the session cursor.
    pub fn current_page(&self, session: &Session) -> Result<Vec<Record>, StorageError> {
        self.get_page(session.active_key(), session.cursor())
    }

    /// Whether a page exists after the one under the cursor.
    pub fn has_next_page(&self, session: &Session) -> Result<bool, StorageError> {
        let total = self.total_records(session.active_key())?;
        Ok(total > PAGE_SIZE * (session.cursor() + 1))
    }

    /// Advances the cursor and returns the page it now points at.
    pub fn next_page(&self, session: &mut Session) -> Result<Vec<Record>, StorageError> {
        let index = self.advance_cursor(session);
        self.get_page(session.active_key(), index)
    }

    fn load(&self, key: &CacheKey) -> Result<Option<Pages>, StorageError> {
        let Some(raw) = self.store.get(key.as_str())? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }
}
