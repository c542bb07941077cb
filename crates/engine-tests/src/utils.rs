use crate::FakeCatApi;
use engine_core::state::{KvStore, memory::MemoryKvStore, sled_store::SledKvStore};
use engine_runtime::catalogue::Catalogue;
use model::{
    query::{predicate::Predicate, sort::SortSpec},
    records::record::Record,
};
use std::{path::Path, sync::Arc, time::Duration};

pub const REFRESH_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Catalogue over an in-memory store.
pub fn memory_catalogue(api: Arc<FakeCatApi>) -> Catalogue {
    Catalogue::new(Arc::new(MemoryKvStore::new()), api, REFRESH_PERIOD)
}

/// Catalogue over a sled store in `dir`. Returns the store too so tests can
/// reopen a catalogue on the same data.
pub fn sled_catalogue(dir: &Path, api: Arc<FakeCatApi>) -> (Catalogue, Arc<dyn KvStore>) {
    let store: Arc<dyn KvStore> = Arc::new(SledKvStore::open(dir).unwrap());
    (Catalogue::new(store.clone(), api, REFRESH_PERIOD), store)
}

/// Parses `field<op>value` strings, panicking on bad input.
pub fn predicates(raw: &[&str]) -> Vec<Predicate> {
    raw.iter().map(|p| p.parse().unwrap()).collect()
}

pub fn sort_spec(raw: &str) -> SortSpec {
    raw.parse().unwrap()
}

pub fn ids(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.id().unwrap_or_default().to_string())
        .collect()
}

/// Every page of the active set from the cursor onwards.
pub fn drain_pages(catalogue: &mut Catalogue) -> Vec<Vec<Record>> {
    let mut pages = vec![catalogue.current_page().unwrap()];
    while let Some(page) = catalogue.next_page().unwrap() {
        pages.push(page);
    }
    pages
}

pub fn page_sizes(pages: &[Vec<Record>]) -> Vec<usize> {
    pages.iter().map(Vec::len).collect()
}
