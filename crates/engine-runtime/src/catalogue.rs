use crate::error::CatalogueError;
use chrono::{DateTime, Utc};
use connectors::source::BreedSource;
use engine_core::{cache::PageCache, state::KvStore};
use engine_processing::{filter, sort, stats};
use model::{
    catalog::{field::Field, operator::Operator},
    pagination::{
        cursor::Session,
        page::{CacheKey, PageSetMeta},
    },
    query::{predicate::Predicate, sort::SortSpec},
    records::{
        breed::{BreedCard, BreedSummary},
        record::Record,
    },
};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

/// Store entry holding the RFC 3339 time of the last successful base fetch.
pub const FETCHED_AT_KEY: &str = "breeds.fetched_at";

/// What a filter row may be set to for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOptions {
    pub field: Field,
    pub operators: Vec<Operator>,
    pub values: Vec<i64>,
}

/// Breed catalogue: base data from a [`BreedSource`], filtered and sorted
/// derivatives in the [`PageCache`], and the page session over them.
pub struct Catalogue {
    cache: PageCache,
    store: Arc<dyn KvStore>,
    source: Arc<dyn BreedSource>,
    session: Session,
    refresh_period: Duration,
}

impl Catalogue {
    pub fn new(
        store: Arc<dyn KvStore>,
        source: Arc<dyn BreedSource>,
        refresh_period: Duration,
    ) -> Self {
        Self {
            cache: PageCache::new(store.clone()),
            store,
            source,
            session: Session::default(),
            refresh_period,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Serves base data from the store when it is younger than the refresh
    /// period, otherwise fetches it. A stale copy is still served when the
    /// fetch fails.
    pub async fn load(&mut self) -> Result<PageSetMeta, CatalogueError> {
        let key = CacheKey::base();
        let cached = self.cache.contains(&key)?;
        if cached && self.is_fresh(Utc::now())? {
            let meta = self.cache.meta(&key)?;
            info!("Using cached breeds ({} records)", meta.total_records);
            return Ok(meta);
        }

        match self.refresh().await {
            Err(CatalogueError::Network(e)) if cached => {
                let meta = self.cache.meta(&key)?;
                warn!(
                    "Refresh failed ({}); using stale cached breeds ({} records)",
                    e, meta.total_records
                );
                Ok(meta)
            }
            result => result,
        }
    }

    /// Fetches the full breed list and replaces the base set. Filtered and
    /// sorted sets built from the old data are dropped.
    pub async fn refresh(&mut self) -> Result<PageSetMeta, CatalogueError> {
        let breeds = self.source.fetch_all_breeds().await?;
        let base = CacheKey::base();

        // No derived set may outlive the base it was built from.
        self.cache.invalidate(&CacheKey::filtered())?;
        self.cache.invalidate(&CacheKey::sorted())?;
        if self.session.active_key().is_derived() {
            self.session.activate(base.clone());
        }

        let meta = self.cache.partition_and_store(&breeds, &base)?;
        if let Err(e) = self.store.set(FETCHED_AT_KEY, &Utc::now().to_rfc3339()) {
            warn!("Could not record refresh time: {}", e);
        }

        info!(
            "Refreshed breeds: {} records in {} pages",
            meta.total_records, meta.total_pages
        );
        Ok(meta)
    }

    /// Time of the last successful refresh, if one is recorded.
    pub fn last_refreshed(&self) -> Result<Option<DateTime<Utc>>, CatalogueError> {
        let Some(raw) = self.store.get(FETCHED_AT_KEY)? else {
            return Ok(None);
        };

        match DateTime::parse_from_rfc3339(&raw) {
            Ok(at) => Ok(Some(at.with_timezone(&Utc))),
            Err(e) => {
                warn!("Ignoring unreadable {}: {}", FETCHED_AT_KEY, e);
                Ok(None)
            }
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> Result<bool, CatalogueError> {
        let Some(fetched_at) = self.last_refreshed()? else {
            return Ok(false);
        };

        Ok(match (now - fetched_at).to_std() {
            Ok(age) => age < self.refresh_period,
            // Timestamp in the future: clock moved backwards.
            Err(_) => false,
        })
    }

    /// `id` and `name` of every cached breed, in source order.
    pub fn breeds(&self) -> Result<Vec<BreedSummary>, CatalogueError> {
        Ok(self
            .cache
            .load_all(&CacheKey::base())?
            .iter()
            .filter_map(BreedSummary::from_record)
            .collect())
    }

    pub async fn show_breed(&self, breed_id: &str) -> Result<BreedCard, CatalogueError> {
        let images = self.source.fetch_breed_image(breed_id).await?;

        images
            .first()
            .and_then(BreedCard::from_image)
            .ok_or_else(|| CatalogueError::BreedNotFound(breed_id.to_string()))
    }

    /// Switches back to the unfiltered breeds and returns their first page.
    pub fn select_all(&mut self) -> Result<Vec<Record>, CatalogueError> {
        self.session.activate(CacheKey::base());
        self.current_page()
    }

    pub fn current_page(&self) -> Result<Vec<Record>, CatalogueError> {
        Ok(self.cache.current_page(&self.session)?)
    }

    pub fn has_next_page(&self) -> Result<bool, CatalogueError> {
        Ok(self.cache.has_next_page(&self.session)?)
    }

    /// Next page of the active set, or `None` once the last page was served.
    pub fn next_page(&mut self) -> Result<Option<Vec<Record>>, CatalogueError> {
        if !self.cache.has_next_page(&self.session)? {
            debug!("No page after {} on '{}'", self.session.cursor(), self.session.active_key());
            return Ok(None);
        }

        Ok(Some(self.cache.next_page(&mut self.session)?))
    }

    pub fn active_meta(&self) -> Result<PageSetMeta, CatalogueError> {
        Ok(self.cache.meta(self.session.active_key())?)
    }

    /// Filters the base breeds and makes the result the active set. An empty
    /// result leaves the active set as it was.
    pub fn apply_filters(&mut self, predicates: &[Predicate]) -> Result<PageSetMeta, CatalogueError> {
        let records = self.cache.load_all(&CacheKey::base())?;
        let matched = filter::evaluate(predicates, records)?;

        if matched.is_empty() {
            info!("Filters matched no breeds; keeping '{}'", self.session.active_key());
            return Err(CatalogueError::EmptyResult);
        }

        let key = CacheKey::filtered();
        let meta = self.cache.partition_and_store(&matched, &key)?;
        self.cache.invalidate(&CacheKey::sorted())?;
        self.session.activate(key);

        info!("{} breeds match {} filter(s)", meta.total_records, predicates.len());
        Ok(meta)
    }

    /// Sorts the active set (or the set a previous sort was built from) and
    /// makes the result the active set.
    pub fn apply_sort(&mut self, spec: SortSpec) -> Result<PageSetMeta, CatalogueError> {
        let source = self.sort_source()?;
        let records = self.cache.load_all(&source)?;
        let sorted = sort::sort_by_spec(spec, records);

        let key = CacheKey::sorted();
        let meta = self.cache.partition_and_store(&sorted, &key)?;
        self.session.activate(key);

        info!("Sorted {} breeds from '{}' by {}", meta.total_records, source, spec);
        Ok(meta)
    }

    fn sort_source(&self) -> Result<CacheKey, CatalogueError> {
        let active = self.session.active_key();
        if active.as_str() != CacheKey::SORTED {
            return Ok(active.clone());
        }

        let filtered = CacheKey::filtered();
        Ok(if self.cache.contains(&filtered)? {
            filtered
        } else {
            CacheKey::base()
        })
    }

    /// Drops filtered and sorted sets and returns to the base breeds.
    pub fn reset_filters(&mut self) -> Result<(), CatalogueError> {
        self.cache.invalidate(&CacheKey::filtered())?;
        self.cache.invalidate(&CacheKey::sorted())?;
        self.session.activate(CacheKey::base());
        Ok(())
    }

    /// Drops the sorted set and returns to the filtered breeds, or the base
    /// breeds when no filter is applied.
    pub fn reset_sort(&mut self) -> Result<(), CatalogueError> {
        self.cache.invalidate(&CacheKey::sorted())?;

        let filtered = CacheKey::filtered();
        let key = if self.cache.contains(&filtered)? {
            filtered
        } else {
            CacheKey::base()
        };
        self.session.activate(key);
        Ok(())
    }

    /// Operators allowed for `field` and the integer values seen in the
    /// base breeds.
    pub fn filter_options(&self, field: Field) -> Result<FieldOptions, CatalogueError> {
        let records = self.cache.load_all(&CacheKey::base())?;
        let values = stats::value_options(field, &records)?;

        Ok(FieldOptions {
            field,
            operators: Operator::for_kind(field.kind()).to_vec(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connectors::error::NetworkError;
    use engine_core::{error::StorageError, state::memory::MemoryKvStore};
    use model::{catalog::operator::Operator, query::sort::SortDirection};
    use serde_json::json;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    struct FakeSource {
        breeds: Mutex<Vec<Record>>,
        fetches: AtomicUsize,
        fail_with: Option<NetworkError>,
    }

    impl FakeSource {
        fn new(breeds: Vec<Record>) -> Self {
            Self {
                breeds: Mutex::new(breeds),
                fetches: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn failing(err: NetworkError) -> Self {
            Self {
                fail_with: Some(err),
                ..Self::new(Vec::new())
            }
        }
    }

    #[async_trait]
    impl BreedSource for FakeSource {
        async fn fetch_all_breeds(&self) -> Result<Vec<Record>, NetworkError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(self.breeds.lock().unwrap().clone()),
            }
        }

        async fn fetch_breed_image(&self, breed_id: &str) -> Result<Vec<Record>, NetworkError> {
            let breeds = self.breeds.lock().unwrap();
            Ok(breeds
                .iter()
                .filter(|b| b.id() == Some(breed_id))
                .map(|b| {
                    Record::new()
                        .with("url", json!(format!("https://cdn/{breed_id}.jpg")))
                        .with("breeds", json!([b.as_map()]))
                })
                .collect())
        }
    }

    /// Memory store whose writes to one key always fail.
    struct FailingKey {
        inner: MemoryKvStore,
        key: &'static str,
        armed: std::sync::atomic::AtomicBool,
    }

    impl FailingKey {
        fn new(key: &'static str) -> Self {
            Self {
                inner: MemoryKvStore::new(),
                key,
                armed: std::sync::atomic::AtomicBool::new(false),
            }
        }

        fn arm(&self) {
            self.armed.store(true, Ordering::SeqCst);
        }
    }

    impl KvStore for FailingKey {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.key && self.armed.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable(format!("write to {key} refused")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn breed(id: usize, adaptability: i64) -> Record {
        Record::new()
            .with("id", json!(format!("b{id}")))
            .with("name", json!(format!("Breed {id}")))
            .with("adaptability", json!(adaptability))
    }

    fn catalogue(source: Arc<FakeSource>) -> Catalogue {
        Catalogue::new(
            Arc::new(MemoryKvStore::new()),
            source,
            Duration::from_secs(3600),
        )
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().filter_map(Record::id).collect()
    }

    #[tokio::test]
    async fn test_load_fetches_once_then_serves_from_cache() {
        let source = Arc::new(FakeSource::new((0..25).map(|i| breed(i, 3)).collect()));
        let mut catalogue = catalogue(source.clone());

        let meta = catalogue.load().await.unwrap();
        assert_eq!(meta, PageSetMeta { total_records: 25, total_pages: 3 });
        catalogue.load().await.unwrap();

        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(catalogue.last_refreshed().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stale_cache_is_refetched() {
        let source = Arc::new(FakeSource::new(vec![breed(0, 1)]));
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let mut catalogue = Catalogue::new(store.clone(), source.clone(), Duration::from_secs(60));

        catalogue.load().await.unwrap();
        let old = Utc::now() - chrono::Duration::hours(2);
        store.set(FETCHED_AT_KEY, &old.to_rfc3339()).unwrap();

        catalogue.load().await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unreadable_timestamp_counts_as_stale() {
        let source = Arc::new(FakeSource::new(vec![breed(0, 1)]));
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let mut catalogue = Catalogue::new(store.clone(), source.clone(), Duration::from_secs(60));

        catalogue.load().await.unwrap();
        store.set(FETCHED_AT_KEY, "yesterday").unwrap();

        assert!(!catalogue.is_fresh(Utc::now()).unwrap());
    }

    #[tokio::test]
    async fn test_pages_walk_until_none() {
        let source = Arc::new(FakeSource::new((0..25).map(|i| breed(i, 3)).collect()));
        let mut catalogue = catalogue(source);
        catalogue.load().await.unwrap();

        assert_eq!(catalogue.select_all().unwrap().len(), 10);
        assert_eq!(catalogue.next_page().unwrap().map(|p| p.len()), Some(10));
        assert_eq!(catalogue.next_page().unwrap().map(|p| p.len()), Some(5));
        assert_eq!(catalogue.next_page().unwrap(), None);
        assert_eq!(catalogue.session().cursor(), 2);
    }

    #[tokio::test]
    async fn test_filter_activates_matches_and_empty_result_keeps_them() {
        let source = Arc::new(FakeSource::new(vec![breed(0, 2), breed(1, 4), breed(2, 5)]));
        let mut catalogue = catalogue(source);
        catalogue.load().await.unwrap();

        let over_three = Predicate::new(Field::Adaptability, Operator::GreaterThan, "3");
        let meta = catalogue.apply_filters(&[over_three]).unwrap();
        assert_eq!(meta.total_records, 2);
        assert_eq!(catalogue.session().active_key(), &CacheKey::filtered());
        assert_eq!(ids(&catalogue.current_page().unwrap()), ["b1", "b2"]);

        let none = Predicate::new(Field::Adaptability, Operator::GreaterThan, "9");
        assert!(matches!(
            catalogue.apply_filters(&[none]),
            Err(CatalogueError::EmptyResult)
        ));
        assert_eq!(catalogue.session().active_key(), &CacheKey::filtered());
        assert_eq!(ids(&catalogue.current_page().unwrap()), ["b1", "b2"]);
    }

    #[tokio::test]
    async fn test_invalid_predicate_is_rejected_before_any_write() {
        let source = Arc::new(FakeSource::new(vec![breed(0, 2)]));
        let mut catalogue = catalogue(source);
        catalogue.load().await.unwrap();

        let bad = Predicate::new(Field::Rare, Operator::LessThan, "1");
        assert!(matches!(
            catalogue.apply_filters(&[bad]),
            Err(CatalogueError::Engine(_))
        ));
        assert!(!catalogue.cache().contains(&CacheKey::filtered()).unwrap());
    }

    #[tokio::test]
    async fn test_sort_builds_on_filter_and_resets_step_back() {
        let source = Arc::new(FakeSource::new(vec![
            breed(0, 2),
            breed(1, 4),
            breed(2, 5),
            breed(3, 4),
        ]));
        let mut catalogue = catalogue(source);
        catalogue.load().await.unwrap();

        let at_least_four = Predicate::new(Field::Adaptability, Operator::GreaterOrEqual, "4");
        catalogue.apply_filters(&[at_least_four]).unwrap();

        let desc = SortSpec::new(Field::Adaptability, SortDirection::Descending);
        catalogue.apply_sort(desc).unwrap();
        assert_eq!(ids(&catalogue.current_page().unwrap()), ["b2", "b1", "b3"]);

        let asc = SortSpec::new(Field::Adaptability, SortDirection::Ascending);
        catalogue.apply_sort(asc).unwrap();
        assert_eq!(ids(&catalogue.current_page().unwrap()), ["b1", "b3", "b2"]);

        catalogue.reset_sort().unwrap();
        assert_eq!(catalogue.session().active_key(), &CacheKey::filtered());

        catalogue.reset_filters().unwrap();
        assert_eq!(catalogue.session().active_key(), &CacheKey::base());
        assert!(!catalogue.cache().contains(&CacheKey::filtered()).unwrap());
    }

    #[tokio::test]
    async fn test_refresh_drops_derived_sets() {
        let source = Arc::new(FakeSource::new(vec![breed(0, 2), breed(1, 5)]));
        let mut catalogue = catalogue(source.clone());
        catalogue.load().await.unwrap();

        let high = Predicate::new(Field::Adaptability, Operator::Equal, "5");
        catalogue.apply_filters(&[high]).unwrap();
        catalogue.next_page().unwrap();

        source.breeds.lock().unwrap().push(breed(2, 5));
        let meta = catalogue.refresh().await.unwrap();

        assert_eq!(meta.total_records, 3);
        assert_eq!(catalogue.session(), &Session::new(CacheKey::base()));
        assert!(!catalogue.cache().contains(&CacheKey::filtered()).unwrap());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cached_breeds() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let ok = Arc::new(FakeSource::new(vec![breed(0, 2)]));
        Catalogue::new(store.clone(), ok, Duration::from_secs(60))
            .refresh()
            .await
            .unwrap();

        let down = Arc::new(FakeSource::failing(NetworkError::status(503, "down")));
        let mut catalogue = Catalogue::new(store, down, Duration::from_secs(60));

        let err = catalogue.refresh().await.unwrap_err();
        assert!(matches!(err, CatalogueError::Network(NetworkError { code: Some(503), .. })));
        assert_eq!(catalogue.breeds().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_breed_picker_and_card() {
        let source = Arc::new(FakeSource::new(vec![breed(0, 2), breed(1, 5)]));
        let mut catalogue = catalogue(source);
        catalogue.load().await.unwrap();

        let picker = catalogue.breeds().unwrap();
        assert_eq!(picker[1], BreedSummary { id: "b1".into(), name: "Breed 1".into() });

        let card = catalogue.show_breed("b1").await.unwrap();
        assert_eq!(card.name, "Breed 1");
        assert_eq!(card.image_url.as_deref(), Some("https://cdn/b1.jpg"));

        assert!(matches!(
            catalogue.show_breed("zzz").await,
            Err(CatalogueError::BreedNotFound(id)) if id == "zzz"
        ));
    }

    #[tokio::test]
    async fn test_options_list_operators_and_values() {
        let source = Arc::new(FakeSource::new(vec![breed(0, 2), breed(1, 4)]));
        let mut catalogue = catalogue(source);
        catalogue.load().await.unwrap();

        let options = catalogue.filter_options(Field::Adaptability).unwrap();
        assert_eq!(options.operators.len(), 6);
        assert_eq!(options.values, vec![2, 3, 4]);

        let flags = catalogue.filter_options(Field::Rare);
        assert!(matches!(flags, Err(CatalogueError::Engine(_))));
    }

    #[tokio::test]
    async fn test_stale_cache_is_served_when_fetch_fails() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let ok = Arc::new(FakeSource::new((0..12).map(|i| breed(i, 3)).collect()));
        Catalogue::new(store.clone(), ok, Duration::from_secs(60))
            .load()
            .await
            .unwrap();
        let old = Utc::now() - chrono::Duration::hours(48);
        store.set(FETCHED_AT_KEY, &old.to_rfc3339()).unwrap();

        let down = Arc::new(FakeSource::failing(NetworkError::status(503, "down")));
        let mut catalogue = Catalogue::new(store, down.clone(), Duration::from_secs(60));

        let meta = catalogue.load().await.unwrap();
        assert_eq!(meta.total_records, 12);
        assert_eq!(down.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(catalogue.select_all().unwrap().len(), 10);
        let recorded = catalogue.last_refreshed().unwrap().unwrap();
        assert!(recorded < Utc::now() - chrono::Duration::hours(47));
    }

    #[tokio::test]
    async fn test_cold_start_fetch_failure_is_an_error() {
        let down = Arc::new(FakeSource::failing(NetworkError::status(503, "down")));
        let mut catalogue = catalogue(down);

        assert!(matches!(
            catalogue.load().await,
            Err(CatalogueError::Network(NetworkError { code: Some(503), .. }))
        ));
    }

    #[tokio::test]
    async fn test_refresh_survives_timestamp_write_failure() {
        let store = Arc::new(FailingKey::new(FETCHED_AT_KEY));
        let source = Arc::new(FakeSource::new(vec![breed(0, 2), breed(1, 5)]));
        let mut catalogue = Catalogue::new(store.clone(), source.clone(), Duration::from_secs(60));
        catalogue.load().await.unwrap();

        let high = Predicate::new(Field::Adaptability, Operator::Equal, "5");
        catalogue.apply_filters(&[high]).unwrap();

        store.arm();
        source.breeds.lock().unwrap().push(breed(2, 5));
        let meta = catalogue.refresh().await.unwrap();

        assert_eq!(meta.total_records, 3);
        assert_eq!(catalogue.session().active_key(), &CacheKey::base());
        assert!(!catalogue.cache().contains(&CacheKey::filtered()).unwrap());
        assert_eq!(catalogue.breeds().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_base_write_drops_derived_sets() {
        let store = Arc::new(FailingKey::new(CacheKey::BASE));
        let source = Arc::new(FakeSource::new(vec![breed(0, 2), breed(1, 5)]));
        let mut catalogue = Catalogue::new(store.clone(), source.clone(), Duration::from_secs(60));
        catalogue.load().await.unwrap();

        let high = Predicate::new(Field::Adaptability, Operator::Equal, "5");
        catalogue.apply_filters(&[high]).unwrap();
        catalogue
            .apply_sort(SortSpec::new(Field::Adaptability, SortDirection::Descending))
            .unwrap();

        store.arm();
        source.breeds.lock().unwrap().push(breed(2, 5));
        assert!(matches!(
            catalogue.refresh().await,
            Err(CatalogueError::Storage(_))
        ));

        assert_eq!(catalogue.session().active_key(), &CacheKey::base());
        assert!(!catalogue.cache().contains(&CacheKey::filtered()).unwrap());
        assert!(!catalogue.cache().contains(&CacheKey::sorted()).unwrap());
        assert_eq!(catalogue.breeds().unwrap().len(), 2);
    }
}
