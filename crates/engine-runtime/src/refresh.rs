use crate::catalogue::Catalogue;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Spawns a task that refreshes the base breeds every `period` until
/// `cancel` fires. The first refresh happens one period after the call.
///
/// A failed refresh is logged and the cached data stays in place; the next
/// tick tries again.
pub fn spawn_refresh(
    catalogue: Arc<Mutex<Catalogue>>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Refresh task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let mut catalogue = catalogue.lock().await;
                    match catalogue.refresh().await {
                        Ok(meta) => info!(records = meta.total_records, "Periodic refresh done"),
                        Err(e) => warn!("Periodic refresh failed: {}", e),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use connectors::{error::NetworkError, source::BreedSource};
    use engine_core::state::memory::MemoryKvStore;
    use model::records::record::Record;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BreedSource for CountingSource {
        async fn fetch_all_breeds(&self) -> Result<Vec<Record>, NetworkError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                return Err(NetworkError::transport("flaky"));
            }
            Ok(vec![Record::new()])
        }

        async fn fetch_breed_image(&self, _breed_id: &str) -> Result<Vec<Record>, NetworkError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_refreshes_until_cancelled_and_survives_failures() {
        let source = Arc::new(CountingSource::default());
        let catalogue = Arc::new(Mutex::new(Catalogue::new(
            Arc::new(MemoryKvStore::new()),
            source.clone(),
            Duration::from_secs(60),
        )));
        let cancel = CancellationToken::new();

        let handle = spawn_refresh(catalogue.clone(), Duration::from_millis(20), cancel.clone());
        tokio::time::sleep(Duration::from_millis(150)).await;
        cancel.cancel();
        handle.await.unwrap();

        let calls = source.calls.load(Ordering::SeqCst);
        assert!(calls >= 3, "expected several refreshes, got {calls}");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_nothing_runs_before_the_first_period() {
        let source = Arc::new(CountingSource::default());
        let catalogue = Arc::new(Mutex::new(Catalogue::new(
            Arc::new(MemoryKvStore::new()),
            source.clone(),
            Duration::from_secs(60),
        )));
        let cancel = CancellationToken::new();

        let handle = spawn_refresh(catalogue, Duration::from_secs(3600), cancel.clone());
        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
