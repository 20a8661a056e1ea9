//! Cooperative cancellation of running crawls

use crate::common::{coordinator, fixed_id_store, ScriptedFetcher, BASE};
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use sumi_seek::crawler::{FetchFuture, HtmlFetcher};
use sumi_seek::storage::{AnalysisStore, InMemoryStore};
use sumi_seek::CrawlStatus;
use tokio::sync::Notify;

/// Holds the base page back until released
struct GatedFetcher {
    inner: ScriptedFetcher,
    release: Arc<Notify>,
}

impl HtmlFetcher for GatedFetcher {
    fn fetch(&self, url: &str) -> FetchFuture {
        let release = Arc::clone(&self.release);
        let page = self.inner.fetch(url);
        async move {
            release.notified().await;
            page.await
        }
        .boxed()
    }
}

/// Serves an endless chain `/p0 -> /p1 -> ...` and sets `status` on one fetch
struct ChainFetcher {
    store: Arc<InMemoryStore>,
    id: &'static str,
    status: CrawlStatus,
    trigger_at: usize,
    calls: Arc<AtomicUsize>,
}

impl HtmlFetcher for ChainFetcher {
    fn fetch(&self, url: &str) -> FetchFuture {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.trigger_at {
            self.store
                .set_status(self.id, self.status, None)
                .expect("Failed to set status");
        }

        let next = url
            .rsplit_once("/p")
            .and_then(|(_, n)| n.parse::<usize>().ok())
            .map_or(0, |n| n + 1);
        let html = format!("chain link <a href='/p{}'>next</a>", next);
        async move { Ok(html) }.boxed()
    }
}

fn chain(
    id: &'static str,
    status: CrawlStatus,
    trigger_at: usize,
) -> (ChainFetcher, Arc<InMemoryStore>, Arc<AtomicUsize>) {
    let store = fixed_id_store(id);
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = ChainFetcher {
        store: Arc::clone(&store),
        id,
        status,
        trigger_at,
        calls: Arc::clone(&calls),
    };
    (fetcher, store, calls)
}

#[tokio::test]
async fn test_done_before_base_fetch_records_nothing() {
    let release = Arc::new(Notify::new());
    let fetcher = GatedFetcher {
        inner: ScriptedFetcher::new(&[
            (BASE, "test <a href='/a'>a</a>"),
            ("https://example.com/a", "test"),
        ]),
        release: Arc::clone(&release),
    };
    let store = Arc::new(InMemoryStore::new(8));
    let coordinator = coordinator(Arc::new(fetcher), store.clone(), 5);

    let (id, handle) = coordinator.crawl_with_handle("test").expect("Failed to start crawl");
    store
        .set_status(&id, CrawlStatus::Done, None)
        .expect("Failed to set DONE");
    release.notify_one();
    handle.await.expect("Crawl task panicked");

    let record = store.get(&id).expect("Missing record");
    assert_eq!(record.status, CrawlStatus::Done);
    assert!(record.urls.is_empty());
}

#[tokio::test]
async fn test_halt_stops_within_one_sampling_interval() {
    // max_results 1000 samples HALT every 100 executions
    let trigger_at = 5;
    let (fetcher, store, calls) = chain("haltcrwl", CrawlStatus::Halt, trigger_at);
    let coordinator = coordinator(Arc::new(fetcher), store.clone(), 1000);

    let (id, handle) = coordinator.crawl_with_handle("absent").expect("Failed to start crawl");
    assert_eq!(id, "haltcrwl");
    handle.await.expect("Crawl task panicked");

    let fetched = calls.load(Ordering::SeqCst);
    assert!(
        fetched <= 1 + trigger_at + 100,
        "fetched {} pages after HALT",
        fetched
    );

    let record = store.get(&id).expect("Missing record");
    assert_eq!(record.status, CrawlStatus::Done);
    assert!(record.urls.is_empty());
}

#[tokio::test]
async fn test_done_stops_on_next_execution() {
    let trigger_at = 4;
    let (fetcher, store, calls) = chain("donecrwl", CrawlStatus::Done, trigger_at);
    let coordinator = coordinator(Arc::new(fetcher), store.clone(), 1000);

    let (id, handle) = coordinator.crawl_with_handle("chain").expect("Failed to start crawl");
    handle.await.expect("Crawl task panicked");

    assert_eq!(calls.load(Ordering::SeqCst), trigger_at);

    // Base, p0 and p1 matched before DONE arrived with the fetch of p2
    let record = store.get(&id).expect("Missing record");
    assert_eq!(record.status, CrawlStatus::Done);
    assert_eq!(
        record.sorted_urls(),
        vec![
            "https://example.com/",
            "https://example.com/p0",
            "https://example.com/p1"
        ]
    );
}

#[tokio::test]
async fn test_failed_status_also_stops_crawl() {
    let trigger_at = 3;
    let (fetcher, store, calls) = chain("failcrwl", CrawlStatus::Failed, trigger_at);
    let coordinator = coordinator(Arc::new(fetcher), store.clone(), 1000);

    let (id, handle) = coordinator.crawl_with_handle("absent").expect("Failed to start crawl");
    handle.await.expect("Crawl task panicked");

    assert_eq!(calls.load(Ordering::SeqCst), trigger_at);

    // FAILED is not terminal, so the finished crawl still records DONE
    let record = store.get(&id).expect("Missing record");
    assert_eq!(record.status, CrawlStatus::Done);
}
