use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::app::{MindsyncError, Result};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::domain::Item;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::store::Store;
use crate::sync::{Endpoints, SyncReport};

/// One page of the activity feed.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub candidates: Vec<Item>,
    pub next_cursor: Option<String>,
    /// `(entities[i], error)` for entries that could not be mapped
    pub rejected: Vec<(String, String)>,
    /// Entries on the page, mapped or not; a full page means more may follow.
    pub entity_count: usize,
}

/// Whether a feed candidate should be (re)stored given what is stored now.
pub fn needs_update(existing: Option<&Item>, force: bool) -> bool {
    force || existing.map_or(true, |item| !item.is_complete())
}

/// What a single candidate branch did.
#[derive(Debug)]
enum Outcome {
    Stored(String),
    Skipped,
    /// Still blank and identical to the stored entry.
    Unchanged,
    Empty(String),
}

/// Collaborators every branch needs, shared across spawned tasks.
struct Shared<S> {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    store: Arc<S>,
    endpoints: Endpoints,
    normalizer: Normalizer,
}

/// Results accumulated by concurrent branches of one run.
#[derive(Default)]
struct RunState {
    updated: AtomicUsize,
    updated_ids: Mutex<Vec<String>>,
    empty_urls: Mutex<Vec<String>>,
    failures: Mutex<Vec<(String, String)>>,
}

impl RunState {
    fn stored(&self, id: String) {
        self.updated.fetch_add(1, Ordering::SeqCst);
        tracing::info!(id = %id, "Stored item");
        push(&self.updated_ids, id);
    }

    fn empty(&self, url: String) {
        tracing::warn!("Detail fetch returned nothing: {}", url);
        push(&self.empty_urls, url);
    }

    fn failed(&self, id: String, error: String) {
        tracing::warn!(id = %id, "Failed to reconcile item: {}", error);
        push(&self.failures, (id, error));
    }
}

fn push<T>(list: &Mutex<Vec<T>>, value: T) {
    list.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(value);
}

fn take<T>(list: &Mutex<Vec<T>>) -> Vec<T> {
    std::mem::take(&mut *list.lock().unwrap_or_else(PoisonError::into_inner))
}

/// Mirrors a user's feed into a store.
pub struct Reconciler<S> {
    shared: Arc<Shared<S>>,
    semaphore: Arc<Semaphore>,
    page_size: usize,
}

impl<S: Store + Send + Sync + 'static> Reconciler<S> {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, store: Arc<S>, endpoints: Endpoints) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            shared: Arc::new(Shared {
                fetcher,
                store,
                endpoints,
                normalizer: Normalizer::new(),
            }),
            semaphore: Arc::new(Semaphore::new(workers)),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(workers.max(1)));
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.shared.store
    }

    /// Fetches and maps one feed page starting at `cursor`.
    ///
    /// A response that is not a feed document is an error. A single entry
    /// that cannot be mapped only ends up in [`FeedPage::rejected`].
    pub async fn fetch_feed_page(&self, user_id: &str, cursor: Option<&str>) -> Result<FeedPage> {
        let shared = &self.shared;
        let url = shared.endpoints.feed_url(user_id, self.page_size, cursor)?;
        let body = shared.fetcher.fetch(&url).await?;
        let doc: Value = serde_json::from_slice(&body)?;

        let count = shared.normalizer.entity_count(&doc)?;
        let mut candidates = Vec::with_capacity(count);
        let mut rejected = Vec::new();
        for i in 0..count {
            match shared.normalizer.map_feed_entry(&doc, i) {
                Ok(item) => candidates.push(item),
                Err(e) => rejected.push((format!("entities[{}]", i), e.to_string())),
            }
        }

        tracing::debug!("Feed page from {:?}: {} entities", cursor, count);

        Ok(FeedPage {
            candidates,
            next_cursor: shared.normalizer.feed_cursor(&doc),
            rejected,
            entity_count: count,
        })
    }

    /// Walks every feed page and brings the store up to date.
    ///
    /// Only a failing feed page aborts the run. Per-item failures end up in
    /// [`SyncReport::failures`], empty detail responses in
    /// [`SyncReport::empty_urls`].
    pub async fn reconcile(&self, user_id: &str, force: bool) -> Result<SyncReport> {
        let started_at = Utc::now();
        let run = Arc::new(RunState::default());
        let mut cursor: Option<String> = None;
        let mut pages = 0;
        let mut candidates = 0;

        loop {
            let page = self.fetch_feed_page(user_id, cursor.as_deref()).await?;
            pages += 1;
            candidates += page.candidates.len();
            let full = page.entity_count >= self.page_size;
            for (entry, error) in page.rejected {
                run.failed(entry, error);
            }

            self.reconcile_page(page.candidates, force, &run).await;

            if !full {
                break;
            }
            match page.next_cursor {
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    tracing::warn!("Feed returned the same cursor {} again, stopping", next);
                    break;
                }
                Some(next) => cursor = Some(next),
                None => {
                    tracing::debug!("Full page without load-next cursor, stopping");
                    break;
                }
            }
        }

        let report = SyncReport {
            updated: run.updated.load(Ordering::SeqCst),
            updated_ids: take(&run.updated_ids),
            empty_urls: take(&run.empty_urls),
            failures: take(&run.failures),
            pages,
            candidates,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Reconciled {} candidates over {} pages: {} updated, {} empty, {} failed",
            report.candidates,
            report.pages,
            report.updated,
            report.empty_urls.len(),
            report.failures.len()
        );

        Ok(report)
    }

    async fn reconcile_page(&self, candidates: Vec<Item>, force: bool, run: &Arc<RunState>) {
        let handles: Vec<_> = candidates
            .into_iter()
            .map(|candidate| {
                let shared = self.shared.clone();
                let semaphore = self.semaphore.clone();
                let run = run.clone();

                tokio::spawn(async move {
                    let id = candidate.id.clone();
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => return run.failed(id, e.to_string()),
                    };

                    match reconcile_candidate(&shared, candidate, force).await {
                        Ok(Outcome::Stored(id)) => run.stored(id),
                        Ok(Outcome::Empty(url)) => run.empty(url),
                        Ok(Outcome::Skipped) => {}
                        Ok(Outcome::Unchanged) => {
                            tracing::debug!(id = %id, "Item still has no message");
                        }
                        Err(e) => run.failed(id, e.to_string()),
                    }
                })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                tracing::error!("Task join error: {}", e);
            }
        }
    }
}

async fn reconcile_candidate<S: Store>(
    shared: &Shared<S>,
    candidate: Item,
    force: bool,
) -> Result<Outcome> {
    let existing = shared.store.get_item(&candidate.id)?;
    if !needs_update(existing.as_ref(), force) {
        return Ok(Outcome::Skipped);
    }

    let item = if candidate.message.is_some() {
        candidate
    } else {
        match fetch_detail(shared, &candidate.id).await {
            Ok(mut detail) => {
                if detail.id != candidate.id {
                    tracing::debug!("Detail for {} resolved to {}", candidate.id, detail.id);
                }
                // The feed id stays the key, even when the detail is the reminded original.
                detail.id = candidate.id;
                detail
            }
            Err(MindsyncError::EmptyDetail { url }) => return Ok(Outcome::Empty(url)),
            Err(e) => return Err(e),
        }
    };

    if !item.is_complete() && existing.as_ref().is_some_and(|e| same_record(e, &item)) {
        return Ok(Outcome::Unchanged);
    }

    let id = item.id.clone();
    shared.store.put_item(item)?;
    Ok(Outcome::Stored(id))
}

async fn fetch_detail<S>(shared: &Shared<S>, id: &str) -> Result<Item> {
    let url = shared.endpoints.detail_url(id)?;
    let body = shared.fetcher.fetch(&url).await?;
    let doc: Value = serde_json::from_slice(&body)?;
    shared.normalizer.map_detail_entry(&doc, &url)
}

/// Equal as far as the store file is concerned.
fn same_record(a: &Item, b: &Item) -> bool {
    a.remind_of == b.remind_of
        && a.message.as_deref().unwrap_or("") == b.message.as_deref().unwrap_or("")
}
