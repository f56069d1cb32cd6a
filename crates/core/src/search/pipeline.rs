use crate::config::Settings;
use crate::domain::stock::StockRecord;
use crate::search::debounce::Debouncer;
use crate::search::filter::filter_stocks;
use crate::store::FetchState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub debounce: Duration,
    /// How long the pipeline keeps running with no observers before it
    /// tears itself down.
    pub stop_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for PipelineSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            debounce: settings.debounce,
            stop_timeout: settings.stop_timeout,
        }
    }
}

/// Live derivation of the filtered view from the query text and the loaded
/// items.
///
/// The worker task only runs while someone holds a receiver from
/// [`SearchPipeline::subscribe`]. Every (re)start debounces the current query
/// afresh and filters against the current items.
pub struct SearchPipeline {
    shared: Arc<Shared>,
}

struct Shared {
    settings: PipelineSettings,
    query: watch::Receiver<String>,
    items: watch::Receiver<FetchState>,
    view: watch::Sender<Vec<StockRecord>>,
    searching: watch::Sender<bool>,
    debounced: watch::Sender<Option<String>>,
    recomputations: AtomicU64,
    resumed: Notify,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SearchPipeline {
    pub fn new(
        settings: PipelineSettings,
        query: watch::Receiver<String>,
        items: watch::Receiver<FetchState>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                settings,
                query,
                items,
                view: watch::Sender::new(Vec::new()),
                searching: watch::Sender::new(false),
                debounced: watch::Sender::new(None),
                recomputations: AtomicU64::new(0),
                resumed: Notify::new(),
                task: Mutex::new(None),
            }),
        }
    }

    /// Starts observing the filtered view. Must be called from within a
    /// tokio runtime.
    pub fn subscribe(&self) -> watch::Receiver<Vec<StockRecord>> {
        let mut task = self.shared.task();
        let rx = self.shared.view.subscribe();
        match task.as_ref() {
            Some(handle) if !handle.is_finished() => self.shared.resumed.notify_one(),
            _ => {
                tracing::debug!("starting search pipeline");
                *task = Some(tokio::spawn(run(self.shared.clone())));
            }
        }
        rx
    }

    pub fn results(&self) -> Vec<StockRecord> {
        self.shared.view.borrow().clone()
    }

    pub fn is_searching(&self) -> bool {
        *self.shared.searching.borrow()
    }

    pub fn searching(&self) -> watch::Receiver<bool> {
        self.shared.searching.subscribe()
    }

    /// Last query value that made it through the debounce window.
    pub fn debounced_query(&self) -> Option<String> {
        self.shared.debounced.borrow().clone()
    }

    pub fn recomputations(&self) -> u64 {
        self.shared.recomputations.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .task()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels the worker and any pending debounce timer.
    pub fn shutdown(&self) {
        if let Some(handle) = self.shared.task().take() {
            handle.abort();
        }
    }
}

impl Drop for SearchPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run(shared: Arc<Shared>) {
    let mut query_rx = shared.query.clone();
    let mut items_rx = shared.items.clone();
    let mut debouncer = Debouncer::new(shared.settings.debounce);

    debouncer.push(query_rx.borrow_and_update().clone());
    let mut generation = items_rx.borrow_and_update().generation;
    let mut current: Option<String> = None;

    loop {
        tokio::select! {
            changed = query_rx.changed() => {
                if changed.is_err() {
                    tracing::debug!("query source closed; stopping search pipeline");
                    return;
                }
                debouncer.push(query_rx.borrow_and_update().clone());
            }
            query = debouncer.expired() => {
                shared.debounced.send_replace(Some(query.clone()));
                let state = items_rx.borrow_and_update();
                generation = state.generation;
                recompute(&shared, &query, &state.items);
                current = Some(query);
            }
            changed = items_rx.changed() => {
                if changed.is_err() {
                    tracing::debug!("item source closed; stopping search pipeline");
                    return;
                }
                let state = items_rx.borrow_and_update();
                if state.generation == generation {
                    continue;
                }
                generation = state.generation;
                // Nothing to combine with until a query has passed the debounce.
                if let Some(query) = current.as_deref() {
                    recompute(&shared, query, &state.items);
                }
            }
            _ = shared.view.closed() => {
                if wait_while_unobserved(&shared).await {
                    tracing::debug!("search pipeline unobserved; torn down");
                    return;
                }
            }
        }
    }
}

/// Returns true when the pipeline should stop for good.
async fn wait_while_unobserved(shared: &Shared) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(shared.settings.stop_timeout) => {}
        _ = shared.resumed.notified() => return false,
    }

    let mut task = shared.task();
    if shared.view.receiver_count() > 0 {
        return false;
    }
    task.take();
    true
}

fn recompute(shared: &Shared, query: &str, items: &[StockRecord]) {
    shared.searching.send_replace(true);
    let view = filter_stocks(query, items);
    let n = shared.recomputations.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::debug!(query, results = view.len(), recomputations = n, "search results recomputed");
    shared.view.send_if_modified(|current| {
        if *current == view {
            return false;
        }
        *current = view;
        true
    });
    shared.searching.send_replace(false);
}
