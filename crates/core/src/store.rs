use crate::domain::stock::StockRecord;
use crate::events::{EventChannel, UiNotification};
use crate::fetch::{ApplicationFailure, StockListFetcher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

pub const APPLICATION_FAILURE_MESSAGE: &str = "Something went wrong!!";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    pub is_loading: bool,
    pub items: Vec<StockRecord>,
    /// Bumped on every successful load, so observers can tell a new list
    /// from a loading-flag toggle.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    ApplicationFailure,
    TransportFailure,
    AlreadyInFlight,
}

/// Owns [`FetchState`]. The only writer is [`QueryStateStore::load`].
pub struct QueryStateStore {
    fetcher: Arc<dyn StockListFetcher>,
    events: EventChannel,
    state: watch::Sender<FetchState>,
    in_flight: AtomicBool,
}

impl QueryStateStore {
    pub fn new(fetcher: Arc<dyn StockListFetcher>, events: EventChannel) -> Self {
        Self {
            fetcher,
            events,
            state: watch::Sender::new(FetchState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Fetches the list once. Failures never clear previously loaded items;
    /// they are turned into a single notification instead.
    pub async fn load(&self) -> LoadOutcome {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::warn!("stock list load already in progress; ignoring");
            return LoadOutcome::AlreadyInFlight;
        }
        let _in_flight = InFlight {
            flag: &self.in_flight,
            state: &self.state,
        };

        self.state.send_modify(|s| s.is_loading = true);
        tracing::info!(source = self.fetcher.source_name(), "loading stock list");

        let outcome = match self.fetcher.fetch_stock_list().await {
            Ok(items) => {
                let count = items.len();
                self.state.send_modify(|s| {
                    s.items = items;
                    s.generation += 1;
                    s.is_loading = false;
                });
                tracing::info!(count, "stock list loaded");
                return LoadOutcome::Loaded { count };
            }
            Err(err) => match err.downcast_ref::<ApplicationFailure>() {
                Some(failure) => {
                    tracing::warn!(status = failure.status, "stock list load refused by server");
                    self.events
                        .send(UiNotification::show_message(APPLICATION_FAILURE_MESSAGE));
                    LoadOutcome::ApplicationFailure
                }
                None => {
                    tracing::error!(error = %err, "stock list load failed");
                    self.events.send(UiNotification::show_error(Some(err)));
                    LoadOutcome::TransportFailure
                }
            },
        };

        self.state.send_modify(|s| s.is_loading = false);
        outcome
    }
}

/// Releases the single-flight bit and, if the load was cancelled before it
/// finished, clears the loading flag it left behind.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    state: &'a watch::Sender<FetchState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if !s.is_loading {
                return false;
            }
            s.is_loading = false;
            true
        });
        self.flag.store(false, Ordering::Release);
    }
}
