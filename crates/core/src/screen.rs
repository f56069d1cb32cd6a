use crate::config::Settings;
use crate::domain::stock::StockRecord;
use crate::events::{EventChannel, UiNotification};
use crate::fetch::StockListFetcher;
use crate::search::{PipelineSettings, SearchPipeline};
use crate::store::{FetchState, QueryStateStore};
use crate::view::ScreenView;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Per-screen owner of the fetch state, the query text, the search pipeline
/// and the notification queue. Dropping it cancels the initial load and the
/// pipeline, so nothing is written after teardown.
pub struct SearchScreen {
    store: Arc<QueryStateStore>,
    events: EventChannel,
    query: watch::Sender<String>,
    pipeline: SearchPipeline,
    load_task: JoinHandle<()>,
}

impl SearchScreen {
    /// Builds the screen and starts the initial load. Must be called from
    /// within a tokio runtime.
    pub fn new(settings: &Settings, fetcher: Arc<dyn StockListFetcher>) -> Self {
        Self::with_pipeline_settings(PipelineSettings::from(settings), fetcher)
    }

    pub fn with_pipeline_settings(
        pipeline_settings: PipelineSettings,
        fetcher: Arc<dyn StockListFetcher>,
    ) -> Self {
        let events = EventChannel::new();
        let store = Arc::new(QueryStateStore::new(fetcher, events.clone()));
        let query = watch::Sender::new(String::new());
        let pipeline = SearchPipeline::new(pipeline_settings, query.subscribe(), store.subscribe());

        let load_task = tokio::spawn({
            let store = store.clone();
            async move {
                let outcome = store.load().await;
                tracing::debug!(?outcome, "initial stock list load finished");
            }
        });

        Self {
            store,
            events,
            query,
            pipeline,
            load_task,
        }
    }

    pub fn on_search_text_change(&self, text: impl Into<String>) {
        let text = text.into();
        self.query.send_if_modified(|current| {
            if *current == text {
                return false;
            }
            *current = text;
            true
        });
    }

    pub fn clear_search(&self) {
        self.on_search_text_change(String::new());
    }

    pub fn search_text(&self) -> String {
        self.query.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn is_searching(&self) -> bool {
        self.pipeline.is_searching()
    }

    pub fn fetch_state(&self) -> watch::Receiver<FetchState> {
        self.store.subscribe()
    }

    /// Observes the filtered view; keeps the search pipeline alive while held.
    pub fn results(&self) -> watch::Receiver<Vec<StockRecord>> {
        self.pipeline.subscribe()
    }

    pub fn pipeline(&self) -> &SearchPipeline {
        &self.pipeline
    }

    pub fn notifications(&self) -> Vec<UiNotification> {
        self.events.pending()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Vec<UiNotification>> {
        self.events.subscribe()
    }

    pub fn acknowledge(&self, id: Uuid) -> bool {
        self.events.acknowledge(id)
    }

    pub fn view(&self) -> ScreenView {
        ScreenView::render(
            self.is_loading(),
            &self.query.borrow(),
            self.is_searching(),
            &self.pipeline.results(),
        )
    }

    /// Back/exit action: ends the screen.
    pub fn close(self) {
        tracing::info!("search screen closed");
    }
}

impl Drop for SearchScreen {
    fn drop(&mut self) {
        self.load_task.abort();
        self.pipeline.shutdown();
    }
}
