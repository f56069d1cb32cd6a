use crate::domain::stock::StockRecord;
use crate::fetch::StockListFetcher;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub(crate) fn stock(ticker: &str, name: Option<&str>) -> StockRecord {
    StockRecord {
        ticker: Some(ticker.to_string()),
        name: name.map(str::to_string),
        current_price: None,
    }
}

/// Hands out queued results in order, then empty lists.
pub(crate) struct ScriptedFetcher {
    responses: Mutex<VecDeque<anyhow::Result<Vec<StockRecord>>>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub(crate) fn new(responses: Vec<anyhow::Result<Vec<StockRecord>>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StockListFetcher for ScriptedFetcher {
    fn source_name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_stock_list(&self) -> anyhow::Result<Vec<StockRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Blocks the first fetch until the test releases it through the sender.
pub(crate) struct GatedFetcher {
    gate: tokio::sync::Mutex<Option<oneshot::Receiver<anyhow::Result<Vec<StockRecord>>>>>,
}

impl GatedFetcher {
    pub(crate) fn new() -> (Arc<Self>, oneshot::Sender<anyhow::Result<Vec<StockRecord>>>) {
        let (tx, rx) = oneshot::channel();
        let fetcher = Arc::new(Self {
            gate: tokio::sync::Mutex::new(Some(rx)),
        });
        (fetcher, tx)
    }
}

#[async_trait::async_trait]
impl StockListFetcher for GatedFetcher {
    fn source_name(&self) -> &'static str {
        "gated"
    }

    async fn fetch_stock_list(&self) -> anyhow::Result<Vec<StockRecord>> {
        let rx = self.gate.lock().await.take();
        match rx {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(anyhow::anyhow!("gate dropped"))),
            None => Ok(Vec::new()),
        }
    }
}
