use crate::config::Settings;
use crate::domain::stock::StockRecord;
use crate::fetch::{ApplicationFailure, StockListFetcher};
use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpStockListFetcher {
    http: reqwest::Client,
    url: String,
}

impl HttpStockListFetcher {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.list_url(), settings.timeout)
    }

    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("failed to build stock list http client")?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl StockListFetcher for HttpStockListFetcher {
    fn source_name(&self) -> &'static str {
        "http_json"
    }

    async fn fetch_stock_list(&self) -> Result<Vec<StockRecord>> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("stock list request failed: {}", self.url))?;

        let status = res.status();
        tracing::info!(url = %self.url, %status, "stock list response");

        if !status.is_success() {
            return Err(ApplicationFailure {
                status: status.as_u16(),
            }
            .into());
        }

        let text = res
            .text()
            .await
            .context("failed to read stock list response")?;
        tracing::debug!(body = %text, "stock list response body");

        let items = serde_json::from_str::<Vec<StockRecord>>(&text)
            .context("stock list response is not a JSON array of stock records")?;
        Ok(items)
    }
}
