pub mod error;
pub mod http;

use crate::domain::stock::StockRecord;

pub use error::ApplicationFailure;
pub use http::HttpStockListFetcher;

/// Single round trip to the stock list endpoint, no retry.
///
/// Implementations report a server-side refusal as [`ApplicationFailure`]
/// (wrapped in `anyhow::Error`); any other error is treated by callers as a
/// transport failure.
#[async_trait::async_trait]
pub trait StockListFetcher: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_stock_list(&self) -> anyhow::Result<Vec<StockRecord>>;
}
