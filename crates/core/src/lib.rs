pub mod domain;
pub mod events;
pub mod fetch;
pub mod screen;
pub mod search;
pub mod store;
pub mod view;

pub mod config {
    use std::time::Duration;

    pub const DEFAULT_BASE_URL: &str = "https://gist.githubusercontent.com";
    pub const DEFAULT_LIST_PATH: &str = "priyanshrastogi/0e1d4f8d517698cfdced49f5e59567be/raw/9158ad254e92aaffe215e950f4846a23a0680703/mock-stocks.json";

    const DEFAULT_TIMEOUT_SECS: u64 = 60;
    const DEFAULT_DEBOUNCE_MS: u64 = 500;
    const DEFAULT_STOP_TIMEOUT_MS: u64 = 5_000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub base_url: String,
        pub list_path: String,
        pub timeout: Duration,
        pub debounce: Duration,
        pub stop_timeout: Duration,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                base_url: DEFAULT_BASE_URL.to_string(),
                list_path: DEFAULT_LIST_PATH.to_string(),
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
                stop_timeout: Duration::from_millis(DEFAULT_STOP_TIMEOUT_MS),
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let defaults = Self::default();
            Ok(Self {
                base_url: non_empty_var("STOCKS_BASE_URL").unwrap_or(defaults.base_url),
                list_path: non_empty_var("STOCKS_LIST_PATH").unwrap_or(defaults.list_path),
                timeout: Duration::from_secs(
                    parse_var("STOCKS_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS),
                ),
                debounce: Duration::from_millis(
                    parse_var("SEARCH_DEBOUNCE_MS").unwrap_or(DEFAULT_DEBOUNCE_MS),
                ),
                stop_timeout: Duration::from_millis(
                    parse_var("SEARCH_STOP_TIMEOUT_MS").unwrap_or(DEFAULT_STOP_TIMEOUT_MS),
                ),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn list_url(&self) -> String {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                self.list_path.trim_start_matches('/')
            )
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    fn parse_var(key: &str) -> Option<u64> {
        std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok())
    }

}

#[cfg(test)]
mod test_support;
