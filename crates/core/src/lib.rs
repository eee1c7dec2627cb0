pub mod analysis;
pub mod client;
pub mod domain;
pub mod market;
pub mod render;
pub mod session;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_ANALYZE_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_MARKET_DATA_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://query1.finance.yahoo.com";
    const DEFAULT_PORT: u16 = 10000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: Option<String>,
        pub search_timeout_secs: u64,
        pub analyze_timeout_secs: u64,
        pub market_data_base_url: String,
        pub market_data_timeout_secs: u64,
        pub port: u16,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                api_base_url: std::env::var("CHARTSENSE_API_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                search_timeout_secs: env_parse("SEARCH_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_SEARCH_TIMEOUT_SECS),
                analyze_timeout_secs: env_parse("ANALYZE_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_ANALYZE_TIMEOUT_SECS),
                market_data_base_url: std::env::var("MARKET_DATA_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_MARKET_DATA_BASE_URL.to_string()),
                market_data_timeout_secs: env_parse("MARKET_DATA_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_MARKET_DATA_TIMEOUT_SECS),
                port: env_parse("PORT")?.unwrap_or(DEFAULT_PORT),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_api_base_url(&self) -> anyhow::Result<&str> {
            self.api_base_url
                .as_deref()
                .context("CHARTSENSE_API_URL is required")
        }

        pub fn search_timeout(&self) -> Duration {
            Duration::from_secs(self.search_timeout_secs)
        }

        pub fn analyze_timeout(&self) -> Duration {
            Duration::from_secs(self.analyze_timeout_secs)
        }

        pub fn market_data_timeout(&self) -> Duration {
            Duration::from_secs(self.market_data_timeout_secs)
        }
    }

    fn env_parse<T: std::str::FromStr>(key: &str) -> anyhow::Result<Option<T>> {
        match std::env::var(key) {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| anyhow::anyhow!("{key} is not a valid value: {raw}")),
            _ => Ok(None),
        }
    }
}
