use crate::config::Settings;
use crate::domain::suggestion::SuggestionEntry;
use crate::market::types::{Candle, PriceHistory};
use crate::market::MarketData;
use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);
const HISTORY_RANGE: &str = "1y";
const HISTORY_INTERVAL: &str = "1d";
const QUOTES_COUNT: &str = "10";

/// Indian listings only: NSE and BSE suffixes.
const EXCHANGE_SUFFIXES: [&str; 2] = [".NS", ".BO"];

#[derive(Debug, Clone)]
pub struct YahooMarketData {
    http: reqwest::Client,
    base_url: String,
    history_timeout: Duration,
}

impl YahooMarketData {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.market_data_base_url.clone(),
            settings.market_data_timeout(),
        )
    }

    pub fn new(base_url: impl Into<String>, history_timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build market data http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            history_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Chart endpoint for `symbol`, which is percent-encoded as a single path segment.
    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid market data base url: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("market data base url cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart"])
            .push(symbol);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl MarketData for YahooMarketData {
    fn source_name(&self) -> &'static str {
        "yahoo"
    }

    async fn daily_history(&self, symbol: &str) -> Result<PriceHistory> {
        let res = self
            .http
            .get(self.chart_url(symbol)?)
            .timeout(self.history_timeout)
            .query(&[("range", HISTORY_RANGE), ("interval", HISTORY_INTERVAL)])
            .send()
            .await
            .context("chart request failed")?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!(symbol, "chart lookup found no such symbol");
            return Ok(PriceHistory {
                symbol: symbol.to_string(),
                ..PriceHistory::default()
            });
        }

        let text = res.text().await.context("failed to read chart response")?;
        if !status.is_success() {
            anyhow::bail!("chart HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<ChartResponse>(&text)
            .with_context(|| format!("chart response has unexpected shape: {text}"))?;
        Ok(history_from_chart(symbol, parsed))
    }

    async fn live_search(&self, query: &str) -> Result<Vec<SuggestionEntry>> {
        let res = self
            .http
            .get(self.url("/v1/finance/search"))
            .timeout(SEARCH_TIMEOUT)
            .query(&[("q", query), ("quotesCount", QUOTES_COUNT), ("newsCount", "0")])
            .send()
            .await
            .context("symbol search request failed")?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("symbol search HTTP {status}");
        }

        let parsed = res
            .json::<SearchResponse>()
            .await
            .context("failed to decode symbol search response")?;
        Ok(suggestions_from_search(parsed))
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

#[derive(Debug, Deserialize)]
struct SearchQuote {
    #[serde(default)]
    symbol: String,
    longname: Option<String>,
    shortname: Option<String>,
}

fn history_from_chart(symbol: &str, chart: ChartResponse) -> PriceHistory {
    let Some(result) = chart.chart.result.and_then(|r| r.into_iter().next()) else {
        return PriceHistory {
            symbol: symbol.to_string(),
            ..PriceHistory::default()
        };
    };

    let company_name = result.meta.long_name.or(result.meta.short_name);
    let columns = result.indicators.quote.into_iter().next().unwrap_or_default();

    // Yahoo leaves gaps (nulls) for halted sessions; those rows are skipped.
    let candles = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            Some(Candle {
                timestamp: DateTime::from_timestamp(*ts, 0)?,
                open: (*columns.open.get(i)?)?,
                high: (*columns.high.get(i)?)?,
                low: (*columns.low.get(i)?)?,
                close: (*columns.close.get(i)?)?,
                volume: columns.volume.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect();

    PriceHistory {
        symbol: symbol.to_string(),
        company_name,
        candles,
    }
}

fn suggestions_from_search(resp: SearchResponse) -> Vec<SuggestionEntry> {
    resp.quotes
        .into_iter()
        .filter(|q| EXCHANGE_SUFFIXES.iter().any(|s| q.symbol.ends_with(s)))
        .map(|q| {
            let name = q
                .longname
                .or(q.shortname)
                .unwrap_or_else(|| q.symbol.clone());
            SuggestionEntry { symbol: q.symbol, name }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::routing::get;
    use axum::{http::StatusCode as AxumStatus, Json, Router};
    use serde_json::json;

    #[test]
    fn chart_rows_with_gaps_are_skipped() {
        let v = json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "TCS.NS", "longName": "Tata Consultancy Services Limited"},
                    "timestamp": [1704067200, 1704153600, 1704240000],
                    "indicators": {"quote": [{
                        "open": [3700.0, null, 3720.0],
                        "high": [3750.0, null, 3760.0],
                        "low": [3690.0, null, 3700.0],
                        "close": [3740.0, null, 3755.5],
                        "volume": [1000, null, null]
                    }]}
                }],
                "error": null
            }
        });

        let chart: ChartResponse = serde_json::from_value(v).unwrap();
        let history = history_from_chart("TCS.NS", chart);
        assert_eq!(
            history.company_name.as_deref(),
            Some("Tata Consultancy Services Limited")
        );
        assert_eq!(history.closes(), vec![3740.0, 3755.5]);
        assert_eq!(history.candles[1].volume, 0);
    }

    #[test]
    fn chart_without_result_is_empty() {
        let v = json!({"chart": {"result": null, "error": {"code": "Not Found"}}});
        let chart: ChartResponse = serde_json::from_value(v).unwrap();
        assert!(history_from_chart("NOPE.NS", chart).candles.is_empty());
    }

    #[test]
    fn search_keeps_indian_listings_only() {
        let v = json!({
            "quotes": [
                {"symbol": "RELIANCE.NS", "longname": "Reliance Industries Limited", "shortname": "RELIANCE INDS"},
                {"symbol": "RIGD.IL", "shortname": "RELIANCE INDS GDR"},
                {"symbol": "RELIANCE.BO", "shortname": "RELIANCE INDS"},
                {"symbol": "500325.BO"}
            ]
        });
        let resp: SearchResponse = serde_json::from_value(v).unwrap();
        assert_eq!(
            suggestions_from_search(resp),
            vec![
                SuggestionEntry::new("RELIANCE.NS", "Reliance Industries Limited"),
                SuggestionEntry::new("RELIANCE.BO", "RELIANCE INDS"),
                SuggestionEntry::new("500325.BO", "500325.BO"),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_symbol_yields_empty_history() {
        let router = Router::new().route(
            "/v8/finance/chart/:symbol",
            get(|| async {
                (
                    AxumStatus::NOT_FOUND,
                    Json(json!({"chart": {"result": null, "error": {"code": "Not Found"}}})),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let market =
            YahooMarketData::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let history = market.daily_history("NOPE.NS").await.unwrap();
        assert_eq!(history.symbol, "NOPE.NS");
        assert!(history.candles.is_empty());
    }

    #[tokio::test]
    async fn symbol_is_sent_as_one_encoded_path_segment() {
        let router = Router::new().route(
            "/v8/finance/chart/:symbol",
            get(|Path(symbol): Path<String>| async move {
                if symbol == "A/B?x#y" {
                    AxumStatus::NOT_FOUND
                } else {
                    AxumStatus::BAD_REQUEST
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let market =
            YahooMarketData::new(format!("http://{addr}/"), Duration::from_secs(2)).unwrap();
        let history = market.daily_history("A/B?x#y").await.unwrap();
        assert!(history.candles.is_empty());
    }
}
