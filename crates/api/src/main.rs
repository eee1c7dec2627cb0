use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartsense_core::analysis::analyze_history;
use chartsense_core::domain::analysis::ErrorBody;
use chartsense_core::domain::suggestion::SuggestionEntry;
use chartsense_core::market::{search::search_stocks, MarketData, YahooMarketData};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = chartsense_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let market = YahooMarketData::from_settings(&settings)?;
    tracing::info!(source = market.source_name(), base_url = %settings.market_data_base_url, "market data configured");

    let app = router(AppState {
        market: Arc::new(market),
    });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Clone)]
struct AppState {
    market: Arc<dyn MarketData>,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/search", get(search))
        .route("/analyze", post(analyze))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn home() -> &'static str {
    "API is working"
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SuggestionEntry>> {
    Json(search_stocks(state.market.as_ref(), &params.q).await)
}

#[derive(Debug, Deserialize)]
struct AnalyzeBody {
    symbol: Option<String>,
}

async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "No JSON data provided");
    };

    let Some(symbol) = body.symbol.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    else {
        return error_response(StatusCode::BAD_REQUEST, "No stock symbol provided");
    };

    let history = match state.market.daily_history(&symbol).await {
        Ok(h) => h,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(%symbol, error = %err, "price history fetch failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Analysis failed: {err:#}"),
            );
        }
    };

    match analyze_history(&symbol, &history) {
        Ok(report) => {
            tracing::info!(
                %symbol,
                candles = history.candles.len(),
                final_suggestion = %report.final_suggestion,
                "analysis complete"
            );
            Json(report).into_response()
        }
        Err(err) => {
            tracing::info!(%symbol, error = %err, "analysis rejected");
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.into(),
        }),
    )
        .into_response()
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &chartsense_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartsense_core::client::{AnalysisApi, HttpAnalysisApi};
    use chartsense_core::domain::analysis::AnalysisResult;
    use chartsense_core::market::{Candle, PriceHistory};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use std::time::Duration;

    struct StubMarket;

    #[async_trait::async_trait]
    impl MarketData for StubMarket {
        fn source_name(&self) -> &'static str {
            "stub"
        }

        async fn daily_history(&self, symbol: &str) -> anyhow::Result<PriceHistory> {
            let len = match symbol {
                "TCS.NS" => 60,
                "TINY.NS" => 5,
                "DOWN.NS" => anyhow::bail!("chart HTTP 502 Bad Gateway"),
                _ => 0,
            };
            let candles = (0..len)
                .map(|i| Candle {
                    timestamp: Utc.timestamp_opt(1_700_000_000 + i * 86_400, 0).unwrap(),
                    open: 3900.0,
                    high: 3920.0,
                    low: 3880.0,
                    close: 3900.0 + (i % 3) as f64,
                    volume: 10,
                })
                .collect();
            Ok(PriceHistory {
                symbol: symbol.to_string(),
                company_name: Some("Tata Consultancy Services Limited".to_string()),
                candles,
            })
        }

        async fn live_search(&self, _query: &str) -> anyhow::Result<Vec<SuggestionEntry>> {
            Ok(vec![SuggestionEntry::new("TCS.BO", "Tata Consultancy Services Limited")])
        }
    }

    async fn spawn_app() -> String {
        let app = router(AppState {
            market: Arc::new(StubMarket),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn post_analyze(base: &str, body: Value) -> (u16, Value) {
        let res = reqwest::Client::new()
            .post(format!("{base}/analyze"))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status().as_u16();
        (status, res.json::<Value>().await.unwrap())
    }

    #[tokio::test]
    async fn home_reports_liveness() {
        let base = spawn_app().await;
        let text = reqwest::get(format!("{base}/")).await.unwrap().text().await.unwrap();
        assert_eq!(text, "API is working");
    }

    #[tokio::test]
    async fn search_merges_live_and_catalog() {
        let base = spawn_app().await;
        let out: Vec<SuggestionEntry> = reqwest::get(format!("{base}/search?q=tcs"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            out,
            vec![
                SuggestionEntry::new("TCS.BO", "Tata Consultancy Services Limited"),
                SuggestionEntry::new("TCS.NS", "Tata Consultancy Services Ltd"),
            ]
        );

        let short: Vec<SuggestionEntry> = reqwest::get(format!("{base}/search?q=t"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(short.is_empty());
    }

    #[tokio::test]
    async fn analyze_validates_request() {
        let base = spawn_app().await;

        let (status, body) = post_analyze(&base, json!({})).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "No stock symbol provided"}));

        let res = reqwest::Client::new()
            .post(format!("{base}/analyze"))
            .body("symbol=TCS.NS")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);
        assert_eq!(
            res.json::<Value>().await.unwrap(),
            json!({"error": "No JSON data provided"})
        );
    }

    #[tokio::test]
    async fn analyze_maps_data_problems() {
        let base = spawn_app().await;

        let (status, body) = post_analyze(&base, json!({"symbol": "TINY.NS"})).await;
        assert_eq!(status, 400);
        assert_eq!(
            body["error"],
            "Insufficient data for TINY.NS. Stock may not exist."
        );

        let (status, body) = post_analyze(&base, json!({"symbol": "DOWN.NS"})).await;
        assert_eq!(status, 500);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Analysis failed: chart HTTP 502"));
    }

    #[tokio::test]
    async fn client_round_trips_against_server() {
        let base = spawn_app().await;
        let api = HttpAnalysisApi::new(base, Duration::from_secs(5), Duration::from_secs(5)).unwrap();

        let suggestions = api.search("tcs").await.unwrap();
        assert_eq!(suggestions[0].symbol, "TCS.BO");

        let report = match api.analyze("TCS.NS").await {
            AnalysisResult::Report(r) => r,
            other => panic!("expected report, got {other:?}"),
        };
        assert_eq!(report.stock, "TCS.NS");
        assert_eq!(report.company_name, "Tata Consultancy Services Limited");
        assert!(report.indicators.missing().is_empty());
        let s = report.signal_summary;
        assert_eq!(s.buy_count + s.sell_count + s.hold_count, 5);

        assert_eq!(
            api.analyze("GHOST.NS").await,
            AnalysisResult::failure("Insufficient data for GHOST.NS. Stock may not exist.")
        );
    }
}
