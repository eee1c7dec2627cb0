use crate::client::{AnalysisApi, GENERIC_ANALYSIS_FAILURE};
use crate::config::Settings;
use crate::domain::analysis::{AnalysisReport, AnalysisResult};
use crate::domain::suggestion::SuggestionEntry;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpAnalysisApi {
    http: reqwest::Client,
    base_url: String,
    search_timeout: Duration,
    analyze_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequestBody<'a> {
    symbol: &'a str,
}

impl HttpAnalysisApi {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_api_base_url()?.to_string();
        Self::new(
            base_url,
            settings.search_timeout(),
            settings.analyze_timeout(),
        )
    }

    pub fn new(
        base_url: impl Into<String>,
        search_timeout: Duration,
        analyze_timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build analysis api http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            search_timeout,
            analyze_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn analyze_once(&self, symbol: &str) -> Result<AnalysisResult> {
        let res = self
            .http
            .post(self.url("/analyze"))
            .timeout(self.analyze_timeout)
            .json(&AnalyzeRequestBody { symbol })
            .send()
            .await
            .context("analyze request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read analyze response")?;

        if status != StatusCode::OK {
            tracing::debug!(%status, symbol, "analyze returned non-200");
            let message = error_field(&text).unwrap_or_else(|| GENERIC_ANALYSIS_FAILURE.to_string());
            return Ok(AnalysisResult::failure(message));
        }

        let raw_json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("analyze response is not valid JSON: {text}"))?;
        if let Some(error) = raw_json.get("error").and_then(Value::as_str) {
            return Ok(AnalysisResult::failure(error));
        }

        let report = serde_json::from_value::<AnalysisReport>(raw_json)
            .context("failed to parse analyze response into AnalysisReport")?;
        Ok(AnalysisResult::Report(report))
    }
}

#[async_trait::async_trait]
impl AnalysisApi for HttpAnalysisApi {
    async fn search(&self, query: &str) -> Result<Vec<SuggestionEntry>> {
        let res = self
            .http
            .get(self.url("/search"))
            .timeout(self.search_timeout)
            .query(&[("q", query)])
            .send()
            .await
            .context("search request failed")?;

        let status = res.status();
        if status != StatusCode::OK {
            anyhow::bail!("search HTTP {status}");
        }

        let text = res.text().await.context("failed to read search response")?;
        serde_json::from_str::<Vec<SuggestionEntry>>(&text)
            .with_context(|| format!("search response is not a suggestion list: {text}"))
    }

    async fn analyze(&self, symbol: &str) -> AnalysisResult {
        match self.analyze_once(symbol).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(symbol, error = %err, "analyze call failed");
                AnalysisResult::failure(format!("Error: {err:#}"))
            }
        }
    }
}

fn error_field(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}
