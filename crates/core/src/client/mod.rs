pub mod http;

use crate::domain::analysis::AnalysisResult;
use crate::domain::suggestion::SuggestionEntry;

pub use http::HttpAnalysisApi;

/// Message stored when a non-200 analyze response carries no usable `error` field.
pub const GENERIC_ANALYSIS_FAILURE: &str = "Analysis failed";

/// Client side of the Technical Analysis API.
#[async_trait::async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Any failure (transport, timeout, non-200, bad body) is an `Err`; callers that only
    /// need "matches or not" collapse it into an empty result.
    async fn search(&self, query: &str) -> anyhow::Result<Vec<SuggestionEntry>>;

    /// Never fails: every error path is folded into `AnalysisResult::Failure`.
    async fn analyze(&self, symbol: &str) -> AnalysisResult;
}
