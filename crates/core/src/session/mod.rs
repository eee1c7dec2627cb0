//! Search → select → analyze interaction, independent of any UI toolkit.
//!
//! `LookupSession` never performs I/O. Operations that need the network return a request
//! value tagged with a sequence number; the caller runs it and feeds the outcome back through
//! the matching `on_*_completed` operation. Only the latest outstanding request of each kind
//! is applied, so a slow superseded response can never overwrite fresher state.

pub mod driver;

use crate::domain::analysis::AnalysisResult;
use crate::domain::suggestion::SuggestionEntry;

pub use driver::{Completion, SessionDriver};

/// Queries shorter than this (in characters) never hit `/search`.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub seq: u64,
    pub symbol: String,
}

/// Why the not-found banner is up. Both causes render identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundCause {
    NoMatches,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    SuggestionsShown,
    NotFound,
    Selected,
    Analyzing,
    ResultShown,
    ErrorShown,
}

#[derive(Debug, Clone, Default)]
pub struct LookupSession {
    query: String,
    suggestions: Vec<SuggestionEntry>,
    searching: bool,
    not_found: Option<NotFoundCause>,
    selected: Option<String>,
    analyzing: bool,
    result: Option<AnalysisResult>,

    next_seq: u64,
    pending_search: Option<u64>,
    pending_analyze: Option<u64>,
}

impl LookupSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[SuggestionEntry] {
        &self.suggestions
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn show_not_found(&self) -> bool {
        self.not_found.is_some()
    }

    pub fn not_found_cause(&self) -> Option<&NotFoundCause> {
        self.not_found.as_ref()
    }

    pub fn selected_symbol(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn has_outstanding_requests(&self) -> bool {
        self.pending_search.is_some() || self.pending_analyze.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.analyzing {
            return Phase::Analyzing;
        }
        match &self.result {
            Some(AnalysisResult::Report(_)) => return Phase::ResultShown,
            Some(AnalysisResult::Failure { .. }) => return Phase::ErrorShown,
            None => {}
        }
        if self.selected.is_some() {
            return Phase::Selected;
        }
        if self.searching {
            return Phase::Searching;
        }
        if self.not_found.is_some() {
            return Phase::NotFound;
        }
        if !self.suggestions.is_empty() {
            return Phase::SuggestionsShown;
        }
        Phase::Idle
    }

    /// Text in the search field changed.
    ///
    /// Any edit drops the selected symbol and the analysis result; only queries of at least
    /// [`MIN_QUERY_CHARS`] characters produce a search request.
    pub fn on_query_changed(&mut self, text: &str) -> Option<SearchRequest> {
        self.query = text.to_string();
        self.clear_selection_and_result();

        if text.chars().count() < MIN_QUERY_CHARS {
            self.clear_search_state();
            return None;
        }

        self.searching = true;
        let seq = self.issue_seq();
        self.pending_search = Some(seq);
        tracing::debug!(seq, query = %text, "search issued");
        Some(SearchRequest {
            seq,
            query: text.to_string(),
        })
    }

    /// Applies a finished search. Returns `false` when the response was superseded and
    /// ignored.
    pub fn on_search_completed(
        &mut self,
        seq: u64,
        outcome: Result<Vec<SuggestionEntry>, String>,
    ) -> bool {
        if self.pending_search != Some(seq) {
            tracing::debug!(seq, latest = ?self.pending_search, "dropping stale search response");
            return false;
        }
        self.pending_search = None;
        self.searching = false;

        match outcome {
            Ok(entries) if !entries.is_empty() => {
                self.suggestions = entries;
                self.not_found = None;
            }
            Ok(_) => {
                self.suggestions.clear();
                self.not_found = Some(NotFoundCause::NoMatches);
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "search failed; showing not found");
                self.suggestions.clear();
                self.not_found = Some(NotFoundCause::Failed(err));
            }
        }
        true
    }

    /// Picks a suggestion. Does not start an analysis.
    ///
    /// The previous result, and any analysis still in flight, belong to the old selection
    /// and are dropped.
    pub fn on_suggestion_selected(&mut self, entry: &SuggestionEntry) {
        self.clear_selection_and_result();
        self.selected = Some(entry.symbol.clone());
        self.query = entry.symbol.clone();
        self.clear_search_state();
    }

    pub fn on_analyze_requested(&mut self) -> Option<AnalyzeRequest> {
        let symbol = self.selected.clone().filter(|s| !s.is_empty())?;

        self.analyzing = true;
        self.result = None;
        let seq = self.issue_seq();
        self.pending_analyze = Some(seq);
        tracing::debug!(seq, %symbol, "analysis issued");
        Some(AnalyzeRequest { seq, symbol })
    }

    /// Applies a finished analysis. Returns `false` when the response was superseded and
    /// ignored.
    pub fn on_analyze_completed(&mut self, seq: u64, result: AnalysisResult) -> bool {
        if self.pending_analyze != Some(seq) {
            tracing::debug!(seq, latest = ?self.pending_analyze, "dropping stale analysis response");
            return false;
        }
        self.pending_analyze = None;
        self.analyzing = false;
        self.result = Some(result);
        true
    }

    /// Back to the initial empty state. Outstanding requests are orphaned.
    pub fn reset(&mut self) {
        *self = Self {
            next_seq: self.next_seq,
            ..Self::default()
        };
    }

    fn clear_search_state(&mut self) {
        self.suggestions.clear();
        self.searching = false;
        self.not_found = None;
        self.pending_search = None;
    }

    fn clear_selection_and_result(&mut self) {
        self.selected = None;
        self.result = None;
        self.analyzing = false;
        self.pending_analyze = None;
    }

    fn issue_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}
