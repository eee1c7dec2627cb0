use crate::client::AnalysisApi;
use crate::domain::analysis::AnalysisResult;
use crate::domain::suggestion::SuggestionEntry;
use crate::session::{AnalyzeRequest, LookupSession, SearchRequest};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A finished request, delivered back to the event loop.
#[derive(Debug, Clone)]
pub enum Completion {
    Search {
        seq: u64,
        outcome: Result<Vec<SuggestionEntry>, String>,
    },
    Analyze {
        seq: u64,
        result: AnalysisResult,
    },
}

/// Runs a [`LookupSession`] against an [`AnalysisApi`].
///
/// Each request runs on its own task; results come back through a channel and are applied
/// one at a time by whoever owns the driver, so every session mutation happens on a single
/// logical event loop.
pub struct SessionDriver<A> {
    api: Arc<A>,
    session: LookupSession,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<A> SessionDriver<A>
where
    A: AnalysisApi + 'static,
{
    pub fn new(api: Arc<A>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            session: LookupSession::new(),
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &LookupSession {
        &self.session
    }

    pub fn type_query(&mut self, text: &str) {
        if let Some(req) = self.session.on_query_changed(text) {
            self.spawn_search(req);
        }
    }

    /// Selects the suggestion at `index` in display order. Returns `false` when out of range.
    pub fn select_index(&mut self, index: usize) -> bool {
        let Some(entry) = self.session.suggestions().get(index).cloned() else {
            return false;
        };
        self.session.on_suggestion_selected(&entry);
        true
    }

    /// Returns `false` when nothing is selected and no request was made.
    pub fn request_analysis(&mut self) -> bool {
        match self.session.on_analyze_requested() {
            Some(req) => {
                self.spawn_analyze(req);
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Waits for the next completion and applies it. Returns whether it changed the session
    /// (`false` for superseded responses).
    pub async fn next_completion(&mut self) -> bool {
        // The driver holds a sender, so the channel never closes while `self` is alive.
        match self.rx.recv().await {
            Some(completion) => self.apply(completion),
            None => false,
        }
    }

    /// Applies completions until nothing the session still cares about is in flight.
    pub async fn settle(&mut self) {
        while self.session.has_outstanding_requests() {
            self.next_completion().await;
        }
    }

    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Search { seq, outcome } => self.session.on_search_completed(seq, outcome),
            Completion::Analyze { seq, result } => self.session.on_analyze_completed(seq, result),
        }
    }

    /// A panicking [`AnalysisApi`] still produces a completion, so the session never stays
    /// stuck searching or analyzing.
    fn spawn_search(&self, req: SearchRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let SearchRequest { seq, query } = req;
        let task = tokio::spawn(async move {
            api.search(&query).await.map_err(|err| format!("{err:#}"))
        });
        tokio::spawn(async move {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(seq, error = %err, "search task did not finish");
                    Err(format!("search task failed: {err}"))
                }
            };
            let _ = tx.send(Completion::Search { seq, outcome });
        });
    }

    fn spawn_analyze(&self, req: AnalyzeRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let AnalyzeRequest { seq, symbol } = req;
        let task = tokio::spawn(async move { api.analyze(&symbol).await });
        tokio::spawn(async move {
            let result = match task.await {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(seq, error = %err, "analysis task did not finish");
                    AnalysisResult::failure(format!("Error: analysis task failed: {err}"))
                }
            };
            let _ = tx.send(Completion::Analyze { seq, result });
        });
    }
}
