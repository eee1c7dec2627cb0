//! Pure mapping from session state to what a front end should draw.

use crate::domain::analysis::{
    AnalysisReport, AnalysisResult, IndicatorKind, IndicatorReading, SignalSummary,
};
use crate::domain::signal::SignalClass;
use crate::domain::suggestion::SuggestionEntry;
use crate::session::LookupSession;

pub const NOT_FOUND_BANNER: &str = "Stock not found";
pub const UNAVAILABLE: &str = "Unavailable";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionView<'a> {
    pub query: &'a str,
    pub show_clear_button: bool,
    pub searching: bool,
    pub suggestions: &'a [SuggestionEntry],
    pub banner: Option<&'static str>,
    pub selected_symbol: Option<&'a str>,
    pub can_analyze: bool,
    pub analyzing: bool,
    pub result: Option<ResultView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Report(ReportView),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub title: String,
    pub price: String,
    pub recommendation: String,
    pub recommendation_class: SignalClass,
    pub rows: Vec<IndicatorRow>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub kind: IndicatorKind,
    pub label: &'static str,
    pub detail: String,
    pub signal: String,
    pub class: SignalClass,
}

pub fn session_view(session: &LookupSession) -> SessionView<'_> {
    SessionView {
        query: session.query(),
        show_clear_button: !session.query().is_empty(),
        searching: session.is_searching(),
        suggestions: session.suggestions(),
        banner: session.show_not_found().then_some(NOT_FOUND_BANNER),
        selected_symbol: session.selected_symbol(),
        can_analyze: session.selected_symbol().is_some() && !session.is_analyzing(),
        analyzing: session.is_analyzing(),
        result: session.result().map(result_view),
    }
}

pub fn result_view(result: &AnalysisResult) -> ResultView {
    match result {
        AnalysisResult::Report(report) => ResultView::Report(report_view(report)),
        AnalysisResult::Failure { error } => ResultView::Error(error.clone()),
    }
}

pub fn report_view(report: &AnalysisReport) -> ReportView {
    let missing = report.indicators.missing();
    if !missing.is_empty() {
        let keys: Vec<&str> = missing.iter().map(|k| k.key()).collect();
        tracing::warn!(stock = %report.stock, ?keys, "analysis report is missing indicators");
    }

    let rows = IndicatorKind::ALL
        .into_iter()
        .map(|kind| indicator_row(kind, report.indicators.reading(kind)))
        .collect();

    ReportView {
        title: format!("{} ({})", report.company_name, report.stock),
        price: format!("{:.2}", report.current_price),
        recommendation: report.final_suggestion.to_string(),
        recommendation_class: report.final_suggestion.class(),
        rows,
        summary: summary_line(&report.signal_summary),
    }
}

pub fn summary_line(summary: &SignalSummary) -> String {
    format!(
        "Buy: {} | Sell: {} | Hold: {}",
        summary.buy_count, summary.sell_count, summary.hold_count
    )
}

fn indicator_row(kind: IndicatorKind, reading: Option<IndicatorReading<'_>>) -> IndicatorRow {
    let Some(reading) = reading else {
        return IndicatorRow {
            kind,
            label: kind.label(),
            detail: UNAVAILABLE.to_string(),
            signal: UNAVAILABLE.to_string(),
            class: SignalClass::Neutral,
        };
    };

    let detail = match (kind, reading) {
        (IndicatorKind::Macd, IndicatorReading::Value(r)) => format!("Value: {:.4}", r.value),
        (IndicatorKind::Volatility, IndicatorReading::Value(r)) => {
            format!("Value: {:.2}%", r.value)
        }
        (_, IndicatorReading::Value(r)) => format!("Value: {:.2}", r.value),
        (_, IndicatorReading::MovingAverage(r)) => {
            format!("Short MA: {:.2} | Long MA: {:.2}", r.short_ma, r.long_ma)
        }
        (_, IndicatorReading::Bands(r)) => format!(
            "Current: {:.2} | Upper: {:.2} | Lower: {:.2}",
            r.current, r.upper, r.lower
        ),
    };

    IndicatorRow {
        kind,
        label: kind.label(),
        detail,
        signal: reading.signal().to_string(),
        class: reading.signal().class(),
    }
}
