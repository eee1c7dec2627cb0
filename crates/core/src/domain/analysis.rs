use crate::domain::signal::Signal;
use serde::{Deserialize, Serialize};

/// Successful `/analyze` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub stock: String,
    pub company_name: String,
    pub current_price: f64,
    pub indicators: Indicators,
    pub final_suggestion: Signal,
    pub signal_summary: SignalSummary,
}

/// The five fixed indicator readings. A key missing from the payload deserializes as `None`
/// so the view can mark that row unavailable instead of rejecting the whole report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<ValueReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<ValueReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_average: Option<MovingAverageReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bollinger_bands: Option<BandReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<ValueReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueReading {
    pub value: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageReading {
    pub short_ma: f64,
    pub long_ma: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandReading {
    pub current: f64,
    pub upper: f64,
    pub lower: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub buy_count: u32,
    pub sell_count: u32,
    pub hold_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Rsi,
    Macd,
    MovingAverage,
    BollingerBands,
    Volatility,
}

/// Borrowed view over one indicator, whatever its shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorReading<'a> {
    Value(&'a ValueReading),
    MovingAverage(&'a MovingAverageReading),
    Bands(&'a BandReading),
}

impl IndicatorKind {
    /// Display order of the indicator rows.
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::MovingAverage,
        IndicatorKind::BollingerBands,
        IndicatorKind::Volatility,
    ];

    pub fn key(self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Macd => "macd",
            IndicatorKind::MovingAverage => "moving_average",
            IndicatorKind::BollingerBands => "bollinger_bands",
            IndicatorKind::Volatility => "volatility",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::MovingAverage => "Moving Average",
            IndicatorKind::BollingerBands => "Bollinger Bands",
            IndicatorKind::Volatility => "Volatility",
        }
    }
}

impl Indicators {
    pub fn reading(&self, kind: IndicatorKind) -> Option<IndicatorReading<'_>> {
        match kind {
            IndicatorKind::Rsi => self.rsi.as_ref().map(IndicatorReading::Value),
            IndicatorKind::Macd => self.macd.as_ref().map(IndicatorReading::Value),
            IndicatorKind::MovingAverage => self
                .moving_average
                .as_ref()
                .map(IndicatorReading::MovingAverage),
            IndicatorKind::BollingerBands => {
                self.bollinger_bands.as_ref().map(IndicatorReading::Bands)
            }
            IndicatorKind::Volatility => self.volatility.as_ref().map(IndicatorReading::Value),
        }
    }

    pub fn missing(&self) -> Vec<IndicatorKind> {
        IndicatorKind::ALL
            .into_iter()
            .filter(|kind| self.reading(*kind).is_none())
            .collect()
    }
}

impl IndicatorReading<'_> {
    pub fn signal(&self) -> &Signal {
        match self {
            IndicatorReading::Value(r) => &r.signal,
            IndicatorReading::MovingAverage(r) => &r.signal,
            IndicatorReading::Bands(r) => &r.signal,
        }
    }
}

/// Outcome of one analyze call as held by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Report(AnalysisReport),
    Failure { error: String },
}

impl AnalysisResult {
    pub fn failure(error: impl Into<String>) -> Self {
        AnalysisResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AnalysisResult::Failure { .. })
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisResult::Report(r) => Some(r),
            AnalysisResult::Failure { .. } => None,
        }
    }
}

/// Wire shape of every error body produced by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
