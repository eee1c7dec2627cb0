pub mod indicators;
pub mod signals;

use crate::domain::analysis::{
    AnalysisReport, BandReading, Indicators, MovingAverageReading, ValueReading,
};
use crate::market::types::PriceHistory;
use indicators::*;
use signals::{IndicatorSignals, IndicatorSnapshot};
use std::fmt;

/// Candles needed before any indicator is considered meaningful.
pub const MIN_CANDLES: usize = 20;

/// Rejections that are the caller's fault (unknown or unusable symbol), as opposed to
/// infrastructure failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    InsufficientData { symbol: String },
    InvalidPrice { symbol: String },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InsufficientData { symbol } => {
                write!(f, "Insufficient data for {symbol}. Stock may not exist.")
            }
            AnalysisError::InvalidPrice { symbol } => {
                write!(f, "Invalid price data for {symbol}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

pub fn snapshot(history: &PriceHistory) -> IndicatorSnapshot {
    let closes = history.closes();
    IndicatorSnapshot {
        rsi: rsi(&closes, RSI_PERIOD),
        macd: macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL),
        moving_average: moving_average_crossover(&closes, MA_SHORT, MA_LONG),
        bollinger_bands: bollinger_bands(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV),
        volatility: volatility_pct(&history.candles, ATR_PERIOD),
    }
}

/// Builds the `/analyze` payload for `symbol` from its daily history.
pub fn analyze_history(
    symbol: &str,
    history: &PriceHistory,
) -> Result<AnalysisReport, AnalysisError> {
    if history.candles.len() < MIN_CANDLES {
        return Err(AnalysisError::InsufficientData {
            symbol: symbol.to_string(),
        });
    }

    let current_price = finite_or(history.last_close().unwrap_or(0.0), 0.0);
    if current_price <= 0.0 {
        return Err(AnalysisError::InvalidPrice {
            symbol: symbol.to_string(),
        });
    }

    let snap = snapshot(history);
    let signals = IndicatorSignals::evaluate(&snap);

    let indicators = Indicators {
        rsi: Some(ValueReading {
            value: round_to(snap.rsi, 2),
            signal: signals.rsi.clone(),
        }),
        macd: Some(ValueReading {
            value: round_to(snap.macd.histogram, 4),
            signal: signals.macd.clone(),
        }),
        moving_average: Some(MovingAverageReading {
            short_ma: round_to(snap.moving_average.short_ma, 2),
            long_ma: round_to(snap.moving_average.long_ma, 2),
            signal: signals.moving_average.clone(),
        }),
        bollinger_bands: Some(BandReading {
            current: round_to(snap.bollinger_bands.current, 2),
            upper: round_to(snap.bollinger_bands.upper, 2),
            lower: round_to(snap.bollinger_bands.lower, 2),
            signal: signals.bollinger_bands.clone(),
        }),
        volatility: Some(ValueReading {
            value: round_to(snap.volatility, 2),
            signal: signals.volatility.clone(),
        }),
    };

    Ok(AnalysisReport {
        stock: symbol.to_string(),
        company_name: history
            .company_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| symbol.to_string()),
        current_price: round_to(current_price, 2),
        indicators,
        final_suggestion: signals.final_suggestion(),
        signal_summary: signals.summary(),
    })
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::Signal;
    use crate::market::types::Candle;
    use chrono::{TimeZone, Utc};

    fn history(closes: &[f64], name: Option<&str>) -> PriceHistory {
        PriceHistory {
            symbol: "INFY.NS".to_string(),
            company_name: name.map(str::to_string),
            candles: closes
                .iter()
                .enumerate()
                .map(|(i, c)| Candle {
                    timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 86_400, 0).unwrap(),
                    open: *c,
                    high: c * 1.01,
                    low: c * 0.99,
                    close: *c,
                    volume: 1_000,
                })
                .collect(),
        }
    }

    #[test]
    fn rejects_short_history() {
        let err = analyze_history("NOPE.NS", &history(&[10.0; 19], None)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient data for NOPE.NS. Stock may not exist."
        );
    }

    #[test]
    fn rejects_non_positive_price() {
        let mut closes = vec![10.0; 30];
        closes.push(0.0);
        let err = analyze_history("BAD.NS", &history(&closes, None)).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidPrice { symbol: "BAD.NS".to_string() });
        assert_eq!(err.to_string(), "Invalid price data for BAD.NS");
    }

    #[test]
    fn builds_full_report_with_consistent_summary() {
        let closes: Vec<f64> = (0..250).map(|i| 1000.0 + (i as f64) * 2.0).collect();
        let report = analyze_history("INFY.NS", &history(&closes, Some("Infosys Limited"))).unwrap();

        assert_eq!(report.stock, "INFY.NS");
        assert_eq!(report.company_name, "Infosys Limited");
        assert_eq!(report.current_price, 1498.0);
        assert!(report.indicators.missing().is_empty());

        let summary = report.signal_summary;
        assert_eq!(summary.buy_count + summary.sell_count + summary.hold_count, 5);

        // Steady uptrend: overbought RSI, bullish MACD and crossover.
        assert_eq!(report.indicators.rsi.as_ref().unwrap().signal, Signal::Sell);
        assert_eq!(report.indicators.macd.as_ref().unwrap().signal, Signal::Buy);
        assert_eq!(
            report.indicators.moving_average.as_ref().unwrap().signal,
            Signal::Buy
        );
    }

    #[test]
    fn company_name_falls_back_to_symbol() {
        let report = analyze_history("INFY.NS", &history(&[100.0; 25], Some("  "))).unwrap();
        assert_eq!(report.company_name, "INFY.NS");
    }

    #[test]
    fn values_are_rounded() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-0.123456, 4), -0.1235);
    }
}
