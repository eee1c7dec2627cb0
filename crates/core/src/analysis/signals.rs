use crate::analysis::indicators::{BollingerBands, Crossover, Macd};
use crate::domain::analysis::SignalSummary;
use crate::domain::signal::Signal;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const VOLATILITY_HIGH_PCT: f64 = 5.0;
const VOLATILITY_LOW_PCT: f64 = 2.0;
const STRONG_VOTES: u32 = 3;

/// Raw indicator values for one symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub macd: Macd,
    pub moving_average: Crossover,
    pub bollinger_bands: BollingerBands,
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSignals {
    pub rsi: Signal,
    pub macd: Signal,
    pub moving_average: Signal,
    pub bollinger_bands: Signal,
    pub volatility: Signal,
}

impl IndicatorSignals {
    pub fn evaluate(s: &IndicatorSnapshot) -> Self {
        let rsi = if s.rsi < RSI_OVERSOLD {
            Signal::Buy
        } else if s.rsi > RSI_OVERBOUGHT {
            Signal::Sell
        } else {
            Signal::Hold
        };

        let m = &s.macd;
        let macd = if m.macd > m.signal && m.histogram > 0.0 {
            Signal::Buy
        } else if m.macd < m.signal && m.histogram < 0.0 {
            Signal::Sell
        } else {
            Signal::Hold
        };

        let moving_average = if s.moving_average.crossover {
            Signal::Buy
        } else {
            Signal::Sell
        };

        let b = &s.bollinger_bands;
        let bollinger_bands = if b.current < b.lower {
            Signal::Buy
        } else if b.current > b.upper {
            Signal::Sell
        } else {
            Signal::Hold
        };

        let volatility = if s.volatility > VOLATILITY_HIGH_PCT {
            Signal::Sell
        } else if s.volatility < VOLATILITY_LOW_PCT {
            Signal::Buy
        } else {
            Signal::Hold
        };

        Self {
            rsi,
            macd,
            moving_average,
            bollinger_bands,
            volatility,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        [
            &self.rsi,
            &self.macd,
            &self.moving_average,
            &self.bollinger_bands,
            &self.volatility,
        ]
        .into_iter()
    }

    pub fn summary(&self) -> SignalSummary {
        let count = |want: &Signal| self.iter().filter(|s| *s == want).count() as u32;
        SignalSummary {
            buy_count: count(&Signal::Buy),
            sell_count: count(&Signal::Sell),
            hold_count: count(&Signal::Hold),
        }
    }

    /// Majority vote; three agreeing indicators make it a strong call.
    pub fn final_suggestion(&self) -> Signal {
        let SignalSummary {
            buy_count,
            sell_count,
            ..
        } = self.summary();

        if buy_count >= STRONG_VOTES {
            Signal::StrongBuy
        } else if sell_count >= STRONG_VOTES {
            Signal::StrongSell
        } else if buy_count > sell_count {
            Signal::Buy
        } else if sell_count > buy_count {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: 50.0,
            macd: Macd {
                macd: 0.0,
                signal: 0.0,
                histogram: 0.0,
            },
            moving_average: Crossover {
                short_ma: 100.0,
                long_ma: 100.0,
                crossover: false,
            },
            bollinger_bands: BollingerBands {
                upper: 110.0,
                middle: 100.0,
                lower: 90.0,
                current: 100.0,
            },
            volatility: 3.0,
        }
    }

    #[test]
    fn neutral_snapshot_holds_except_moving_average() {
        let signals = IndicatorSignals::evaluate(&snapshot());
        assert_eq!(signals.moving_average, Signal::Sell);
        assert_eq!(
            signals.summary(),
            SignalSummary {
                buy_count: 0,
                sell_count: 1,
                hold_count: 4
            }
        );
        assert_eq!(signals.final_suggestion(), Signal::Sell);
    }

    #[test]
    fn thresholds_are_strict() {
        let mut s = snapshot();
        s.rsi = 30.0;
        s.volatility = 5.0;
        let signals = IndicatorSignals::evaluate(&s);
        assert_eq!(signals.rsi, Signal::Hold);
        assert_eq!(signals.volatility, Signal::Hold);

        s.rsi = 29.9;
        s.volatility = 1.9;
        let signals = IndicatorSignals::evaluate(&s);
        assert_eq!(signals.rsi, Signal::Buy);
        assert_eq!(signals.volatility, Signal::Buy);
    }

    #[test]
    fn three_buys_is_strong_buy() {
        let mut s = snapshot();
        s.rsi = 20.0;
        s.volatility = 1.0;
        s.moving_average.crossover = true;
        assert_eq!(IndicatorSignals::evaluate(&s).final_suggestion(), Signal::StrongBuy);
    }

    #[test]
    fn three_sells_is_strong_sell() {
        let mut s = snapshot();
        s.rsi = 80.0;
        s.bollinger_bands.current = 120.0;
        assert_eq!(IndicatorSignals::evaluate(&s).final_suggestion(), Signal::StrongSell);
    }

    #[test]
    fn tie_is_hold() {
        let mut s = snapshot();
        s.rsi = 20.0;
        let signals = IndicatorSignals::evaluate(&s);
        assert_eq!(signals.summary().buy_count, 1);
        assert_eq!(signals.summary().sell_count, 1);
        assert_eq!(signals.final_suggestion(), Signal::Hold);
    }

    #[test]
    fn macd_needs_both_conditions() {
        let mut s = snapshot();
        s.macd = Macd {
            macd: 1.0,
            signal: 0.5,
            histogram: 0.5,
        };
        assert_eq!(IndicatorSignals::evaluate(&s).macd, Signal::Buy);
        s.macd = Macd {
            macd: -1.0,
            signal: -0.5,
            histogram: -0.5,
        };
        assert_eq!(IndicatorSignals::evaluate(&s).macd, Signal::Sell);
        s.macd.histogram = 0.0;
        assert_eq!(IndicatorSignals::evaluate(&s).macd, Signal::Hold);
    }
}
