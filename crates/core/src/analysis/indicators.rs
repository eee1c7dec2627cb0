//! Indicator math over daily candles. Every function degrades to a fixed neutral value
//! instead of failing when the series is too short or produces non-finite numbers.

use crate::market::types::Candle;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;
pub const MA_SHORT: usize = 50;
pub const MA_LONG: usize = 200;
pub const ATR_PERIOD: usize = 14;

const NEUTRAL_RSI: f64 = 50.0;
const RSI_LOSS_FLOOR: f64 = 0.01;
const DEFAULT_VOLATILITY_PCT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub current: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossover {
    pub short_ma: f64,
    pub long_ma: f64,
    pub crossover: bool,
}

pub fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// Mean of the last `period` values, if there are that many.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let sum: f64 = values[values.len() - period..].iter().sum();
    Some(sum / period as f64)
}

/// Sample standard deviation of the last `period` values.
pub fn rolling_std(values: &[f64], period: usize) -> Option<f64> {
    if period < 2 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
    Some(var.sqrt())
}

/// Bias-adjusted exponentially weighted mean for every prefix of `values`, using the span
/// parameterisation `alpha = 2 / (span + 1)`.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut num = 0.0;
    let mut den = 0.0;
    values
        .iter()
        .map(|x| {
            num = x + decay * num;
            den = 1.0 + decay * den;
            num / den
        })
        .collect()
}

/// RSI from simple averages of the last `period` gains and losses.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let window = &closes[closes.len() - period - 1..];
    let (gain, loss) = window.windows(2).fold((0.0, 0.0), |(g, l), w| {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            (g + delta, l)
        } else {
            (g, l - delta)
        }
    });

    let avg_gain = gain / period as f64;
    let mut avg_loss = loss / period as f64;
    if avg_loss == 0.0 {
        avg_loss = RSI_LOSS_FLOOR;
    }

    let rs = avg_gain / avg_loss;
    finite_or(100.0 - 100.0 / (1.0 + rs), NEUTRAL_RSI)
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let fast_ema = ewm_mean(closes, fast);
    let slow_ema = ewm_mean(closes, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = ewm_mean(&line, signal);

    let (Some(m), Some(s)) = (line.last().copied(), signal_line.last().copied()) else {
        return Macd {
            macd: 0.0,
            signal: 0.0,
            histogram: 0.0,
        };
    };

    Macd {
        macd: finite_or(m, 0.0),
        signal: finite_or(s, 0.0),
        histogram: finite_or(m - s, 0.0),
    }
}

pub fn bollinger_bands(closes: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let current = closes.last().copied().unwrap_or(0.0);
    let middle = sma(closes, period);
    let std = rolling_std(closes, period);
    let band = |offset: f64, fallback: f64| match (middle, std) {
        (Some(m), Some(s)) => finite_or(m + offset * s, fallback),
        _ => fallback,
    };

    BollingerBands {
        upper: band(std_dev, current * 1.1),
        middle: finite_or(middle.unwrap_or(current), current),
        lower: band(-std_dev, current * 0.9),
        current: finite_or(current, 0.0),
    }
}

/// Short vs long simple moving average. Histories shorter than `long` fall back to a
/// 5/10 pair clamped to the available length.
pub fn moving_average_crossover(closes: &[f64], short: usize, long: usize) -> Crossover {
    let n = closes.len();
    let (short, long) = if n < long {
        (5.min(n / 2), 10.min(n.saturating_sub(1)))
    } else {
        (short, long)
    };

    let last = closes.last().copied().unwrap_or(0.0);
    let short_ma = finite_or(sma(closes, short).unwrap_or(last), last);
    let long_ma = finite_or(sma(closes, long).unwrap_or(last), last);

    Crossover {
        short_ma,
        long_ma,
        crossover: short_ma > long_ma,
    }
}

/// Average true range over `period` candles, as a percentage of the last close.
pub fn volatility_pct(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() < period {
        return DEFAULT_VOLATILITY_PCT;
    }

    let true_ranges: Vec<f64> = candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let high_low = c.high - c.low;
            match i.checked_sub(1).map(|p| candles[p].close) {
                Some(prev_close) => high_low
                    .max((c.high - prev_close).abs())
                    .max((c.low - prev_close).abs()),
                None => high_low,
            }
        })
        .collect();

    let current = candles
        .last()
        .map(|c| finite_or(c.close, 100.0))
        .unwrap_or(100.0);
    let atr = finite_or(sma(&true_ranges, period).unwrap_or(f64::NAN), current * 0.02);

    if current <= 0.0 {
        return DEFAULT_VOLATILITY_PCT;
    }
    finite_or(atr / current * 100.0, DEFAULT_VOLATILITY_PCT)
}
