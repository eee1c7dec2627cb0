use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical recommendation attached to an indicator reading or to a whole report.
///
/// The vocabulary is open: strings outside the known five are kept verbatim in `Other` and
/// classified as neutral.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Signal {
    Buy,
    StrongBuy,
    Sell,
    StrongSell,
    Hold,
    Other(String),
}

/// Display treatment for a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalClass {
    Positive,
    Negative,
    Neutral,
}

impl Signal {
    pub fn as_str(&self) -> &str {
        match self {
            Signal::Buy => "Buy",
            Signal::StrongBuy => "Strong Buy",
            Signal::Sell => "Sell",
            Signal::StrongSell => "Strong Sell",
            Signal::Hold => "Hold",
            Signal::Other(s) => s,
        }
    }

    pub fn class(&self) -> SignalClass {
        match self {
            Signal::Buy | Signal::StrongBuy => SignalClass::Positive,
            Signal::Sell | Signal::StrongSell => SignalClass::Negative,
            Signal::Hold | Signal::Other(_) => SignalClass::Neutral,
        }
    }
}

impl SignalClass {
    pub fn color_name(self) -> &'static str {
        match self {
            SignalClass::Positive => "green",
            SignalClass::Negative => "red",
            SignalClass::Neutral => "orange",
        }
    }
}

impl From<String> for Signal {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Buy" => Signal::Buy,
            "Strong Buy" => Signal::StrongBuy,
            "Sell" => Signal::Sell,
            "Strong Sell" => Signal::StrongSell,
            "Hold" => Signal::Hold,
            _ => Signal::Other(s),
        }
    }
}

impl From<&str> for Signal {
    fn from(s: &str) -> Self {
        Signal::from(s.to_string())
    }
}

impl From<Signal> for String {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
