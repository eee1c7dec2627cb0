use serde::{Deserialize, Serialize};

/// One candidate match returned by `/search`. Order is significant and duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    pub symbol: String,
    pub name: String,
}

impl SuggestionEntry {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}
