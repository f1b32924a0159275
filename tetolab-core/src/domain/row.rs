//! Ranked table rows and the shared buy/wait classification.

use serde::{Deserialize, Serialize};

/// Classification of a current price against a ceiling.
///
/// Every surface that colors or labels a row — terminal table, XLSX
/// conditional formats, CSV/JSON signal column — derives from
/// [`Signal::classify`]. Nothing else compares the two prices, so the
/// presentations cannot disagree at a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    /// Current price strictly under the ceiling.
    Buy,
    /// Exact tie.
    Equal,
    /// Current price strictly over the ceiling.
    Wait,
}

impl Signal {
    pub fn classify(current_price: f64, price_ceiling: f64) -> Signal {
        if current_price < price_ceiling {
            Signal::Buy
        } else if current_price > price_ceiling {
            Signal::Wait
        } else {
            Signal::Equal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Equal => "EQUAL",
            Signal::Wait => "WAIT",
        }
    }

    /// Binary reading used by the dashboard legend: price at or under the
    /// ceiling counts as a buy.
    pub fn is_buy_or_better(self) -> bool {
        matches!(self, Signal::Buy | Signal::Equal)
    }
}

/// One ranked row of the screen output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRow {
    pub ticker: String,
    pub current_price: f64,
    pub price_ceiling: f64,
    /// `price_ceiling - current_price`; the ranking key, descending.
    pub gap: f64,
    pub signal: Signal,
}

impl PortfolioRow {
    pub fn new(ticker: impl Into<String>, current_price: f64, price_ceiling: f64) -> Self {
        Self {
            ticker: ticker.into(),
            current_price,
            price_ceiling,
            gap: price_ceiling - current_price,
            signal: Signal::classify(current_price, price_ceiling),
        }
    }
}
