//! DividendEvent — the fundamental payout data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One declared dividend payment for a single ticker.
///
/// `payment_date` lives on a single naive timeline: providers convert
/// exchange timestamps to UTC and truncate to a calendar date before an
/// event is constructed. Window filtering and all comparisons operate on
/// the date alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub payment_date: NaiveDate,
    pub amount: f64,
}

impl DividendEvent {
    pub fn new(payment_date: NaiveDate, amount: f64) -> Self {
        Self {
            payment_date,
            amount,
        }
    }

    /// Amounts must be non-negative and finite to enter a valuation.
    pub fn is_sane(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }
}
