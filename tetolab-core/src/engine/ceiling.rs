//! Ceiling valuation — trailing dividend window, annualization, threshold.
//!
//! The ceiling is the maximum price at which the annualized dividend of
//! the trailing window still yields at least the target threshold:
//!
//! ```text
//! ceiling = (sum of window payouts / window_years) / yield_threshold
//! ```
//!
//! An empty history valuates to 0.0, which is a real answer (any positive
//! price sits above it), never an absence.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{DividendEvent, DivisorStrategy, ValuationParams};

/// Start of the trailing window: `as_of` minus `window_years` calendar
/// years. Feb 29 anchors fall back to Feb 28 on non-leap years.
///
/// Events dated exactly on the cutoff are OUTSIDE the window — callers
/// compare with strictly-greater.
pub fn window_cutoff(as_of: NaiveDate, window_years: u32) -> NaiveDate {
    let year = as_of.year() - window_years as i32;
    as_of
        .with_year(year)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 2, 28).expect("Feb 28 exists"))
}

/// Compute the price ceiling for one dividend series.
///
/// Total over all inputs: retrieval failures never reach this function,
/// and insane events (negative or non-finite amounts) are ignored.
/// `params.yield_threshold` is assumed validated to (0, 1].
pub fn price_ceiling(events: &[DividendEvent], params: &ValuationParams) -> f64 {
    let annualized = match params.divisor {
        DivisorStrategy::FixedWindow => fixed_window_annualized(events, params),
        DivisorStrategy::ObservedYears => observed_years_annualized(events, params),
    };
    annualized / params.yield_threshold
}

/// Canonical annualization: window sum divided by the full window length,
/// regardless of how many years actually paid.
fn fixed_window_annualized(events: &[DividendEvent], params: &ValuationParams) -> f64 {
    let cutoff = window_cutoff(params.as_of, params.window_years);
    let total: f64 = events
        .iter()
        .filter(|e| e.is_sane() && e.payment_date > cutoff)
        .map(|e| e.amount)
        .sum();
    total / f64::from(params.window_years)
}

/// Alternate annualization: average the yearly sums of the most recent
/// `window_years` calendar years that had at least one payment.
///
/// Uses the whole history, not the trailing window, which is how the
/// dashboard lineage of the calculation behaves. Diverges from
/// `fixed_window_annualized` for sparse payers.
fn observed_years_annualized(events: &[DividendEvent], params: &ValuationParams) -> f64 {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for e in events.iter().filter(|e| e.is_sane()) {
        *by_year.entry(e.payment_date.year()).or_insert(0.0) += e.amount;
    }
    if by_year.is_empty() {
        return 0.0;
    }
    let taken: Vec<f64> = by_year
        .values()
        .rev()
        .take(params.window_years as usize)
        .copied()
        .collect();
    taken.iter().sum::<f64>() / taken.len() as f64
}
