//! Screener integration tests against a mock provider.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tetolab_core::data::provider::{DataError, QuoteProvider};
use tetolab_core::domain::{DividendEvent, Signal, ValuationParams};
use tetolab_core::engine::{filter_rows, Screener, SkipReason};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ev(y: i32, m: u32, d: u32, amount: f64) -> DividendEvent {
    DividendEvent::new(date(y, m, d), amount)
}

/// In-memory provider: canned histories and prices, with per-ticker
/// failure switches for both lookups.
#[derive(Default)]
struct MockQuotes {
    dividends: HashMap<String, Vec<DividendEvent>>,
    prices: HashMap<String, f64>,
    fail_dividends: HashSet<String>,
    fail_prices: HashSet<String>,
}

impl MockQuotes {
    fn with_ticker(mut self, ticker: &str, events: Vec<DividendEvent>, price: f64) -> Self {
        self.dividends.insert(ticker.to_string(), events);
        self.prices.insert(ticker.to_string(), price);
        self
    }

    fn failing_dividends(mut self, ticker: &str) -> Self {
        self.fail_dividends.insert(ticker.to_string());
        self
    }

    fn failing_price(mut self, ticker: &str) -> Self {
        self.fail_prices.insert(ticker.to_string());
        self
    }
}

impl QuoteProvider for MockQuotes {
    fn name(&self) -> &str {
        "mock"
    }

    fn dividend_history(&self, ticker: &str) -> Result<Vec<DividendEvent>, DataError> {
        if self.fail_dividends.contains(ticker) {
            return Err(DataError::NetworkUnreachable("mock outage".into()));
        }
        Ok(self.dividends.get(ticker).cloned().unwrap_or_default())
    }

    fn latest_close(&self, ticker: &str) -> Result<f64, DataError> {
        if self.fail_prices.contains(ticker) {
            return Err(DataError::NoRecentTrades {
                symbol: ticker.to_string(),
            });
        }
        self.prices
            .get(ticker)
            .copied()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            })
    }

    fn is_available(&self) -> bool {
        true
    }
}

fn params_2025() -> ValuationParams {
    ValuationParams::new(0.07).with_as_of(date(2025, 7, 1))
}

fn tickers(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn golden_scenario_flows_through_the_screener() {
    let provider = MockQuotes::default().with_ticker(
        "SAPR4.SA",
        vec![
            ev(2021, 6, 1, 1.00),
            ev(2022, 6, 1, 1.20),
            ev(2023, 6, 1, 1.10),
            ev(2024, 6, 1, 1.30),
            ev(2025, 6, 1, 1.25),
        ],
        15.00,
    );
    let report = Screener::new(&provider, params_2025()).screen(&tickers(&["SAPR4.SA"]));

    assert_eq!(report.ranked_count(), 1);
    let row = &report.rows[0];
    assert!((row.price_ceiling - 16.714285714).abs() < 1e-6);
    assert_eq!(row.signal, Signal::Buy);
    assert!((row.gap - (row.price_ceiling - 15.00)).abs() < 1e-12);
}

#[test]
fn retrieval_failure_for_one_ticker_does_not_halt_the_rest() {
    let provider = MockQuotes::default()
        .with_ticker("Y.SA", vec![ev(2024, 6, 1, 1.0)], 10.0)
        .failing_dividends("X.SA");

    let report = Screener::new(&provider, params_2025()).screen(&tickers(&["X.SA", "Y.SA"]));

    assert_eq!(report.ranked_count(), 1);
    assert_eq!(report.rows[0].ticker, "Y.SA");
    assert_eq!(report.skipped_count(), 1);

    let x = &report.outcomes[0];
    assert_eq!(x.ticker, "X.SA");
    assert_eq!(x.skipped, Some(SkipReason::DividendsUnavailable));
    assert!(x.detail.as_deref().unwrap().contains("mock outage"));
}

#[test]
fn price_failure_drops_the_row_but_keeps_the_outcome() {
    let provider = MockQuotes::default()
        .with_ticker("A.SA", vec![ev(2024, 6, 1, 1.0)], 10.0)
        .failing_price("A.SA");

    let report = Screener::new(&provider, params_2025()).screen(&tickers(&["A.SA"]));

    assert_eq!(report.ranked_count(), 0);
    assert_eq!(report.outcomes[0].skipped, Some(SkipReason::PriceUnavailable));
}

#[test]
fn empty_history_ranks_with_a_zero_ceiling() {
    // A zero ceiling is a real valuation, not a retrieval failure: the
    // ticker stays in the table and signals WAIT for any positive price.
    let provider = MockQuotes::default().with_ticker("Z.SA", vec![], 5.0);

    let report = Screener::new(&provider, params_2025()).screen(&tickers(&["Z.SA"]));

    assert_eq!(report.ranked_count(), 1);
    assert_eq!(report.rows[0].price_ceiling, 0.0);
    assert_eq!(report.rows[0].signal, Signal::Wait);
}

#[test]
fn rows_rank_descending_by_gap_with_input_order_tiebreak() {
    let provider = MockQuotes::default()
        // gap = ceiling - price; one payment inside the window each.
        .with_ticker("SMALL.SA", vec![ev(2024, 6, 1, 0.35)], 0.5) // ceiling 1.0, gap 0.5
        .with_ticker("BIG.SA", vec![ev(2024, 6, 1, 1.40)], 1.0) // ceiling 4.0, gap 3.0
        .with_ticker("TIE.SA", vec![ev(2024, 6, 1, 0.35)], 0.5); // gap 0.5, ties with SMALL

    let report = Screener::new(&provider, params_2025()).screen(&tickers(&[
        "SMALL.SA", "BIG.SA", "TIE.SA",
    ]));

    let order: Vec<_> = report.rows.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(order, vec!["BIG.SA", "SMALL.SA", "TIE.SA"]);
}

#[test]
fn screening_twice_is_idempotent() {
    let provider = MockQuotes::default()
        .with_ticker("A.SA", vec![ev(2023, 6, 1, 1.0), ev(2024, 6, 1, 1.1)], 12.0)
        .with_ticker("B.SA", vec![ev(2024, 3, 1, 2.0)], 20.0)
        .failing_price("C.SA");

    let screener = Screener::new(&provider, params_2025());
    let universe = tickers(&["A.SA", "B.SA", "C.SA"]);
    let first = screener.screen(&universe);
    let second = screener.screen(&universe);

    assert_eq!(first.rows, second.rows);
    assert_eq!(first.outcomes, second.outcomes);
}

#[test]
fn filter_applies_after_ranking_and_preserves_order() {
    let provider = MockQuotes::default()
        .with_ticker("PETR4.SA", vec![ev(2024, 6, 1, 3.5)], 30.0)
        .with_ticker("PETR3.SA", vec![ev(2024, 6, 1, 2.8)], 28.0)
        .with_ticker("ITUB4.SA", vec![ev(2024, 6, 1, 1.4)], 25.0);

    let report = Screener::new(&provider, params_2025()).screen(&tickers(&[
        "PETR4.SA", "PETR3.SA", "ITUB4.SA",
    ]));

    let filtered = filter_rows(&report.rows, "PeTr");
    assert_eq!(filtered.len(), 2);

    // Survivors keep the ranked order.
    let pre: Vec<_> = report
        .rows
        .iter()
        .filter(|r| r.ticker.contains("PETR"))
        .map(|r| r.ticker.clone())
        .collect();
    let post: Vec<_> = filtered.iter().map(|r| r.ticker.clone()).collect();
    assert_eq!(pre, post);
}

#[test]
fn threshold_choice_moves_every_ceiling_the_same_way() {
    let events = vec![ev(2024, 6, 1, 1.4)];
    let provider = MockQuotes::default().with_ticker("A.SA", events, 10.0);
    let universe = tickers(&["A.SA"]);

    let loose = Screener::new(&provider, params_2025()).screen(&universe);
    let strict = Screener::new(
        &provider,
        ValuationParams::new(0.09).with_as_of(date(2025, 7, 1)),
    )
    .screen(&universe);

    assert!(strict.rows[0].price_ceiling < loose.rows[0].price_ceiling);
}
