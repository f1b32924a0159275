//! Screener — runs the ceiling valuation over a ticker list and builds
//! the ranked table.
//!
//! Tickers are processed sequentially and independently. A retrieval
//! failure on either side (dividends or price) excludes that ticker from
//! the ranked rows but never aborts the batch; every ticker leaves an
//! explicit outcome behind so callers can count and display skips.

use serde::{Deserialize, Serialize};

use crate::data::provider::QuoteProvider;
use crate::domain::{PortfolioRow, ValuationParams, ValuationResult};
use crate::engine::ceiling::price_ceiling;

/// Why a ticker is missing from the ranked rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    DividendsUnavailable,
    PriceUnavailable,
}

/// Per-ticker outcome of a screen run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerOutcome {
    pub ticker: String,
    /// `None` when the ticker was ranked.
    pub skipped: Option<SkipReason>,
    /// Provider error text for skipped tickers.
    pub detail: Option<String>,
}

impl TickerOutcome {
    fn ranked(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            skipped: None,
            detail: None,
        }
    }

    fn skipped(ticker: &str, reason: SkipReason, detail: String) -> Self {
        Self {
            ticker: ticker.to_string(),
            skipped: Some(reason),
            detail: Some(detail),
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.skipped.is_none()
    }
}

/// Result of one screen run: the ranked table plus the per-ticker audit
/// trail, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenReport {
    /// Ranked rows, descending by gap; ties keep input order.
    pub rows: Vec<PortfolioRow>,
    pub outcomes: Vec<TickerOutcome>,
    pub params: ValuationParams,
}

impl ScreenReport {
    pub fn ranked_count(&self) -> usize {
        self.rows.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ranked()).count()
    }
}

/// Progress callback for multi-ticker screens.
pub trait ScreenProgress {
    /// Called before fetching a ticker.
    fn on_start(&self, ticker: &str, index: usize, total: usize);

    /// Called when a ticker finishes, ranked or skipped.
    fn on_complete(&self, outcome: &TickerOutcome, index: usize, total: usize);

    /// Called when the whole batch is done.
    fn on_batch_complete(&self, ranked: usize, skipped: usize, total: usize);
}

/// Progress reporter that prints to stdout (CLI path).
pub struct StdoutProgress;

impl ScreenProgress for StdoutProgress {
    fn on_start(&self, ticker: &str, index: usize, total: usize) {
        println!("[{}/{}] Screening {ticker}...", index + 1, total);
    }

    fn on_complete(&self, outcome: &TickerOutcome, _index: usize, _total: usize) {
        match (&outcome.skipped, &outcome.detail) {
            (None, _) => println!("  OK: {}", outcome.ticker),
            (Some(_), Some(detail)) => println!("  SKIP: {}: {detail}", outcome.ticker),
            (Some(_), None) => println!("  SKIP: {}", outcome.ticker),
        }
    }

    fn on_batch_complete(&self, ranked: usize, skipped: usize, total: usize) {
        println!("\nScreen complete: {ranked}/{total} ranked, {skipped} skipped");
    }
}

/// Silent progress for callers that report elsewhere (TUI worker).
struct NoProgress;

impl ScreenProgress for NoProgress {
    fn on_start(&self, _: &str, _: usize, _: usize) {}
    fn on_complete(&self, _: &TickerOutcome, _: usize, _: usize) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize) {}
}

/// One ticker's valuation with the retrieval errors that produced any
/// absent side.
struct Valuated {
    result: ValuationResult,
    dividends_error: Option<String>,
    price_error: Option<String>,
}

/// Runs the valuation over a ticker list against one provider.
pub struct Screener<'a> {
    provider: &'a dyn QuoteProvider,
    params: ValuationParams,
}

impl<'a> Screener<'a> {
    pub fn new(provider: &'a dyn QuoteProvider, params: ValuationParams) -> Self {
        Self { provider, params }
    }

    pub fn params(&self) -> &ValuationParams {
        &self.params
    }

    /// Screen without progress reporting.
    pub fn screen(&self, tickers: &[String]) -> ScreenReport {
        self.screen_with_progress(tickers, &NoProgress)
    }

    /// Screen a ticker list: valuate each, rank the complete ones.
    pub fn screen_with_progress(
        &self,
        tickers: &[String],
        progress: &dyn ScreenProgress,
    ) -> ScreenReport {
        let total = tickers.len();
        let mut rows = Vec::with_capacity(total);
        let mut outcomes = Vec::with_capacity(total);

        for (index, ticker) in tickers.iter().enumerate() {
            progress.on_start(ticker, index, total);

            let v = self.valuate_inner(ticker);
            let outcome = match (v.result.price_ceiling, v.result.current_price) {
                (Some(ceiling), Some(price)) => {
                    rows.push(PortfolioRow::new(ticker.clone(), price, ceiling));
                    TickerOutcome::ranked(ticker)
                }
                (None, _) => TickerOutcome::skipped(
                    ticker,
                    SkipReason::DividendsUnavailable,
                    v.dividends_error.unwrap_or_else(|| "unknown error".into()),
                ),
                (_, None) => TickerOutcome::skipped(
                    ticker,
                    SkipReason::PriceUnavailable,
                    v.price_error.unwrap_or_else(|| "unknown error".into()),
                ),
            };

            progress.on_complete(&outcome, index, total);
            outcomes.push(outcome);
        }

        sort_rows(&mut rows);

        let report = ScreenReport {
            rows,
            outcomes,
            params: self.params,
        };
        progress.on_batch_complete(report.ranked_count(), report.skipped_count(), total);
        report
    }

    /// Valuate one ticker. Either side of the result may be absent;
    /// absence means retrieval failed for that side.
    pub fn valuate(&self, ticker: &str) -> ValuationResult {
        self.valuate_inner(ticker).result
    }

    fn valuate_inner(&self, ticker: &str) -> Valuated {
        let (price_ceiling, dividends_error) = match self.provider.dividend_history(ticker) {
            Ok(events) => (Some(price_ceiling(&events, &self.params)), None),
            Err(e) => {
                log::warn!("dividend history failed for {ticker}: {e}");
                (None, Some(e.to_string()))
            }
        };

        let (current_price, price_error) = match self.provider.latest_close(ticker) {
            Ok(price) => (Some(price), None),
            Err(e) => {
                log::warn!("price lookup failed for {ticker}: {e}");
                (None, Some(e.to_string()))
            }
        };

        Valuated {
            result: ValuationResult {
                ticker: ticker.to_string(),
                price_ceiling,
                current_price,
            },
            dividends_error,
            price_error,
        }
    }
}

/// Stable descending sort by gap. `total_cmp` keeps the order total even
/// if a non-finite price slips through a provider.
fn sort_rows(rows: &mut [PortfolioRow]) {
    rows.sort_by(|a, b| b.gap.total_cmp(&a.gap));
}

/// Case-insensitive substring filter on the ticker, applied AFTER
/// sorting: survivors keep their relative order. An empty or whitespace
/// query keeps everything.
pub fn filter_rows(rows: &[PortfolioRow], query: &str) -> Vec<PortfolioRow> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|r| r.ticker.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
