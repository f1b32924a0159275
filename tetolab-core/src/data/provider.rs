//! Quote provider trait and structured error types.
//!
//! The QuoteProvider trait abstracts over market data sources so the
//! screener can be exercised against a mock and the Yahoo client can be
//! swapped without touching the core.

use thiserror::Error;

use crate::domain::DividendEvent;

/// Structured error types for quote retrieval.
///
/// Designed to be displayable in both CLI and TUI contexts. Every variant
/// is a per-ticker, recoverable condition: the screener records it and
/// moves on to the next ticker.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no recent trading data for '{symbol}'")]
    NoRecentTrades { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for market data sources.
///
/// Both calls are independent per-ticker lookups; implementations own
/// their retry and rate-limit policy, the core never retries.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Full declared-dividend history for a ticker, oldest first.
    /// An empty history is a legitimate response, not an error.
    fn dividend_history(&self, ticker: &str) -> Result<Vec<DividendEvent>, DataError>;

    /// Most recent closing price. Fails with `NoRecentTrades` when the
    /// ticker has no recent trading data.
    fn latest_close(&self, ticker: &str) -> Result<f64, DataError>;

    /// Check if the provider is currently available (not rate-limited,
    /// not blocked).
    fn is_available(&self) -> bool;
}
