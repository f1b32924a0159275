//! Valuation engine and screener.

pub mod ceiling;
pub mod screener;

pub use ceiling::{price_ceiling, window_cutoff};
pub use screener::{
    filter_rows, ScreenProgress, ScreenReport, Screener, SkipReason, StdoutProgress, TickerOutcome,
};
