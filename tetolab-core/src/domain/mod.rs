//! Domain types: dividend events, valuation inputs/outputs, ranked rows.

pub mod dividend;
pub mod row;
pub mod valuation;

pub use dividend::DividendEvent;
pub use row::{PortfolioRow, Signal};
pub use valuation::{DivisorStrategy, ValuationParams, ValuationResult};
