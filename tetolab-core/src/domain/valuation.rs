//! Valuation parameters and per-ticker valuation results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the trailing dividend total is annualized.
///
/// The source material for this calculation is ambiguous: one lineage
/// always divides by the window length, another averages over the calendar
/// years that actually paid. `FixedWindow` is the canonical strategy; the
/// other is selectable but never chosen implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisorStrategy {
    /// Sum the events inside the trailing window, divide by `window_years`.
    ///
    /// A ticker that paid in only 2 of the last 5 years still divides by 5.
    /// That conservatism is deliberate.
    FixedWindow,
    /// Group all events by calendar year, take the most recent
    /// `window_years` years that had at least one payment, and average
    /// over the years actually taken.
    ObservedYears,
}

impl DivisorStrategy {
    pub fn label(self) -> &'static str {
        match self {
            DivisorStrategy::FixedWindow => "fixed-window",
            DivisorStrategy::ObservedYears => "observed-years",
        }
    }
}

/// Inputs to a single ceiling valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationParams {
    /// Reference date for the trailing window.
    pub as_of: NaiveDate,
    /// Minimum acceptable annual dividend yield, as a fraction in (0, 1].
    pub yield_threshold: f64,
    /// Trailing window length in calendar years.
    pub window_years: u32,
    pub divisor: DivisorStrategy,
}

impl ValuationParams {
    /// Params with the defaults the original screen runs with:
    /// today, five-year window, fixed-window divisor.
    pub fn new(yield_threshold: f64) -> Self {
        Self {
            as_of: chrono::Local::now().date_naive(),
            yield_threshold,
            window_years: 5,
            divisor: DivisorStrategy::FixedWindow,
        }
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn with_window_years(mut self, window_years: u32) -> Self {
        self.window_years = window_years;
        self
    }

    pub fn with_divisor(mut self, divisor: DivisorStrategy) -> Self {
        self.divisor = divisor;
        self
    }

    /// Check the numeric domain before a screen run.
    pub fn validate(&self) -> Result<(), String> {
        if !self.yield_threshold.is_finite()
            || self.yield_threshold <= 0.0
            || self.yield_threshold > 1.0
        {
            return Err(format!(
                "yield threshold must be in (0, 1], got {}",
                self.yield_threshold
            ));
        }
        if self.window_years == 0 {
            return Err("window must be at least one year".into());
        }
        Ok(())
    }
}

/// Outcome of valuating one ticker.
///
/// `None` on either side means retrieval failed for that side. An empty
/// dividend history is NOT an absence — it valuates to `Some(0.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub ticker: String,
    pub price_ceiling: Option<f64>,
    pub current_price: Option<f64>,
}

impl ValuationResult {
    /// Both sides present — the ticker can be ranked.
    pub fn is_complete(&self) -> bool {
        self.price_ceiling.is_some() && self.current_price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_follow_the_original_screen() {
        let p = ValuationParams::new(0.07);
        assert_eq!(p.window_years, 5);
        assert_eq!(p.divisor, DivisorStrategy::FixedWindow);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        assert!(ValuationParams::new(0.0).validate().is_err());
        assert!(ValuationParams::new(1.5).validate().is_err());
        assert!(ValuationParams::new(f64::NAN).validate().is_err());
        assert!(ValuationParams::new(1.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let p = ValuationParams::new(0.07).with_window_years(0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn completeness_requires_both_sides() {
        let r = ValuationResult {
            ticker: "PETR4.SA".into(),
            price_ceiling: Some(0.0),
            current_price: None,
        };
        assert!(!r.is_complete());
    }
}
