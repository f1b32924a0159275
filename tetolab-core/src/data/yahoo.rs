//! Yahoo Finance quote provider.
//!
//! Fetches declared dividends and the latest close from Yahoo's v8 chart
//! API. Handles rate limiting, retries with exponential backoff, response
//! parsing, and the circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; every parse failure surfaces as `ResponseFormatChanged`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, QuoteProvider};
use crate::domain::DividendEvent;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    events: Option<ChartEvents>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    dividends: Option<HashMap<String, DividendCell>>,
}

#[derive(Debug, Deserialize)]
struct DividendCell {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Option<Vec<Option<f64>>>,
}

/// Yahoo Finance quote provider.
pub struct YahooQuotes {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    timeout: Duration,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooQuotes {
    /// Provider with the default 30-second request timeout.
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Self {
        Self::with_timeout(circuit_breaker, Duration::from_secs(30))
    }

    /// Provider with a caller-chosen per-request timeout. Timeout expiry
    /// is a retrieval error like any other: the affected ticker is
    /// skipped, the screen continues.
    pub fn with_timeout(circuit_breaker: Arc<CircuitBreaker>, timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            circuit_breaker,
            timeout,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Chart URL covering the full declared-dividend history.
    ///
    /// `period1=0` starts at the epoch; the coarse interval keeps the
    /// price arrays small — only the `events` block matters here.
    fn dividends_url(ticker: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{ticker}\
             ?period1=0&period2={now}&interval=1mo&events=div"
        )
    }

    /// Chart URL for the most recent trading day.
    fn latest_url(ticker: &str) -> String {
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{ticker}\
             ?range=1d&interval=1d"
        )
    }

    /// Unwrap the single result node, mapping Yahoo's error envelope.
    fn result_node(ticker: &str, resp: ChartResponse) -> Result<ChartData, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: ticker.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))
    }

    /// Parse the dividend event map into a date-sorted series.
    fn parse_dividends(node: ChartData) -> Result<Vec<DividendEvent>, DataError> {
        let cells = match node.events.and_then(|e| e.dividends) {
            Some(cells) => cells,
            // Tickers that never paid have no events block at all.
            None => return Ok(Vec::new()),
        };

        let mut events = Vec::with_capacity(cells.len());
        for cell in cells.into_values() {
            let date = timestamp_to_date(cell.date)?;
            if !cell.amount.is_finite() || cell.amount < 0.0 {
                return Err(DataError::ResponseFormatChanged(format!(
                    "dividend amount {} on {date}",
                    cell.amount
                )));
            }
            events.push(DividendEvent::new(date, cell.amount));
        }
        events.sort_by_key(|e| e.payment_date);
        Ok(events)
    }

    /// Last non-null close of the most recent session, falling back to
    /// the meta quote when the close array is empty.
    fn parse_latest_close(ticker: &str, node: ChartData) -> Result<f64, DataError> {
        let from_quote = node
            .indicators
            .as_ref()
            .and_then(|ind| ind.quote.first())
            .and_then(|q| q.close.as_ref())
            .and_then(|closes| closes.iter().rev().find_map(|c| *c));

        let close = from_quote
            .or_else(|| node.meta.and_then(|m| m.regular_market_price));

        match close {
            Some(c) if c.is_finite() && c > 0.0 => Ok(c),
            _ => Err(DataError::NoRecentTrades {
                symbol: ticker.to_string(),
            }),
        }
    }

    /// Execute one chart request with retry and circuit breaker logic.
    fn fetch_chart(&self, ticker: &str, url: &str) -> Result<ChartData, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                log::debug!("retry {attempt} for {ticker} after {delay:?}");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        // IP ban: open the breaker for everyone at once.
                        log::warn!("HTTP 403 from Yahoo for {ticker}; tripping circuit breaker");
                        self.circuit_breaker.trip();
                        return Err(DataError::CircuitBreakerTripped);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.circuit_breaker.record_failure();
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if !status.is_success() {
                        self.circuit_breaker.record_failure();
                        last_error = Some(DataError::Other(format!("HTTP {status} for {ticker}")));
                        continue;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse response for {ticker}: {e}"
                        ))
                    })?;

                    let node = Self::result_node(ticker, chart)?;
                    self.circuit_breaker.record_success();
                    return Ok(node);
                }
                Err(e) => {
                    if e.is_timeout() {
                        last_error = Some(DataError::Timeout {
                            secs: self.timeout.as_secs(),
                        });
                        continue;
                    }
                    if e.is_connect() {
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl QuoteProvider for YahooQuotes {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn dividend_history(&self, ticker: &str) -> Result<Vec<DividendEvent>, DataError> {
        let node = self.fetch_chart(ticker, &Self::dividends_url(ticker))?;
        Self::parse_dividends(node)
    }

    fn latest_close(&self, ticker: &str) -> Result<f64, DataError> {
        let node = self.fetch_chart(ticker, &Self::latest_url(ticker))?;
        Self::parse_latest_close(ticker, node)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

/// Exchange timestamps arrive as Unix seconds; normalize to UTC and
/// truncate to a calendar date so every event lives on one naive timeline.
fn timestamp_to_date(ts: i64) -> Result<NaiveDate, DataError> {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.naive_utc().date())
        .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_from_json(json: &str) -> ChartData {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooQuotes::result_node("TEST.SA", resp).unwrap()
    }

    #[test]
    fn parses_dividend_events_sorted_by_date() {
        let node = node_from_json(
            r#"{"chart":{"result":[{"events":{"dividends":{
                "1717200000":{"amount":1.25,"date":1717200000},
                "1622505600":{"amount":1.00,"date":1622505600}
            }}}],"error":null}}"#,
        );
        let events = YahooQuotes::parse_dividends(node).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].payment_date < events[1].payment_date);
        assert_eq!(events[0].amount, 1.00);
    }

    #[test]
    fn missing_events_block_is_an_empty_history() {
        let node = node_from_json(r#"{"chart":{"result":[{}],"error":null}}"#);
        let events = YahooQuotes::parse_dividends(node).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn negative_dividend_amount_is_a_format_error() {
        let node = node_from_json(
            r#"{"chart":{"result":[{"events":{"dividends":{
                "1717200000":{"amount":-1.0,"date":1717200000}
            }}}],"error":null}}"#,
        );
        assert!(matches!(
            YahooQuotes::parse_dividends(node),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn latest_close_takes_last_non_null() {
        let node = node_from_json(
            r#"{"chart":{"result":[{"indicators":{"quote":[
                {"close":[30.1,30.5,null]}
            ]}}],"error":null}}"#,
        );
        let close = YahooQuotes::parse_latest_close("TEST.SA", node).unwrap();
        assert_eq!(close, 30.5);
    }

    #[test]
    fn latest_close_falls_back_to_meta() {
        let node = node_from_json(
            r#"{"chart":{"result":[{
                "meta":{"regularMarketPrice":28.4},
                "indicators":{"quote":[{"close":[null]}]}
            }],"error":null}}"#,
        );
        let close = YahooQuotes::parse_latest_close("TEST.SA", node).unwrap();
        assert_eq!(close, 28.4);
    }

    #[test]
    fn all_null_closes_mean_no_recent_trades() {
        let node = node_from_json(
            r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[null,null]}]}}],"error":null}}"#,
        );
        assert!(matches!(
            YahooQuotes::parse_latest_close("TEST.SA", node),
            Err(DataError::NoRecentTrades { .. })
        ));
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let resp: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#,
        )
        .unwrap();
        assert!(matches!(
            YahooQuotes::result_node("NOPE.SA", resp),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn timestamps_normalize_to_utc_dates() {
        // 2024-06-01T00:00:00Z
        assert_eq!(
            timestamp_to_date(1717200000).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }
}
