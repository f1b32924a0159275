//! CSV and JSON snapshot export.
//!
//! CSV carries a textual `signal` column in place of the workbook's
//! conditional colors; both derive from the same classification, so the
//! two formats cannot disagree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tetolab_core::engine::ScreenReport;

use crate::snapshot::SnapshotSink;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a full screen report (rows, outcomes, params) to pretty JSON.
pub fn export_json(report: &ScreenReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScreenReport to JSON")
}

/// Write the JSON snapshot to a file, replacing any previous content.
pub fn write_json(path: &std::path::Path, report: &ScreenReport) -> Result<()> {
    let json = export_json(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write JSON snapshot {}", path.display()))
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Render the ranked rows as CSV.
///
/// Columns: ticker, p_max, current_price, signal
pub fn export_csv(report: &ScreenReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["ticker", "p_max", "current_price", "signal"])?;

    for row in &report.rows {
        wtr.write_record([
            row.ticker.as_str(),
            &format!("{:.2}", row.price_ceiling),
            &format!("{:.2}", row.current_price),
            row.signal.label(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// CSV snapshot sink: one file, fully rewritten per run.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSink for CsvSink {
    fn replace(&mut self, report: &ScreenReport) -> Result<()> {
        let csv = export_csv(report)?;
        std::fs::write(&self.path, csv)
            .with_context(|| format!("failed to write CSV snapshot {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetolab_core::domain::{PortfolioRow, ValuationParams};

    fn report() -> ScreenReport {
        ScreenReport {
            rows: vec![
                PortfolioRow::new("SAPR4.SA", 5.20, 6.50),
                PortfolioRow::new("PETR4.SA", 38.00, 36.10),
            ],
            outcomes: vec![],
            params: ValuationParams::new(0.07),
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let csv = export_csv(&report()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ticker,p_max,current_price,signal");
        assert!(lines[1].starts_with("SAPR4.SA,6.50,5.20,BUY"));
        assert!(lines[2].contains("WAIT"));
    }

    #[test]
    fn json_round_trips() {
        let json = export_json(&report()).unwrap();
        let back: ScreenReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rows, report().rows);
    }
}
