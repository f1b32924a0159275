//! XLSX snapshot sink with conditional row coloring.
//!
//! Mirrors the worksheet the original screen maintained by hand: header
//! `[Ticker, P_Max, Current Price]`, one row per ranked ticker, and
//! exactly three mutually exclusive conditional-format rules over the
//! price columns. The workbook is rebuilt from scratch on every run, so
//! stale rows and stale rules cannot survive a re-screen.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, ConditionalFormatFormula, Format, Workbook};
use tetolab_core::domain::Signal;
use tetolab_core::engine::ScreenReport;

use crate::snapshot::SnapshotSink;

/// Worksheet columns: A = ticker, B = ceiling, C = current price.
const COL_TICKER: u16 = 0;
const COL_CEILING: u16 = 1;
const COL_PRICE: u16 = 2;

/// The three coloring rules, one per signal. Each formula compares the
/// current price (column C) against the ceiling (column B) with the same
/// operator [`Signal::classify`] uses, anchored on the first data row.
fn rules() -> [(Signal, &'static str, Color); 3] {
    [
        (Signal::Buy, "=$C2<$B2", Color::RGB(0xCCFFCC)),
        (Signal::Equal, "=$C2=$B2", Color::RGB(0xFFFF99)),
        (Signal::Wait, "=$C2>$B2", Color::RGB(0xFFCCCC)),
    ]
}

/// XLSX snapshot sink: one workbook path, fully rewritten per run.
pub struct XlsxSink {
    path: PathBuf,
}

impl XlsxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn build(report: &ScreenReport) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Snapshot")?;

        let header = Format::new().set_bold();
        worksheet.write_string_with_format(0, COL_TICKER, "Ticker", &header)?;
        worksheet.write_string_with_format(0, COL_CEILING, "P_Max", &header)?;
        worksheet.write_string_with_format(0, COL_PRICE, "Current Price", &header)?;
        worksheet.set_column_width(COL_TICKER, 14)?;
        worksheet.set_column_width(COL_CEILING, 10)?;
        worksheet.set_column_width(COL_PRICE, 14)?;

        for (i, row) in report.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            worksheet.write_string(r, COL_TICKER, row.ticker.as_str())?;
            worksheet.write_number(r, COL_CEILING, row.price_ceiling)?;
            worksheet.write_number(r, COL_PRICE, row.current_price)?;
        }

        // An empty range is invalid; a headers-only workbook needs no rules.
        if !report.rows.is_empty() {
            let last_row = report.rows.len() as u32;
            for (_, formula, fill) in rules() {
                let rule = ConditionalFormatFormula::new()
                    .set_rule(formula)
                    .set_format(Format::new().set_background_color(fill));
                worksheet.add_conditional_format(1, COL_CEILING, last_row, COL_PRICE, &rule)?;
            }
        }

        Ok(workbook)
    }
}

impl SnapshotSink for XlsxSink {
    fn replace(&mut self, report: &ScreenReport) -> Result<()> {
        let mut workbook = Self::build(report)?;
        workbook
            .save(&self.path)
            .with_context(|| format!("failed to write XLSX snapshot {}", self.path.display()))
    }
}
