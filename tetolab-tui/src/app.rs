//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use tetolab_core::domain::{DivisorStrategy, PortfolioRow, ValuationParams};
use tetolab_core::engine::{filter_rows, ScreenReport};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Selectable yield thresholds, cycled with `y`.
pub const THRESHOLDS: [f64; 4] = [0.06, 0.07, 0.08, 0.09];

/// Index of the 7% default in [`THRESHOLDS`].
pub const DEFAULT_THRESHOLD_INDEX: usize = 1;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Table,
    Chart,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Table => 0,
            Panel::Chart => 1,
            Panel::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Table),
            1 => Some(Panel::Chart),
            2 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Table => "Table",
            Panel::Chart => "Chart",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 3).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 2) % 3).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

pub struct AppState {
    pub running: bool,
    pub active_panel: Panel,

    /// Universe the screens run over.
    pub tickers: Vec<String>,
    pub threshold_index: usize,
    pub window_years: u32,
    pub divisor: DivisorStrategy,

    /// Last completed screen. The table keeps rendering this while a
    /// refresh is in flight or after a failed one.
    pub report: Option<ScreenReport>,
    pub last_updated: Option<NaiveDateTime>,

    /// Free-text ticker filter, applied after ranking.
    pub filter: String,
    pub filter_editing: bool,

    pub cursor: usize,

    pub screening: bool,
    pub progress: Option<(String, usize, usize)>,
    pub status_message: Option<(String, StatusLevel)>,

    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        tickers: Vec<String>,
    ) -> Self {
        Self {
            running: true,
            active_panel: Panel::Table,
            tickers,
            threshold_index: DEFAULT_THRESHOLD_INDEX,
            window_years: 5,
            divisor: DivisorStrategy::FixedWindow,
            report: None,
            last_updated: None,
            filter: String::new(),
            filter_editing: false,
            cursor: 0,
            screening: false,
            progress: None,
            status_message: None,
            worker_tx,
            worker_rx,
        }
    }

    pub fn threshold(&self) -> f64 {
        THRESHOLDS[self.threshold_index]
    }

    pub fn params(&self) -> ValuationParams {
        ValuationParams::new(self.threshold())
            .with_window_years(self.window_years)
            .with_divisor(self.divisor)
    }

    /// Rows after the filter, in ranked order.
    pub fn visible_rows(&self) -> Vec<PortfolioRow> {
        match &self.report {
            Some(report) => filter_rows(&report.rows, &self.filter),
            None => Vec::new(),
        }
    }

    /// Ask the worker for a fresh screen. No-op while one is in flight.
    pub fn request_screen(&mut self) {
        if self.screening {
            return;
        }
        self.screening = true;
        self.progress = None;
        let cmd = WorkerCommand::Screen {
            tickers: self.tickers.clone(),
            params: self.params(),
        };
        if self.worker_tx.send(cmd).is_err() {
            self.screening = false;
            self.set_error("worker thread is gone — restart the app".to_string());
        }
    }

    /// Cycle the yield threshold and re-screen.
    pub fn cycle_threshold(&mut self) {
        self.threshold_index = (self.threshold_index + 1) % THRESHOLDS.len();
        self.set_status(format!("Yield threshold: {:.0}%", self.threshold() * 100.0));
        self.request_screen();
    }

    /// Toggle the annualization divisor and re-screen.
    pub fn toggle_divisor(&mut self) {
        self.divisor = match self.divisor {
            DivisorStrategy::FixedWindow => DivisorStrategy::ObservedYears,
            DivisorStrategy::ObservedYears => DivisorStrategy::FixedWindow,
        };
        self.set_status(format!("Divisor: {}", self.divisor.label()));
        self.request_screen();
    }

    pub fn apply_report(&mut self, report: ScreenReport) {
        self.screening = false;
        self.progress = None;
        self.last_updated = Some(chrono::Local::now().naive_local());

        let ranked = report.ranked_count();
        let skipped = report.skipped_count();
        if skipped == 0 {
            self.set_status(format!("Screen complete: {ranked} tickers ranked"));
        } else {
            self.set_warning(format!("Screen done: {ranked} ranked, {skipped} skipped"));
        }

        self.report = Some(report);
        self.clamp_cursor();
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let cur = self.cursor as isize + delta;
        self.cursor = cur.clamp(0, len as isize - 1) as usize;
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: String) {
        self.status_message = Some((msg, StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: String) {
        self.status_message = Some((msg, StatusLevel::Error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    type Harness = (
        AppState,
        mpsc::Receiver<WorkerCommand>,
        mpsc::Sender<WorkerResponse>,
    );

    /// App plus the worker-side channel ends, kept alive by the caller.
    fn app() -> Harness {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let state = AppState::new(cmd_tx, resp_rx, vec!["PETR4.SA".into(), "ITUB4.SA".into()]);
        (state, cmd_rx, resp_tx)
    }

    #[test]
    fn panels_cycle_in_both_directions() {
        assert_eq!(Panel::Table.next(), Panel::Chart);
        assert_eq!(Panel::Help.next(), Panel::Table);
        assert_eq!(Panel::Table.prev(), Panel::Help);
    }

    #[test]
    fn threshold_cycles_through_the_four_choices() {
        let (mut a, _cmd_rx, _resp_tx) = app();
        assert_eq!(a.threshold(), 0.07);
        a.cycle_threshold();
        assert_eq!(a.threshold(), 0.08);
        a.cycle_threshold();
        a.cycle_threshold();
        assert_eq!(a.threshold(), 0.06);
        a.cycle_threshold();
        assert_eq!(a.threshold(), 0.07);
    }

    #[test]
    fn cycling_requests_a_fresh_screen() {
        let (mut a, cmd_rx, _resp_tx) = app();
        a.cycle_threshold();
        match cmd_rx.try_recv().unwrap() {
            WorkerCommand::Screen { tickers, params } => {
                assert_eq!(tickers.len(), 2);
                assert_eq!(params.yield_threshold, 0.08);
            }
            other => panic!("expected a screen command, got {other:?}"),
        }
    }

    #[test]
    fn cursor_stays_inside_the_visible_rows() {
        let (mut a, _cmd_rx, _resp_tx) = app();
        a.move_cursor(5);
        assert_eq!(a.cursor, 0);
    }
}
