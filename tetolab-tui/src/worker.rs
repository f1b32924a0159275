//! Background worker thread — all network fetching runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The
//! worker owns the Yahoo provider and its circuit breaker; the UI thread
//! never touches the network.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tetolab_core::data::{CircuitBreaker, YahooQuotes};
use tetolab_core::domain::ValuationParams;
use tetolab_core::engine::{ScreenProgress, ScreenReport, Screener, TickerOutcome};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Screen {
        tickers: Vec<String>,
        params: ValuationParams,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Progress {
        ticker: String,
        index: usize,
        total: usize,
    },
    ScreenDone {
        report: Box<ScreenReport>,
    },
    ScreenError {
        message: String,
    },
}

/// Forwards per-ticker progress over the response channel.
struct ChannelProgress<'a> {
    tx: &'a Sender<WorkerResponse>,
}

impl ScreenProgress for ChannelProgress<'_> {
    fn on_start(&self, ticker: &str, index: usize, total: usize) {
        let _ = self.tx.send(WorkerResponse::Progress {
            ticker: ticker.to_string(),
            index,
            total,
        });
    }

    fn on_complete(&self, _outcome: &TickerOutcome, _index: usize, _total: usize) {}

    fn on_batch_complete(&self, _ranked: usize, _skipped: usize, _total: usize) {}
}

/// Spawn the worker thread. It owns one provider for its whole life so
/// the circuit breaker state survives across refreshes.
pub fn spawn_worker(
    cmd_rx: Receiver<WorkerCommand>,
    resp_tx: Sender<WorkerResponse>,
    timeout: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        let provider = YahooQuotes::with_timeout(breaker, timeout);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                WorkerCommand::Screen { tickers, params } => {
                    if let Err(e) = params.validate() {
                        let _ = resp_tx.send(WorkerResponse::ScreenError { message: e });
                        continue;
                    }
                    let screener = Screener::new(&provider, params);
                    let progress = ChannelProgress { tx: &resp_tx };
                    let report = screener.screen_with_progress(&tickers, &progress);
                    let _ = resp_tx.send(WorkerResponse::ScreenDone {
                        report: Box::new(report),
                    });
                }
                WorkerCommand::Shutdown => break,
            }
        }
    })
}
