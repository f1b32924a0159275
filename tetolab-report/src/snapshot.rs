//! Snapshot sink trait — idempotent "replace snapshot" semantics.
//!
//! A sink owns one external target (a workbook, a CSV file). `replace`
//! rewrites that target from scratch with the given report: prior rows
//! and prior formatting never survive, so running twice with the same
//! report is the same as running once. The core never sees a sink's
//! object model.

use anyhow::Result;
use tetolab_core::engine::ScreenReport;

pub trait SnapshotSink {
    /// Overwrite the target with this report. Failure is fatal to this
    /// output path only; the computed report is unaffected and a rerun
    /// recomputes everything, so callers report the error without retry.
    fn replace(&mut self, report: &ScreenReport) -> Result<()>;
}
