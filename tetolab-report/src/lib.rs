//! Tetolab Report — persistence sinks for screen snapshots.
//!
//! Three formats behind one trait:
//! - **XLSX**: the spreadsheet the screen maintains, with conditional
//!   row coloring mirroring the signal classification
//! - **CSV**: ranked rows with a textual signal column
//! - **JSON**: full report round-trip for downstream tooling
//!
//! Every sink has replace-snapshot semantics: the target is rewritten
//! from scratch on each run.

pub mod export;
pub mod sheet;
pub mod snapshot;

pub use export::{export_csv, export_json, write_json, CsvSink};
pub use sheet::XlsxSink;
pub use snapshot::SnapshotSink;
