//! Universe configuration — segment-organized ticker lists.
//!
//! The universe is a TOML file mapping segments to B3 tickers. The
//! default carries the screen's original sixteen tickers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The complete universe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    pub segments: BTreeMap<String, Vec<String>>,
}

impl Universe {
    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read universe file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse universe TOML: {e}"))
    }

    /// All tickers, segment order then list order. This is the input
    /// order of the screen and therefore the tiebreak order of the
    /// ranked table.
    pub fn all_tickers(&self) -> Vec<String> {
        self.segments
            .values()
            .flat_map(|tickers| tickers.iter().cloned())
            .collect()
    }

    pub fn segment_names(&self) -> Vec<&str> {
        self.segments.keys().map(|s| s.as_str()).collect()
    }

    pub fn ticker_count(&self) -> usize {
        self.segments.values().map(|v| v.len()).sum()
    }

    /// Default B3 universe: the dividend payers and real-estate funds the
    /// original screen tracks.
    pub fn default_br() -> Self {
        let mut segments = BTreeMap::new();

        let seg = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };

        segments.insert("bancos".into(), seg(&["ITUB4.SA", "BBAS3.SA", "SANB4.SA"]));
        segments.insert(
            "energia".into(),
            seg(&["PETR4.SA", "AURE3.SA", "VBBR3.SA"]),
        );
        segments.insert(
            "industria".into(),
            seg(&["CSNA3.SA", "VALE3.SA", "UNIP6.SA", "KLBN4.SA"]),
        );
        segments.insert("saneamento".into(), seg(&["SAPR4.SA"]));
        segments.insert("seguros".into(), seg(&["BBSE3.SA"]));
        segments.insert("telecom".into(), seg(&["VIVT3.SA"]));
        segments.insert(
            "fiis".into(),
            seg(&["VISC11.SA", "XPLG11.SA", "MXRF11.SA"]),
        );

        Self { segments }
    }
}
