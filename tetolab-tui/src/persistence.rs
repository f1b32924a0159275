//! App state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use tetolab_core::domain::DivisorStrategy;

use crate::app::{AppState, Panel, DEFAULT_THRESHOLD_INDEX, THRESHOLDS};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub threshold_index: usize,
    pub divisor: DivisorStrategy,
    pub filter: String,
    pub active_panel: Panel,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            threshold_index: DEFAULT_THRESHOLD_INDEX,
            divisor: DivisorStrategy::FixedWindow,
            filter: String::new(),
            active_panel: Panel::Table,
        }
    }
}

/// Load persisted state from disk. Returns defaults if the file is
/// missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        threshold_index: app.threshold_index,
        divisor: app.divisor,
        filter: app.filter.clone(),
        active_panel: app.active_panel,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    // A corrupt index would panic on the threshold table; fall back.
    app.threshold_index = if state.threshold_index < THRESHOLDS.len() {
        state.threshold_index
    } else {
        DEFAULT_THRESHOLD_INDEX
    };
    app.divisor = state.divisor;
    app.filter = state.filter;
    app.active_panel = state.active_panel;
}
