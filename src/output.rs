//! Run results: per-key outcomes and aggregate statistics.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The outcome of one input key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkResult {
    /// The canonical key that was looked up.
    pub key: String,
    /// Recipe name as returned by the catalogue; `None` when not found.
    pub name: Option<String>,
    /// Target path of the document; `None` when not found.
    pub document: Option<PathBuf>,
}

impl DrinkResult {
    /// Whether the catalogue had a match for this key.
    pub fn found(&self) -> bool {
        self.name.is_some()
    }
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Canonical keys collected from the input file.
    pub total_keys: usize,
    /// Keys that produced a document.
    pub rendered: usize,
    /// Keys the catalogue had no match for.
    pub not_found: usize,
    /// Wall-clock duration of the whole run.
    pub duration_ms: u64,
}

/// Everything a completed run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// One entry per input key, in input order.
    pub drinks: Vec<DrinkResult>,
    /// Aggregate statistics.
    pub stats: RunStats,
}
