//! Generator configuration. One immutable bundle, threaded explicitly — no globals.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Source auth log (CSV, 9 columns, no header)
    pub input: PathBuf,
    /// Where the generated datasets are written
    pub output: PathBuf,
    /// Optional row cap on ingest (None = whole file)
    pub max_rows: Option<usize>,
    /// Whole-dataset decile partitioning instead of per-user splits
    pub meganet: bool,
    /// Split arithmetic parameters
    pub split: SplitConfig,
    /// Log a progress line every this many processed groups
    pub report_every: usize,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Share of each sequence assigned to training (percent)
    pub training_pct: u32,
    /// Downstream model batch size; segment lengths align to it
    pub batch_size: usize,
    /// Configured floor for the minimum qualifying group size
    pub min_group_floor: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("auth.csv"),
            output: PathBuf::from("features.json"),
            max_rows: None,
            meganet: false,
            split: SplitConfig::default(),
            report_every: 50,
            log: LogConfig::default(),
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            training_pct: 70,
            batch_size: 32,
            min_group_floor: 150,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl SplitConfig {
    /// Effective minimum group size: the configured floor, but never so small
    /// that an accepted group could fail to produce a non-degenerate split.
    pub fn min_group_size(&self) -> usize {
        self.min_group_floor.max(2 * self.batch_size + 2)
    }
}

impl GeneratorConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<GeneratorConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_group_size_never_below_two_batches() {
        let cfg = SplitConfig {
            training_pct: 70,
            batch_size: 100,
            min_group_floor: 150,
        };
        assert_eq!(cfg.min_group_size(), 202);
    }

    #[test]
    fn min_group_size_uses_floor_when_larger() {
        let cfg = SplitConfig::default();
        assert_eq!(cfg.min_group_size(), 150);
    }
}
