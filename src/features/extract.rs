//! Pluggable per-event feature extraction.

use super::running::RunningUserFeatures;
use crate::ingest::EventRecord;

/// Produces one fixed-length numeric vector per event. `history` is the
/// aggregator state *before* the event is folded in: features describe the
/// user's history up to but not including the current event.
pub trait FeatureExtract {
    /// Declared vector width; every `extract` result must have this length.
    fn dim(&self) -> usize;

    fn extract(&self, event: &EventRecord, history: &RunningUserFeatures) -> Vec<f64>;
}

/// Default extractor: history-only summary of access timing, the four
/// categorical trackers, and the running failure rate.
///
/// | Index | Feature                          |
/// |-------|----------------------------------|
/// | 0     | time since last access           |
/// | 1..3  | domains unique / freq            |
/// | 3..5  | dest users unique / freq         |
/// | 5..7  | src computers unique / freq      |
/// | 7..9  | dest computers unique / freq     |
/// | 9     | failure rate (0.0 with no history) |
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineExtractor;

impl FeatureExtract for BaselineExtractor {
    fn dim(&self) -> usize {
        10
    }

    fn extract(&self, _event: &EventRecord, history: &RunningUserFeatures) -> Vec<f64> {
        // Empty-history policy: the first row of a group has no attempts yet,
        // so the failure rate is defined as 0.0 rather than an error.
        let failure_rate = if history.login_attempts() == 0 {
            0.0
        } else {
            history.failed_logins() as f64 / history.login_attempts() as f64
        };
        vec![
            history.time_since_last_access(),
            history.domains().unique() as f64,
            history.domains().freq() as f64,
            history.dest_users().unique() as f64,
            history.dest_users().freq() as f64,
            history.src_computers().unique() as f64,
            history.src_computers().freq() as f64,
            history.dest_computers().unique() as f64,
            history.dest_computers().freq() as f64,
            failure_rate,
        ]
    }
}
