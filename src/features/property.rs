//! Frequency tracker for one categorical attribute of a user's history.

use std::collections::HashMap;

/// Accumulates distinct values (in insertion order) and per-value counts.
/// Callers filter the `"?"` sentinel before appending.
#[derive(Debug, Clone, Default)]
pub struct PropertyDescription {
    values: Vec<String>,
    counts: HashMap<String, u64>,
}

impl PropertyDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `item`.
    pub fn append(&mut self, item: &str) {
        if !self.counts.contains_key(item) {
            self.values.push(item.to_string());
        }
        *self.counts.entry(item.to_string()).or_insert(0) += 1;
    }

    /// Count of distinct values seen so far.
    pub fn unique(&self) -> usize {
        self.values.len()
    }

    /// Highest single-value occurrence count seen so far (0 if empty).
    pub fn freq(&self) -> u64 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Distinct values in first-seen order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_and_freq_track_occurrences() {
        let mut p = PropertyDescription::new();
        for item in ["a", "a", "b", "c", "a"] {
            p.append(item);
        }
        assert_eq!(p.unique(), 3);
        assert_eq!(p.freq(), 3);
        assert_eq!(p.values(), ["a", "b", "c"]);
    }

    #[test]
    fn empty_tracker_reports_zero() {
        let p = PropertyDescription::new();
        assert_eq!(p.unique(), 0);
        assert_eq!(p.freq(), 0);
    }
}
