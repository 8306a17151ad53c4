//! Link Statistics Module
//!
//! Counts resolution outcomes and sweep evictions.

// == Link Stats ==
/// Outcome counters for a running engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Successful resolutions
    pub resolved: u64,
    /// Resolutions of unknown codes
    pub not_found: u64,
    /// Records found expired on access
    pub expired: u64,
    /// Resolutions refused because the quota was used up
    pub quota_rejected: u64,
    /// Records removed by sweeps
    pub swept: u64,
}

impl LinkStats {
    // == Constructor ==
    /// Creates a new LinkStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total resolution attempts.
    pub fn attempts(&self) -> u64 {
        self.resolved + self.not_found + self.expired + self.quota_rejected
    }

    // == Success Rate ==
    /// Returns resolved / attempts, or 0.0 if nothing has been resolved yet.
    pub fn success_rate(&self) -> f64 {
        let total = self.attempts();
        if total == 0 {
            0.0
        } else {
            self.resolved as f64 / total as f64
        }
    }

    pub fn record_resolved(&mut self) {
        self.resolved += 1;
    }

    pub fn record_not_found(&mut self) {
        self.not_found += 1;
    }

    pub fn record_expired(&mut self) {
        self.expired += 1;
    }

    pub fn record_quota_rejected(&mut self) {
        self.quota_rejected += 1;
    }

    pub fn record_swept(&mut self, count: usize) {
        self.swept += count as u64;
    }
}
