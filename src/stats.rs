//! Per-session slap counters
//!
//! Reported to the profile and analytics collaborators at session end.

use serde::{Deserialize, Serialize};

/// Slap counters for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_slaps: u32,
    pub successful_slaps: u32,
    pub failed_slaps: u32,
    pub highest_combo: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit; `combo` is the combo after the hit
    pub fn record_success(&mut self, combo: u32) {
        self.total_slaps += 1;
        self.successful_slaps += 1;
        self.highest_combo = self.highest_combo.max(combo);
    }

    pub fn record_failure(&mut self) {
        self.total_slaps += 1;
        self.failed_slaps += 1;
    }

    /// Successful slaps as a percentage of all slaps (0 when none)
    pub fn success_rate(&self) -> f64 {
        if self.total_slaps == 0 {
            return 0.0;
        }
        f64::from(self.successful_slaps) / f64::from(self.total_slaps) * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.total_slaps == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = SessionStats::new();
        assert!(stats.is_empty());
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_record() {
        let mut stats = SessionStats::new();
        stats.record_success(1);
        stats.record_success(2);
        stats.record_failure();
        stats.record_success(1);

        assert_eq!(stats.total_slaps, 4);
        assert_eq!(stats.successful_slaps, 3);
        assert_eq!(stats.failed_slaps, 1);
        assert_eq!(stats.highest_combo, 2);
        assert_eq!(stats.success_rate(), 75.0);
    }
}
