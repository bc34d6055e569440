use serde::{Deserialize, Serialize};

/// Counters accumulated while scanning a recording.
///
/// Carried by value through the selector's fold rather than shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMetrics {
    pub frames_scanned: usize,
    pub candidates_evaluated: usize,
    pub stationary_skipped: usize,
    pub minimum_updates: usize,
}

impl ScanMetrics {
    pub fn record_frame(mut self) -> Self {
        self.frames_scanned += 1;
        self
    }

    pub fn record_candidate(mut self) -> Self {
        self.candidates_evaluated += 1;
        self
    }

    pub fn record_stationary(mut self) -> Self {
        self.stationary_skipped += 1;
        self
    }

    pub fn record_minimum(mut self) -> Self {
        self.minimum_updates += 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_by_value() {
        let metrics = ScanMetrics::default()
            .record_frame()
            .record_candidate()
            .record_candidate()
            .record_stationary()
            .record_minimum();
        assert_eq!(metrics.frames_scanned, 1);
        assert_eq!(metrics.candidates_evaluated, 2);
        assert_eq!(metrics.stationary_skipped, 1);
        assert_eq!(metrics.minimum_updates, 1);
    }
}
