//! Stage timing helpers

use std::time::Instant;

/// A timing guard that records the stage duration when dropped
///
/// The duration lands in `etl_stage_duration_seconds` labelled with the
/// stage name, whether the stage finished or bailed out with an error.
pub struct TimingGuard {
    start: Instant,
    stage: &'static str,
}

impl TimingGuard {
    pub fn new(stage: &'static str) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }

    /// Finish timing now instead of at end of scope.
    pub fn finish(self) {}
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        ::metrics::histogram!(super::STAGE_DURATION_SECONDS, "stage" => self.stage).record(duration);
    }
}

/// Convenience function to create a timing guard
pub fn time_stage(stage: &'static str) -> TimingGuard {
    TimingGuard::new(stage)
}
