//! Run statistics

use std::time::Duration;

/// Totals for a finished run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories handed to a worker
    pub dispatched: usize,
    /// Results that reached the reporter
    pub reported: usize,
    /// Reported results carrying a clone or command error
    pub failed: usize,
    /// Results the reporter could not render or write
    pub render_failures: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.reported.saturating_sub(self.failed)
    }

    /// One-line summary in the style of the other status output
    pub fn generate_summary(&self) -> String {
        let duration_secs = self.duration.as_secs_f64();
        if self.failed > 0 {
            format!(
                "✅ Completed in {:.1}s • {} repositories • {} succeeded • {} failed",
                duration_secs,
                self.reported,
                self.succeeded(),
                self.failed
            )
        } else {
            format!(
                "✅ Completed in {:.1}s • {} repositories • {} succeeded",
                duration_secs,
                self.reported,
                self.succeeded()
            )
        }
    }
}
