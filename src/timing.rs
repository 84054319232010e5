//! Stage timing.

use std::time::Instant;

/// A simple timer for measuring pipeline stage durations.
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer with the given stage name.
    pub fn start(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Finish the timer and print the elapsed time.
    pub fn finish(self) {
        let secs = self.start.elapsed().as_secs_f64();
        tracing::debug!(stage = %self.name, secs, "stage finished");
        if secs >= 1.0 {
            println!("  [{:.1}s] {}", secs, self.name);
        } else {
            println!("  [{}ms] {}", self.start.elapsed().as_millis(), self.name);
        }
    }
}
