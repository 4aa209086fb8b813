//! Test timing

use std::time::{Duration, Instant};

/// Measures the wall-clock time taken by a single test body.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn stop(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Format the given duration using seconds, milliseconds, or microseconds,
/// whichever suits its magnitude.
///
/// # Arguments
///
/// * `duration` - The duration to format.
pub fn format_duration(duration: &Duration) -> String {
    if *duration >= Duration::from_secs(1) {
        return format!("{} s", duration.as_millis() as f64 / 1000.0);
    }

    if *duration >= Duration::from_millis(1) {
        return format!("{} ms", duration.as_micros() as f64 / 1000.0);
    }

    format!("{} us", duration.as_nanos() as f64 / 1000.0)
}
