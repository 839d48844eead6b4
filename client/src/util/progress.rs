//! Progress estimation for running jobs.
//!
//! The server supplies an estimated completion time with each running entry;
//! progress is the elapsed fraction of the estimate, read against the server
//! clock via the session's skew.

#[cfg(test)]
#[path = "progress_test.rs"]
mod progress_test;

/// Display state of a running job's progress bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progress {
    /// No estimate available; show an indeterminate spinner.
    Unknown,
    /// Percentage of the estimate elapsed, capped at 99 once the estimate
    /// has passed.
    Percent(f64),
    /// Running at more than 120 % of the estimate.
    Overtime,
}

/// Compute progress for a run that started at `started` with estimated
/// completion `eta`, both unix seconds on the server clock. `local_now` is
/// the local wall clock and `clock_skew` the session's server offset.
#[must_use]
pub fn progress(local_now: i64, clock_skew: i64, started: i64, eta: Option<i64>) -> Progress {
    let Some(eta) = eta else {
        return Progress::Unknown;
    };
    if eta <= started {
        return Progress::Unknown;
    }
    #[allow(clippy::cast_precision_loss)]
    let fraction = (local_now + clock_skew - started) as f64 / (eta - started) as f64;
    if fraction > 1.2 {
        Progress::Overtime
    } else if fraction >= 1.0 {
        Progress::Percent(99.0)
    } else {
        Progress::Percent(100.0 * fraction)
    }
}
