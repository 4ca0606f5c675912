//! Progress fraction and remaining-time estimation.

use std::time::Duration;

/// Fraction of the run completed, in `[0.0, 1.0]`.
///
/// An empty run counts as complete.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fraction(completed: usize, total: usize) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (completed.min(total) as f32) / (total as f32)
}

/// Estimate the time left from the average time per completed file.
///
/// `elapsed * (total - completed) / completed`; `None` until at least one
/// file has completed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn estimate_remaining(elapsed: Duration, completed: usize, total: usize) -> Option<Duration> {
    if completed == 0 {
        return None;
    }
    let remaining = total.saturating_sub(completed);
    Some(elapsed.mul_f64(remaining as f64 / completed as f64))
}

/// Human-readable remaining-time suffix, e.g. `Est. 42 seconds remaining`.
#[must_use]
pub fn format_eta(eta: Duration) -> String {
    let secs = eta.as_secs();
    if secs < 60 {
        format!("Est. {secs} seconds remaining")
    } else {
        format!("Est. {} minutes remaining", secs / 60)
    }
}
