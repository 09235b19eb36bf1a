//! Progress arithmetic for download/unzip style reporting

/// Projected remaining time, assuming progress is linear.
///
/// Returned in the unit of `elapsed`. `percent` of zero is not guarded:
/// no ETA is requested before progress starts.
pub fn calculate_eta(percent: f64, elapsed: f64) -> f64 {
    if percent == 100.0 {
        return 0.0;
    }
    elapsed * (100.0 / percent) - elapsed
}

/// Whole seconds left for an ETA given in milliseconds.
///
/// Non-finite input renders as `"0"`.
pub fn secs_remaining(eta_millis: f64) -> String {
    let secs = if eta_millis.is_finite() {
        eta_millis / 1000.0
    } else {
        0.0
    };
    format!("{:.0}", secs)
}
