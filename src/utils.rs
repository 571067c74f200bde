use chrono::{DateTime, TimeZone};

/// Table and status bar formatting for a sensor value
pub fn format_reading(value: f64) -> String {
    format!("{:.2}", value)
}

/// Seconds between two capture times, used as the chart x coordinate.
/// Offsets are honoured, so a wall clock that jumps back does not fold the axis.
pub fn elapsed_seconds<Tz: TimeZone>(origin: &DateTime<Tz>, at: &DateTime<Tz>) -> f64 {
    at.clone().signed_duration_since(origin).num_milliseconds() as f64 / 1000.0
}

/// Fixed width y axis label so the three charts line up
pub fn format_fixed_width_y_label(value: f64) -> String {
    let abs_value = value.abs();
    if abs_value >= 1000.0 {
        format!("{:>6.1e}", value)
    } else if abs_value >= 100.0 {
        format!("{:>6.0}", value)
    } else if abs_value >= 10.0 {
        format!("{:>6.1}", value)
    } else {
        format!("{:>6.2}", value)
    }
}
