use chrono::{DateTime, Local};

/// Capture time format used by the table view, the database and the CSV export
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One reading of a three axis sensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Axes {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A decoded 6-axis motion sample.
///
/// `acceleration` is in m/s², `gyroscope` in °/s (already scaled).
/// `timestamp` has second resolution and keeps its UTC offset, so
/// differences stay correct across a DST change.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub measurement_id: u64,
    pub acceleration: Axes,
    pub gyroscope: Axes,
    pub timestamp: DateTime<Local>,
}

impl Sample {
    pub fn new(measurement_id: u64, acceleration: Axes, gyroscope: Axes, timestamp: DateTime<Local>) -> Self {
        Self {
            measurement_id,
            acceleration,
            gyroscope,
            timestamp,
        }
    }

    /// Local wall clock time, as shown and stored
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
pub fn local_time(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Local> {
    use chrono::TimeZone;

    Local
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
        .expect("unambiguous local time")
}
