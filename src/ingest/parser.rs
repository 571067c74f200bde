use chrono::{DateTime, Local, Timelike};

use crate::types::{Axes, Sample};

/// LSB per °/s for the ±250°/s gyroscope range
pub const GYRO_SCALE: f64 = 131.0;

/// x, y, z, gx_raw, gy_raw, gz_raw
pub const FIELD_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("empty record")]
    Empty,
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("field {index} is not a number: {field:?}")]
    InvalidNumber { index: usize, field: String },
    #[error("field {index} is not finite")]
    NonFinite { index: usize },
}

/// Decodes `x,y,z,gx,gy,gz` records and numbers the accepted ones.
///
/// The id counter only moves when a record is accepted, so ids are
/// gap free starting at 1.
#[derive(Debug, Default)]
pub struct SampleParser {
    last_id: u64,
}

impl SampleParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the most recently accepted sample, 0 before the first one
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Decodes a record stamped with the current local time
    pub fn parse(&mut self, line: &str) -> Result<Sample, DecodeError> {
        self.parse_at(line, Local::now())
    }

    pub fn parse_at(&mut self, line: &str, captured_at: DateTime<Local>) -> Result<Sample, DecodeError> {
        let values = decode_fields(line)?;

        self.last_id += 1;
        let timestamp = captured_at.with_nanosecond(0).unwrap_or(captured_at);

        Ok(Sample::new(
            self.last_id,
            Axes::new(values[0], values[1], values[2]),
            Axes::new(
                values[3] / GYRO_SCALE,
                values[4] / GYRO_SCALE,
                values[5] / GYRO_SCALE,
            ),
            timestamp,
        ))
    }
}

fn decode_fields(line: &str) -> Result<[f64; FIELD_COUNT], DecodeError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(DecodeError::Empty);
    }

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(DecodeError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let mut values = [0.0; FIELD_COUNT];
    for (index, field) in fields.iter().enumerate() {
        let value = field.trim().parse::<f64>().map_err(|_| DecodeError::InvalidNumber {
            index,
            field: field.to_string(),
        })?;
        if !value.is_finite() {
            return Err(DecodeError::NonFinite { index });
        }
        values[index] = value;
    }

    Ok(values)
}
