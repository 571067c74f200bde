use std::collections::VecDeque;
use chrono::{DateTime, Local};

use crate::config::RetentionPolicy;
use crate::types::{Axes, Sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    fn pick(&self, axes: &Axes) -> f64 {
        match self {
            Axis::X => axes.x,
            Axis::Y => axes.y,
            Axis::Z => axes.z,
        }
    }
}

/// In-memory sample history as parallel series.
///
/// All series always have the same length. With bounded retention the
/// oldest entry of every series is evicted together.
#[derive(Debug)]
pub struct SampleHistory {
    ids: VecDeque<u64>,
    buffer_x: VecDeque<f64>,
    buffer_y: VecDeque<f64>,
    buffer_z: VecDeque<f64>,
    buffer_gx: VecDeque<f64>,
    buffer_gy: VecDeque<f64>,
    buffer_gz: VecDeque<f64>,
    timestamps: VecDeque<DateTime<Local>>,
    retention: RetentionPolicy,
    // x origin for charts, stays put when old samples are evicted
    first_timestamp: Option<DateTime<Local>>,
    total_received: u64,
}

impl SampleHistory {
    pub fn new(retention: RetentionPolicy) -> Self {
        let capacity = match retention {
            RetentionPolicy::Bounded { max_samples } => max_samples,
            RetentionPolicy::Unbounded => 0,
        };

        Self {
            ids: VecDeque::with_capacity(capacity),
            buffer_x: VecDeque::with_capacity(capacity),
            buffer_y: VecDeque::with_capacity(capacity),
            buffer_z: VecDeque::with_capacity(capacity),
            buffer_gx: VecDeque::with_capacity(capacity),
            buffer_gy: VecDeque::with_capacity(capacity),
            buffer_gz: VecDeque::with_capacity(capacity),
            timestamps: VecDeque::with_capacity(capacity),
            retention,
            first_timestamp: None,
            total_received: 0,
        }
    }

    pub fn push(&mut self, sample: &Sample) {
        self.ids.push_back(sample.measurement_id);
        self.buffer_x.push_back(sample.acceleration.x);
        self.buffer_y.push_back(sample.acceleration.y);
        self.buffer_z.push_back(sample.acceleration.z);
        self.buffer_gx.push_back(sample.gyroscope.x);
        self.buffer_gy.push_back(sample.gyroscope.y);
        self.buffer_gz.push_back(sample.gyroscope.z);
        self.timestamps.push_back(sample.timestamp);

        self.first_timestamp.get_or_insert(sample.timestamp);
        self.total_received += 1;

        if let RetentionPolicy::Bounded { max_samples } = self.retention {
            while self.ids.len() > max_samples {
                self.pop_oldest();
            }
        }
    }

    fn pop_oldest(&mut self) {
        self.ids.pop_front();
        self.buffer_x.pop_front();
        self.buffer_y.pop_front();
        self.buffer_z.pop_front();
        self.buffer_gx.pop_front();
        self.buffer_gy.pop_front();
        self.buffer_gz.pop_front();
        self.timestamps.pop_front();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Samples seen since startup, including evicted ones
    pub fn total_received(&self) -> u64 {
        self.total_received
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    pub fn acceleration(&self, axis: Axis) -> &VecDeque<f64> {
        match axis {
            Axis::X => &self.buffer_x,
            Axis::Y => &self.buffer_y,
            Axis::Z => &self.buffer_z,
        }
    }

    pub fn gyroscope(&self, axis: Axis) -> &VecDeque<f64> {
        match axis {
            Axis::X => &self.buffer_gx,
            Axis::Y => &self.buffer_gy,
            Axis::Z => &self.buffer_gz,
        }
    }

    pub fn timestamps(&self) -> &VecDeque<DateTime<Local>> {
        &self.timestamps
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Local>> {
        self.first_timestamp
    }

    /// Rebuilds the retained sample at `index` (0 is the oldest)
    pub fn get(&self, index: usize) -> Option<Sample> {
        Some(Sample::new(
            *self.ids.get(index)?,
            Axes::new(
                *self.buffer_x.get(index)?,
                *self.buffer_y.get(index)?,
                *self.buffer_z.get(index)?,
            ),
            Axes::new(
                *self.buffer_gx.get(index)?,
                *self.buffer_gy.get(index)?,
                *self.buffer_gz.get(index)?,
            ),
            *self.timestamps.get(index)?,
        ))
    }

    pub fn latest(&self) -> Option<Sample> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn latest_acceleration(&self, axis: Axis) -> Option<f64> {
        self.latest().map(|s| axis.pick(&s.acceleration))
    }
}
