use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use crossbeam_channel::tick;
use log::{debug, info, warn};

use crate::serial::LineSource;
use super::bus::SampleBus;
use super::parser::{DecodeError, SampleParser};

/// What a single poll did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Transport unavailable or no complete line buffered
    Idle,
    Accepted { measurement_id: u64, delivered: usize },
    Rejected { error: DecodeError, line: String },
}

/// Fixed period read → parse → publish loop.
///
/// Each tick handles at most one line. The driver owns the parser, so
/// the measurement counter lives exactly as long as the driver.
pub struct PollDriver<S: LineSource> {
    source: S,
    parser: SampleParser,
    bus: SampleBus,
    interval: Duration,
}

impl<S: LineSource> PollDriver<S> {
    pub fn new(source: S, bus: SampleBus, interval: Duration) -> Self {
        Self {
            source,
            parser: SampleParser::new(),
            bus,
            interval,
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.source.is_available() {
            return TickOutcome::Idle;
        }

        let Some(line) = self.source.try_read_line() else {
            return TickOutcome::Idle;
        };

        match self.parser.parse(&line) {
            Ok(sample) => {
                debug!(
                    "Measurement {}: acc=({:.2}, {:.2}, {:.2}) gyro=({:.2}, {:.2}, {:.2})",
                    sample.measurement_id,
                    sample.acceleration.x, sample.acceleration.y, sample.acceleration.z,
                    sample.gyroscope.x, sample.gyroscope.y, sample.gyroscope.z,
                );
                let delivered = self.bus.publish(&sample);
                TickOutcome::Accepted {
                    measurement_id: sample.measurement_id,
                    delivered,
                }
            }
            Err(error) => TickOutcome::Rejected { error, line },
        }
    }

    /// Ticks until shutdown is signalled or every subscriber has gone.
    /// Wakes at least every 100 ms to notice the shutdown flag.
    pub fn run(mut self, shutdown_signal: Arc<AtomicBool>) {
        let ticker = tick(self.interval);
        let wake = self.interval.min(Duration::from_millis(100));

        info!("Poll driver started, interval {:?}", self.interval);

        while !shutdown_signal.load(Ordering::Relaxed) {
            if ticker.recv_timeout(wake).is_err() {
                continue;
            }

            match self.tick() {
                TickOutcome::Accepted { measurement_id, delivered: 0 } => {
                    warn!("Measurement {} reached no subscriber", measurement_id);
                }
                TickOutcome::Rejected { error, line } => {
                    warn!("Invalid data received ({}), skipping: {:?}", error, line);
                }
                _ => {}
            }

            if self.bus.is_empty() {
                info!("No sample subscribers left, poll driver exiting");
                break;
            }
        }

        info!("Poll driver stopped after {} measurements", self.parser.last_id());
    }

    #[cfg(test)]
    pub fn parser(&self) -> &SampleParser {
        &self.parser
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }
}
