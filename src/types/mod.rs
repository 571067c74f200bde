pub mod sample;
pub mod results;
pub mod tasks;

pub use sample::{Axes, Sample, TIMESTAMP_FORMAT};
pub use results::{ExportResult, PersistResult, RowCount};
pub use tasks::DatabaseTask;

#[cfg(test)]
pub use sample::local_time;
