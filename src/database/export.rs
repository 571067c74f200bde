use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use chrono::Local;
use log::info;

use super::manager::DatabaseManager;

pub const CSV_HEADER: &str = "measurement_id,x_acc,y_acc,z_acc,x_gyro,y_gyro,z_gyro,time";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to read measurements: {0}")]
    Database(#[from] duckdb::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `<export_dir>/measurements_<local time>.csv`
pub fn default_export_path(export_dir: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    Path::new(export_dir).join(format!("measurements_{}.csv", stamp))
}

/// Writes every persisted measurement to `path`, returning the row count.
/// Nothing is written when the table is empty.
pub fn export_measurements_to_csv(db_manager: &DatabaseManager, path: &Path) -> Result<usize, ExportError> {
    let samples = db_manager.load_samples()?;
    if samples.is_empty() {
        return Ok(0);
    }

    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    writeln!(writer, "{}", CSV_HEADER).map_err(io_err)?;

    for sample in &samples {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            sample.measurement_id,
            sample.acceleration.x,
            sample.acceleration.y,
            sample.acceleration.z,
            sample.gyroscope.x,
            sample.gyroscope.y,
            sample.gyroscope.z,
            sample.timestamp_string(),
        )
        .map_err(io_err)?;
    }

    writer.flush().map_err(io_err)?;

    info!("Exported {} measurements to {}", samples.len(), path.display());
    Ok(samples.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{local_time, Axes, Sample};

    #[test]
    fn writes_header_and_one_line_per_row() {
        let db = DatabaseManager::open_in_memory().expect("open");
        let ts = local_time(2024, 6, 1, 8, 30, 0);
        db.insert_sample(&Sample::new(1, Axes::new(1.0, 2.0, 3.0), Axes::new(1.0, 2.0, 0.0), ts))
            .expect("insert");
        db.insert_sample(&Sample::new(2, Axes::new(-1.5, 0.0, 9.75), Axes::new(0.0, 0.0, -1.0), ts))
            .expect("insert");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out").join("export.csv");
        let rows = export_measurements_to_csv(&db, &path).expect("export");

        let content = fs::read_to_string(&path).expect("read back");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(rows, 2);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1,1,2,3,1,2,0,2024-06-01 08:30:00");
        assert_eq!(lines[2], "2,-1.5,0,9.75,0,0,-1,2024-06-01 08:30:00");
    }

    #[test]
    fn empty_table_writes_nothing() {
        let db = DatabaseManager::open_in_memory().expect("open");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("export.csv");

        assert_eq!(export_measurements_to_csv(&db, &path).expect("export"), 0);
        assert!(!path.exists());
    }

    #[test]
    fn default_path_lives_in_export_dir() {
        let path = default_export_path("data_export");
        assert!(path.starts_with("data_export"));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
    }
}
