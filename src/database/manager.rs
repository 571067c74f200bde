use duckdb::{params, Connection, Result as DuckResult};
use chrono::{Local, NaiveDateTime, TimeZone};
use std::fs;
use std::path::Path;
use log::{error, info};

use crate::config::DatabaseConfig;
use crate::types::{Axes, Sample, TIMESTAMP_FORMAT};
use super::schema::DatabaseSchema;

pub struct DatabaseManager {
    conn: Connection,
}

impl DatabaseManager {
    pub fn new(config: &DatabaseConfig) -> DuckResult<Self> {
        let db_path = Path::new(&config.path);

        if config.auto_create_dir {
            if let Some(dir) = db_path.parent() {
                if let Err(e) = fs::create_dir_all(dir) {
                    error!("Failed to create database directory {}: {}", dir.display(), e);
                }
            }
        }

        let conn = Connection::open(db_path)?;
        info!("Database connection established at: {}", db_path.display());

        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> DuckResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> DuckResult<Self> {
        DatabaseSchema::create_tables(&conn)?;
        Ok(DatabaseManager { conn })
    }

    pub fn insert_sample(&self, sample: &Sample) -> DuckResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO data (measurement_id, x_acc, y_acc, z_acc, x_gyro, y_gyro, z_gyro, time)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )?;

        stmt.execute(params![
            sample.measurement_id as i64,
            sample.acceleration.x,
            sample.acceleration.y,
            sample.acceleration.z,
            sample.gyroscope.x,
            sample.gyroscope.y,
            sample.gyroscope.z,
            sample.timestamp_string(),
        ])?;

        Ok(())
    }

    pub fn count_rows(&self) -> DuckResult<usize> {
        self.conn.query_row("SELECT COUNT(*) FROM data", [], |row| {
            Ok(row.get::<_, i64>(0)? as usize)
        })
    }

    /// All persisted samples in insertion order
    pub fn load_samples(&self) -> DuckResult<Vec<Sample>> {
        let mut stmt = self.conn.prepare(
            "SELECT measurement_id, x_acc, y_acc, z_acc, x_gyro, y_gyro, z_gyro, time
             FROM data ORDER BY id"
        )?;

        let rows = stmt.query_map([], |row| {
            let time: String = row.get(7)?;
            let naive = NaiveDateTime::parse_from_str(&time, TIMESTAMP_FORMAT)
                .map_err(|e| duckdb::Error::FromSqlConversionFailure(7, duckdb::types::Type::Text, Box::new(e)))?;
            // rows keep wall clock time only; a repeated DST hour resolves to its first occurrence
            let timestamp = Local
                .from_local_datetime(&naive)
                .earliest()
                .ok_or_else(|| {
                    duckdb::Error::FromSqlConversionFailure(
                        7,
                        duckdb::types::Type::Text,
                        format!("local time {} does not exist", time).into(),
                    )
                })?;

            Ok(Sample::new(
                row.get::<_, i64>(0)? as u64,
                Axes::new(row.get(1)?, row.get(2)?, row.get(3)?),
                Axes::new(row.get(4)?, row.get(5)?, row.get(6)?),
                timestamp,
            ))
        })?;

        let mut samples = Vec::new();
        for row in rows {
            samples.push(row?);
        }

        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::local_time;

    fn sample(id: u64, x: f64) -> Sample {
        let ts = local_time(2024, 2, 29, 23, 59, 59);
        Sample::new(id, Axes::new(x, 0.0, 9.81), Axes::new(1.0, 2.0, 0.0), ts)
    }

    #[test]
    fn empty_table_after_open() {
        let db = DatabaseManager::open_in_memory().expect("open");
        assert_eq!(db.count_rows().expect("count"), 0);
    }

    #[test]
    fn insert_then_load_keeps_order_and_values() {
        let db = DatabaseManager::open_in_memory().expect("open");
        for id in 1..=3 {
            db.insert_sample(&sample(id, id as f64 * 0.5)).expect("insert");
        }

        let loaded = db.load_samples().expect("load");
        assert_eq!(db.count_rows().expect("count"), 3);
        assert_eq!(loaded, vec![sample(1, 0.5), sample(2, 1.0), sample(3, 1.5)]);
    }

    #[test]
    fn reopening_a_file_keeps_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = DatabaseConfig {
            path: dir.path().join("nested").join("sensor_data.db").to_string_lossy().into_owned(),
            ..DatabaseConfig::default()
        };

        {
            let db = DatabaseManager::new(&config).expect("open");
            db.insert_sample(&sample(1, 1.0)).expect("insert");
        }

        let db = DatabaseManager::new(&config).expect("reopen");
        db.insert_sample(&sample(1, 2.0)).expect("insert");
        assert_eq!(db.count_rows().expect("count"), 2);
    }
}
