use duckdb::{Connection, Result as DuckResult};
use log::info;

pub const TABLE_NAME: &str = "data";

pub struct DatabaseSchema;

impl DatabaseSchema {
    /// Creates the measurement table if it does not exist yet.
    /// There is no migration step: an existing table is used as is.
    pub fn create_tables(conn: &Connection) -> DuckResult<()> {
        conn.execute(
            "CREATE SEQUENCE IF NOT EXISTS data_id_seq",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS data (
                id INTEGER PRIMARY KEY DEFAULT nextval('data_id_seq'),
                measurement_id BIGINT,
                x_acc DOUBLE,
                y_acc DOUBLE,
                z_acc DOUBLE,
                x_gyro DOUBLE,
                y_gyro DOUBLE,
                z_gyro DOUBLE,
                time VARCHAR
            )",
            [],
        )?;

        info!("Measurement table '{}' ready", TABLE_NAME);
        Ok(())
    }
}
