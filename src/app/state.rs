use std::time::Instant;
use crossbeam_channel::{Receiver, Sender};

use crate::config::AppConfig;
use crate::history::SampleHistory;
use crate::plotter::AccelerationCharts;
use crate::types::{DatabaseTask, ExportResult, PersistResult, RowCount, Sample};

/// What the panel knows about the serial link
#[derive(Debug, Clone)]
pub struct TransportState {
    pub port: String,
    pub baud_rate: u32,
    pub connected: bool,
    /// Set once when the port could not be opened at startup
    pub startup_warning: Option<String>,
    pub warning_acknowledged: bool,
    pub last_sample_at: Option<Instant>,
}

impl TransportState {
    pub fn new(port: String, baud_rate: u32, startup_warning: Option<String>) -> Self {
        Self {
            port,
            baud_rate,
            connected: startup_warning.is_none(),
            startup_warning,
            warning_acknowledged: false,
            last_sample_at: None,
        }
    }

    pub fn should_show_warning(&self) -> bool {
        self.startup_warning.is_some() && !self.warning_acknowledged
    }
}

/// Persistence outcomes reported by the database thread
#[derive(Debug, Clone, Default)]
pub struct PersistenceState {
    pub stored: u64,
    pub failed: u64,
    pub last_error: Option<String>,
    /// Rows from earlier runs, once the database has answered the count request
    pub preexisting_rows: Option<usize>,
    pub count_receiver: Option<Receiver<RowCount>>,
    /// The database thread has gone away; nothing is stored from here on
    pub offline: bool,
}

impl PersistenceState {
    pub fn record(&mut self, result: PersistResult) {
        match result.error {
            None => self.stored += 1,
            Some(error) => {
                self.failed += 1;
                self.last_error = Some(format!("#{}: {}", result.measurement_id, error));
            }
        }
    }

    pub fn record_row_count(&mut self, count: RowCount) {
        self.preexisting_rows = Some(count.preexisting());
    }

    /// Rows in the table as far as the panel knows
    pub fn db_rows(&self) -> Option<usize> {
        self.preexisting_rows.map(|rows| rows + self.stored as usize)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportState {
    pub export_status: String,
    pub export_result_receiver: Option<Receiver<ExportResult>>,
}

#[derive(Debug, Clone)]
pub struct DatabaseState {
    pub path: String,
    pub export_dir: String,
    pub db_task_sender: Sender<DatabaseTask>,
    pub persist_result_receiver: Receiver<PersistResult>,
}

/// Channel ends the UI thread owns
pub struct AppChannels {
    pub sample_receiver: Receiver<Sample>,
    pub db_task_sender: Sender<DatabaseTask>,
    pub persist_result_receiver: Receiver<PersistResult>,
}

pub struct AppState {
    pub history: SampleHistory,
    pub charts: AccelerationCharts,
    pub sample_receiver: Receiver<Sample>,
    pub transport: TransportState,
    pub persistence: PersistenceState,
    pub export: ExportState,
    pub database: DatabaseState,
}

impl AppState {
    pub fn new(channels: AppChannels, transport: TransportState, config: &AppConfig) -> Self {
        Self {
            history: SampleHistory::new(config.history.retention),
            charts: AccelerationCharts::new(config.history.redraw),
            sample_receiver: channels.sample_receiver,
            transport,
            persistence: PersistenceState::default(),
            export: ExportState::default(),
            database: DatabaseState {
                path: config.database.path.clone(),
                export_dir: config.database.export_dir.clone(),
                db_task_sender: channels.db_task_sender,
                persist_result_receiver: channels.persist_result_receiver,
            },
        }
    }

    pub fn get_status_summary(&self) -> &'static str {
        if !self.transport.connected {
            "No device"
        } else if self.transport.last_sample_at.is_none() {
            "Waiting for data"
        } else {
            "Receiving"
        }
    }

    /// Samples shown whose persist outcome has not arrived yet
    pub fn unpersisted_count(&self) -> u64 {
        self.history
            .total_received()
            .saturating_sub(self.persistence.stored + self.persistence.failed)
    }
}
