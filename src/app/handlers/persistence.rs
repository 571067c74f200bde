use crossbeam_channel::TryRecvError;
use log::{error, info, warn};

use crate::app::state::AppState;
use crate::types::DatabaseTask;

pub struct PersistenceHandler;

impl PersistenceHandler {
    pub fn handle_persist_results(state: &mut AppState) {
        loop {
            match state.database.persist_result_receiver.try_recv() {
                Ok(result) => {
                    if !result.is_success() {
                        warn!(
                            "Measurement {} is displayed but was not stored",
                            result.measurement_id
                        );
                    }
                    state.persistence.record(result);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !state.persistence.offline {
                        error!("Database thread is not running, new measurements are not stored");
                        state.persistence.offline = true;
                    }
                    break;
                }
            }
        }
    }

    pub fn request_row_count(state: &mut AppState) {
        let (response_sender, response_receiver) = crossbeam_channel::bounded(1);
        match state.database.db_task_sender.try_send(DatabaseTask::CountRows { response_sender }) {
            Ok(()) => state.persistence.count_receiver = Some(response_receiver),
            Err(e) => warn!("Failed to request stored row count: {}", e),
        }
    }

    pub fn handle_count_results(state: &mut AppState) {
        if let Some(receiver) = &state.persistence.count_receiver {
            if let Ok(count) = receiver.try_recv() {
                info!("Database holds {} stored measurements", count.total);
                state.persistence.record_row_count(count);
                state.persistence.count_receiver = None;
            }
        }
    }
}
