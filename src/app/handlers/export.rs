use log::info;

use crate::app::state::AppState;
use crate::database::default_export_path;
use crate::types::DatabaseTask;

pub struct ExportHandler;

impl ExportHandler {
    pub fn request_export(state: &mut AppState) {
        if state.export.export_result_receiver.is_some() {
            state.export.export_status = "Export already running".to_string();
            return;
        }

        let path = default_export_path(&state.database.export_dir);
        let (response_sender, response_receiver) = crossbeam_channel::bounded(1);
        let task = DatabaseTask::Export {
            path,
            response_sender,
        };

        match state.database.db_task_sender.try_send(task) {
            Ok(()) => {
                state.export.export_status = "Exporting measurements...".to_string();
                state.export.export_result_receiver = Some(response_receiver);
            }
            Err(e) => {
                state.export.export_status = format!("Failed to start export: {}", e);
            }
        }
    }

    pub fn handle_export_results(state: &mut AppState) {
        if let Some(receiver) = &state.export.export_result_receiver {
            if let Ok(result) = receiver.try_recv() {
                match &result.path {
                    Some(path) => info!("Exported {} rows to {}", result.rows, path.display()),
                    None => info!("Export finished without a file: {}", result.message),
                }
                state.export.export_status = result.message;
                state.export.export_result_receiver = None;
            }
        }
    }
}
