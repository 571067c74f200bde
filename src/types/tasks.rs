use std::path::PathBuf;

use super::{ExportResult, RowCount};

/// Requests served by the database handler thread
#[derive(Clone, Debug)]
pub enum DatabaseTask {
    Export {
        path: PathBuf,
        response_sender: crossbeam_channel::Sender<ExportResult>,
    },
    CountRows {
        response_sender: crossbeam_channel::Sender<RowCount>,
    },
}
