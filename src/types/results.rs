use std::path::PathBuf;

/// Outcome of persisting a single sample
#[derive(Debug, Clone, PartialEq)]
pub struct PersistResult {
    pub measurement_id: u64,
    pub error: Option<String>,
}

impl PersistResult {
    pub fn stored(measurement_id: u64) -> Self {
        Self {
            measurement_id,
            error: None,
        }
    }

    pub fn failed(measurement_id: u64, error: String) -> Self {
        Self {
            measurement_id,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Answer to a row count request.
///
/// `inserted_this_run` is how many inserts had succeeded when the count
/// was taken, so the panel can tell rows from earlier runs apart from
/// the ones it is still hearing about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCount {
    pub total: usize,
    pub inserted_this_run: u64,
}

impl RowCount {
    /// Rows that were in the table before this run
    pub fn preexisting(&self) -> usize {
        self.total.saturating_sub(self.inserted_this_run as usize)
    }
}

/// Result of a CSV export
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub rows: usize,
    pub path: Option<PathBuf>,
    pub message: String,
}

impl ExportResult {
    pub fn success(rows: usize, path: PathBuf) -> Self {
        let message = format!("Exported {} rows to {}", rows, path.display());
        Self {
            rows,
            path: Some(path),
            message,
        }
    }

    pub fn no_data() -> Self {
        Self {
            rows: 0,
            path: None,
            message: "No measurements to export".to_string(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            rows: 0,
            path: None,
            message,
        }
    }
}
