use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use crossbeam_channel::{never, select, Receiver, Sender};
use log::{debug, error, info, warn};

use crate::config::DatabaseConfig;
use crate::types::{DatabaseTask, ExportResult, PersistResult, RowCount, Sample};
use super::export::export_measurements_to_csv;
use super::manager::DatabaseManager;

/// Database thread: persists published samples and serves UI requests.
///
/// A failed insert is logged and reported back; it never stops the loop
/// or touches what the panel already shows.
pub fn run_database_handler(
    config: DatabaseConfig,
    sample_receiver: Receiver<Sample>,
    task_receiver: Receiver<DatabaseTask>,
    result_sender: Sender<PersistResult>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    // the connection is created on this thread and never leaves it
    let db_manager = match DatabaseManager::new(&config) {
        Ok(db) => {
            info!("Database handler thread: DuckDB initialized successfully");
            db
        }
        Err(e) => {
            error!("Database handler thread: Failed to initialize DuckDB: {}", e);
            return Err(e.into());
        }
    };

    serve(&db_manager, &sample_receiver, &task_receiver, &result_sender, &shutdown_signal);

    info!("Database handler thread stopped");
    Ok(())
}

fn serve(
    db_manager: &DatabaseManager,
    sample_receiver: &Receiver<Sample>,
    task_receiver: &Receiver<DatabaseTask>,
    result_sender: &Sender<PersistResult>,
    shutdown_signal: &AtomicBool,
) {
    let no_tasks = never();
    let mut tasks_open = true;
    let mut inserted: u64 = 0;

    // samples are stored until the publisher is gone, even after the panel closed
    while !shutdown_signal.load(Ordering::Relaxed) {
        let tasks = if tasks_open { task_receiver } else { &no_tasks };

        select! {
            recv(sample_receiver) -> msg => match msg {
                Ok(sample) => persist(db_manager, &sample, result_sender, &mut inserted),
                Err(_) => {
                    info!("Sample channel disconnected, database handler exiting");
                    break;
                }
            },
            recv(tasks) -> msg => match msg {
                Ok(task) => handle_task(db_manager, task, inserted),
                Err(_) => {
                    info!("Task channel disconnected, no more requests will be served");
                    tasks_open = false;
                }
            },
            default(Duration::from_millis(100)) => {}
        }
    }

    let pending: Vec<Sample> = sample_receiver.try_iter().collect();
    if !pending.is_empty() {
        info!("Persisting {} pending measurements before exit", pending.len());
        for sample in &pending {
            persist(db_manager, sample, result_sender, &mut inserted);
        }
    }
}

fn persist(
    db_manager: &DatabaseManager,
    sample: &Sample,
    result_sender: &Sender<PersistResult>,
    inserted: &mut u64,
) {
    let result = handle_insert(db_manager, sample);
    if result.is_success() {
        *inserted += 1;
    }
    // the panel may already be closed; the row is stored either way
    if result_sender.send(result).is_err() {
        debug!("No one is listening for the result of measurement {}", sample.measurement_id);
    }
}

fn handle_insert(db_manager: &DatabaseManager, sample: &Sample) -> PersistResult {
    match db_manager.insert_sample(sample) {
        Ok(()) => PersistResult::stored(sample.measurement_id),
        Err(e) => {
            error!("Failed to persist measurement {}: {}", sample.measurement_id, e);
            PersistResult::failed(sample.measurement_id, e.to_string())
        }
    }
}

fn handle_task(db_manager: &DatabaseManager, task: DatabaseTask, inserted: u64) {
    match task {
        DatabaseTask::Export { path, response_sender } => {
            let result = handle_export_request(db_manager, &path);
            if response_sender.send(result).is_err() {
                warn!("Export requester went away before the result was ready");
            }
        }
        DatabaseTask::CountRows { response_sender } => {
            match db_manager.count_rows() {
                Ok(total) => {
                    let _ = response_sender.send(RowCount {
                        total,
                        inserted_this_run: inserted,
                    });
                }
                Err(e) => error!("Failed to count stored measurements: {}", e),
            }
        }
    }
}

pub fn handle_export_request(db_manager: &DatabaseManager, path: &Path) -> ExportResult {
    match export_measurements_to_csv(db_manager, path) {
        Ok(0) => ExportResult::no_data(),
        Ok(rows) => ExportResult::success(rows, path.to_path_buf()),
        Err(e) => {
            error!("Export failed: {}", e);
            ExportResult::error(format!("Export failed: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{local_time, Axes};
    use crossbeam_channel::{bounded, unbounded};
    use std::thread;

    fn sample(id: u64) -> Sample {
        let ts = local_time(2024, 4, 2, 9, 0, id as u32);
        Sample::new(id, Axes::new(id as f64, 0.0, 9.81), Axes::default(), ts)
    }

    #[test]
    fn persists_samples_and_reports_each_one() {
        let db = DatabaseManager::open_in_memory().expect("open");
        let (sample_tx, sample_rx) = unbounded();
        let (_task_tx, task_rx) = unbounded::<DatabaseTask>();
        let (result_tx, result_rx) = unbounded();

        sample_tx.send(sample(1)).expect("send");
        sample_tx.send(sample(2)).expect("send");
        drop(sample_tx);

        serve(&db, &sample_rx, &task_rx, &result_tx, &AtomicBool::new(false));

        let results: Vec<PersistResult> = result_rx.try_iter().collect();
        assert_eq!(results, vec![PersistResult::stored(1), PersistResult::stored(2)]);
        assert_eq!(db.count_rows().expect("count"), 2);
    }

    #[test]
    fn pending_samples_are_flushed_on_shutdown() {
        let db = DatabaseManager::open_in_memory().expect("open");
        let (sample_tx, sample_rx) = unbounded();
        let (_task_tx, task_rx) = unbounded::<DatabaseTask>();
        let (result_tx, _result_rx) = unbounded();

        sample_tx.send(sample(1)).expect("send");
        serve(&db, &sample_rx, &task_rx, &result_tx, &AtomicBool::new(true));

        assert_eq!(db.count_rows().expect("count"), 1);
    }

    #[test]
    fn answers_count_requests() {
        let db = DatabaseManager::open_in_memory().expect("open");
        db.insert_sample(&sample(1)).expect("insert");

        let (count_tx, count_rx) = bounded(1);
        handle_task(&db, DatabaseTask::CountRows { response_sender: count_tx }, 0);
        assert_eq!(count_rx.try_recv(), Ok(RowCount { total: 1, inserted_this_run: 0 }));
    }

    #[test]
    fn keeps_storing_after_the_panel_is_gone() {
        let db = DatabaseManager::open_in_memory().expect("open");
        let (sample_tx, sample_rx) = unbounded();
        let (task_tx, task_rx) = unbounded::<DatabaseTask>();
        let (result_tx, result_rx) = unbounded();
        drop(task_tx);
        drop(result_rx);

        for id in 1..=3 {
            sample_tx.send(sample(id)).expect("send");
        }
        drop(sample_tx);

        serve(&db, &sample_rx, &task_rx, &result_tx, &AtomicBool::new(false));
        assert_eq!(db.count_rows().expect("count"), 3);
    }

    #[test]
    fn export_of_empty_table_reports_no_data() {
        let db = DatabaseManager::open_in_memory().expect("open");
        let dir = tempfile::tempdir().expect("tempdir");
        let result = handle_export_request(&db, &dir.path().join("x.csv"));
        assert_eq!(result.rows, 0);
        assert!(result.path.is_none());
    }

    #[test]
    fn handler_thread_uses_configured_file_and_stops_on_signal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = DatabaseConfig {
            path: dir.path().join("panel.db").to_string_lossy().into_owned(),
            ..DatabaseConfig::default()
        };
        let (sample_tx, sample_rx) = unbounded();
        let (task_tx, task_rx) = unbounded();
        let (result_tx, result_rx) = unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_shutdown = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            run_database_handler(config, sample_rx, task_rx, result_tx, thread_shutdown)
                .map_err(|e| e.to_string())
        });

        sample_tx.send(sample(7)).expect("send");
        let result = result_rx.recv_timeout(Duration::from_secs(10)).expect("persist result");
        assert!(result.is_success());

        let (count_tx, count_rx) = bounded(1);
        task_tx.send(DatabaseTask::CountRows { response_sender: count_tx }).expect("send");
        assert_eq!(
            count_rx.recv_timeout(Duration::from_secs(10)),
            Ok(RowCount { total: 1, inserted_this_run: 1 })
        );

        shutdown.store(true, Ordering::Relaxed);
        assert!(handle.join().expect("join").is_ok());
    }
}
