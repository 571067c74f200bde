use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use log::{error, info};

/// A background thread with its own stop flag
pub struct Worker {
    name: &'static str,
    handle: JoinHandle<()>,
    shutdown_signal: Arc<AtomicBool>,
}

impl Worker {
    pub fn spawn<F>(name: &'static str, body: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>) + Send + 'static,
    {
        let shutdown_signal = Arc::new(AtomicBool::new(false));
        let thread_signal = Arc::clone(&shutdown_signal);
        let handle = thread::spawn(move || body(thread_signal));
        Self {
            name,
            handle,
            shutdown_signal,
        }
    }

    fn stop(self) {
        self.shutdown_signal.store(true, Ordering::Relaxed);
        match self.handle.join() {
            Ok(()) => info!("{} thread shut down gracefully", self.name),
            Err(e) => error!("{} thread panicked: {:?}", self.name, e),
        }
    }
}

/// The poll driver and the database thread, stopped in dependency order.
///
/// The driver is joined first so its bus, and with it the persistence
/// sender, is gone before the database thread is told to stop. Every
/// sample the driver published is then stored before the database exits.
pub struct Workers {
    driver: Worker,
    database: Worker,
}

impl Workers {
    pub fn new(driver: Worker, database: Worker) -> Self {
        Self { driver, database }
    }

    pub fn shutdown(self) {
        self.driver.stop();
        self.database.stop();
    }
}
