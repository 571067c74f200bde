pub mod ingest;
pub mod persistence;
pub mod export;

pub use ingest::IngestHandler;
pub use persistence::PersistenceHandler;
pub use export::ExportHandler;

#[cfg(test)]
pub mod test_support {
    use crossbeam_channel::{unbounded, Receiver, Sender};

    use crate::app::state::{AppChannels, AppState, TransportState};
    use crate::config::AppConfig;
    use crate::types::{DatabaseTask, PersistResult, Sample};

    /// The far ends of the channels an `AppState` is built from
    pub struct FarEnds {
        pub sample_sender: Sender<Sample>,
        pub task_receiver: Receiver<DatabaseTask>,
        pub persist_sender: Sender<PersistResult>,
    }

    pub fn state_with_channels(startup_warning: Option<String>) -> (AppState, FarEnds) {
        let (sample_sender, sample_receiver) = unbounded();
        let (db_task_sender, task_receiver) = unbounded();
        let (persist_sender, persist_result_receiver) = unbounded();

        let config = AppConfig::default();
        let transport = TransportState::new(
            config.serial.port.clone(),
            config.serial.baud_rate,
            startup_warning,
        );
        let state = AppState::new(
            AppChannels {
                sample_receiver,
                db_task_sender,
                persist_result_receiver,
            },
            transport,
            &config,
        );

        (
            state,
            FarEnds {
                sample_sender,
                task_receiver,
                persist_sender,
            },
        )
    }
}
