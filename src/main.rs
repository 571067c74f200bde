mod app;
mod config;
mod database;
mod history;
mod ingest;
mod logger;
mod plotter;
mod serial;
mod types;
mod utils;
mod workers;

use crossbeam_channel::bounded;
use dotenv::dotenv;
use eframe::egui;
use log::{error, info};

use app::{AppChannels, SensorPanelApp, TransportState};
use config::ConfigManager;
use database::run_database_handler;
use ingest::{PollDriver, SampleBus};
use serial::Transport;
use workers::{Worker, Workers};

fn main() {
    dotenv().ok();

    let mut config_manager = ConfigManager::load_or_default();
    let config = config_manager.get_config().clone();

    logger::init_logger(&config.logging.level);
    info!("Application starting");
    config_manager.log_load_notes();

    let (ui_sample_sender, ui_sample_receiver) = bounded(config.channels.sample_channel_capacity);
    let (db_sample_sender, db_sample_receiver) = bounded(config.channels.sample_channel_capacity);
    let (db_task_sender, db_task_receiver) = bounded(config.channels.db_task_channel_capacity);
    let (persist_result_sender, persist_result_receiver) = bounded(config.channels.persist_result_channel_capacity);

    let db_config = config.database.clone();
    let database = Worker::spawn("Database", move |db_shutdown| {
        if let Err(e) = run_database_handler(
            db_config,
            db_sample_receiver,
            db_task_receiver,
            persist_result_sender,
            db_shutdown,
        ) {
            error!("Database thread failed: {}", e);
        }
    });

    let (transport, transport_error) = Transport::open_or_unavailable(&config.serial);
    let transport_state = TransportState::new(
        config.serial.port.clone(),
        config.serial.baud_rate,
        transport_error.map(|e| e.to_string()),
    );

    // presentation first, then persistence
    let mut bus = SampleBus::new();
    bus.subscribe("presentation", ui_sample_sender);
    bus.subscribe("persistence", db_sample_sender);

    let poll_driver = PollDriver::new(transport, bus, config.serial.poll_interval());
    let driver = Worker::spawn("Poll driver", move |driver_shutdown| poll_driver.run(driver_shutdown));
    let workers = Workers::new(driver, database);

    let options = eframe::NativeOptions {
        vsync: config.window.vsync,
        hardware_acceleration: if config.window.hardware_acceleration {
            eframe::HardwareAcceleration::Preferred
        } else {
            eframe::HardwareAcceleration::Off
        },
        renderer: eframe::Renderer::Glow,
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window.title.clone())
            .with_inner_size([config.window.width, config.window.height])
            .with_resizable(config.window.resizable),
        ..Default::default()
    };

    let channels = AppChannels {
        sample_receiver: ui_sample_receiver,
        db_task_sender,
        persist_result_receiver,
    };
    let panel = SensorPanelApp::new(channels, transport_state, config_manager);

    let gui_result = eframe::run_native(
        &config.window.title,
        options,
        Box::new(|_cc| Ok(Box::new(panel))),
    );

    info!("GUI closed, signaling worker threads to shutdown");
    workers.shutdown();

    if let Err(e) = gui_result {
        error!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
