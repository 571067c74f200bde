pub mod handlers;
pub mod sensor_app;
pub mod state;
pub mod ui;

pub use sensor_app::SensorPanelApp;
pub use state::{AppChannels, TransportState};
