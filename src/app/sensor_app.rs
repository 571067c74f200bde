use std::time::Duration;
use eframe::{egui, Frame};
use log::info;

use crate::config::ConfigManager;
use super::handlers::{ExportHandler, IngestHandler, PersistenceHandler};
use super::state::{AppChannels, AppState, TransportState};

pub struct SensorPanelApp {
    pub state: AppState,
    pub config: ConfigManager,
}

impl SensorPanelApp {
    pub fn new(channels: AppChannels, transport: TransportState, config: ConfigManager) -> Self {
        let state = AppState::new(channels, transport, config.get_config());

        let mut app = SensorPanelApp { state, config };
        PersistenceHandler::request_row_count(&mut app.state);

        info!(
            "Panel ready, serial {} ({})",
            app.state.transport.port,
            if app.state.transport.connected { "connected" } else { "unavailable" }
        );

        app
    }

    fn handle_channels(&mut self) {
        IngestHandler::handle_incoming_samples(&mut self.state);
        PersistenceHandler::handle_count_results(&mut self.state);
        PersistenceHandler::handle_persist_results(&mut self.state);
        ExportHandler::handle_export_results(&mut self.state);
    }
}

impl eframe::App for SensorPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        ctx.set_visuals(egui::Visuals::light());

        // new samples land before drawing so the frame shows them
        self.handle_channels();

        crate::app::ui::render_status_bar(self, ctx);
        crate::app::ui::render_bottom_status_bar(self, ctx);
        crate::app::ui::render_main_panel(self, ctx);
        crate::app::ui::render_warning_dialog(self, ctx);

        ctx.request_repaint_after(Duration::from_millis(150));
    }
}
