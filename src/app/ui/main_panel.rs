use eframe::egui;

use crate::app::sensor_app::SensorPanelApp;
use super::measurement_table::render_measurement_table;

pub fn render_main_panel(app: &mut SensorPanelApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        app.state.charts.ui(ui, &app.state.history, &app.config.get_config().plot);

        ui.add_space(10.0);
        ui.separator();

        render_measurement_table(ui, &app.state.history);
    });
}
