use eframe::egui;

use crate::app::sensor_app::SensorPanelApp;

/// One-time notice that the serial port could not be opened
pub fn render_warning_dialog(app: &mut SensorPanelApp, ctx: &egui::Context) {
    if !app.state.transport.should_show_warning() {
        return;
    }

    let detail = app.state.transport.startup_warning.clone().unwrap_or_default();

    egui::Window::new("Serial Port Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Sensor is not connected. Please check the connection.");
            ui.add_space(5.0);
            ui.colored_label(egui::Color32::GRAY, detail);
            ui.add_space(10.0);
            ui.label("The panel keeps running, but no new measurements will arrive.");
            ui.add_space(10.0);

            if ui.button("OK").clicked() {
                app.state.transport.warning_acknowledged = true;
            }
        });
}
