use eframe::egui;
use log::{error, info};

use crate::app::handlers::ExportHandler;
use crate::app::sensor_app::SensorPanelApp;
use crate::config::{RedrawPolicy, RetentionPolicy};
use crate::history::Axis;
use crate::utils::format_reading;

fn retention_label(policy: RetentionPolicy) -> String {
    match policy {
        RetentionPolicy::Unbounded => "all".to_string(),
        RetentionPolicy::Bounded { max_samples } => format!("last {}", max_samples),
    }
}

fn redraw_label(policy: RedrawPolicy) -> String {
    match policy {
        RedrawPolicy::Full => "full".to_string(),
        RedrawPolicy::Tail { points } => format!("tail {}", points),
    }
}

pub fn render_status_bar(app: &mut SensorPanelApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("status_bar")
        .min_height(40.0)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("Status:");

                let status_text = app.state.get_status_summary();
                let status_color = match status_text {
                    "Receiving" => egui::Color32::from_rgb(0, 150, 0),
                    "Waiting for data" => egui::Color32::from_rgb(255, 165, 0),
                    _ => egui::Color32::from_rgb(150, 0, 0),
                };
                ui.colored_label(status_color, status_text);

                ui.separator();
                ui.label(format!(
                    "Port: {} @ {} baud",
                    app.state.transport.port, app.state.transport.baud_rate
                ));

                ui.separator();
                ui.label(format!(
                    "Samples: {} (showing {})",
                    app.state.history.total_received(),
                    app.state.history.len()
                ));

                if app.state.history.latest().is_some() {
                    ui.separator();
                    let latest: Vec<String> = Axis::ALL
                        .iter()
                        .filter_map(|axis| {
                            app.state
                                .history
                                .latest_acceleration(*axis)
                                .map(|v| format!("{}={}", axis.label(), format_reading(v)))
                        })
                        .collect();
                    ui.label(format!("Latest: {}", latest.join(" ")));
                }

                ui.separator();
                ui.label(format!(
                    "History: {} | Redraw: {}",
                    retention_label(app.state.history.retention()),
                    redraw_label(app.state.charts.redraw_policy())
                ));

                ui.separator();
                let mut show_gyroscope = app.config.get_config().plot.show_gyroscope;
                if ui.checkbox(&mut show_gyroscope, "Show Gyroscope").changed() {
                    app.config.get_config_mut().plot.show_gyroscope = show_gyroscope;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("📤 Export CSV").clicked() {
                        ExportHandler::request_export(&mut app.state);
                    }

                    if ui.button("💾 Save Settings").clicked() {
                        match app.config.save() {
                            Ok(path) => info!("Settings saved to {}", path.display()),
                            Err(e) => error!("Failed to save settings: {}", e),
                        }
                    }
                });
            });
            ui.add_space(5.0);
        });
}

pub fn render_bottom_status_bar(app: &mut SensorPanelApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("bottom_status_bar")
        .min_height(25.0)
        .show(ctx, |ui| {
            ui.add_space(3.0);
            ui.horizontal(|ui| {
                ui.label(format!("DB: DuckDB ({})", app.state.database.path));
                let persistence = &app.state.persistence;
                if persistence.offline {
                    ui.colored_label(egui::Color32::from_rgb(200, 0, 0), "offline");
                }
                ui.separator();

                ui.label(format!("Stored: {}", persistence.stored));
                if let Some(rows) = persistence.db_rows() {
                    ui.label(format!("(table rows: {})", rows));
                }

                let unpersisted = app.state.unpersisted_count();
                if unpersisted > 0 {
                    ui.separator();
                    ui.label(format!("Pending: {}", unpersisted));
                }

                if persistence.failed > 0 {
                    ui.separator();
                    ui.colored_label(
                        egui::Color32::from_rgb(200, 0, 0),
                        format!("Not stored: {}", persistence.failed),
                    );
                    if let Some(error) = &persistence.last_error {
                        ui.colored_label(egui::Color32::from_rgb(200, 0, 0), error);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if !app.state.export.export_status.is_empty() {
                        ui.colored_label(egui::Color32::from_rgb(0, 150, 100), &app.state.export.export_status);
                    }
                });
            });
            ui.add_space(3.0);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_labels() {
        assert_eq!(retention_label(RetentionPolicy::Unbounded), "all");
        assert_eq!(retention_label(RetentionPolicy::Bounded { max_samples: 60 }), "last 60");
        assert_eq!(redraw_label(RedrawPolicy::Full), "full");
        assert_eq!(redraw_label(RedrawPolicy::Tail { points: 30 }), "tail 30");
    }
}
