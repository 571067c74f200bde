use eframe::egui;

use crate::history::SampleHistory;
use crate::types::Sample;
use crate::utils::format_reading;

pub const TABLE_HEADERS: [&str; 8] = [
    "Measurement ID",
    "X Acceleration (m/s²)",
    "Y Acceleration (m/s²)",
    "Z Acceleration (m/s²)",
    "X Gyroscope (°/s)",
    "Y Gyroscope (°/s)",
    "Z Gyroscope (°/s)",
    "Date",
];

const ROW_HEIGHT: f32 = 18.0;

pub fn table_row(sample: &Sample) -> [String; 8] {
    [
        sample.measurement_id.to_string(),
        format_reading(sample.acceleration.x),
        format_reading(sample.acceleration.y),
        format_reading(sample.acceleration.z),
        format_reading(sample.gyroscope.x),
        format_reading(sample.gyroscope.y),
        format_reading(sample.gyroscope.z),
        sample.timestamp_string(),
    ]
}

/// Append-only view of the retained samples, newest row at the bottom.
/// Only visible rows are laid out.
pub fn render_measurement_table(ui: &mut egui::Ui, history: &SampleHistory) {
    let column_width = (ui.available_width() / TABLE_HEADERS.len() as f32).max(60.0);

    ui.horizontal(|ui| {
        for header in TABLE_HEADERS {
            ui.add_sized([column_width, ROW_HEIGHT], egui::Label::new(egui::RichText::new(header).strong()));
        }
    });
    ui.separator();

    if history.is_empty() {
        ui.colored_label(egui::Color32::GRAY, "No measurements yet");
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show_rows(ui, ROW_HEIGHT, history.len(), |ui, row_range| {
            for index in row_range {
                let Some(sample) = history.get(index) else {
                    continue;
                };
                ui.horizontal(|ui| {
                    for cell in table_row(&sample) {
                        ui.add_sized([column_width, ROW_HEIGHT], egui::Label::new(cell));
                    }
                });
            }
        });
}
