use std::collections::VecDeque;
use egui::Color32;
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};

use crate::config::{PlotConfig, RedrawPolicy};
use crate::history::{Axis, SampleHistory};
use crate::utils::{elapsed_seconds, format_fixed_width_y_label};

fn rgb(color: [u8; 3]) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

/// `[seconds since first sample, value]` pairs for one series.
///
/// `Full` uses the whole retained history, `Tail` only the newest points.
pub fn chart_points(history: &SampleHistory, series: &VecDeque<f64>, redraw: RedrawPolicy) -> Vec<[f64; 2]> {
    let Some(origin) = history.first_timestamp() else {
        return Vec::new();
    };

    let skip = match redraw {
        RedrawPolicy::Full => 0,
        RedrawPolicy::Tail { points } => series.len().saturating_sub(points),
    };

    history
        .timestamps()
        .iter()
        .zip(series.iter())
        .skip(skip)
        .map(|(ts, &value)| [elapsed_seconds(&origin, ts), value])
        .collect()
}

/// y range with 5% padding, never thinner than 0.1
pub fn value_bounds(points: &[[f64; 2]]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let (y_min, y_max) = points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), p| (min.min(p[1]), max.max(p[1])),
    );

    let mid = (y_min + y_max) / 2.0;
    let range = (y_max - y_min).max(0.1);
    let half = range / 2.0 + range * 0.05;
    Some((mid - half, mid + half))
}

/// The three acceleration charts, plus optional gyroscope charts.
/// Every frame redraws from the history according to the redraw policy.
pub struct AccelerationCharts {
    redraw: RedrawPolicy,
}

impl AccelerationCharts {
    pub fn new(redraw: RedrawPolicy) -> Self {
        Self { redraw }
    }

    pub fn redraw_policy(&self) -> RedrawPolicy {
        self.redraw
    }

    pub fn ui(&self, ui: &mut egui::Ui, history: &SampleHistory, config: &PlotConfig) {
        let acc_colors = [config.colors.x_axis, config.colors.y_axis, config.colors.z_axis];
        ui.columns(3, |columns| {
            for ((column, axis), color) in columns.iter_mut().zip(Axis::ALL).zip(acc_colors) {
                let title = format!("{} Acceleration", axis.label());
                self.plot_series(
                    column,
                    &title,
                    "Acceleration (m/s²)",
                    history,
                    history.acceleration(axis),
                    rgb(color),
                    config,
                );
            }
        });

        if config.show_gyroscope {
            ui.add_space(6.0);
            let gyro_colors = [config.colors.gyro_x, config.colors.gyro_y, config.colors.gyro_z];
            ui.columns(3, |columns| {
                for ((column, axis), color) in columns.iter_mut().zip(Axis::ALL).zip(gyro_colors) {
                    let title = format!("{} Gyroscope", axis.label());
                    self.plot_series(
                        column,
                        &title,
                        "Angular rate (°/s)",
                        history,
                        history.gyroscope(axis),
                        rgb(color),
                        config,
                    );
                }
            });
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn plot_series(
        &self,
        ui: &mut egui::Ui,
        title: &str,
        y_label: &str,
        history: &SampleHistory,
        series: &VecDeque<f64>,
        color: Color32,
        config: &PlotConfig,
    ) {
        ui.vertical_centered(|ui| {
            ui.strong(title);
        });

        let points = chart_points(history, series, self.redraw);
        let bounds = value_bounds(&points);
        let x_range = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first[0], last[0].max(first[0] + 1.0)),
            _ => (0.0, 1.0),
        };

        Plot::new(title)
            .height(config.plot_height)
            .x_axis_label("Time (s)")
            .y_axis_label(y_label)
            .x_axis_formatter(|v, _| format!("{:.0}s", v.value))
            .y_axis_formatter(|v, _| format_fixed_width_y_label(v.value))
            .allow_drag(config.allow_drag)
            .allow_zoom(config.allow_zoom)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                let Some((y_min, y_max)) = bounds else {
                    return;
                };

                if !config.allow_drag && !config.allow_zoom {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [x_range.0, y_min],
                        [x_range.1, y_max],
                    ));
                }

                plot_ui.line(
                    Line::new(title, PlotPoints::from(points))
                        .color(color)
                        .width(1.5),
                );
            });
    }
}
