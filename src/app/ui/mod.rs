pub mod status_bar;
pub mod main_panel;
pub mod measurement_table;
pub mod warning_dialog;

pub use status_bar::{render_bottom_status_bar, render_status_bar};
pub use main_panel::render_main_panel;
pub use warning_dialog::render_warning_dialog;
