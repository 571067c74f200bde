use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::{log, Level};

// Application configuration.
// Every section has defaults, so a partial TOML file is enough.

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "imu_panel.toml";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "IMU_PANEL_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub serial: SerialConfig,
    pub database: DatabaseConfig,
    pub history: HistoryConfig,
    pub plot: PlotConfig,
    pub channels: ChannelConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
    pub hardware_acceleration: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    /// Upper bound for a single read from the port
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Partial lines longer than this are discarded
    pub max_line_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub auto_create_dir: bool,
    pub export_dir: String,
}

/// How much sample history the panel keeps in memory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetentionPolicy {
    Unbounded,
    Bounded { max_samples: usize },
}

/// Which part of the history a chart draws each frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RedrawPolicy {
    Full,
    Tail { points: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub retention: RetentionPolicy,
    pub redraw: RedrawPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    pub plot_height: f32,
    pub show_gyroscope: bool,
    pub allow_drag: bool,
    pub allow_zoom: bool,
    pub colors: PlotColors,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotColors {
    pub x_axis: [u8; 3],
    pub y_axis: [u8; 3],
    pub z_axis: [u8; 3],
    pub gyro_x: [u8; 3],
    pub gyro_y: [u8; 3],
    pub gyro_z: [u8; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelConfig {
    pub sample_channel_capacity: usize,
    pub db_task_channel_capacity: usize,
    pub persist_result_channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter used when RUST_LOG is not set
    pub level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            title: "Acceleration and Gyroscope Data Analysis".to_string(),
            resizable: true,
            vsync: true,
            hardware_acceleration: true,
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        let port = if cfg!(windows) { "COM3" } else { "/dev/ttyUSB0" };
        Self {
            port: port.to_string(),
            baud_rate: 9600,
            timeout_ms: 1000,
            poll_interval_ms: 1000,
            max_line_length: 256,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "sensor_data.db".to_string(),
            auto_create_dir: true,
            export_dir: "data_export".to_string(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention: RetentionPolicy::Unbounded,
            redraw: RedrawPolicy::Full,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            plot_height: 220.0,
            show_gyroscope: false,
            allow_drag: false,
            allow_zoom: false,
            colors: PlotColors::default(),
        }
    }
}

impl Default for PlotColors {
    fn default() -> Self {
        Self {
            x_axis: [255, 0, 0],
            y_axis: [0, 160, 0],
            z_axis: [0, 0, 255],
            gyro_x: [200, 90, 0],
            gyro_y: [0, 140, 140],
            gyro_z: [128, 0, 128],
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            sample_channel_capacity: 1000,
            db_task_channel_capacity: 100,
            persist_result_channel_capacity: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(ConfigError::IoError)?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)
            .map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content)
            .map_err(ConfigError::IoError)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        if self.serial.port.trim().is_empty() {
            return Err(ConfigError::ValidationError("Serial port must not be empty".to_string()));
        }

        if self.serial.baud_rate == 0 {
            return Err(ConfigError::ValidationError("Baud rate must be positive".to_string()));
        }

        if self.serial.poll_interval_ms == 0 || self.serial.timeout_ms == 0 {
            return Err(ConfigError::ValidationError("Poll interval and read timeout must be positive".to_string()));
        }

        if self.serial.max_line_length == 0 {
            return Err(ConfigError::ValidationError("Maximum line length must be positive".to_string()));
        }

        if self.database.path.trim().is_empty() {
            return Err(ConfigError::ValidationError("Database path must not be empty".to_string()));
        }

        if let RetentionPolicy::Bounded { max_samples: 0 } = self.history.retention {
            return Err(ConfigError::ValidationError("Bounded retention needs at least one sample".to_string()));
        }

        if let RedrawPolicy::Tail { points: 0 } = self.history.redraw {
            return Err(ConfigError::ValidationError("Tail redraw needs at least one point".to_string()));
        }

        if self.channels.sample_channel_capacity == 0
            || self.channels.db_task_channel_capacity == 0
            || self.channels.persist_result_channel_capacity == 0
        {
            return Err(ConfigError::ValidationError("Channel capacities must be positive".to_string()));
        }

        Ok(())
    }

    /// Applies `SERIAL_PORT`, `SERIAL_BAUD` and `SENSOR_DB_PATH` as found by `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("SERIAL_PORT") {
            self.serial.port = port;
        }

        if let Some(baud) = lookup("SERIAL_BAUD") {
            self.serial.baud_rate = baud.trim().parse::<u32>()
                .map_err(|e| ConfigError::ValidationError(format!("SERIAL_BAUD '{}': {}", baud, e)))?;
        }

        if let Some(path) = lookup("SENSOR_DB_PATH") {
            self.database.path = path;
        }

        self.validate()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub struct ConfigManager {
    /// Effective config, file values with env overrides on top
    config: AppConfig,
    /// What the file said, before env overrides
    file_config: AppConfig,
    config_path: Option<PathBuf>,
    // collected while loading, before the logger exists
    load_notes: Vec<(Level, String)>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            file_config: AppConfig::default(),
            config_path: None,
            load_notes: Vec::new(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            file_config: config.clone(),
            config,
            config_path: Some(path.as_ref().to_path_buf()),
            load_notes: Vec::new(),
        })
    }

    /// Loads the config file if there is one, then applies env overrides.
    /// Any failure leaves the defaults (or the file values) in place.
    pub fn load_or_default() -> Self {
        let path = env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut notes = Vec::new();
        let mut manager = if path.exists() {
            match Self::load_from_file(&path) {
                Ok(manager) => {
                    notes.push((Level::Info, format!("Loaded configuration from {}", path.display())));
                    manager
                }
                Err(e) => {
                    notes.push((Level::Warn, format!("Failed to load configuration from {}: {}, using defaults", path.display(), e)));
                    Self::new()
                }
            }
        } else {
            notes.push((Level::Info, format!("No configuration file at {}, using defaults", path.display())));
            Self::new()
        };

        manager.load_notes = notes;
        manager.apply_overrides(|key| env::var(key).ok());
        manager
    }

    /// Layers overrides over the file config; invalid ones are noted and ignored
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overridden = self.file_config.clone();
        match overridden.apply_overrides(lookup) {
            Ok(()) => self.config = overridden,
            Err(e) => self
                .load_notes
                .push((Level::Warn, format!("Ignoring environment overrides: {}", e))),
        }
    }

    /// Emits what happened during loading; call once the logger is up
    pub fn log_load_notes(&mut self) {
        for (level, message) in self.load_notes.drain(..) {
            log!(level, "{}", message);
        }
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    #[cfg(test)]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// The config as it should be written back: panel edits are kept,
    /// the env-overridable fields keep their file values.
    fn to_save(&self) -> AppConfig {
        let mut config = self.config.clone();
        config.serial.port = self.file_config.serial.port.clone();
        config.serial.baud_rate = self.file_config.serial.baud_rate;
        config.database.path = self.file_config.database.path.clone();
        config
    }

    /// Writes the current config back to the file it came from,
    /// or to the default location when it was built from defaults.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = self.config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        self.to_save().save_to_file(&path)?;
        Ok(path)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_bench_setup() {
        let config = AppConfig::default();
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.database.path, "sensor_data.db");
        assert_eq!(config.history.retention, RetentionPolicy::Unbounded);
        assert_eq!(config.history.redraw, RedrawPolicy::Full);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [serial]
            port = "/dev/ttyACM0"
            baud_rate = 115200

            [history.retention]
            mode = "bounded"
            max_samples = 600

            [history.redraw]
            mode = "tail"
            points = 120
            "#,
        )
        .expect("valid config");

        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 115200);
        assert_eq!(config.serial.timeout_ms, 1000);
        assert_eq!(config.history.retention, RetentionPolicy::Bounded { max_samples: 600 });
        assert_eq!(config.history.redraw, RedrawPolicy::Tail { points: 120 });
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let result = AppConfig::from_toml_str("[serial]\npoll_interval_ms = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_empty_bounded_history() {
        let mut config = AppConfig::default();
        config.history.retention = RetentionPolicy::Bounded { max_samples: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = AppConfig::from_toml_str("[serial\nport = 3");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("panel.toml");

        let mut config = AppConfig::default();
        config.serial.port = "/dev/ttyS4".to_string();
        config.plot.show_gyroscope = true;
        config.history.redraw = RedrawPolicy::Tail { points: 30 };
        config.save_to_file(&path).expect("save");

        let manager = ConfigManager::load_from_file(&path).expect("load");
        assert_eq!(manager.get_config(), &config);
        assert_eq!(manager.config_path(), Some(path.as_path()));
    }

    #[test]
    fn env_overrides_replace_port_baud_and_db_path() {
        let vars: HashMap<&str, &str> = [
            ("SERIAL_PORT", "COM7"),
            ("SERIAL_BAUD", "57600"),
            ("SENSOR_DB_PATH", "data/imu.db"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .expect("overrides");

        assert_eq!(config.serial.port, "COM7");
        assert_eq!(config.serial.baud_rate, 57600);
        assert_eq!(config.database.path, "data/imu.db");
    }

    #[test]
    fn saving_keeps_env_overrides_out_of_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("panel.toml");

        let mut on_disk = AppConfig::default();
        on_disk.serial.port = "/dev/ttyS4".to_string();
        on_disk.save_to_file(&path).expect("save");

        let mut manager = ConfigManager::load_from_file(&path).expect("load");
        manager.apply_overrides(|key| match key {
            "SERIAL_PORT" => Some("COM9".to_string()),
            "SENSOR_DB_PATH" => Some("/tmp/session.db".to_string()),
            _ => None,
        });
        assert_eq!(manager.get_config().serial.port, "COM9");

        manager.get_config_mut().plot.show_gyroscope = true;
        assert_eq!(manager.save().expect("save"), path);

        let reloaded = AppConfig::load_from_file(&path).expect("reload");
        assert_eq!(reloaded.serial.port, "/dev/ttyS4");
        assert_eq!(reloaded.database.path, "sensor_data.db");
        assert!(reloaded.plot.show_gyroscope);
    }

    #[test]
    fn invalid_override_leaves_the_file_config_in_effect() {
        let mut manager = ConfigManager::new();
        manager.apply_overrides(|key| (key == "SERIAL_BAUD").then(|| "0".to_string()));
        assert_eq!(manager.get_config().serial.baud_rate, 9600);
        assert_eq!(manager.load_notes.len(), 1);
    }

    #[test]
    fn non_numeric_baud_override_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| (key == "SERIAL_BAUD").then(|| "fast".to_string()));
        assert!(result.is_err());
    }
}
