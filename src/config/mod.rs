use anyhow::{ensure, Context, Result};
use config::{Config, File};
use log::{debug, info, LevelFilter};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::options::PluginOptions;
use crate::widget::UpdateOrdering;

pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

impl OutputFormat {
    fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default)]
    pub ordering: UpdateOrdering,
    /// Comma separated interface names; empty means every non-loopback one.
    #[serde(default)]
    pub interfaces: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub save_to_file: bool,
    #[serde(default = "default_image_file")]
    pub file: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_interval_ms() -> u64 {
    500
}

fn default_image_file() -> String {
    "netspeed.png".to_string()
}

fn default_width() -> u32 {
    240
}

fn default_height() -> u32 {
    32
}

fn default_font() -> String {
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf".to_string()
}

fn default_font_size() -> f32 {
    crate::renderer::fonts::DEFAULT_FONT_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            ordering: UpdateOrdering::default(),
            interfaces: String::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            save_to_file: false,
            file: default_image_file(),
            width: default_width(),
            height: default_height(),
            font: default_font(),
            font_size: default_font_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(rename = "PLUGIN", alias = "plugin", default)]
    pub plugin: PluginOptions,
    #[serde(rename = "POLLING", alias = "polling", default)]
    pub polling: PollingConfig,
    #[serde(rename = "OUTPUT", alias = "output", default)]
    pub output: OutputConfig,
    #[serde(rename = "LOGGING", alias = "logging", default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_file(DEFAULT_CONFIG_FILE)
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }

    pub fn interfaces(&self) -> Vec<String> {
        self.polling
            .interfaces
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let config = Config::builder()
            .add_source(File::with_name(config_path.to_str().unwrap_or("")).format(config::FileFormat::Ini))
            .build()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        let app_config: AppConfig = config.try_deserialize()
            .context("Failed to deserialize config")?;

        ensure!(
            app_config.polling.interval_ms > 0,
            "POLLING.interval_ms must be greater than zero"
        );

        Ok(app_config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();

        let mut config_str = String::new();

        // PLUGIN section, an unset colour is left out
        config_str.push_str("[PLUGIN]\n");
        if let Some(color) = &self.plugin.color {
            config_str.push_str(&format!("color = {}\n", color));
        }
        config_str.push('\n');

        config_str.push_str(&format!(
            "[POLLING]\ninterval_ms = {}\nordering = {}\ninterfaces = {}\n\n",
            self.polling.interval_ms,
            match self.polling.ordering {
                UpdateOrdering::Received => "received",
                UpdateOrdering::Issued => "issued",
            },
            self.polling.interfaces
        ));

        config_str.push_str(&format!(
            "[OUTPUT]\nformat = {}\nsave_to_file = {}\nfile = {}\nwidth = {}\nheight = {}\nfont = {}\nfont_size = {}\n\n",
            self.output.format.as_str(),
            self.output.save_to_file,
            self.output.file,
            self.output.width,
            self.output.height,
            self.output.font,
            self.output.font_size
        ));

        config_str.push_str(&format!("[LOGGING]\nlevel = {}\n", self.logging.level));

        fs::write(config_path, config_str)
            .context(format!("Failed to save config to {}", config_path.display()))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::validate_options;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.plugin.color.as_deref(), Some("lightCyan"));
        assert_eq!(config.polling.interval_ms, 500);
        assert_eq!(config.polling.ordering, UpdateOrdering::Received);
        assert!(config.interfaces().is_empty());
        assert_eq!(config.output.format, OutputFormat::Plain);
        assert_eq!(config.output.save_to_file, false);
        assert_eq!(config.output.file, "netspeed.png");
        assert_eq!(config.output.width, 240);
        assert_eq!(config.output.height, 32);
        assert_eq!(config.get_log_level(), LevelFilter::Info);
        assert_eq!(config.polling_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_from_file() {
        let temp_file = write_config(
            "[PLUGIN]\ncolor = lightRed\n\n[POLLING]\ninterval_ms = 250\nordering = issued\ninterfaces = enp13s0, wlan0\n\n[OUTPUT]\nformat = json\nsave_to_file = true\nfile = test.png\nwidth = 300\nheight = 40\n\n[LOGGING]\nlevel = debug\n",
        );

        let config = AppConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(config.plugin.color.as_deref(), Some("lightRed"));
        assert_eq!(config.polling.interval_ms, 250);
        assert_eq!(config.polling.ordering, UpdateOrdering::Issued);
        assert_eq!(config.interfaces(), vec!["enp13s0", "wlan0"]);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.save_to_file, true);
        assert_eq!(config.output.file, "test.png");
        assert_eq!(config.output.width, 300);
        assert_eq!(config.output.height, 40);
        assert_eq!(config.get_log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let temp_file = write_config("[LOGGING]\nlevel = warn\n");

        let config = AppConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(config.plugin.color.as_deref(), Some("lightCyan"));
        assert_eq!(config.polling.interval_ms, 500);
        assert_eq!(config.output.format, OutputFormat::Plain);
        assert_eq!(config.get_log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_empty_color_fails_validation() {
        let temp_file = write_config("[PLUGIN]\ncolor =\n\n[POLLING]\ninterval_ms = 500\n");

        let config = AppConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(
            validate_options(&config.plugin),
            vec!["'color' color string is required but missing."]
        );
    }

    #[test]
    fn test_zero_interval_rejected() {
        let temp_file = write_config("[POLLING]\ninterval_ms = 0\n");
        assert!(AppConfig::from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_invalid_log_level_falls_back_to_info() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert_eq!(config.get_log_level(), LevelFilter::Info);
    }

    #[test]
    fn test_save_config() {
        let mut config = AppConfig::default();
        config.plugin.color = Some("lightMagenta".to_string());
        config.polling.interval_ms = 1000;
        config.polling.ordering = UpdateOrdering::Issued;
        config.polling.interfaces = "eth0".to_string();
        config.output.format = OutputFormat::Json;
        config.output.save_to_file = true;
        config.output.file = "saved.png".to_string();
        config.output.width = 320;
        config.logging.level = "trace".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path();

        config.save(config_path).unwrap();

        let loaded_config = AppConfig::from_file(config_path).unwrap();

        assert_eq!(loaded_config.plugin.color.as_deref(), Some("lightMagenta"));
        assert_eq!(loaded_config.polling.interval_ms, 1000);
        assert_eq!(loaded_config.polling.ordering, UpdateOrdering::Issued);
        assert_eq!(loaded_config.interfaces(), vec!["eth0"]);
        assert_eq!(loaded_config.output.format, OutputFormat::Json);
        assert_eq!(loaded_config.output.save_to_file, true);
        assert_eq!(loaded_config.output.file, "saved.png");
        assert_eq!(loaded_config.output.width, 320);
        assert_eq!(loaded_config.output.font, config.output.font);
        assert_eq!(loaded_config.get_log_level(), LevelFilter::Trace);
    }

    #[test]
    fn test_missing_file() {
        assert!(AppConfig::from_file("/nonexistent/netspeed-config.ini").is_err());
    }
}
