use env_logger::{Builder, WriteStyle};
use log::{error, info};
use netspeed::config::{AppConfig, DEFAULT_CONFIG_FILE};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_missing = !Path::new(DEFAULT_CONFIG_FILE).exists();

    // Load configuration first (without logging)
    let config = AppConfig::new().unwrap_or_else(|e| {
        if !config_missing {
            eprintln!("Failed to load configuration: {:#}", e);
        }
        // Fall back to default configuration
        AppConfig::default()
    });

    // Initialise logger with a configured log level
    Builder::new()
        .filter_level(config.get_log_level())
        .write_style(WriteStyle::Always)
        .format_timestamp_secs()
        .init();

    if config_missing {
        info!("No {} found, writing defaults", DEFAULT_CONFIG_FILE);
        if let Err(e) = config.save(DEFAULT_CONFIG_FILE) {
            error!("Could not write default configuration: {:#}", e);
        }
    }

    if let Err(e) = netspeed::run(config).await {
        error!("Application error: {}", e);
        return Err(e);
    }
    Ok(())
}
