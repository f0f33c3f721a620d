pub mod config;

use crate::collectors::SystemStatProvider;
use crate::config::{AppConfig, OutputConfig, OutputFormat};
use crate::models::DisplayState;
use crate::options::{OptionsError, ValidatedOptions};
use crate::renderer::{Element, FontConfig};
use crate::widget::NetworkSpeedWidget;
use anyhow::Context;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::io::{self, Write};

pub mod collectors;
pub mod dashboard;
pub mod models;
pub mod options;
pub mod renderer;
pub mod widget;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting network speed widget");

    tokio::select! {
        result = main_loop(&config) => {
            match result {
                Ok(_) => info!("Widget stopped"),
                Err(e) => {
                    error!("Application error: {e:#}");
                    // Print chain of error causes
                    let mut source = e.source();
                    while let Some(e) = source {
                        error!("Caused by: {e}");
                        source = e.source();
                    }
                    return Err(e).context("Application failed to run");
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, unmounting widget");
        }
    }

    Ok(())
}

async fn main_loop(config: &AppConfig) -> anyhow::Result<()> {
    let options = match ValidatedOptions::try_from(config.plugin.clone()) {
        Ok(options) => options,
        Err(OptionsError::Invalid(errors)) => {
            for e in &errors {
                error!("Plugin option error: {}", e);
            }
            anyhow::bail!("{} invalid plugin option(s)", errors.len());
        }
    };

    let provider = SystemStatProvider::new(config.interfaces());
    let mut widget = NetworkSpeedWidget::with_ordering(provider, options, config.polling.ordering);
    widget.set_interval(config.polling_interval());

    let font = load_font(&config.output);
    let mut updates = widget.subscribe();
    widget.start().context("Failed to start widget")?;

    loop {
        updates
            .changed()
            .await
            .context("Widget state channel closed")?;
        let state = updates.borrow_and_update().clone();
        let tree = widget.render();

        let line = format_line(config.output.format, &state, &tree, widget.options().color_name())?;
        writeln!(io::stdout().lock(), "{}", line).context("Failed to write to stdout")?;

        if config.output.save_to_file {
            let image = dashboard::create_image(&tree, font.as_ref(), config.output.width, config.output.height);
            if let Err(e) = dashboard::save_image(&config.output.file, &image) {
                error!("Failed to save widget image: {}", e);
            }
        }
        debug!("stats: {:?}", widget.stats());
    }
}

fn load_font(output: &OutputConfig) -> Option<FontConfig> {
    if !output.save_to_file {
        return None;
    }
    match FontConfig::from_file(&output.font, output.font_size) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Text will be left out of the image: {}", e);
            None
        }
    }
}

#[derive(Serialize)]
struct StatusLine<'a> {
    text: String,
    download: &'a str,
    upload: &'a str,
    color: &'a str,
}

/// One line of stdout output for the current state.
pub fn format_line(
    format: OutputFormat,
    state: &DisplayState,
    tree: &Element,
    color_name: &str,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Plain => Ok(tree.to_string()),
        OutputFormat::Json => {
            let line = StatusLine {
                text: tree.to_string(),
                download: &state.download,
                upload: &state.upload,
                color: color_name,
            };
            serde_json::to_string(&line).context("Failed to encode status line")
        }
    }
}
