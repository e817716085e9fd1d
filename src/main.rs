//! Cookie - A small terminal text editor.
//!
//! # Usage
//!
//! ```bash
//! cookie notes.txt
//! cookie --tab-stop 4 main.c
//! cookie --log-file cookie.log
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cookie::app::App;
use cookie::config::{self, ConfigOverrides};

/// A small terminal text editor
#[derive(Parser, Debug)]
#[command(name = "cookie", version, about, long_about = None)]
struct Cli {
    /// File to edit; created on first save if it does not exist
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Directory holding config.json and syntax.json
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Columns per tab stop (overrides config.json)
    #[arg(long, value_name = "N")]
    tab_stop: Option<usize>,

    /// Extra Ctrl-Q presses needed to quit with unsaved changes
    #[arg(long, value_name = "N")]
    quit_times: Option<usize>,

    /// Write log events to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| std::env::var_os("COOKIE_LOG").map(PathBuf::from));
    init_logging(log_file.as_deref())?;

    let config_dir = cli.config_dir.clone().unwrap_or_else(config::config_dir);
    let overrides = ConfigOverrides {
        tab_stop: cli.tab_stop,
        quit_times: cli.quit_times,
    };
    let settings = config::load_settings(&config_dir, &overrides)
        .with_context(|| format!("Failed to load config from {}", config_dir.display()))?;
    tracing::info!(
        dir = %config_dir.display(),
        syntaxes = settings.syntaxes.len(),
        "loaded settings"
    );

    let mut app = App::new(settings)
        .with_file(cli.file)
        .with_config_dir(config_dir)
        .with_overrides(overrides);

    app.run().context("Application error")
}
