//! mvn-settings - inject credentials into Maven settings.xml files.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Set up diagnostic logging on stderr.
//! - Run the selected command and translate failures into structured exit codes.
//!
//! Does NOT handle:
//! - Document rewriting (see `crates/settings`).
//! - Configuration resolution rules (see `crates/config`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide `MVN_SETTINGS_*` values.
//! - Only the rendered settings document is written to stdout; everything else goes to stderr.

mod args;
mod commands;
mod dispatch;
mod error;
mod manifest;
mod output;

use args::{Cli, LogFormat};
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use mvn_settings_config::ConfigLoader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::from(&e).as_i32());
    }

    let cli = Cli::parse();
    init_logging(cli.log_format);

    let exit_code = match run_command(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn init_logging(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
