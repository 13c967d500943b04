//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not read `MVN_SETTINGS_*` variables; the config loader applies them
//!   underneath whatever is passed here.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mvn-settings")]
#[command(about = "Inject server and proxy credentials into Maven settings.xml files", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  mvn-settings inject --settings settings.xml --credentials creds.json --output out.xml\n  mvn-settings inject -s settings.xml --credentials creds.json --replace-all --manifest keys.json\n  mvn-settings cleanup --manifest keys.json\n"
)]
pub struct Cli {
    /// Format of diagnostic logs written to stderr (filter with RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inject credentials into a settings template
    Inject(InjectArgs),

    /// Remove key files listed in a manifest written by `inject`
    Cleanup {
        /// Manifest file written by `inject --manifest`
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct InjectArgs {
    /// Settings template to read
    #[arg(short, long, value_name = "FILE")]
    pub settings: PathBuf,

    /// Credentials JSON file (falls back to MVN_SETTINGS_CREDENTIALS)
    #[arg(short, long, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Keep only the servers present in the credentials file
    #[arg(long, conflicts_with = "merge_only")]
    pub replace_all: bool,

    /// Update matching servers and leave all others alone (default)
    #[arg(long)]
    pub merge_only: bool,

    /// Directory for materialized private keys (falls back to MVN_SETTINGS_SCRATCH_DIR)
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Record materialized key files here for a later `cleanup`
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

impl InjectArgs {
    /// Server injection mode requested on the command line, if any.
    pub fn replace_all(&self) -> Option<bool> {
        match (self.replace_all, self.merge_only) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
