use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

pub const DEFAULT_RUNTIME_URL: &str = "http://localhost:3000/api/copilotkit";

/// Terminal spreadsheet editor with an AI assistant sidebar.
#[derive(Debug, Clone, Parser)]
#[command(name = "chatsheet", version, about)]
pub struct Config {
    /// Assistant runtime endpoint
    #[arg(long, env = "CHATSHEET_RUNTIME_URL", default_value = DEFAULT_RUNTIME_URL)]
    pub runtime_url: String,

    /// File or named pipe the embedding host reads notifications from
    #[arg(long, env = "CHATSHEET_HOST_CHANNEL")]
    pub host_channel: Option<PathBuf>,

    /// Log file (defaults to the user cache directory)
    #[arg(long, env = "CHATSHEET_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, env = "CHATSHEET_LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// Start with the assistant sidebar open
    #[arg(long)]
    pub sidebar_open: bool,
}
