// src/config.rs
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_HISTORY_FILENAME: &str = "chess_history.json";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Two-player chess in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "chess_rules", version, about)]
pub struct Config {
    /// File the `save` command writes the move history to.
    #[arg(long, default_value = DEFAULT_HISTORY_FILENAME)]
    pub history_file: String,

    /// Log filter, e.g. `debug` or `chess_rules=trace`. Falls back to RUST_LOG, then `warn`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the board without the move list and state summary.
    #[arg(long)]
    pub board_only: bool,
}

impl Config {
    fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        }
    }

    /// Installs the global tracing subscriber. Logs go to stderr so they
    /// don't interleave with the board on stdout.
    pub fn init_tracing(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .try_init();
    }
}
