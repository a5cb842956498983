//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Spin Tester - clockwise pointer gesture tracker
#[derive(Parser, Debug)]
#[command(
    name = "spin-tester",
    author,
    version,
    about = "Clockwise spin gesture tracker",
    long_about = "Counts clockwise revolutions of a pointer and reports a smoothed speed.\n\n\
                  Runs a synthetic circular gesture in real time, replays recorded \n\
                  pointer traces, and inspects tracker configuration files."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SPIN_TESTER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SPIN_TESTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a synthetic circular gesture through a live session
    Simulate(SimulateArgs),

    /// Replay a recorded pointer trace offline
    Replay(ReplayArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display effective configuration
    Info(InfoArgs),
}

/// Arguments for the `simulate` command
#[derive(Parser, Debug, Clone)]
pub struct SimulateArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "SPIN_TESTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Circle radius in position units
    #[arg(long, default_value = "100")]
    pub radius: f64,

    /// Time for one full turn in milliseconds
    #[arg(long, default_value = "800")]
    pub period_ms: u64,

    /// Draw the circle counter-clockwise (never counted)
    #[arg(long)]
    pub counter_clockwise: bool,

    /// Stop after this many milliseconds (0 = until Ctrl+C)
    #[arg(long, default_value = "5000", env = "SPIN_TESTER_DURATION_MS")]
    pub duration_ms: u64,

    /// Pointer event rate of the synthetic source
    #[arg(long, default_value = "60")]
    pub rate_hz: f64,

    /// Input queue size between the source and the session
    #[arg(long, default_value = "256", env = "SPIN_TESTER_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Emit snapshots and the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `replay` command
#[derive(Parser, Debug, Clone)]
pub struct ReplayArgs {
    /// Recorded trace (.json, .jsonl or .csv with t_ms,x,y)
    #[arg(short, long)]
    pub trace: PathBuf,

    /// Path to configuration file (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "SPIN_TESTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Clock advance after the last sample (default: until speed settles)
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Emit snapshots and the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "spin.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "spin.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
