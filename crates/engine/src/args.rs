//! Command-line argument parsing

use std::path::PathBuf;

use clap::Parser;

/// Result of parsing command-line arguments.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "aurora", version, about, long_about = None)]
pub struct ParsedArgs {
    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Run without native windows
    #[arg(short, long)]
    pub background: bool,

    /// Ignore the preferences file and start from defaults
    #[arg(long)]
    pub factory_startup: bool,

    /// Trace every translated event
    #[arg(long)]
    pub debug_events: bool,

    /// Preferences file to use instead of the one in the app-data dir
    #[arg(long, value_name = "PATH", env = "AURORA_PREFS")]
    pub prefs: Option<PathBuf>,

    /// Document to open and save to (default: documents/untitled.toml in the app-data dir)
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Parse the process arguments, exiting with usage on error.
pub fn parse_args() -> ParsedArgs {
    ParsedArgs::parse()
}
