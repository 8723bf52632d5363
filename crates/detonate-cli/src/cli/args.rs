//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Execute one untrusted file and report what it changed.
///
/// Assumes it already runs inside an isolated container. The verdict is
/// printed and returned as the exit status: 0 clean, 1 malware,
/// 2 suspicious, 3 error.
#[derive(Parser, Debug)]
#[command(name = "detonate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (TOML); defaults apply when it does not exist
    #[arg(short, long, env = "DETONATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format on stdout
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Increase log verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full analysis on the file in the input directory
    Analyze(AnalyzeArgs),

    /// Show the effective keyword rule table
    Rules,

    /// Show the effective configuration as TOML
    Config,
}

// ============================================================================
// Analyze command
// ============================================================================

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Directory holding the file to analyze
    #[arg(long, env = "DETONATE_INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Root directory watched for new files
    #[arg(long, env = "DETONATE_WATCH_ROOT")]
    pub watch_root: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(short, long, env = "DETONATE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Execution deadline in seconds
    #[arg(short, long, env = "DETONATE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Delay before the post-execution snapshot, in milliseconds
    #[arg(long, env = "DETONATE_SETTLE_MS")]
    pub settle_ms: Option<u64>,
}
