use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `curator` binary.
#[derive(Debug, Parser)]
#[command(
    name = "curator",
    version,
    about = "Curator - knowledge-base maintenance agent",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run options when no subcommand is given
    #[command(flatten)]
    pub run: RunArgs,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover research, check dependencies and links, and write the report (default)
    Run(RunArgs),
    /// Print the resolved search prompt list
    Prompts(ConfigArgs),
    /// Print the effective configuration with secrets redacted
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Config file layered over the global and project files
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Corpus root directory
    #[arg(long, value_name = "DIR")]
    pub corpus: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Number of ranked papers kept in the report
    #[arg(long, value_name = "N")]
    pub top_k: Option<usize>,

    /// Max in-flight calls for every subsystem
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Wall-clock budget for the whole run
    #[arg(long, value_name = "SECS")]
    pub deadline_secs: Option<u64>,

    /// Directory for the report and JSON artifact
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}
