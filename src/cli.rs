//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the homesetup engine.
#[derive(Parser, Debug)]
#[command(
    name = "homesetup",
    about = "Home directory setup and reconciliation engine",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the repository root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile the home directory against the declared state
    Install(InstallOpts),
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct InstallOpts {
    /// Skip specific tasks
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only specific tasks
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Replace symlinks that point somewhere other than the declared source
    #[arg(long)]
    pub rebuild: bool,

    /// Tolerate destinations already occupied by the user's own files (skip with a warning)
    #[arg(long)]
    pub allow_custom: bool,

    /// Path to an external libclang used when building the vim completer
    #[arg(long, value_name = "PATH")]
    pub libclang: Option<PathBuf>,
}
