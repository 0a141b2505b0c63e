//! CLI entry point for the homesetup engine.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use homesetup_cli::logging::Logger;
use homesetup_cli::{cli, commands, logging};

#[allow(clippy::print_stdout)]
fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match args.command {
        cli::Command::Install(opts) => {
            logging::init_subscriber(args.verbose, "install");
            let log = Arc::new(Logger::new("install"));
            commands::install::run(&args.global, &opts, &log)
        }
        cli::Command::Version => {
            let version = option_env!("HOMESETUP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("homesetup {version}");
            Ok(())
        }
    }
}
