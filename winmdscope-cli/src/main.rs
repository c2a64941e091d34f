mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;
use winmdscope::events::LogListener;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // Show winmdscope info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("winmdscope", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    let listener = LogListener;
    match &cli.command {
        Command::Tables { path, table } => {
            commands::tables::run(path, table.as_deref(), &cli.global, &listener)
        }
        Command::Types { path, namespace } => {
            commands::types::run(path, namespace.as_deref(), &cli.global, &listener)
        }
        Command::Members { path, r#type } => {
            commands::members::run(path, r#type, &cli.global, &listener)
        }
    }
}
