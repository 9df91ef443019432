//! Multibuild CLI - batch build orchestrator

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("multibuild=debug")
    } else {
        EnvFilter::new("multibuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Build(ref args) => commands::build::execute(&cli, args),
        Commands::Config(ref args) => commands::config::execute(&cli, args).map(|_| 0),
        Commands::Platforms(ref args) => commands::platforms::execute(args).map(|_| 0),
        Commands::Completions(ref args) => commands::completions::execute(args).map(|_| 0),
    }
}
