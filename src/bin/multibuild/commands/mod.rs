//! Command implementations

pub mod build;
pub mod completions;
pub mod config;
pub mod platforms;

use anyhow::{Context, Result};

use multibuild::util::config::TomlConfigStore;

use crate::cli::Cli;

/// Resolve the configuration store from the global CLI flags.
pub fn config_store(cli: &Cli) -> Result<TomlConfigStore> {
    if let Some(ref path) = cli.config_path {
        return Ok(TomlConfigStore::at_path(path, &cli.app));
    }

    TomlConfigStore::for_app(&cli.app)
        .context("could not determine the per-user config directory")
}
