//! Shared utilities

pub mod config;
pub mod fs;
pub mod process;
pub mod shell;

pub use config::{BuildConfig, ConfigStore, TomlConfigStore};
pub use shell::{Shell, ShellMode};
