//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use multibuild::core::platform::PlatformId;

/// Multibuild - a batch build orchestrator for multi-platform builds
#[derive(Parser)]
#[command(name = "multibuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress status output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: String,

    /// Application key for the persisted settings snapshot
    #[arg(long, global = true, env = "MULTIBUILD_APP", default_value = "app")]
    pub app: String,

    /// Settings file path (overrides the per-user location)
    #[arg(long, global = true, env = "MULTIBUILD_CONFIG")]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the batch build for the selected platforms
    Build(BuildArgs),

    /// Show, edit, or reset the persisted build settings
    Config(ConfigArgs),

    /// List supported platforms and their artifact extensions
    Platforms(PlatformsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Platforms to build (defaults to the configured set)
    #[arg(short, long, value_name = "PLATFORM")]
    pub platform: Vec<PlatformId>,

    /// Override the build name
    #[arg(long)]
    pub name: Option<String>,

    /// Override the output root directory
    #[arg(short, long)]
    pub output_root: Option<PathBuf>,

    /// Also build a headless server variant per platform
    #[arg(long, overrides_with = "no_servers")]
    pub servers: bool,

    /// Do not build server variants
    #[arg(long, overrides_with = "servers")]
    pub no_servers: bool,

    /// Mirror the configured copy folder into each platform output
    #[arg(long, overrides_with = "no_copy_folder")]
    pub copy_folder: bool,

    /// Do not mirror the copy folder
    #[arg(long, overrides_with = "copy_folder")]
    pub no_copy_folder: bool,

    /// Development build with debugging support
    #[arg(long)]
    pub development: bool,

    /// Write directly under the output root, without a dated subdirectory
    #[arg(long)]
    pub no_stamp: bool,

    /// Emit the job plan as JSON (no build)
    #[arg(long)]
    pub plan: bool,

    /// Persist the effective settings after a successful build
    #[arg(long)]
    pub save: bool,

    /// Emit machine-readable JSON events instead of human output
    #[arg(long = "message-format", value_name = "FMT")]
    pub message_format: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current settings as TOML
    Show,

    /// Set one settings field (e.g. `name`, `output-root`, `backend.program`)
    Set {
        /// Field to set
        key: String,
        /// New value
        value: String,
    },

    /// Delete the persisted snapshot, reverting to defaults
    Reset,
}

#[derive(Args)]
pub struct PlatformsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
