//! Persisted build configuration.
//!
//! The user-facing settings survive across sessions as a TOML snapshot,
//! keyed by an application-identifying string:
//! `~/.multibuild/<app-key>.toml`. The orchestration core never touches
//! persistence directly; it only consumes the `BuildRequest` materialized
//! from a loaded `BuildConfig`. Persistence is injected through the
//! `ConfigStore` trait so tests and embedders can supply their own.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::platform::PlatformId;

/// User-facing build settings, mirrored 1:1 into `BuildRequest` fields
/// before orchestration begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build name, used for artifact filenames
    pub name: String,

    /// Root directory receiving per-platform output trees
    pub output_root: PathBuf,

    /// Selected platforms, in build order
    pub platforms: Vec<PlatformId>,

    /// Also produce a headless server variant per platform
    pub bundle_server_variant: bool,

    /// Mirror an auxiliary folder into each platform output
    pub copy_folder: bool,

    /// The auxiliary folder to mirror
    pub copy_folder_path: PathBuf,

    /// Glob patterns resolving to the scene list, relative to the cwd
    pub scene_globs: Vec<String>,

    /// Development build with debugging support
    pub development: bool,

    /// Place each run under a timestamped subdirectory of the output root
    pub stamped_subdir: bool,

    /// External toolchain invocation settings
    pub backend: BackendSettings,

    /// Asset mirror exclusion settings
    pub mirror: MirrorSettings,
}

/// External build toolchain settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Toolchain program to invoke per job
    pub program: String,

    /// Extra arguments passed before the generated per-job arguments
    pub args: Vec<String>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            program: "buildtool".to_string(),
            args: Vec::new(),
        }
    }
}

/// Asset mirror settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    /// File extensions (without the dot) excluded from mirroring
    pub exclude_extensions: Vec<String>,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        MirrorSettings {
            exclude_extensions: vec!["meta".to_string()],
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::defaults_for("app")
    }
}

impl BuildConfig {
    /// Fresh defaults for an application: all desktop platforms on,
    /// servers and copy-folder off.
    pub fn defaults_for(name: &str) -> Self {
        BuildConfig {
            name: name.to_string(),
            output_root: PathBuf::from("Build"),
            platforms: PlatformId::supported().to_vec(),
            bundle_server_variant: false,
            copy_folder: false,
            copy_folder_path: PathBuf::from("CopyFolder"),
            scene_globs: vec!["scenes/**/*.scene".to_string()],
            development: false,
            stamped_subdir: true,
            backend: BackendSettings::default(),
            mirror: MirrorSettings::default(),
        }
    }
}

/// Injected configuration repository.
///
/// `load` falls back to defaults when nothing has been persisted yet; a
/// present-but-unreadable snapshot is an error, not a silent reset.
pub trait ConfigStore {
    /// Load the persisted configuration, or defaults if none exists.
    fn load(&self) -> Result<BuildConfig>;

    /// Persist the configuration.
    fn save(&self, config: &BuildConfig) -> Result<()>;
}

/// TOML-file-backed configuration store.
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
    app_key: String,
}

impl TomlConfigStore {
    /// Store backed by an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>, app_key: impl Into<String>) -> Self {
        TomlConfigStore {
            path: path.into(),
            app_key: app_key.into(),
        }
    }

    /// Store at the per-user default location for the given app key.
    pub fn for_app(app_key: &str) -> Option<Self> {
        let dir = global_config_dir()?;
        Some(TomlConfigStore {
            path: dir.join(format!("{}.toml", app_key)),
            app_key: app_key.to_string(),
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the persisted snapshot, reverting `load` to defaults.
    pub fn reset(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove config: {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<BuildConfig> {
        if !self.path.exists() {
            return Ok(BuildConfig::defaults_for(&self.app_key));
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read config: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", self.path.display()))
    }

    fn save(&self, config: &BuildConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(config).context("failed to serialize config")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("failed to write config: {}", self.path.display()))?;

        Ok(())
    }
}

/// Get the global multibuild config directory (~/.multibuild).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".multibuild"))
}
