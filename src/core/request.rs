//! Build requests and derived build jobs.
//!
//! A `BuildRequest` is the fully-populated intent for one orchestration
//! run, materialized by the ops layer from persisted configuration plus
//! CLI overrides. `BuildJob`s are derived from it by the planner and are
//! never user-authored.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::platform::PlatformId;

/// A per-job build option flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildFlag {
    /// Headless/dedicated-server build (set on server-variant jobs)
    Headless,

    /// Development build with debugging support
    Development,
}

/// One logical batch-build request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRequest {
    /// Build name, used for the artifact filename
    pub name: String,

    /// Root directory that receives per-platform output trees
    pub output_root: PathBuf,

    /// Selected platforms, in caller order (duplicate-free)
    pub platforms: Vec<PlatformId>,

    /// Also produce a headless server variant per platform
    pub bundle_server_variant: bool,

    /// Auxiliary folder mirrored into each platform output (None = disabled)
    pub copy_source: Option<PathBuf>,

    /// Scenes to include, in build order
    pub scene_list: Vec<PathBuf>,

    /// Flags applied to every job (e.g. Development)
    pub extra_flags: BTreeSet<BuildFlag>,
}

impl BuildRequest {
    /// Create a request with the given name, output root, and platforms.
    pub fn new(
        name: impl Into<String>,
        output_root: impl Into<PathBuf>,
        platforms: Vec<PlatformId>,
    ) -> Self {
        BuildRequest {
            name: name.into(),
            output_root: output_root.into(),
            platforms,
            bundle_server_variant: false,
            copy_source: None,
            scene_list: Vec::new(),
            extra_flags: BTreeSet::new(),
        }
    }

    /// Enable server-variant bundling.
    pub fn with_server_variant(mut self, bundle: bool) -> Self {
        self.bundle_server_variant = bundle;
        self
    }

    /// Set the auxiliary copy folder.
    pub fn with_copy_source(mut self, source: Option<PathBuf>) -> Self {
        self.copy_source = source;
        self
    }

    /// Set the scene list.
    pub fn with_scenes(mut self, scenes: Vec<PathBuf>) -> Self {
        self.scene_list = scenes;
        self
    }

    /// Add a flag applied to every job.
    pub fn with_flag(mut self, flag: BuildFlag) -> Self {
        self.extra_flags.insert(flag);
        self
    }

    /// Whether copy-folder semantics are enabled for this request.
    pub fn copy_enabled(&self) -> bool {
        self.copy_source.is_some()
    }
}

/// One planned invocation of the build backend.
///
/// Immutable once planned; consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildJob {
    /// Target platform
    pub platform: PlatformId,

    /// Whether this is the headless server variant
    pub server_variant: bool,

    /// Full artifact path, e.g. `<root>/Windows/name.exe`
    pub output_path: PathBuf,

    /// Scenes to include, in build order
    pub scene_list: Vec<PathBuf>,

    /// Build option flags
    pub options: BTreeSet<BuildFlag>,
}

impl BuildJob {
    /// The platform-level output directory this job writes under.
    ///
    /// For a primary job that is the artifact's parent directory; for a
    /// server variant it is the parent of the `server/` subdirectory, so
    /// both variants of one platform share it.
    pub fn platform_dir(&self) -> Option<&std::path::Path> {
        let parent = self.output_path.parent()?;
        if self.server_variant {
            parent.parent()
        } else {
            Some(parent)
        }
    }

    /// Short human label, e.g. `linux` or `linux (server)`.
    pub fn label(&self) -> String {
        if self.server_variant {
            format!("{} (server)", self.platform)
        } else {
            self.platform.to_string()
        }
    }
}
