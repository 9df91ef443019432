//! Build plan generation.
//!
//! A `BuildPlan` is the ordered fan-out of one `BuildRequest` into
//! backend jobs: one primary job per selected platform, in the order the
//! caller listed them, and when server bundling is requested one server
//! job immediately after its platform's primary job. Order is part of the
//! contract; reports and tests rely on it being reproducible.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::platform::UnsupportedPlatform;
use crate::core::request::{BuildFlag, BuildJob, BuildRequest};

/// A complete build plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    /// All jobs in execution order
    pub jobs: Vec<BuildJob>,
}

impl BuildPlan {
    /// Compute the job plan for a request.
    ///
    /// Output layout per platform (the artifact filename carries the
    /// platform's extension):
    ///
    /// ```text
    /// <output_root>/<Platform>/<name>.<ext>
    /// <output_root>/<Platform>/server/<name>.<ext>
    /// ```
    ///
    /// Fails only when a selected platform is outside the supported set;
    /// the engine validates requests up front, so that is a caller bug
    /// surfacing, not a mid-plan condition.
    pub fn new(request: &BuildRequest) -> Result<Self, UnsupportedPlatform> {
        let mut jobs = Vec::with_capacity(request.platforms.len() * 2);

        for &platform in &request.platforms {
            let extension = platform.artifact_extension()?;
            let platform_dir = request.output_root.join(platform.output_dir_name());
            let artifact = format!("{}.{}", request.name, extension);

            jobs.push(BuildJob {
                platform,
                server_variant: false,
                output_path: platform_dir.join(&artifact),
                scene_list: request.scene_list.clone(),
                options: request.extra_flags.clone(),
            });

            if request.bundle_server_variant {
                let mut options = request.extra_flags.clone();
                options.insert(BuildFlag::Headless);

                jobs.push(BuildJob {
                    platform,
                    server_variant: true,
                    output_path: platform_dir.join("server").join(&artifact),
                    scene_list: request.scene_list.clone(),
                    options,
                });
            }
        }

        Ok(BuildPlan { jobs })
    }

    /// Number of planned jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Platform-level output directories, in plan order, one per platform.
    pub fn platform_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for job in &self.jobs {
            if let Some(dir) = job.platform_dir() {
                if dirs.last().map(|d| d.as_path()) != Some(dir) {
                    dirs.push(dir.to_path_buf());
                }
            }
        }
        dirs
    }
}
