//! The orchestration engine.
//!
//! Drives one `BuildRequest` end to end: validate, plan, pre-copy assets
//! per platform, execute jobs strictly sequentially through the backend,
//! and aggregate a `BuildReport`. Continuation policy is fail-fast: the
//! first `Failed` or `Cancelled` job stops the run, and every remaining
//! planned job is recorded as `NotAttempted` so the report always covers
//! the whole plan.
//!
//! Configuration and filesystem errors are faults of the run and return
//! `Err`; backend build failures are data inside the `Ok` report.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use crate::core::platform::{PlatformId, UnsupportedPlatform};
use crate::core::report::{BuildReport, JobOutcome, JobResult, OverallOutcome};
use crate::core::request::BuildRequest;
use crate::orchestrator::backend::BuildBackend;
use crate::orchestrator::plan::BuildPlan;
use crate::util::fs::{copy_tree, MirrorError, MirrorPolicy};

/// Name of the per-platform subdirectory receiving mirrored assets.
pub const COPY_DEST_DIR: &str = "Bonus";

/// Faults that prevent or abort an orchestration run.
///
/// All of these surface synchronously to the caller; none of them leave a
/// backend job half-recorded.
#[derive(Debug, Error)]
pub enum OrchestrateError {
    /// The request selected no platforms
    #[error("no platforms selected; enable at least one platform")]
    EmptyPlatformSet,

    /// The same platform was selected twice
    #[error("platform '{platform}' selected more than once")]
    DuplicatePlatform {
        /// The repeated platform
        platform: PlatformId,
    },

    /// Copy-folder semantics enabled but the source folder is missing
    #[error("copy folder does not exist: {path}")]
    CopySourceMissing {
        /// The configured copy source
        path: PathBuf,
    },

    /// A selected platform is outside the supported set
    #[error(transparent)]
    Unsupported(#[from] UnsupportedPlatform),

    /// Asset mirroring failed
    #[error(transparent)]
    Mirror(#[from] MirrorError),
}

/// Sequential build orchestrator.
pub struct Orchestrator<'a> {
    backend: &'a dyn BuildBackend,
    mirror_policy: MirrorPolicy,
    show_progress: bool,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator over the given backend.
    pub fn new(backend: &'a dyn BuildBackend) -> Self {
        Orchestrator {
            backend,
            mirror_policy: MirrorPolicy::default(),
            show_progress: false,
        }
    }

    /// Set the asset-mirror exclusion policy.
    pub fn with_mirror_policy(mut self, policy: MirrorPolicy) -> Self {
        self.mirror_policy = policy;
        self
    }

    /// Enable a progress bar across jobs.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run one request to completion.
    ///
    /// Validation happens before any filesystem or backend work, so a
    /// misconfigured request never produces partial output. The returned
    /// report's `total_elapsed` is wall-clock from plan start to
    /// aggregation end, pre-copy overhead included.
    pub fn run(&self, request: &BuildRequest) -> Result<BuildReport, OrchestrateError> {
        self.validate(request)?;

        let started = Instant::now();
        let plan = BuildPlan::new(request)?;

        tracing::info!(
            jobs = plan.job_count(),
            platforms = request.platforms.len(),
            "starting batch build '{}'",
            request.name
        );

        let pb = if self.show_progress && plan.job_count() > 1 {
            let pb = ProgressBar::new(plan.job_count() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut results: Vec<JobResult> = Vec::with_capacity(plan.job_count());
        let mut overall = OverallOutcome::Succeeded;
        let mut jobs = plan.jobs.into_iter();

        for job in jobs.by_ref() {
            // Assets are mirrored once per platform, before that
            // platform's primary job; the server variant shares them.
            if !job.server_variant {
                if let Some(source) = request.copy_source.as_deref() {
                    let dest = job
                        .platform_dir()
                        .expect("planned job without platform dir")
                        .join(COPY_DEST_DIR);
                    let stats = copy_tree(source, &dest, true, &self.mirror_policy)?;
                    tracing::debug!(
                        files = stats.files_copied,
                        bytes = stats.bytes,
                        "mirrored assets into {}",
                        dest.display()
                    );
                }
            }

            if let Some(pb) = &pb {
                pb.set_message(job.label());
            }

            let result = self.backend.build_platform(&job);
            tracing::info!(
                outcome = ?result.outcome,
                elapsed_ms = result.elapsed.as_millis() as u64,
                "built {}",
                result.job.label()
            );

            if let Some(pb) = &pb {
                pb.inc(1);
            }

            let stop = match result.outcome {
                JobOutcome::Succeeded => None,
                JobOutcome::Failed => Some(OverallOutcome::Failed),
                JobOutcome::Cancelled => Some(OverallOutcome::Cancelled),
                // The backend never returns NotAttempted; treat it as a
                // failure rather than silently continuing.
                JobOutcome::NotAttempted => Some(OverallOutcome::Failed),
            };

            results.push(result);

            if let Some(outcome) = stop {
                overall = outcome;
                break;
            }
        }

        // Back-fill jobs the stop decision skipped.
        for job in jobs {
            results.push(JobResult::not_attempted(job));
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let report = BuildReport {
            results,
            total_elapsed: started.elapsed(),
            overall,
        };

        tracing::info!(
            outcome = ?report.overall,
            elapsed_ms = report.total_elapsed.as_millis() as u64,
            "batch build finished: {}",
            report.summary_line()
        );

        Ok(report)
    }

    /// Admission checks, all before any job or copy starts.
    fn validate(&self, request: &BuildRequest) -> Result<(), OrchestrateError> {
        if request.platforms.is_empty() {
            return Err(OrchestrateError::EmptyPlatformSet);
        }

        let mut seen = BTreeSet::new();
        for &platform in &request.platforms {
            if !seen.insert(platform) {
                return Err(OrchestrateError::DuplicatePlatform { platform });
            }
            platform.artifact_extension()?;
        }

        if let Some(source) = request.copy_source.as_deref() {
            if !source.is_dir() {
                return Err(OrchestrateError::CopySourceMissing {
                    path: source.to_path_buf(),
                });
            }
        }

        Ok(())
    }
}
