//! Build backend adapter.
//!
//! The backend is the external compiler/toolchain that actually produces
//! an artifact for one job. The engine treats it as opaque: one blocking
//! call per job, returning a `JobResult`. A failed or cancelled build is
//! data in that result, never an error return, so continuation policy
//! stays with the orchestrator.

use std::path::PathBuf;
use std::time::Instant;

use crate::core::report::{JobOutcome, JobResult};
use crate::core::request::{BuildFlag, BuildJob};
use crate::util::fs::{ensure_dir, path_size};
use crate::util::process::{find_executable, ProcessBuilder};

/// Backend availability status.
#[derive(Debug, Clone)]
pub enum BackendAvailability {
    /// Backend tool found on PATH
    Available {
        /// Resolved program path
        program: PathBuf,
    },

    /// Backend tool is not installed
    NotFound {
        /// Name of the missing tool
        program: String,
        /// Hint for fixing the configuration
        hint: String,
    },
}

impl BackendAvailability {
    /// Check if the backend is available.
    pub fn is_available(&self) -> bool {
        matches!(self, BackendAvailability::Available { .. })
    }

    /// Get error message if not available.
    pub fn error_message(&self) -> Option<String> {
        match self {
            BackendAvailability::Available { .. } => None,
            BackendAvailability::NotFound { program, hint } => {
                Some(format!("{} not found. {}", program, hint))
            }
        }
    }
}

/// Interface to the external build toolchain.
///
/// `build_platform` is synchronous and blocking; it writes artifacts
/// under `job.output_path` and communicates failure through the returned
/// outcome plus diagnostics.
pub trait BuildBackend {
    /// Build one job to completion.
    fn build_platform(&self, job: &BuildJob) -> JobResult;

    /// Check whether the toolchain can be invoked at all.
    fn availability(&self) -> BackendAvailability;
}

/// Backend that shells out to a configured toolchain command.
///
/// Per job the command receives `--target`, `--output`, one `--scene`
/// per scene, and `--headless`/`--development` for the corresponding
/// option flags, after any user-configured base arguments.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    program: String,
    base_args: Vec<String>,
}

impl CommandBackend {
    /// Create a backend for the given program and base arguments.
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        CommandBackend {
            program: program.into(),
            base_args,
        }
    }

    /// The arguments generated for one job.
    fn job_args(job: &BuildJob) -> Vec<String> {
        let mut args = vec![
            "--target".to_string(),
            job.platform.to_string(),
            "--output".to_string(),
            job.output_path.display().to_string(),
        ];

        for scene in &job.scene_list {
            args.push("--scene".to_string());
            args.push(scene.display().to_string());
        }

        for flag in &job.options {
            match flag {
                BuildFlag::Headless => args.push("--headless".to_string()),
                BuildFlag::Development => args.push("--development".to_string()),
            }
        }

        args
    }

    /// A result carrying a failure the backend hit before the toolchain
    /// could run (spawn failure, unwritable output directory).
    fn failed(job: &BuildJob, started: Instant, diagnostics: String) -> JobResult {
        JobResult {
            job: job.clone(),
            outcome: JobOutcome::Failed,
            elapsed: started.elapsed(),
            artifact_size: None,
            diagnostics: Some(diagnostics),
        }
    }
}

/// Map a finished process status to a job outcome.
///
/// A signal-terminated toolchain (SIGINT/SIGTERM) is an abort, not a
/// build failure.
fn outcome_for_status(status: std::process::ExitStatus) -> JobOutcome {
    if status.success() {
        return JobOutcome::Succeeded;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        // SIGINT / SIGTERM
        if matches!(status.signal(), Some(2) | Some(15)) {
            return JobOutcome::Cancelled;
        }
    }

    JobOutcome::Failed
}

impl BuildBackend for CommandBackend {
    fn build_platform(&self, job: &BuildJob) -> JobResult {
        let started = Instant::now();

        if let Some(parent) = job.output_path.parent() {
            if let Err(e) = ensure_dir(parent) {
                return Self::failed(job, started, format!("{:#}", e));
            }
        }

        let builder = ProcessBuilder::new(&self.program)
            .args(&self.base_args)
            .args(Self::job_args(job));

        tracing::debug!("invoking backend: {}", builder.display_command());

        let output = match builder.exec() {
            Ok(output) => output,
            Err(e) => return Self::failed(job, started, format!("{:#}", e)),
        };

        let elapsed = started.elapsed();
        let outcome = outcome_for_status(output.status);

        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = if stderr.trim().is_empty() {
            None
        } else {
            Some(stderr.trim().to_string())
        };

        let artifact_size = match outcome {
            JobOutcome::Succeeded => path_size(&job.output_path).ok(),
            _ => None,
        };

        JobResult {
            job: job.clone(),
            outcome,
            elapsed,
            artifact_size,
            diagnostics,
        }
    }

    fn availability(&self) -> BackendAvailability {
        match find_executable(&self.program) {
            Some(program) => BackendAvailability::Available { program },
            None => BackendAvailability::NotFound {
                program: self.program.clone(),
                hint: "set [backend].program in the multibuild config to your build toolchain"
                    .to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::PlatformId;
    use std::collections::BTreeSet;
    use std::path::Path;
    use tempfile::TempDir;

    fn job(output: &Path) -> BuildJob {
        BuildJob {
            platform: PlatformId::Linux,
            server_variant: false,
            output_path: output.to_path_buf(),
            scene_list: vec![PathBuf::from("scenes/main.scene")],
            options: BTreeSet::from([BuildFlag::Headless]),
        }
    }

    #[test]
    fn test_job_args_shape() {
        let j = job(Path::new("/out/Linux/game.x86_64"));
        let args = CommandBackend::job_args(&j);

        assert_eq!(args[0], "--target");
        assert_eq!(args[1], "linux");
        assert_eq!(args[2], "--output");
        assert_eq!(args[3], "/out/Linux/game.x86_64");
        assert!(args.contains(&"--scene".to_string()));
        assert!(args.contains(&"scenes/main.scene".to_string()));
        assert!(args.contains(&"--headless".to_string()));
        assert!(!args.contains(&"--development".to_string()));
    }

    #[test]
    fn test_availability_not_found() {
        let backend = CommandBackend::new("definitely-not-a-real-binary-xyz", vec![]);
        let avail = backend.availability();
        assert!(!avail.is_available());
        assert!(avail.error_message().unwrap().contains("not found"));
    }

    #[test]
    fn test_successful_invocation_maps_to_succeeded() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("Linux/game.x86_64");

        // `true` exits 0 without producing the artifact, so size stays None
        let backend = CommandBackend::new("true", vec![]);
        let result = backend.build_platform(&job(&out));

        assert_eq!(result.outcome, JobOutcome::Succeeded);
        assert!(result.artifact_size.is_none());
        // Output directory was prepared for the toolchain
        assert!(out.parent().unwrap().is_dir());
    }

    #[test]
    fn test_nonzero_exit_maps_to_failed() {
        let tmp = TempDir::new().unwrap();
        let backend = CommandBackend::new("false", vec![]);
        let result = backend.build_platform(&job(&tmp.path().join("game")));

        assert_eq!(result.outcome, JobOutcome::Failed);
    }

    #[test]
    fn test_spawn_failure_is_failed_result_not_panic() {
        let tmp = TempDir::new().unwrap();
        let backend = CommandBackend::new("definitely-not-a-real-binary-xyz", vec![]);
        let result = backend.build_platform(&job(&tmp.path().join("game")));

        assert_eq!(result.outcome, JobOutcome::Failed);
        assert!(result.diagnostics.is_some());
    }

    #[test]
    fn test_stderr_captured_as_diagnostics() {
        let tmp = TempDir::new().unwrap();
        let backend = CommandBackend::new("sh", vec![
            "-c".to_string(),
            "echo boom >&2; exit 1".to_string(),
        ]);
        let result = backend.build_platform(&job(&tmp.path().join("game")));

        assert_eq!(result.outcome, JobOutcome::Failed);
        assert_eq!(result.diagnostics.as_deref(), Some("boom"));
    }

    #[test]
    fn test_artifact_size_measured_on_success() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("game.bin");
        // Toolchain stand-in that actually writes the artifact
        let backend = CommandBackend::new(
            "sh",
            vec![
                "-c".to_string(),
                format!("printf 12345 > {}", out.display()),
            ],
        );
        let result = backend.build_platform(&job(&out));

        assert_eq!(result.outcome, JobOutcome::Succeeded);
        assert_eq!(result.artifact_size, Some(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_termination_maps_to_cancelled() {
        let tmp = TempDir::new().unwrap();
        // Toolchain stand-in that interrupts itself
        let backend = CommandBackend::new("sh", vec![
            "-c".to_string(),
            "kill -INT $$".to_string(),
        ]);
        let result = backend.build_platform(&job(&tmp.path().join("game")));

        assert_eq!(result.outcome, JobOutcome::Cancelled);
    }
}
