//! Build outcomes, per-job results, and the aggregate report.
//!
//! Backend failure is data, not a fault: a job that failed or was
//! cancelled still produces a `JobResult`, and the engine's stop decision
//! is taken from the recorded outcome. The report always covers the full
//! plan; jobs skipped by fail-fast appear as `NotAttempted` entries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::request::BuildJob;

/// Outcome of a single build job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobOutcome {
    /// Backend produced the artifact
    Succeeded,

    /// Backend reported a build failure
    Failed,

    /// Backend was aborted by the user or environment
    Cancelled,

    /// Job never started because an earlier job stopped the run
    NotAttempted,
}

impl JobOutcome {
    /// Whether this outcome counts as a completed, successful build.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded)
    }

    /// Whether the backend was actually invoked for this job.
    pub fn was_attempted(&self) -> bool {
        !matches!(self, JobOutcome::NotAttempted)
    }
}

/// Result of one backend invocation (or a skipped job).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    /// The job this result belongs to
    pub job: BuildJob,

    /// Terminal outcome
    pub outcome: JobOutcome,

    /// Time spent in the backend (zero for skipped jobs)
    pub elapsed: Duration,

    /// Size of the produced artifact in bytes, when known
    pub artifact_size: Option<u64>,

    /// Backend diagnostic text, when any was produced
    pub diagnostics: Option<String>,
}

impl JobResult {
    /// Record a job the engine decided not to run.
    pub fn not_attempted(job: BuildJob) -> Self {
        JobResult {
            job,
            outcome: JobOutcome::NotAttempted,
            elapsed: Duration::ZERO,
            artifact_size: None,
            diagnostics: None,
        }
    }
}

/// Terminal outcome of a whole orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverallOutcome {
    /// Every planned job succeeded
    Succeeded,

    /// Some jobs succeeded and some failed, with no stop in between.
    /// Unreachable under the default fail-fast policy.
    PartialFailure,

    /// The run stopped because a job failed
    Failed,

    /// The run stopped because a job was cancelled
    Cancelled,
}

/// Aggregate report over all jobs of one build request.
///
/// Finalized once at the end of orchestration; not mutated after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Per-job results in plan order, one entry per planned job
    pub results: Vec<JobResult>,

    /// Wall-clock time from plan start to aggregation end
    pub total_elapsed: Duration,

    /// Terminal outcome of the run
    pub overall: OverallOutcome,
}

impl BuildReport {
    /// Results for jobs the backend was actually invoked for.
    pub fn attempted(&self) -> impl Iterator<Item = &JobResult> {
        self.results.iter().filter(|r| r.outcome.was_attempted())
    }

    /// Number of jobs that succeeded.
    pub fn succeeded_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    /// The job that stopped the run, if any.
    pub fn stopping_result(&self) -> Option<&JobResult> {
        self.results
            .iter()
            .find(|r| matches!(r.outcome, JobOutcome::Failed | JobOutcome::Cancelled))
    }

    /// One-line human summary distinguishing the three terminal shapes.
    pub fn summary_line(&self) -> String {
        match self.overall {
            OverallOutcome::Succeeded => format!(
                "completed all {} job(s) in {:.2}s",
                self.results.len(),
                self.total_elapsed.as_secs_f64()
            ),
            OverallOutcome::Failed => {
                let stopped = self
                    .stopping_result()
                    .map(|r| r.job.label())
                    .unwrap_or_else(|| "unknown".to_string());
                format!(
                    "stopped after failing {} ({} of {} job(s) succeeded)",
                    stopped,
                    self.succeeded_count(),
                    self.results.len()
                )
            }
            OverallOutcome::Cancelled => {
                let stopped = self
                    .stopping_result()
                    .map(|r| r.job.label())
                    .unwrap_or_else(|| "unknown".to_string());
                format!("cancelled during {}", stopped)
            }
            OverallOutcome::PartialFailure => format!(
                "{} of {} job(s) succeeded",
                self.succeeded_count(),
                self.results.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::PlatformId;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn job(platform: PlatformId) -> BuildJob {
        BuildJob {
            platform,
            server_variant: false,
            output_path: PathBuf::from(format!("/out/{}/game", platform.output_dir_name())),
            scene_list: vec![],
            options: BTreeSet::new(),
        }
    }

    fn result(platform: PlatformId, outcome: JobOutcome) -> JobResult {
        JobResult {
            job: job(platform),
            outcome,
            elapsed: Duration::from_secs(1),
            artifact_size: None,
            diagnostics: None,
        }
    }

    #[test]
    fn test_outcome_predicates() {
        assert!(JobOutcome::Succeeded.is_success());
        assert!(!JobOutcome::Failed.is_success());
        assert!(JobOutcome::Failed.was_attempted());
        assert!(JobOutcome::Cancelled.was_attempted());
        assert!(!JobOutcome::NotAttempted.was_attempted());
    }

    #[test]
    fn test_not_attempted_has_zero_elapsed() {
        let r = JobResult::not_attempted(job(PlatformId::Linux));
        assert_eq!(r.outcome, JobOutcome::NotAttempted);
        assert_eq!(r.elapsed, Duration::ZERO);
        assert!(r.artifact_size.is_none());
    }

    #[test]
    fn test_report_attempted_filters_skipped() {
        let report = BuildReport {
            results: vec![
                result(PlatformId::Windows, JobOutcome::Succeeded),
                result(PlatformId::MacOS, JobOutcome::Failed),
                JobResult::not_attempted(job(PlatformId::Linux)),
            ],
            total_elapsed: Duration::from_secs(3),
            overall: OverallOutcome::Failed,
        };

        assert_eq!(report.attempted().count(), 2);
        assert_eq!(report.succeeded_count(), 1);
        assert_eq!(
            report.stopping_result().unwrap().job.platform,
            PlatformId::MacOS
        );
    }

    #[test]
    fn test_summary_line_failed_names_platform() {
        let report = BuildReport {
            results: vec![
                result(PlatformId::Windows, JobOutcome::Succeeded),
                result(PlatformId::Linux, JobOutcome::Failed),
            ],
            total_elapsed: Duration::from_secs(2),
            overall: OverallOutcome::Failed,
        };
        let line = report.summary_line();
        assert!(line.contains("stopped after failing linux"));
        assert!(line.contains("1 of 2"));
    }

    #[test]
    fn test_summary_line_cancelled_names_platform() {
        let report = BuildReport {
            results: vec![result(PlatformId::Windows, JobOutcome::Cancelled)],
            total_elapsed: Duration::from_secs(1),
            overall: OverallOutcome::Cancelled,
        };
        assert!(report.summary_line().contains("cancelled during windows"));
    }

    #[test]
    fn test_report_serialization_roundtrip() {
        let report = BuildReport {
            results: vec![result(PlatformId::Windows, JobOutcome::Succeeded)],
            total_elapsed: Duration::from_millis(1500),
            overall: OverallOutcome::Succeeded,
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: BuildReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.overall, OverallOutcome::Succeeded);
        assert_eq!(back.results.len(), 1);
    }
}
