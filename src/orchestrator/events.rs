//! Build event types for JSON output.
//!
//! This module defines the stable JSON schema for machine-readable build
//! output, emitted when using `--message-format=json`. Each event is one
//! JSON object per line.
//!
//! # Event Types
//!
//! - `build-started`: Orchestration began, with the planned job count
//! - `job-finished`: One backend job completed (any outcome)
//! - `build-finished`: The run reached its terminal outcome
//!
//! # Stability
//!
//! The JSON schema is versioned and should remain backwards compatible.
//! New fields may be added, but existing fields should not be removed or
//! renamed.

use serde::Serialize;

use crate::core::report::{BuildReport, JobResult};

/// A build event emitted during the batch build.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum BuildEvent {
    /// Orchestration began.
    #[serde(rename = "build-started")]
    BuildStarted {
        /// Build name
        name: String,
        /// Selected platforms in build order
        platforms: Vec<String>,
        /// Number of planned jobs (server variants included)
        job_count: u64,
    },

    /// One backend job completed.
    #[serde(rename = "job-finished")]
    JobFinished {
        /// Platform identifier
        platform: String,
        /// Whether this was the headless server variant
        server_variant: bool,
        /// Outcome ("succeeded", "failed", "cancelled", "not-attempted")
        outcome: String,
        /// Job duration in milliseconds
        duration_ms: u64,
        /// Artifact size in bytes, when known
        #[serde(skip_serializing_if = "Option::is_none")]
        artifact_size: Option<u64>,
        /// Backend diagnostic text, when any
        #[serde(skip_serializing_if = "Option::is_none")]
        diagnostics: Option<String>,
    },

    /// The run reached its terminal outcome.
    #[serde(rename = "build-finished")]
    BuildFinished {
        /// Overall outcome ("succeeded", "failed", "cancelled", ...)
        outcome: String,
        /// Wall-clock duration in milliseconds
        duration_ms: u64,
        /// Number of jobs that succeeded
        jobs_succeeded: u64,
        /// Number of planned jobs
        jobs_planned: u64,
    },
}

impl BuildEvent {
    /// Create a build started event.
    pub fn started(name: impl Into<String>, platforms: Vec<String>, job_count: usize) -> Self {
        BuildEvent::BuildStarted {
            name: name.into(),
            platforms,
            job_count: job_count as u64,
        }
    }

    /// Create a job finished event from a result.
    pub fn job_finished(result: &JobResult) -> Self {
        BuildEvent::JobFinished {
            platform: result.job.platform.to_string(),
            server_variant: result.job.server_variant,
            outcome: outcome_str(result.outcome),
            duration_ms: result.elapsed.as_millis() as u64,
            artifact_size: result.artifact_size,
            diagnostics: result.diagnostics.clone(),
        }
    }

    /// Create a build finished event from a report.
    pub fn finished(report: &BuildReport) -> Self {
        BuildEvent::BuildFinished {
            outcome: overall_str(report),
            duration_ms: report.total_elapsed.as_millis() as u64,
            jobs_succeeded: report.succeeded_count() as u64,
            jobs_planned: report.results.len() as u64,
        }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn outcome_str(outcome: crate::core::report::JobOutcome) -> String {
    use crate::core::report::JobOutcome::*;
    match outcome {
        Succeeded => "succeeded",
        Failed => "failed",
        Cancelled => "cancelled",
        NotAttempted => "not-attempted",
    }
    .to_string()
}

fn overall_str(report: &BuildReport) -> String {
    use crate::core::report::OverallOutcome::*;
    match report.overall {
        Succeeded => "succeeded",
        PartialFailure => "partial-failure",
        Failed => "failed",
        Cancelled => "cancelled",
    }
    .to_string()
}
