//! Multibuild - a batch build orchestrator for multi-platform builds
//!
//! This crate provides the core library functionality for multibuild:
//! job planning, sequential orchestration with fail-fast continuation,
//! the build-backend boundary, asset mirroring, and persisted
//! configuration.

pub mod core;
pub mod ops;
pub mod orchestrator;
pub mod util;

pub use core::{
    BuildFlag, BuildJob, BuildReport, BuildRequest, JobOutcome, JobResult, OverallOutcome,
    PlatformId, UnsupportedPlatform,
};

pub use orchestrator::{
    BuildBackend, BuildPlan, CommandBackend, OrchestrateError, Orchestrator,
};
pub use util::config::{BuildConfig, ConfigStore, TomlConfigStore};
