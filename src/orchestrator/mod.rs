//! Multi-target build orchestration.
//!
//! This module implements the batch-build engine: job planning, the
//! backend adapter boundary, sequential execution with fail-fast
//! continuation, and machine-readable build events.

pub mod backend;
pub mod engine;
pub mod events;
pub mod plan;

pub use backend::{BackendAvailability, BuildBackend, CommandBackend};
pub use engine::{OrchestrateError, Orchestrator, COPY_DEST_DIR};
pub use events::BuildEvent;
pub use plan::BuildPlan;
