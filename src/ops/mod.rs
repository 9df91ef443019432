//! High-level operations.
//!
//! This module contains the implementation of multibuild commands.

pub mod run_batch;

pub use run_batch::{materialize_request, run_batch, RunOptions};
