// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! revo-core: Domain types for the revo restoration orchestrator
//!
//! This crate provides:
//! - The job record, status machine, and create-request validation
//! - Quality tiers, the model catalog, and credit pricing
//! - Progress estimation (fps / eta) from stage callbacks
//! - Clock and ID-generation abstractions for testable time and identity

pub mod clock;
pub mod id;

pub mod catalog;
pub mod job;
pub mod pricing;
pub mod progress;

// Re-exports
pub use catalog::{
    model_catalog, resolve_models, ModelCard, ModelCatalog, ModelRole, QualityPreset, QualityTier,
    ResolvedModels,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use job::{Job, JobRequest, JobStatus, OptionValue, RequestError, RunnerChoice};
pub use pricing::estimate_credits;
pub use progress::{ProgressSample, ProgressTracker};
