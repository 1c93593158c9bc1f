// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! revo-engine: runners and the job orchestrator
//!
//! This crate provides:
//! - The [`JobRunner`] abstraction with a simulated stepper and an
//!   external-process supervisor
//! - The [`JobManager`] orchestrator: job registry, state machine, and a
//!   single-worker FIFO dispatch loop with credit reservation/refund
//! - Supporting collaborators: output pathing, the ffmpeg metadata probe,
//!   environment settings, and the app container

pub mod capabilities;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pathing;
pub mod probe;
pub mod process;
pub mod runner;
pub mod sim;

pub use capabilities::{capabilities, Capabilities, CapabilityDefaults};
pub use config::{App, Settings};
pub use error::{EngineError, RunnerError};
pub use orchestrator::JobManager;
pub use probe::{probe_video, VideoProbe};
pub use process::LadaCliRunner;
pub use runner::{build_runner, find_executable, JobRunner, StageFn};
pub use sim::DryRunRunner;
