// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner abstraction and selection
//!
//! A runner executes one restoration request to completion, reporting
//! stage callbacks along the way. `auto` prefers the real external
//! executable when it is on PATH and falls back to the simulated runner.

use crate::error::RunnerError;
use crate::process::LadaCliRunner;
use crate::sim::DryRunRunner;
use async_trait::async_trait;
use revo_core::{JobRequest, RunnerChoice};
use std::path::PathBuf;

/// Stage callback: `(stage_name, progress)`; may be called any number of times
pub type StageFn<'a> = dyn Fn(&str, f64) + Send + Sync + 'a;

/// Pluggable execution strategy for restoration work
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Human-readable runner name, as exposed in capability reports
    fn name(&self) -> &'static str;

    /// Run the request to completion, reporting stages through `on_stage`
    async fn run(&self, req: &JobRequest, on_stage: &StageFn<'_>) -> Result<(), RunnerError>;
}

/// Locate an executable by walking the PATH environment variable
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}

/// Build the runner for a request.
///
/// Unknown runner names are rejected earlier, when the request string is
/// parsed into a [`RunnerChoice`].
pub fn build_runner(choice: RunnerChoice) -> Box<dyn JobRunner> {
    match choice {
        RunnerChoice::DryRun => Box::new(DryRunRunner),
        RunnerChoice::LadaCli => Box::new(LadaCliRunner::default()),
        RunnerChoice::Auto => {
            if find_executable(LadaCliRunner::EXECUTABLE).is_some() {
                Box::new(LadaCliRunner::default())
            } else {
                Box::new(DryRunRunner)
            }
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
