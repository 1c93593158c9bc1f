// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for runners and the orchestrator

use revo_core::RequestError;
use revo_ledger::LedgerError;
use revo_storage::StoreError;
use thiserror::Error;

/// Errors raised by a runner while executing a job.
///
/// These never escape the orchestrator; they end up as the failed job's
/// `error` text.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("output_path is required for the lada-cli runner")]
    MissingOutputPath,
    #[error("failed to launch {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(String),
}

/// Errors that can occur in orchestrator operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("job not found: {0}")]
    JobNotFound(String),
    #[error("job queue is shut down")]
    QueueClosed,
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
