// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and status machine
//!
//! A job is created `queued`, moves to `running` when the worker picks it
//! up, and ends in `done`, `failed`, or `canceled`. Cancellation only
//! intercepts jobs that have not started executing; there is no transition
//! out of `running` except to a terminal state.

use crate::catalog::QualityTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Validation errors raised when a create request is malformed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("estimated_credits must be >= 1")]
    InvalidCredits,
    #[error("duration_hint_seconds must be >= 1")]
    InvalidDuration,
    #[error("unsupported runner: {0}")]
    UnsupportedRunner(String),
}

/// Lifecycle status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
    Canceled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed | JobStatus::Canceled)
    }

    pub fn name(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
        }
    }
}

/// Free-form option value forwarded to runners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl OptionValue {
    /// Numeric view, used for numeric tuning options like `stage_sleep`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Int(n) => Some(*n as f64),
            OptionValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(n) => write!(f, "{}", n),
            OptionValue::Float(x) => write!(f, "{}", x),
            OptionValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Execution strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerChoice {
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "dry-run")]
    DryRun,
    #[serde(rename = "lada-cli")]
    LadaCli,
}

impl RunnerChoice {
    pub fn name(&self) -> &'static str {
        match self {
            RunnerChoice::Auto => "auto",
            RunnerChoice::DryRun => "dry-run",
            RunnerChoice::LadaCli => "lada-cli",
        }
    }
}

impl std::str::FromStr for RunnerChoice {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(RunnerChoice::Auto),
            "dry-run" => Ok(RunnerChoice::DryRun),
            "lada-cli" => Ok(RunnerChoice::LadaCli),
            other => Err(RequestError::UnsupportedRunner(other.to_string())),
        }
    }
}

/// Request to create a restoration job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub input_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub estimated_credits: Option<u32>,
    #[serde(default)]
    pub duration_hint_seconds: Option<u32>,
    #[serde(default = "default_runner")]
    pub runner: RunnerChoice,
    #[serde(default = "default_tier")]
    pub quality_tier: QualityTier,
    #[serde(default)]
    pub detector_model: Option<String>,
    #[serde(default)]
    pub restorer_model: Option<String>,
    #[serde(default)]
    pub refiner_model: Option<String>,
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
}

fn default_user_id() -> String {
    "anonymous".to_string()
}

fn default_runner() -> RunnerChoice {
    RunnerChoice::Auto
}

fn default_tier() -> QualityTier {
    QualityTier::Ultra
}

impl JobRequest {
    /// Minimal request with defaults for everything but the input path
    pub fn new(input_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            user_id: default_user_id(),
            estimated_credits: None,
            duration_hint_seconds: None,
            runner: default_runner(),
            quality_tier: default_tier(),
            detector_model: None,
            restorer_model: None,
            refiner_model: None,
            options: BTreeMap::new(),
        }
    }

    /// Validate value constraints on the request
    pub fn validate(&self) -> Result<(), RequestError> {
        if matches!(self.estimated_credits, Some(0)) {
            return Err(RequestError::InvalidCredits);
        }
        if matches!(self.duration_hint_seconds, Some(0)) {
            return Err(RequestError::InvalidDuration);
        }
        Ok(())
    }
}

/// A tracked restoration job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub request: JobRequest,
    pub status: JobStatus,
    pub stage: String,
    pub progress: f64,
    pub credits_reserved: u32,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new queued job from a resolved request
    pub fn new(id: impl Into<String>, request: JobRequest) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            request,
            status: JobStatus::Queued,
            stage: "queued".to_string(),
            progress: 0.0,
            credits_reserved: 0,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Mark the job as picked up by the worker
    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.stage = "starting".to_string();
        self.progress = 0.01;
        self.touch();
    }

    /// Record a successful credit reservation
    pub fn set_reserved(&mut self, amount: u32) {
        self.credits_reserved = amount;
        self.touch();
    }

    /// Record a stage callback; progress is clamped into [0, 1]
    pub fn set_stage(&mut self, stage: &str, progress: f64) {
        self.stage = stage.to_string();
        self.progress = progress.clamp(0.0, 1.0);
        self.touch();
    }

    /// Terminal success
    pub fn mark_done(&mut self) {
        self.status = JobStatus::Done;
        self.stage = "done".to_string();
        self.progress = 1.0;
        self.touch();
    }

    /// Terminal failure with the captured error text
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.stage = "failed".to_string();
        self.error = Some(error.into());
        self.touch();
    }

    /// Cancel a job that has not started yet.
    ///
    /// Returns true if the job transitioned; running and terminal jobs are
    /// left untouched.
    pub fn cancel(&mut self) -> bool {
        if self.status != JobStatus::Queued {
            return false;
        }
        self.status = JobStatus::Canceled;
        self.stage = "canceled".to_string();
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
