// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External process runner
//!
//! Supervises a `lada-cli` invocation: builds the argument list from the
//! request, merges the child's stdout and stderr into one line stream, and
//! derives progress from `NN%` markers in the output. When the child goes
//! quiet, progress is extrapolated from elapsed wall time against the
//! request's duration hint, capped below the last marker-derived ceiling.

use crate::error::RunnerError;
use crate::runner::{JobRunner, StageFn};
use async_trait::async_trait;
use regex::Regex;
use revo_core::{JobRequest, OptionValue};
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

#[allow(clippy::expect_used)]
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})\s*%").expect("constant regex pattern is valid"));

/// How long to wait for output before extrapolating progress
const POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Lines of child output kept for the failure report
const LOG_TAIL_LINES: usize = 20;

/// Progress band covered by the external restoration pass. Everything
/// before spawn maps below `BAND_START`; encode/mux happens above
/// `BAND_END`.
const BAND_START: f64 = 0.30;
const BAND_END: f64 = 0.95;

/// Ceiling for extrapolated progress, kept under real marker progress
const EXTRAPOLATION_CAP: f64 = 0.93;

/// Runner that shells out to the `lada-cli` executable
#[derive(Debug, Clone)]
pub struct LadaCliRunner {
    command: String,
}

impl LadaCliRunner {
    /// Executable name probed on PATH by `auto` runner selection
    pub const EXECUTABLE: &'static str = "lada-cli";

    /// Use a different executable, for tests that substitute a script
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for LadaCliRunner {
    fn default() -> Self {
        Self::with_command(Self::EXECUTABLE)
    }
}

/// Build the child argument list from a request.
///
/// Request options are forwarded as CLI flags: `frame_pad: 4` becomes
/// `--frame-pad 4`, booleans become bare flags (`true`) or are dropped
/// (`false`).
fn build_args(req: &JobRequest, output_path: &str) -> Vec<String> {
    let mut args = vec![
        "--input".to_string(),
        req.input_path.clone(),
        "--output".to_string(),
        output_path.to_string(),
    ];
    if let Some(detector) = &req.detector_model {
        args.push("--mosaic-detection-model".to_string());
        args.push(detector.clone());
    }
    if let Some(restorer) = &req.restorer_model {
        args.push("--mosaic-restoration-model".to_string());
        args.push(restorer.clone());
    }
    for (key, value) in &req.options {
        let flag = format!("--{}", key.replace('_', "-"));
        match value {
            OptionValue::Bool(true) => args.push(flag),
            OptionValue::Bool(false) => {}
            other => {
                args.push(flag);
                args.push(other.to_string());
            }
        }
    }
    args
}

/// Extract the highest percent marker from one output line
fn parse_percent(line: &str) -> Option<u32> {
    PERCENT_RE
        .captures_iter(line)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .map(|pct| pct.min(100))
        .max()
}

/// Wall-time estimate for the whole pass, in seconds
fn max_expected_seconds(req: &JobRequest) -> f64 {
    let hint = req.duration_hint_seconds.unwrap_or(30);
    (f64::from(hint) * 1.2).max(8.0)
}

async fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line).is_err() {
            break;
        }
    }
}

#[async_trait]
impl JobRunner for LadaCliRunner {
    fn name(&self) -> &'static str {
        "lada-cli"
    }

    async fn run(&self, req: &JobRequest, on_stage: &StageFn<'_>) -> Result<(), RunnerError> {
        let output_path = req
            .output_path
            .as_deref()
            .ok_or(RunnerError::MissingOutputPath)?;

        on_stage("probing", 0.05);

        let args = build_args(req, output_path);
        tracing::info!(command = %self.command, ?args, "spawning restoration process");

        on_stage("restoring", BAND_START);
        let started = Instant::now();

        let mut child = tokio::process::Command::new(&self.command)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, tx.clone()));
        }
        drop(tx);

        let max_expected = max_expected_seconds(req);
        let mut progress = BAND_START;
        let mut log_tail: Vec<String> = Vec::new();

        loop {
            match tokio::time::timeout(POLL_INTERVAL, rx.recv()).await {
                Ok(Some(line)) => {
                    if !line.trim().is_empty() {
                        log_tail.push(line.clone());
                        if log_tail.len() > LOG_TAIL_LINES {
                            log_tail.remove(0);
                        }
                    }
                    if let Some(pct) = parse_percent(&line) {
                        let mapped = BAND_START + f64::from(pct) / 100.0 * (BAND_END - BAND_START);
                        progress = progress.max(mapped);
                        on_stage("restoring", progress.min(BAND_END));
                    }
                }
                Ok(None) => break,
                Err(_) => {
                    let elapsed = started.elapsed().as_secs_f64();
                    let guessed =
                        (BAND_START + elapsed / max_expected * 0.6).min(EXTRAPOLATION_CAP);
                    if guessed > progress {
                        progress = guessed;
                        on_stage("restoring", progress.min(BAND_END));
                    }
                }
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            tracing::warn!(code = ?status.code(), "restoration process failed");
            let detail = log_tail.join("\n");
            let message = if detail.trim().is_empty() {
                "lada-cli execution failed".to_string()
            } else {
                detail
            };
            return Err(RunnerError::Failed(message));
        }

        on_stage("encoding", 0.97);
        on_stage("done", 1.0);
        Ok(())
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
