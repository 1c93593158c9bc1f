// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated runner
//!
//! Walks a fixed stage list with a tier-dependent sleep before each
//! callback. Used when no real backend is installed and throughout the
//! test suite (`stage_sleep = 0` makes it instantaneous).

use crate::error::RunnerError;
use crate::runner::{JobRunner, StageFn};
use async_trait::async_trait;
use revo_core::{JobRequest, QualityTier};
use std::time::Duration;

/// Runner that simulates a restoration pass without touching any media
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

fn stage_sleep(req: &JobRequest) -> Duration {
    let default_secs = match req.quality_tier {
        QualityTier::Ultra => 0.9,
        QualityTier::High => 0.7,
        QualityTier::Balanced => 0.45,
    };
    let secs = req
        .options
        .get("stage_sleep")
        .and_then(|v| v.as_f64())
        .unwrap_or(default_secs)
        .max(0.0);
    Duration::from_secs_f64(secs)
}

#[async_trait]
impl JobRunner for DryRunRunner {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn run(&self, req: &JobRequest, on_stage: &StageFn<'_>) -> Result<(), RunnerError> {
        let sleep = stage_sleep(req);
        let detector = req.detector_model.as_deref().unwrap_or("unknown-detector");
        let restorer = req.restorer_model.as_deref().unwrap_or("unknown-restorer");

        let mut stages: Vec<(String, f64)> = vec![
            ("probing".to_string(), 0.05),
            ("decoding".to_string(), 0.18),
            (format!("detecting[{}]", detector), 0.40),
            (format!("restoring[{}]", restorer), 0.78),
        ];
        if let Some(refiner) = &req.refiner_model {
            stages.push((format!("refining[{}]", refiner), 0.90));
        }
        stages.push(("encoding".to_string(), 0.96));
        stages.push(("muxing".to_string(), 1.0));

        for (stage, progress) in stages {
            tokio::time::sleep(sleep).await;
            on_stage(&stage, progress);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
