// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress estimation from stage callbacks
//!
//! Derives throughput (fps) and a remaining-time estimate from fractional
//! progress, elapsed wall time, and an optional frame-count hint from the
//! metadata probe. Both figures degrade to `None` when there is not enough
//! signal; nothing here is required for correctness.

use crate::clock::Clock;
use std::time::{Duration, Instant};

/// Point-in-time throughput estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    pub elapsed: Duration,
    pub fps: Option<f64>,
    pub eta: Option<Duration>,
}

/// Estimate fps/eta for a given elapsed time and progress fraction
pub fn estimate(elapsed: Duration, progress: f64, frame_count: Option<u64>) -> ProgressSample {
    let secs = elapsed.as_secs_f64().max(0.001);
    let fps = match frame_count {
        Some(frames) if progress > 0.0 => Some(frames as f64 * progress / secs),
        _ => None,
    };
    let eta = if progress > 0.0 {
        Some(Duration::from_secs_f64(secs * (1.0 - progress) / progress))
    } else {
        None
    };
    ProgressSample {
        elapsed,
        fps,
        eta,
    }
}

/// Tracks one job's progress against its start time
pub struct ProgressTracker<C: Clock> {
    clock: C,
    started: Instant,
    frame_count: Option<u64>,
}

impl<C: Clock> ProgressTracker<C> {
    pub fn new(clock: C, frame_count: Option<u64>) -> Self {
        let started = clock.now();
        Self {
            clock,
            started,
            frame_count,
        }
    }

    /// Sample throughput at the given progress fraction
    pub fn sample(&self, progress: f64) -> ProgressSample {
        let elapsed = self.clock.now().duration_since(self.started);
        estimate(elapsed, progress.clamp(0.0, 1.0), self.frame_count)
    }
}
