// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Video metadata probe
//!
//! Shells out to `ffprobe` for duration, frame rate, and frame count.
//! The probe only feeds hints (pricing defaults, fps/eta estimates), so
//! every failure path degrades to an empty probe instead of erroring.

use crate::runner::find_executable;
use serde_json::Value;

/// Metadata extracted from the input video, all fields best-effort
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VideoProbe {
    pub duration_seconds: Option<f64>,
    pub fps: Option<f64>,
    pub total_frames: Option<u64>,
}

/// Parse an ffprobe rate string, either `30` or rational `30000/1001`
fn parse_rate(raw: &str) -> Option<f64> {
    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }
    raw.parse().ok()
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn parse_probe_output(payload: &Value) -> VideoProbe {
    let stream = payload
        .get("streams")
        .and_then(|s| s.get(0))
        .unwrap_or(&Value::Null);
    let fps = stream
        .get("avg_frame_rate")
        .and_then(Value::as_str)
        .and_then(parse_rate)
        .filter(|f| f.is_finite());
    let duration = stream
        .get("duration")
        .and_then(as_f64)
        .or_else(|| payload.pointer("/format/duration").and_then(as_f64))
        .filter(|d| d.is_finite());
    let mut frames = stream
        .get("nb_frames")
        .and_then(Value::as_str)
        .filter(|raw| *raw != "N/A")
        .and_then(|raw| raw.parse::<u64>().ok());
    if frames.is_none() {
        if let (Some(d), Some(f)) = (duration, fps) {
            if f > 0.0 {
                frames = Some(((d * f) as u64).max(1));
            }
        }
    }
    VideoProbe {
        duration_seconds: duration,
        fps,
        total_frames: frames,
    }
}

/// Probe the input with ffprobe; returns an empty probe when ffprobe is
/// missing, fails, or emits something unparseable
pub async fn probe_video(input_path: &str) -> VideoProbe {
    if find_executable("ffprobe").is_none() {
        return VideoProbe::default();
    }
    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=avg_frame_rate,nb_frames,duration",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
            input_path,
        ])
        .output()
        .await;
    let output = match output {
        Ok(out) if out.status.success() => out,
        Ok(out) => {
            tracing::debug!(input_path, code = ?out.status.code(), "ffprobe failed");
            return VideoProbe::default();
        }
        Err(err) => {
            tracing::debug!(input_path, error = %err, "could not launch ffprobe");
            return VideoProbe::default();
        }
    };
    match serde_json::from_slice::<Value>(&output.stdout) {
        Ok(payload) => parse_probe_output(&payload),
        Err(err) => {
            tracing::debug!(input_path, error = %err, "unparseable ffprobe output");
            VideoProbe::default()
        }
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
