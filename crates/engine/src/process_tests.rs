// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::{Arc, Mutex};

fn request() -> JobRequest {
    let mut req = JobRequest::new("/videos/in.mp4");
    req.output_path = Some("/videos/out.mp4".to_string());
    req
}

#[test]
fn args_carry_paths_models_and_options() {
    let mut req = request();
    req.detector_model = Some("det-a".to_string());
    req.restorer_model = Some("res-b".to_string());
    req.options
        .insert("frame_pad".to_string(), OptionValue::Int(4));
    req.options
        .insert("keep_audio".to_string(), OptionValue::Bool(true));
    req.options
        .insert("two_pass".to_string(), OptionValue::Bool(false));

    let args = build_args(&req, "/videos/out.mp4");
    assert_eq!(
        args,
        vec![
            "--input",
            "/videos/in.mp4",
            "--output",
            "/videos/out.mp4",
            "--mosaic-detection-model",
            "det-a",
            "--mosaic-restoration-model",
            "res-b",
            "--frame-pad",
            "4",
            "--keep-audio",
        ]
    );
}

#[test]
fn percent_markers_are_parsed_and_clamped() {
    assert_eq!(parse_percent("progress: 42%"), Some(42));
    assert_eq!(parse_percent("done 7 % of pass"), Some(7));
    assert_eq!(parse_percent("10% then 55%"), Some(55));
    assert_eq!(parse_percent("999%"), Some(100));
    assert_eq!(parse_percent("no markers here"), None);
}

#[test]
fn wall_time_estimate_floors_at_eight_seconds() {
    let mut req = request();
    assert!((max_expected_seconds(&req) - 36.0).abs() < 1e-9);
    req.duration_hint_seconds = Some(100);
    assert!((max_expected_seconds(&req) - 120.0).abs() < 1e-9);
    req.duration_hint_seconds = Some(1);
    assert!((max_expected_seconds(&req) - 8.0).abs() < 1e-9);
}

#[tokio::test]
async fn missing_output_path_is_rejected_before_spawn() {
    let req = JobRequest::new("/videos/in.mp4");
    let err = LadaCliRunner::default()
        .run(&req, &|_, _| {})
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::MissingOutputPath));
}

#[cfg(unix)]
fn write_script(dir: &std::path::Path, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("fake-lada-cli");
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

#[cfg(unix)]
fn stage_sink() -> (Arc<Mutex<Vec<(String, f64)>>>, impl Fn(&str, f64)) {
    let stages: Arc<Mutex<Vec<(String, f64)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = stages.clone();
    let on_stage = move |stage: &str, progress: f64| {
        sink.lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((stage.to_string(), progress));
    };
    (stages, on_stage)
}

#[cfg(unix)]
#[tokio::test]
async fn successful_process_maps_markers_into_the_band() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo '10%'\necho '50%'\necho '100%'\n");
    let (stages, on_stage) = stage_sink();

    LadaCliRunner::with_command(script)
        .run(&request(), &on_stage)
        .await
        .unwrap();

    let stages = stages.lock().unwrap_or_else(|e| e.into_inner()).clone();
    let restoring: Vec<f64> = stages
        .iter()
        .filter(|(s, _)| s == "restoring")
        .map(|(_, p)| *p)
        .collect();
    assert!(restoring.windows(2).all(|w| w[0] <= w[1]));
    assert!(restoring.iter().all(|p| (0.30..=0.95).contains(p)));
    assert_eq!(stages.last().map(|(s, p)| (s.as_str(), *p)), Some(("done", 1.0)));
}

#[cfg(unix)]
#[tokio::test]
async fn failing_process_reports_its_output_tail() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo 'model file missing' >&2\nexit 3\n");

    let err = LadaCliRunner::with_command(script)
        .run(&request(), &|_, _| {})
        .await
        .unwrap_err();

    match err {
        RunnerError::Failed(message) => assert!(message.contains("model file missing")),
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn silent_failure_gets_a_generic_message() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "exit 1\n");

    let err = LadaCliRunner::with_command(script)
        .run(&request(), &|_, _| {})
        .await
        .unwrap_err();

    match err {
        RunnerError::Failed(message) => assert_eq!(message, "lada-cli execution failed"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unlaunchable_command_is_a_spawn_error() {
    let err = LadaCliRunner::with_command("/nonexistent/revo-fake-bin")
        .run(&request(), &|_, _| {})
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::Spawn { .. }));
}
