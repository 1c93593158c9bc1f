//! Container wiring, capabilities, and profiles

use crate::prelude::*;
use revo_core::JobStatus;
use serde_json::json;
use std::collections::BTreeMap;

#[tokio::test]
async fn capabilities_reflect_settings_defaults() {
    let t = test_app(false);
    let caps = revo_engine::capabilities(&t.app.settings);
    assert!(caps.runners.contains(&"dry-run".to_string()));
    assert_eq!(caps.quality_tiers, vec!["balanced", "high", "ultra"]);
    assert_eq!(caps.defaults.quality_tier, "ultra");
}

#[tokio::test]
async fn profiles_round_trip_through_the_container() {
    let t = test_app(false);
    let mut settings = BTreeMap::new();
    settings.insert("quality_tier".to_string(), json!("high"));
    settings.insert("stage_sleep".to_string(), json!(0.5));
    t.app.profiles.put("night-batch", settings).unwrap();

    let fetched = t.app.profiles.get("night-batch").unwrap();
    assert_eq!(fetched.settings["quality_tier"], json!("high"));
    assert_eq!(t.app.profiles.list().len(), 1);
}

#[tokio::test]
async fn bootstrap_floor_funds_jobs_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let settings = revo_engine::Settings {
        runtime_dir: dir.path().join("runtime"),
        ledger_path: dir.path().join("runtime/credits_ledger.json"),
        profiles_path: dir.path().join("runtime/profiles.json"),
        output_dir: dir.path().join("outputs"),
        enforce_credits: true,
        bootstrap_credit_user: "spec-user".to_string(),
        bootstrap_credit_amount: 5,
        ..revo_engine::Settings::default()
    };
    let app = revo_engine::App::build(settings).unwrap();

    let input = dir.path().join("clip.mp4");
    std::fs::write(&input, b"fake video payload").unwrap();
    let mut req = revo_core::JobRequest::new(input.to_str().unwrap());
    req.user_id = "spec-user".to_string();
    req.runner = revo_core::RunnerChoice::DryRun;
    req.estimated_credits = Some(5);
    req.options.insert(
        "stage_sleep".to_string(),
        revo_core::OptionValue::Float(0.0),
    );
    let snapshot = app.jobs.create_job(req).unwrap();

    for _ in 0..500 {
        if app.jobs.get_job(&snapshot.id).unwrap().is_terminal() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    let job = app.jobs.get_job(&snapshot.id).unwrap();
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(app.ledger.get_balance("spec-user"), 0);
}
