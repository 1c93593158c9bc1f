//! End-to-end job lifecycle through the container

use crate::prelude::*;
use revo_core::{JobStatus, QualityTier};

#[tokio::test]
async fn dry_run_job_runs_to_done_with_materialized_output() {
    let t = test_app(false);
    let snapshot = t.app.jobs.create_job(fast_request(&t)).unwrap();
    assert_eq!(snapshot.status, JobStatus::Queued);
    assert_eq!(snapshot.stage, "queued");
    assert_eq!(snapshot.progress, 0.0);

    let job = wait_terminal(&t, &snapshot.id).await;
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.progress, 1.0);
    assert_eq!(job.error, None);

    let output = job.request.output_path.unwrap();
    assert!(output.contains("_restored_"));
    assert!(output.ends_with(".mp4"));
    // The dry run copied the input into place.
    assert_eq!(std::fs::read(&output).unwrap(), b"fake video payload");
}

#[tokio::test]
async fn submission_snapshot_carries_resolved_models_and_pricing() {
    let t = test_app(false);
    let mut req = fast_request(&t);
    req.quality_tier = QualityTier::Ultra;
    req.duration_hint_seconds = Some(600);

    let snapshot = t.app.jobs.create_job(req).unwrap();
    assert_eq!(
        snapshot.request.detector_model.as_deref(),
        Some("mask2former-swinl-candidate")
    );
    assert_eq!(
        snapshot.request.restorer_model.as_deref(),
        Some("vrt-large-candidate")
    );
    assert_eq!(
        snapshot.request.refiner_model.as_deref(),
        Some("diffusion-video-refiner-candidate")
    );
    // ceil(600 / 120) * 4 for ultra
    assert_eq!(snapshot.request.estimated_credits, Some(20));

    wait_terminal(&t, &snapshot.id).await;
}

#[tokio::test]
async fn jobs_run_in_submission_order() {
    let t = test_app(false);
    let first = t.app.jobs.create_job(fast_request(&t)).unwrap();
    let second = t.app.jobs.create_job(fast_request(&t)).unwrap();

    let second_done = wait_terminal(&t, &second.id).await;
    let first_done = t.app.jobs.get_job(&first.id).unwrap();
    // By the time the later job finished, the earlier one must have too.
    assert_eq!(first_done.status, JobStatus::Done);
    assert!(first_done.updated_at <= second_done.updated_at);
}

#[tokio::test]
async fn stage_callbacks_surface_in_the_registry() {
    let t = test_app(false);
    let mut req = fast_request(&t);
    req.refiner_model = Some("diffusion-video-refiner-candidate".to_string());
    let snapshot = t.app.jobs.create_job(req).unwrap();

    let job = wait_terminal(&t, &snapshot.id).await;
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.stage, "done");
    assert!(job.updated_at >= job.created_at);
}
