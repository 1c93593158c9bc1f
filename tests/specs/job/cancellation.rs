//! Cancellation semantics: queued jobs only

use crate::prelude::*;
use revo_core::{JobStatus, OptionValue};
use revo_engine::EngineError;
use std::time::Duration;

#[tokio::test]
async fn queued_job_cancels_and_is_skipped_by_the_worker() {
    let t = test_app(false);

    let mut blocker = fast_request(&t);
    blocker
        .options
        .insert("stage_sleep".to_string(), OptionValue::Float(0.15));
    let blocker = t.app.jobs.create_job(blocker).unwrap();
    let victim = t.app.jobs.create_job(fast_request(&t)).unwrap();

    let canceled = t.app.jobs.cancel_job(&victim.id).unwrap();
    assert_eq!(canceled.status, JobStatus::Canceled);
    assert_eq!(canceled.stage, "canceled");

    wait_terminal(&t, &blocker.id).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let victim = t.app.jobs.get_job(&victim.id).unwrap();
    assert_eq!(victim.status, JobStatus::Canceled);
    assert_eq!(victim.progress, 0.0);
}

#[tokio::test]
async fn cancel_is_a_no_op_on_finished_jobs() {
    let t = test_app(false);
    let snapshot = t.app.jobs.create_job(fast_request(&t)).unwrap();
    let done = wait_terminal(&t, &snapshot.id).await;
    assert_eq!(done.status, JobStatus::Done);

    let after = t.app.jobs.cancel_job(&snapshot.id).unwrap();
    assert_eq!(after.status, JobStatus::Done);
    assert_eq!(after.progress, 1.0);
}

#[tokio::test]
async fn cancel_of_unknown_job_is_not_found() {
    let t = test_app(false);
    assert!(matches!(
        t.app.jobs.cancel_job("missing"),
        Err(EngineError::JobNotFound(_))
    ));
}
