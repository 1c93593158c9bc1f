//! Credit accounting through the job lifecycle

use crate::prelude::*;
use revo_core::{JobStatus, RunnerChoice};
use revo_ledger::TxnKind;

#[tokio::test]
async fn successful_job_keeps_the_reservation_spent() {
    let t = test_app(true);
    t.app.ledger.topup("spec-user", 10, "spec_topup").unwrap();

    let mut req = fast_request(&t);
    req.estimated_credits = Some(4);
    let snapshot = t.app.jobs.create_job(req).unwrap();

    let job = wait_terminal(&t, &snapshot.id).await;
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.credits_reserved, 4);
    assert_eq!(t.app.ledger.get_balance("spec-user"), 6);

    let txns = t.app.ledger.list_transactions(Some("spec-user"));
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[1].kind, TxnKind::Reserve);
    assert_eq!(txns[1].amount, -4);
    assert_eq!(txns[1].ref_id.as_deref(), Some(job.id.as_str()));
}

#[tokio::test]
async fn failed_job_is_refunded_exactly_once() {
    let t = test_app(true);
    t.app.ledger.topup("spec-user", 10, "spec_topup").unwrap();

    let mut req = fast_request(&t);
    // The external binary is not installed, so this fails after reserving.
    req.runner = RunnerChoice::LadaCli;
    req.estimated_credits = Some(3);
    let snapshot = t.app.jobs.create_job(req).unwrap();

    let job = wait_terminal(&t, &snapshot.id).await;
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.is_some());
    assert_eq!(t.app.ledger.get_balance("spec-user"), 10);

    let kinds: Vec<TxnKind> = t
        .app
        .ledger
        .list_transactions(Some("spec-user"))
        .iter()
        .map(|txn| txn.kind)
        .collect();
    assert_eq!(kinds, vec![TxnKind::Topup, TxnKind::Reserve, TxnKind::Refund]);
}

#[tokio::test]
async fn broke_user_gets_a_failed_job_and_an_untouched_ledger() {
    let t = test_app(true);

    let mut req = fast_request(&t);
    req.estimated_credits = Some(5);
    let snapshot = t.app.jobs.create_job(req).unwrap();

    let job = wait_terminal(&t, &snapshot.id).await;
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.credits_reserved, 0);
    assert!(job.error.unwrap().contains("insufficient credits"));
    assert_eq!(t.app.ledger.get_balance("spec-user"), 0);
    assert!(t.app.ledger.list_transactions(Some("spec-user")).is_empty());
}

#[tokio::test]
async fn ledger_survives_a_container_rebuild() {
    let t = test_app(true);
    t.app.ledger.topup("spec-user", 8, "spec_topup").unwrap();

    let mut req = fast_request(&t);
    req.estimated_credits = Some(2);
    let snapshot = t.app.jobs.create_job(req).unwrap();
    wait_terminal(&t, &snapshot.id).await;

    let settings = t.app.settings.clone();
    let rebuilt = revo_engine::App::build(settings).unwrap();
    assert_eq!(rebuilt.ledger.get_balance("spec-user"), 6);
    assert_eq!(rebuilt.ledger.list_transactions(Some("spec-user")).len(), 2);
}
