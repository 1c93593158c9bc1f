// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job orchestrator
//!
//! Owns the job registry and a single worker task that drains a FIFO
//! queue, one job at a time. Submission resolves models, pricing, and the
//! output path up front; execution reserves credits, drives the runner,
//! and compensates failed reservations with exactly one refund.
//!
//! Locking: the registry mutex and the ledger's internal lock are never
//! held together. Runner errors never propagate out of the worker; they
//! surface through the failed job's `error` field.

use crate::error::EngineError;
use crate::{pathing, probe, runner};
use revo_core::{
    estimate_credits, resolve_models, IdGen, Job, JobRequest, JobStatus, ProgressTracker,
    SystemClock, UuidIdGen,
};
use revo_ledger::CreditLedger;
use revo_storage::StoreError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

struct Inner {
    jobs: Mutex<HashMap<String, Job>>,
    ledger: Arc<CreditLedger>,
    enforce_credits: bool,
    output_dir: PathBuf,
}

impl Inner {
    fn lock_jobs(&self) -> MutexGuard<'_, HashMap<String, Job>> {
        self.jobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Orchestrates restoration jobs over a shared credit ledger.
///
/// Must be started from within a tokio runtime; the worker task exits
/// once the manager is dropped and the queue has drained.
pub struct JobManager<I: IdGen = UuidIdGen> {
    inner: Arc<Inner>,
    id_gen: I,
    tx: mpsc::UnboundedSender<String>,
}

impl JobManager<UuidIdGen> {
    /// Start the orchestrator and its worker task
    pub fn start(
        ledger: Arc<CreditLedger>,
        enforce_credits: bool,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::start_with_ids(ledger, enforce_credits, output_dir, UuidIdGen)
    }
}

impl<I: IdGen> JobManager<I> {
    /// Start with a custom ID generator (tests)
    pub fn start_with_ids(
        ledger: Arc<CreditLedger>,
        enforce_credits: bool,
        output_dir: impl Into<PathBuf>,
        id_gen: I,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let inner = Arc::new(Inner {
            jobs: Mutex::new(HashMap::new()),
            ledger,
            enforce_credits,
            output_dir: output_dir.into(),
        });
        tokio::spawn(worker_loop(inner.clone(), rx));
        Self { inner, id_gen, tx }
    }

    /// Validate and register a job, enqueue it, and return its snapshot.
    ///
    /// Models, the credit estimate, and the output path are resolved here
    /// so the returned snapshot already shows what the job will run with.
    pub fn create_job(&self, req: JobRequest) -> Result<Job, EngineError> {
        req.validate()?;
        let mut req = req;

        let models = resolve_models(
            req.quality_tier,
            req.detector_model.as_deref(),
            req.restorer_model.as_deref(),
            req.refiner_model.as_deref(),
        );
        req.detector_model = Some(models.detector);
        req.restorer_model = Some(models.restorer);
        req.refiner_model = models.refiner;

        let estimated = req
            .estimated_credits
            .unwrap_or_else(|| estimate_credits(req.duration_hint_seconds, req.quality_tier));
        req.estimated_credits = Some(estimated);

        let output = pathing::resolve_output_path(
            &req.input_path,
            req.output_path.as_deref(),
            &self.inner.output_dir,
        )
        .map_err(StoreError::from)?;
        req.output_path = Some(output.display().to_string());

        let id = self.id_gen.next();
        let job = Job::new(id.clone(), req);
        let snapshot = job.clone();

        let mut jobs = self.inner.lock_jobs();
        jobs.insert(id.clone(), job);
        if self.tx.send(id.clone()).is_err() {
            jobs.remove(&id);
            return Err(EngineError::QueueClosed);
        }
        drop(jobs);

        tracing::info!(
            job_id = %snapshot.id,
            user_id = %snapshot.request.user_id,
            estimated_credits = estimated,
            "job queued"
        );
        Ok(snapshot)
    }

    /// Snapshot of one job
    pub fn get_job(&self, job_id: &str) -> Result<Job, EngineError> {
        let jobs = self.inner.lock_jobs();
        jobs.get(job_id)
            .cloned()
            .ok_or_else(|| EngineError::JobNotFound(job_id.to_string()))
    }

    /// Snapshots of all jobs, newest first
    pub fn list_jobs(&self) -> Vec<Job> {
        let jobs = self.inner.lock_jobs();
        let mut all: Vec<Job> = jobs.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        all
    }

    /// Cancel a job that is still queued.
    ///
    /// Running and terminal jobs are left untouched; the unchanged
    /// snapshot is returned so callers can see why nothing happened.
    pub fn cancel_job(&self, job_id: &str) -> Result<Job, EngineError> {
        let mut jobs = self.inner.lock_jobs();
        let job = jobs
            .get_mut(job_id)
            .ok_or_else(|| EngineError::JobNotFound(job_id.to_string()))?;
        if job.cancel() {
            tracing::info!(job_id, "job canceled");
        }
        Ok(job.clone())
    }
}

async fn worker_loop(inner: Arc<Inner>, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(job_id) = rx.recv().await {
        run_one(&inner, &job_id).await;
    }
    tracing::debug!("job queue closed, worker exiting");
}

async fn run_one(inner: &Inner, job_id: &str) {
    let request = {
        let mut jobs = inner.lock_jobs();
        let Some(job) = jobs.get_mut(job_id) else {
            return;
        };
        if job.status == JobStatus::Canceled {
            tracing::debug!(job_id, "skipping canceled job");
            return;
        }
        job.mark_running();
        job.request.clone()
    };
    tracing::info!(
        job_id,
        user_id = %request.user_id,
        runner = request.runner.name(),
        "job started"
    );

    let probe = probe::probe_video(&request.input_path).await;
    let mut request = request;
    if request.duration_hint_seconds.is_none() {
        request.duration_hint_seconds = probe
            .duration_seconds
            .filter(|d| *d >= 1.0)
            .map(|d| d as u32);
    }
    let tracker = ProgressTracker::new(SystemClock, probe.total_frames);

    match execute(inner, job_id, &request, &tracker).await {
        Ok(()) => {
            let mut jobs = inner.lock_jobs();
            if let Some(job) = jobs.get_mut(job_id) {
                job.mark_done();
            }
            drop(jobs);
            tracing::info!(job_id, "job done");
        }
        Err(error) => fail_and_refund(inner, job_id, &error),
    }
}

async fn execute(
    inner: &Inner,
    job_id: &str,
    request: &JobRequest,
    tracker: &ProgressTracker<SystemClock>,
) -> Result<(), String> {
    if inner.enforce_credits {
        let amount = request.estimated_credits.unwrap_or(1);
        inner
            .ledger
            .reserve(&request.user_id, i64::from(amount), job_id)
            .map_err(|e| e.to_string())?;
        let mut jobs = inner.lock_jobs();
        if let Some(job) = jobs.get_mut(job_id) {
            job.set_reserved(amount);
        }
    }

    let runner = runner::build_runner(request.runner);
    let on_stage = |stage: &str, progress: f64| {
        let sample = tracker.sample(progress);
        tracing::debug!(
            job_id,
            stage,
            progress,
            fps = ?sample.fps,
            eta = ?sample.eta,
            "stage update"
        );
        let mut jobs = inner.lock_jobs();
        if let Some(job) = jobs.get_mut(job_id) {
            job.set_stage(stage, progress);
        }
    };
    runner
        .run(request, &on_stage)
        .await
        .map_err(|e| e.to_string())?;

    if runner.name() == "dry-run" {
        materialize_dry_run_output(request).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// A dry run does no real work, so downstream consumers still expect an
/// output file; copy the input into place (or touch an empty file)
fn materialize_dry_run_output(request: &JobRequest) -> std::io::Result<()> {
    let Some(output) = request.output_path.as_deref() else {
        return Ok(());
    };
    let output = Path::new(output);
    if output.exists() {
        return Ok(());
    }
    let input = Path::new(&request.input_path);
    if input.is_file() {
        std::fs::copy(input, output)?;
    } else {
        std::fs::File::create(output)?;
    }
    Ok(())
}

fn fail_and_refund(inner: &Inner, job_id: &str, error: &str) {
    let refund = {
        let mut jobs = inner.lock_jobs();
        let Some(job) = jobs.get_mut(job_id) else {
            return;
        };
        job.mark_failed(error);
        (job.credits_reserved > 0).then(|| (job.request.user_id.clone(), job.credits_reserved))
    };
    tracing::warn!(job_id, error, "job failed");

    // Refund outside the registry lock; the ledger takes its own.
    if let Some((user_id, reserved)) = refund {
        if let Err(err) = inner.ledger.refund(&user_id, i64::from(reserved), job_id) {
            tracing::error!(job_id, error = %err, "refund failed");
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
