//! Shared harness for the behavioral specs

use revo_core::{Job, JobRequest, OptionValue, RunnerChoice};
use revo_engine::{App, Settings};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub struct TestApp {
    pub app: App,
    pub input: PathBuf,
    _dir: TempDir,
}

/// Build a container rooted in a temp dir, with one fake input video
pub fn test_app(enforce_credits: bool) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        runtime_dir: dir.path().join("runtime"),
        ledger_path: dir.path().join("runtime/credits_ledger.json"),
        profiles_path: dir.path().join("runtime/profiles.json"),
        output_dir: dir.path().join("outputs"),
        enforce_credits,
        ..Settings::default()
    };
    let app = App::build(settings).unwrap();
    let input = dir.path().join("clip.mp4");
    std::fs::write(&input, b"fake video payload").unwrap();
    TestApp {
        app,
        input,
        _dir: dir,
    }
}

/// A dry-run request with zero stage sleep, so specs run instantly
pub fn fast_request(t: &TestApp) -> JobRequest {
    let mut req = JobRequest::new(t.input.to_str().unwrap());
    req.user_id = "spec-user".to_string();
    req.runner = RunnerChoice::DryRun;
    req.options
        .insert("stage_sleep".to_string(), OptionValue::Float(0.0));
    req
}

/// Poll until the job reaches a terminal state
pub async fn wait_terminal(t: &TestApp, job_id: &str) -> Job {
    for _ in 0..500 {
        let job = t.app.jobs.get_job(job_id).unwrap();
        if job.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not reach a terminal state");
}
