// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings and the application container
//!
//! Settings come from `REVO_*` environment variables with filesystem-local
//! defaults. [`App::build`] wires the ledger, profile store, and
//! orchestrator together explicitly; nothing here is global.

use crate::error::EngineError;
use crate::orchestrator::JobManager;
use revo_core::QualityTier;
use revo_ledger::CreditLedger;
use revo_storage::{JsonStore, ProfileStore, StoreError};
use std::path::PathBuf;
use std::sync::Arc;

/// Runtime configuration, one field per `REVO_*` variable
#[derive(Debug, Clone)]
pub struct Settings {
    pub runtime_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub profiles_path: PathBuf,
    pub output_dir: PathBuf,
    pub enforce_credits: bool,
    pub bootstrap_credit_user: String,
    pub bootstrap_credit_amount: i64,
    pub default_tier: QualityTier,
}

impl Default for Settings {
    fn default() -> Self {
        let runtime_dir = PathBuf::from("runtime");
        Self {
            ledger_path: runtime_dir.join("credits_ledger.json"),
            profiles_path: runtime_dir.join("profiles.json"),
            runtime_dir,
            output_dir: PathBuf::from("outputs"),
            enforce_credits: true,
            bootstrap_credit_user: "anonymous".to_string(),
            bootstrap_credit_amount: 0,
            default_tier: QualityTier::Ultra,
        }
    }
}

fn parse_bool(raw: &str, default: bool) -> bool {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup (tests)
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let runtime_dir = get("REVO_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.runtime_dir);
        Self {
            ledger_path: get("REVO_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| runtime_dir.join("credits_ledger.json")),
            profiles_path: get("REVO_PROFILES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| runtime_dir.join("profiles.json")),
            runtime_dir,
            output_dir: get("REVO_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            enforce_credits: get("REVO_ENFORCE_CREDITS")
                .map(|raw| parse_bool(&raw, defaults.enforce_credits))
                .unwrap_or(defaults.enforce_credits),
            bootstrap_credit_user: get("REVO_BOOTSTRAP_CREDIT_USER")
                .unwrap_or(defaults.bootstrap_credit_user),
            bootstrap_credit_amount: get("REVO_BOOTSTRAP_CREDIT_AMOUNT")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.bootstrap_credit_amount),
            default_tier: get("REVO_DEFAULT_TIER")
                .map(|raw| QualityTier::parse_lossy(&raw))
                .unwrap_or(defaults.default_tier),
        }
    }
}

/// Fully wired application: ledger, profiles, and the orchestrator
pub struct App {
    pub settings: Settings,
    pub ledger: Arc<CreditLedger>,
    pub profiles: ProfileStore,
    pub jobs: JobManager,
}

impl App {
    /// Build the container from settings.
    ///
    /// Must run inside a tokio runtime; this starts the orchestrator's
    /// worker task. When a bootstrap credit floor is configured, the
    /// bootstrap user is topped up *to* that floor, not by it, so
    /// restarting the process grants nothing extra.
    pub fn build(settings: Settings) -> Result<Self, EngineError> {
        std::fs::create_dir_all(&settings.runtime_dir).map_err(StoreError::from)?;

        let ledger = Arc::new(CreditLedger::open(JsonStore::new(&settings.ledger_path)));
        if settings.bootstrap_credit_amount > 0 {
            let current = ledger.get_balance(&settings.bootstrap_credit_user);
            if current < settings.bootstrap_credit_amount {
                ledger.topup(
                    &settings.bootstrap_credit_user,
                    settings.bootstrap_credit_amount - current,
                    "bootstrap_credit",
                )?;
            }
        }

        let profiles = ProfileStore::open(JsonStore::new(&settings.profiles_path));
        let jobs = JobManager::start(
            ledger.clone(),
            settings.enforce_credits,
            settings.output_dir.clone(),
        );

        tracing::info!(
            runtime_dir = %settings.runtime_dir.display(),
            enforce_credits = settings.enforce_credits,
            "application container built"
        );
        Ok(Self {
            settings,
            ledger,
            profiles,
            jobs,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
