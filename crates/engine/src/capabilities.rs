// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability report
//!
//! Tells clients which runners and quality tiers this deployment can
//! actually serve. The external runner is only advertised when its
//! executable resolves on PATH.

use crate::config::Settings;
use crate::process::LadaCliRunner;
use crate::runner::find_executable;
use revo_core::QualityTier;
use serde::Serialize;

/// Advertised defaults for new requests
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityDefaults {
    pub runner: String,
    pub quality_tier: String,
}

/// What this deployment can run
#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    pub runners: Vec<String>,
    pub quality_tiers: Vec<String>,
    pub defaults: CapabilityDefaults,
}

/// Build the capability report for the current environment
pub fn capabilities(settings: &Settings) -> Capabilities {
    let mut runners = vec!["auto".to_string(), "dry-run".to_string()];
    if find_executable(LadaCliRunner::EXECUTABLE).is_some() {
        runners.push(LadaCliRunner::EXECUTABLE.to_string());
    }
    Capabilities {
        runners,
        quality_tiers: QualityTier::all()
            .iter()
            .map(|tier| tier.name().to_string())
            .collect(),
        defaults: CapabilityDefaults {
            runner: "auto".to_string(),
            quality_tier: settings.default_tier.name().to_string(),
        },
    }
}

#[cfg(test)]
#[path = "capabilities_tests.rs"]
mod tests;
