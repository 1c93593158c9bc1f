// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn report_lists_tiers_and_defaults() {
    let settings = Settings {
        default_tier: QualityTier::Balanced,
        ..Settings::default()
    };

    let caps = capabilities(&settings);
    assert_eq!(caps.quality_tiers, vec!["balanced", "high", "ultra"]);
    assert_eq!(caps.defaults.runner, "auto");
    assert_eq!(caps.defaults.quality_tier, "balanced");
}

#[test]
fn external_runner_is_only_advertised_when_installed() {
    let caps = capabilities(&Settings::default());
    assert!(caps.runners.contains(&"auto".to_string()));
    assert!(caps.runners.contains(&"dry-run".to_string()));
    let installed = find_executable(LadaCliRunner::EXECUTABLE).is_some();
    assert_eq!(caps.runners.contains(&"lada-cli".to_string()), installed);
}

#[test]
fn report_serializes_for_transport() {
    let caps = capabilities(&Settings::default());
    let json = serde_json::to_value(&caps).unwrap();
    assert!(json["runners"].is_array());
    assert_eq!(json["defaults"]["runner"], "auto");
}
