// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credit pricing for restoration jobs

use crate::catalog::QualityTier;

/// Billing window: one base credit per started 120 seconds of footage
const BASE_WINDOW_SECONDS: u32 = 120;

/// Credit multiplier for a tier
pub fn tier_multiplier(tier: QualityTier) -> u32 {
    match tier {
        QualityTier::Balanced => 1,
        QualityTier::High => 2,
        QualityTier::Ultra => 4,
    }
}

/// Estimate the credit cost for a job.
///
/// A missing or zero duration hint is treated as one base window. The
/// result is always at least 1.
pub fn estimate_credits(duration_hint_seconds: Option<u32>, tier: QualityTier) -> u32 {
    let duration = match duration_hint_seconds {
        Some(d) if d > 0 => d,
        _ => BASE_WINDOW_SECONDS,
    };
    let base = duration.div_ceil(BASE_WINDOW_SECONDS).max(1);
    base * tier_multiplier(tier)
}
