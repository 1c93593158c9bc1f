// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quality tiers, model presets, and the model catalog
//!
//! The preset table is the process-wide constant mapping from a quality
//! tier to the default detector/restorer/refiner trio. Explicit model
//! overrides on a request always win over the preset.

use serde::{Deserialize, Serialize};

/// Named quality preset selecting a default model trio and pricing multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Balanced,
    High,
    Ultra,
}

impl QualityTier {
    pub fn name(&self) -> &'static str {
        match self {
            QualityTier::Balanced => "balanced",
            QualityTier::High => "high",
            QualityTier::Ultra => "ultra",
        }
    }

    /// All tiers, cheapest first
    pub fn all() -> [QualityTier; 3] {
        [QualityTier::Balanced, QualityTier::High, QualityTier::Ultra]
    }

    /// Parse a tier name, falling back to `High` for anything unrecognized.
    ///
    /// The silent fallback mirrors the behavior at the string boundary of
    /// the service; a stricter variant would reject the name instead.
    pub fn parse_lossy(name: &str) -> QualityTier {
        match name {
            "balanced" => QualityTier::Balanced,
            "ultra" => QualityTier::Ultra,
            _ => QualityTier::High,
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The role a model plays in the restoration pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    Detector,
    Restorer,
    Refiner,
}

/// Descriptive card for a known model
#[derive(Debug, Clone, Serialize)]
pub struct ModelCard {
    pub id: &'static str,
    pub role: ModelRole,
    pub family: &'static str,
    pub objective: &'static str,
    pub maturity: &'static str,
    pub notes: &'static str,
}

/// Immutable tier preset: default model trio plus descriptive notes
#[derive(Debug, Clone, Serialize)]
pub struct QualityPreset {
    pub tier: QualityTier,
    pub detector_model: &'static str,
    pub restorer_model: &'static str,
    pub refiner_model: Option<&'static str>,
    pub notes: &'static str,
}

/// Catalog view: every known model card plus the preset table
#[derive(Debug, Clone, Serialize)]
pub struct ModelCatalog {
    pub cards: Vec<ModelCard>,
    pub quality_presets: Vec<QualityPreset>,
}

const MODEL_CARDS: &[ModelCard] = &[
    ModelCard {
        id: "yolo11x-seg-baseline",
        role: ModelRole::Detector,
        family: "YOLO segmentation",
        objective: "balanced",
        maturity: "baseline",
        notes: "Stable baseline for segmentation-style mosaic detection.",
    },
    ModelCard {
        id: "rtdetrv2-l-candidate",
        role: ModelRole::Detector,
        family: "RT-DETRv2",
        objective: "quality-first",
        maturity: "candidate",
        notes: "Transformer detector candidate for stronger boundary quality.",
    },
    ModelCard {
        id: "mask2former-swinl-candidate",
        role: ModelRole::Detector,
        family: "Mask2Former",
        objective: "quality-first",
        maturity: "candidate",
        notes: "High-quality mask prediction candidate for hard scenes.",
    },
    ModelCard {
        id: "basicvsrpp-v2-baseline",
        role: ModelRole::Restorer,
        family: "BasicVSR++",
        objective: "balanced",
        maturity: "baseline",
        notes: "Baseline restoration backbone with good stability.",
    },
    ModelCard {
        id: "rvrt-base-candidate",
        role: ModelRole::Restorer,
        family: "RVRT",
        objective: "quality-first",
        maturity: "candidate",
        notes: "Video transformer candidate with improved temporal modeling.",
    },
    ModelCard {
        id: "vrt-large-candidate",
        role: ModelRole::Restorer,
        family: "VRT",
        objective: "quality-first",
        maturity: "candidate",
        notes: "High-capacity transformer candidate for best quality mode.",
    },
    ModelCard {
        id: "swinir-video-refiner-candidate",
        role: ModelRole::Refiner,
        family: "SwinIR-style refiner",
        objective: "quality-first",
        maturity: "candidate",
        notes: "Post-refinement pass to suppress ringing and texture artifacts.",
    },
    ModelCard {
        id: "diffusion-video-refiner-candidate",
        role: ModelRole::Refiner,
        family: "Diffusion refiner",
        objective: "quality-first",
        maturity: "candidate",
        notes: "Optional heavy refiner for highest perceptual quality setting.",
    },
];

const QUALITY_PRESETS: &[QualityPreset] = &[
    QualityPreset {
        tier: QualityTier::Balanced,
        detector_model: "yolo11x-seg-baseline",
        restorer_model: "basicvsrpp-v2-baseline",
        refiner_model: None,
        notes: "Default quality baseline with low risk.",
    },
    QualityPreset {
        tier: QualityTier::High,
        detector_model: "rtdetrv2-l-candidate",
        restorer_model: "rvrt-base-candidate",
        refiner_model: Some("swinir-video-refiner-candidate"),
        notes: "Quality-first recommended profile for most runs.",
    },
    QualityPreset {
        tier: QualityTier::Ultra,
        detector_model: "mask2former-swinl-candidate",
        restorer_model: "vrt-large-candidate",
        refiner_model: Some("diffusion-video-refiner-candidate"),
        notes: "Maximum quality profile for best visual output.",
    },
];

/// Look up the preset for a tier
pub fn preset_for(tier: QualityTier) -> &'static QualityPreset {
    QUALITY_PRESETS
        .iter()
        .find(|p| p.tier == tier)
        .unwrap_or(&QUALITY_PRESETS[1])
}

/// Build the full catalog view
pub fn model_catalog() -> ModelCatalog {
    ModelCatalog {
        cards: MODEL_CARDS.to_vec(),
        quality_presets: QUALITY_PRESETS.to_vec(),
    }
}

/// Models resolved for a job: explicit overrides win, preset fills the rest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModels {
    pub detector: String,
    pub restorer: String,
    pub refiner: Option<String>,
}

/// Resolve the model trio for a tier with optional per-request overrides
pub fn resolve_models(
    tier: QualityTier,
    detector: Option<&str>,
    restorer: Option<&str>,
    refiner: Option<&str>,
) -> ResolvedModels {
    let preset = preset_for(tier);
    ResolvedModels {
        detector: detector.unwrap_or(preset.detector_model).to_string(),
        restorer: restorer.unwrap_or(preset.restorer_model).to_string(),
        refiner: refiner
            .map(str::to_string)
            .or_else(|| preset.refiner_model.map(str::to_string)),
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
