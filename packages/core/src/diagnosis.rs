use crate::canonical::{CanonicalName, canonicalize};
use crate::gate::{LOW_CONFIDENCE_WARNING, Threshold, gate};
use crate::practices::{practices_for, recommended_action};
use crate::scores::RankedCandidate;
use crate::strategy::{Inference, InferenceStrategy};
use mangoscan_types::{DiagnosisError, DiagnosisResult, LeafImage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maximum number of alternative candidates reported.
pub const TOP_K: usize = 3;

/// The verdict for one uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    /// Canonical disease name, or "Uncertain" when gated.
    pub diagnosis: String,
    /// Canonical top-1 label before gating.
    pub raw_prediction: String,
    /// Rounded to 4 decimals for display; the gate compares the unrounded value.
    pub confidence: f64,
    pub min_confidence: f64,
    pub low_confidence: bool,
    /// Pre-gate candidates, descending. Never re-gated.
    pub top_predictions: Vec<RankedCandidate>,
    pub recommended_action: String,
    pub practices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub model_version: String,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Composes strategy, canonicalizer, gate and practice lookup.
///
/// Holds only immutable state, so one instance serves every request.
#[derive(Clone)]
pub struct Diagnoser {
    strategy: Arc<dyn InferenceStrategy>,
    threshold: Threshold,
}

impl Diagnoser {
    pub fn new(strategy: Arc<dyn InferenceStrategy>, threshold: Threshold) -> Self {
        Self {
            strategy,
            threshold,
        }
    }

    pub fn strategy(&self) -> &dyn InferenceStrategy {
        self.strategy.as_ref()
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    #[tracing::instrument(name = "diagnose", skip_all, fields(strategy = self.strategy.id()))]
    pub fn diagnose(&self, image: &LeafImage) -> DiagnosisResult<Diagnosis> {
        let Inference {
            distribution,
            strategy_id,
        } = self.strategy.infer(image)?;

        let top_k = distribution.top(TOP_K.min(distribution.len()));
        let best = top_k
            .first()
            .cloned()
            .ok_or_else(|| DiagnosisError::invalid_scores("empty score distribution"))?;
        let confidence = best.confidence.clamp(0.0, 1.0);

        let raw_prediction = canonicalize(&best.label);
        let top_predictions = top_k
            .into_iter()
            .map(|candidate| RankedCandidate {
                label: canonicalize(&candidate.label).into_string(),
                confidence: round4(candidate.confidence),
            })
            .collect();

        let outcome = gate(confidence, self.threshold.value());
        let (diagnosis, warning) = if outcome.low_confidence {
            (CanonicalName::Uncertain, Some(LOW_CONFIDENCE_WARNING.to_string()))
        } else {
            (raw_prediction.clone(), None)
        };
        tracing::debug!(
            raw = %raw_prediction,
            confidence,
            threshold = self.threshold.value(),
            low_confidence = outcome.low_confidence,
            "Gated prediction"
        );

        let practices = practices_for(diagnosis.as_str());

        Ok(Diagnosis {
            diagnosis: diagnosis.into_string(),
            raw_prediction: raw_prediction.into_string(),
            confidence: round4(confidence),
            min_confidence: self.threshold.value(),
            low_confidence: outcome.low_confidence,
            top_predictions,
            recommended_action: recommended_action(practices),
            practices: practices.iter().map(|p| p.to_string()).collect(),
            warning,
            model_version: strategy_id,
        })
    }
}
