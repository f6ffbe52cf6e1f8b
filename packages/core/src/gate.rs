use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.65;

pub const LOW_CONFIDENCE_WARNING: &str = "Low confidence result. Retake the photo in good light \
with a single leaf in focus, and treat this diagnosis as preliminary.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub low_confidence: bool,
}

/// A confidence exactly at the threshold passes.
pub fn gate(confidence: f64, threshold: f64) -> GateOutcome {
    GateOutcome {
        low_confidence: confidence < threshold,
    }
}

/// Process-wide minimum confidence, validated to lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_MIN_CONFIDENCE)
    }
}
