use super::{Inference, InferenceStrategy};
use crate::canonical::Disease;
use crate::scores::ScoreDistribution;
use mangoscan_types::{ChannelMeans, DiagnosisResult, LeafImage};

pub const FALLBACK_VERSION: &str = "fallback-heuristic-v1";

/// Green must exceed red by more than this (and exceed blue) to call a leaf healthy.
const GREEN_MARGIN: f64 = 8.0;
/// Red must exceed green by more than this to call anthracnose.
const RED_MARGIN: f64 = 5.0;

const HEALTHY_CONFIDENCE: f64 = 0.70;
const ANTHRACNOSE_CONFIDENCE: f64 = 0.65;
const POWDERY_MILDEW_CONFIDENCE: f64 = 0.62;

const LABELS: [Disease; 3] = [
    Disease::Healthy,
    Disease::Anthracnose,
    Disease::PowderyMildew,
];

/// Training-free mean-color rule. Deterministic for equal channel means.
pub fn classify_by_color(means: ChannelMeans) -> (Disease, f64) {
    if means.green > means.red + GREEN_MARGIN && means.green > means.blue {
        (Disease::Healthy, HEALTHY_CONFIDENCE)
    } else if means.red > means.green + RED_MARGIN {
        (Disease::Anthracnose, ANTHRACNOSE_CONFIDENCE)
    } else {
        (Disease::PowderyMildew, POWDERY_MILDEW_CONFIDENCE)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicFallbackStrategy;

impl InferenceStrategy for HeuristicFallbackStrategy {
    fn id(&self) -> &str {
        FALLBACK_VERSION
    }

    fn classifier_classes(&self) -> Option<usize> {
        None
    }

    fn infer(&self, image: &LeafImage) -> DiagnosisResult<Inference> {
        let means = image.channel_means();
        let (disease, confidence) = classify_by_color(means);
        tracing::debug!(
            red = means.red,
            green = means.green,
            blue = means.blue,
            %disease,
            "Heuristic fallback classification"
        );

        let labels = LABELS.map(Disease::as_str);
        Ok(Inference {
            distribution: ScoreDistribution::degenerate(&labels, disease.as_str(), confidence),
            strategy_id: FALLBACK_VERSION.to_string(),
        })
    }
}
