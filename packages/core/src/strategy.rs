/// # Inference Strategies
/// The trained classifier and the training-free color heuristic share one contract.
use crate::scores::ScoreDistribution;
use mangoscan_types::{Classifier, DiagnosisError, DiagnosisResult, LeafImage};
use std::sync::Arc;

/// Mean-color rule used when no trained classifier is loaded
pub mod heuristic;
/// Classifier-backed strategy
pub mod model;

pub use heuristic::{FALLBACK_VERSION, HeuristicFallbackStrategy};
pub use model::ModelBackedStrategy;

/// Result of one inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub distribution: ScoreDistribution,
    /// Reported as `modelVersion`; distinguishes model output from fallback output.
    pub strategy_id: String,
}

pub trait InferenceStrategy: Send + Sync {
    fn id(&self) -> &str;

    /// Number of classes of the trained classifier, `None` when running the fallback.
    fn classifier_classes(&self) -> Option<usize>;

    fn infer(&self, image: &LeafImage) -> DiagnosisResult<Inference>;
}

/// Pick the strategy for the lifetime of the process.
///
/// A classifier that failed to load, or loaded without any class labels, activates
/// the heuristic fallback. This is logged, never surfaced as an error.
pub fn select_strategy(
    classifier: DiagnosisResult<Arc<dyn Classifier>>,
) -> Arc<dyn InferenceStrategy> {
    match classifier {
        Ok(classifier) if !classifier.class_labels().is_empty() => {
            tracing::info!(
                version = classifier.version(),
                classes = classifier.class_labels().len(),
                "Using trained classifier"
            );
            Arc::new(ModelBackedStrategy::new(classifier))
        }
        Ok(classifier) => {
            let err = DiagnosisError::model_unavailable(format!(
                "classifier {} has an empty class list",
                classifier.version()
            ));
            tracing::warn!("{}, using heuristic fallback", err);
            Arc::new(HeuristicFallbackStrategy)
        }
        Err(err) => {
            tracing::warn!("{}, using heuristic fallback", err);
            Arc::new(HeuristicFallbackStrategy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoLabels;

    impl Classifier for NoLabels {
        fn version(&self) -> &str {
            "empty-v0"
        }
        fn class_labels(&self) -> &[String] {
            &[]
        }
        fn scores(&self, _image: &LeafImage) -> DiagnosisResult<Vec<f32>> {
            Ok(vec![])
        }
    }

    #[test]
    fn load_failure_selects_fallback() {
        let strategy = select_strategy(Err(DiagnosisError::model_unavailable("missing")));
        assert_eq!(strategy.id(), FALLBACK_VERSION);
        assert_eq!(strategy.classifier_classes(), None);
    }

    #[test]
    fn empty_class_list_selects_fallback() {
        let strategy = select_strategy(Ok(Arc::new(NoLabels)));
        assert_eq!(strategy.id(), FALLBACK_VERSION);
    }
}
