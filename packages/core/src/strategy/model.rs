use super::{Inference, InferenceStrategy};
use crate::scores::normalize;
use mangoscan_types::{Classifier, DiagnosisResult, LeafImage};
use std::sync::Arc;

pub struct ModelBackedStrategy {
    classifier: Arc<dyn Classifier>,
}

impl ModelBackedStrategy {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

impl InferenceStrategy for ModelBackedStrategy {
    fn id(&self) -> &str {
        self.classifier.version()
    }

    fn classifier_classes(&self) -> Option<usize> {
        Some(self.classifier.class_labels().len())
    }

    fn infer(&self, image: &LeafImage) -> DiagnosisResult<Inference> {
        let scores = self.classifier.scores(image)?;
        let distribution = normalize(self.classifier.class_labels(), &scores)?;
        Ok(Inference {
            distribution,
            strategy_id: self.classifier.version().to_string(),
        })
    }
}
