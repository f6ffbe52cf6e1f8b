use crate::error::DiagnosisResult;
use crate::img::LeafImage;

/// A trained image classifier.
///
/// Implementations own their preprocessing (resize, normalization) and return one
/// unnormalized score per entry of [`Classifier::class_labels`], in the same order.
/// Inference is synchronous and may be slow; callers run it off the async executor.
pub trait Classifier: Send + Sync {
    /// Identifier bound to the loaded checkpoint, reported as `modelVersion`.
    fn version(&self) -> &str;

    fn class_labels(&self) -> &[String];

    fn scores(&self, image: &LeafImage) -> DiagnosisResult<Vec<f32>>;
}
