use std::time::Duration;

pub type DiagnosisResult<T> = std::result::Result<T, DiagnosisError>;

/// Failures of a single diagnosis request, or of model loading at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiagnosisError {
    /// Empty payload, non-image media type or undecodable bytes.
    #[error("{0}")]
    InvalidInput(String),

    /// Only raised at startup; the service switches to the heuristic fallback.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Invalid scores: {0}")]
    InvalidScores(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Inference timed out after {0:?}")]
    InferenceTimeout(Duration),
}

impl DiagnosisError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    pub fn invalid_scores(msg: impl Into<String>) -> Self {
        Self::InvalidScores(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }
}
