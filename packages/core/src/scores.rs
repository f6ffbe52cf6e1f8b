use mangoscan_types::{DiagnosisError, DiagnosisResult};
use serde::{Deserialize, Serialize};

/// Probability per known class, in class-list order.
///
/// Distributions from [`normalize`] sum to 1. The heuristic fallback builds a
/// degenerate one where a single class carries its fixed confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDistribution {
    entries: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RankedCandidate {
    pub label: String,
    pub confidence: f64,
}

/// Label for output index `idx`; indexes past the class list get a synthetic name.
pub fn class_label(labels: &[String], idx: usize) -> String {
    labels
        .get(idx)
        .cloned()
        .unwrap_or_else(|| format!("class_{}", idx))
}

/// Numerically stable softmax over raw classifier scores.
pub fn normalize(labels: &[String], scores: &[f32]) -> DiagnosisResult<ScoreDistribution> {
    if scores.is_empty() {
        return Err(DiagnosisError::invalid_scores("classifier returned no scores"));
    }
    if let Some(idx) = scores.iter().position(|s| !s.is_finite()) {
        return Err(DiagnosisError::invalid_scores(format!(
            "score for {} is not finite ({})",
            class_label(labels, idx),
            scores[idx]
        )));
    }

    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = scores.iter().map(|s| (*s as f64 - max).exp()).collect();
    // the max term contributes exp(0) = 1, so the sum is never zero
    let sum: f64 = exps.iter().sum();

    let entries = exps
        .into_iter()
        .enumerate()
        .map(|(idx, e)| (class_label(labels, idx), e / sum))
        .collect();

    Ok(ScoreDistribution { entries })
}

impl ScoreDistribution {
    /// All mass on `chosen` at `confidence`, every other label at 0.
    pub fn degenerate(labels: &[&str], chosen: &str, confidence: f64) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        let entries = labels
            .iter()
            .map(|label| {
                let p = if *label == chosen { confidence } else { 0.0 };
                (label.to_string(), p)
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(label, p)| (label.as_str(), *p))
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// The `k` most probable classes, descending; ties keep class-list order.
    pub fn top(&self, k: usize) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = self
            .entries
            .iter()
            .map(|(label, p)| RankedCandidate {
                label: label.clone(),
                confidence: *p,
            })
            .collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked.truncate(k);
        ranked
    }
}
