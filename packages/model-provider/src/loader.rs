use crate::classes::read_class_list;
use mangoscan_types::{Classifier, DiagnosisError, DiagnosisResult};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_MODEL_VERSION: &str = "kaggle-mango-resnet18-v1";

/// Where the trained checkpoint lives and how its output is tagged.
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub model_path: PathBuf,
    pub classes_path: PathBuf,
    pub version: String,
}

impl Default for ModelSource {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/mango_disease_model.onnx"),
            classes_path: PathBuf::from("model/classes.txt"),
            version: DEFAULT_MODEL_VERSION.to_string(),
        }
    }
}

/// Load the trained classifier.
///
/// Every failure is reported as [`DiagnosisError::ModelUnavailable`]; callers hand the
/// result to strategy selection, which falls back to the color heuristic.
pub fn load_classifier(source: &ModelSource) -> DiagnosisResult<Arc<dyn Classifier>> {
    if !source.model_path.is_file() {
        return Err(DiagnosisError::model_unavailable(format!(
            "model file {} not found",
            source.model_path.display()
        )));
    }

    let labels = read_class_list(&source.classes_path)?;
    tracing::info!(
        path = %source.model_path.display(),
        classes = labels.len(),
        "Loading classifier"
    );
    load_onnx(source, labels)
}

#[cfg(feature = "local-ml")]
fn load_onnx(source: &ModelSource, labels: Vec<String>) -> DiagnosisResult<Arc<dyn Classifier>> {
    let classifier = crate::onnx::OnnxClassifier::from_file(
        &source.model_path,
        labels,
        source.version.clone(),
    )?;
    Ok(Arc::new(classifier))
}

#[cfg(not(feature = "local-ml"))]
fn load_onnx(
    _source: &ModelSource,
    _labels: Vec<String>,
) -> DiagnosisResult<Arc<dyn Classifier>> {
    Err(DiagnosisError::model_unavailable(
        "ONNX inference requires the 'local-ml' feature. Rebuild with --features local-ml",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_model_is_unavailable() {
        let source = ModelSource {
            model_path: PathBuf::from("/nonexistent/model.onnx"),
            ..ModelSource::default()
        };
        assert!(matches!(
            load_classifier(&source),
            Err(DiagnosisError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn missing_class_list_is_unavailable() {
        let model = tempfile::NamedTempFile::new().unwrap();
        let source = ModelSource {
            model_path: model.path().to_path_buf(),
            classes_path: PathBuf::from("/nonexistent/classes.txt"),
            ..ModelSource::default()
        };
        assert!(matches!(
            load_classifier(&source),
            Err(DiagnosisError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn corrupt_checkpoint_is_unavailable() {
        let mut model = tempfile::NamedTempFile::new().unwrap();
        model.write_all(b"not an onnx graph").unwrap();
        let mut classes = tempfile::NamedTempFile::new().unwrap();
        writeln!(classes, "Healthy").unwrap();

        let source = ModelSource {
            model_path: model.path().to_path_buf(),
            classes_path: classes.path().to_path_buf(),
            ..ModelSource::default()
        };
        assert!(matches!(
            load_classifier(&source),
            Err(DiagnosisError::ModelUnavailable(_))
        ));
    }
}
