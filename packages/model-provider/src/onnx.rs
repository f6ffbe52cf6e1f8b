/// # ONNX Classifier
/// Image classification with an ONNX Runtime session (ResNet-style `NCHW` input, one logit per class)
use crate::execution_providers::{initialize_ort, is_initialized};
use crate::preprocess::{DEFAULT_INPUT_SIZE, to_input_tensor};
use mangoscan_types::{Classifier, DiagnosisError, DiagnosisResult, LeafImage};
use ort::{inputs, session::Session, value::Tensor};
use std::path::Path;
use std::sync::Mutex;

pub struct OnnxClassifier {
    /// `Session::run` needs exclusive access; requests take turns on it.
    session: Mutex<Session>,
    labels: Vec<String>,
    version: String,
    input_name: String,
    output_name: String,
    input_width: u32,
    input_height: u32,
}

/// Width and height from the last two dims of an `NCHW` input; dynamic dims fall back to 224.
pub fn determine_input_shape(session: &Session, input_name: &str) -> (u32, u32) {
    for input in &session.inputs {
        if input.name == input_name
            && let Some(dims) = input.input_type.tensor_shape()
        {
            let d = dims.len();
            if d > 1 {
                let (h, w) = (dims[d - 2], dims[d - 1]);
                let w = if w > 0 { w as u32 } else { DEFAULT_INPUT_SIZE };
                let h = if h > 0 { h as u32 } else { DEFAULT_INPUT_SIZE };
                return (w, h);
            }
        }
    }
    (DEFAULT_INPUT_SIZE, DEFAULT_INPUT_SIZE)
}

impl OnnxClassifier {
    pub fn from_file(path: &Path, labels: Vec<String>, version: String) -> DiagnosisResult<Self> {
        if !is_initialized() {
            let info = initialize_ort();
            for warning in &info.warnings {
                tracing::warn!("{}", warning);
            }
            tracing::info!(
                providers = ?info.active_providers,
                accelerated = info.accelerated,
                "ONNX Runtime initialized"
            );
        }

        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|e| {
                DiagnosisError::model_unavailable(format!(
                    "failed to load ONNX model {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| DiagnosisError::model_unavailable("ONNX model has no inputs"))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| DiagnosisError::model_unavailable("ONNX model has no outputs"))?;
        let (input_width, input_height) = determine_input_shape(&session, &input_name);

        tracing::info!(
            input = %input_name,
            output = %output_name,
            input_width,
            input_height,
            "ONNX classifier ready"
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
            version,
            input_name,
            output_name,
            input_width,
            input_height,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn version(&self) -> &str {
        &self.version
    }

    fn class_labels(&self) -> &[String] {
        &self.labels
    }

    fn scores(&self, image: &LeafImage) -> DiagnosisResult<Vec<f32>> {
        let tensor = to_input_tensor(image, self.input_width, self.input_height);
        let value = Tensor::from_array(tensor)
            .map_err(|e| DiagnosisError::inference(format!("failed to build input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| DiagnosisError::inference("ONNX session lock poisoned"))?;
        let outputs = session
            .run(inputs![self.input_name.as_str() => value])
            .map_err(|e| DiagnosisError::inference(format!("failed to run ONNX model: {}", e)))?;

        let logits = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| DiagnosisError::inference(format!("output is not f32: {}", e)))?;

        Ok(logits.iter().copied().collect())
    }
}
