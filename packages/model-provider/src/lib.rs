//! Trained classifier backend for MangoScan.
//!
//! Loads an ONNX checkpoint plus its `classes.txt` and exposes it through the
//! [`Classifier`](mangoscan_types::Classifier) contract. ONNX Runtime is only linked
//! with the `local-ml` feature; without it [`load_classifier`] reports the model as
//! unavailable and the service runs its heuristic fallback.

pub mod classes;
pub mod execution_providers;
pub mod loader;
#[cfg(feature = "local-ml")]
pub mod onnx;
pub mod preprocess;

pub use execution_providers::{ExecutionProviderInfo, initialize_ort};
pub use loader::{DEFAULT_MODEL_VERSION, ModelSource, load_classifier};
