//! Shared types for the MangoScan crates: the decoded leaf image, the classifier
//! contract and the pipeline error taxonomy.

pub use image;

pub mod classifier;
pub mod error;
pub mod img;

pub use classifier::Classifier;
pub use error::{DiagnosisError, DiagnosisResult};
pub use img::{ChannelMeans, LeafImage};

/// Opaque random identifier, used for error reports.
pub fn create_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
