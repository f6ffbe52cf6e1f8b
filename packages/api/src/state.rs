use mangoscan::Diagnoser;
use std::{sync::Arc, time::Duration};
use tokio::sync::Semaphore;

pub type AppState = Arc<State>;

pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CONCURRENT_INFERENCES: usize = 4;

/// Per-request limits enforced by the HTTP layer.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_image_size_bytes: usize,
    /// Covers waiting for an inference slot as well as the inference itself.
    pub inference_timeout: Duration,
    /// Inference calls allowed to occupy blocking threads at once.
    pub max_concurrent_inferences: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_image_size_bytes: DEFAULT_MAX_IMAGE_SIZE_BYTES,
            inference_timeout: DEFAULT_INFERENCE_TIMEOUT,
            max_concurrent_inferences: DEFAULT_MAX_CONCURRENT_INFERENCES,
        }
    }
}

/// Read-only after startup; shared by all requests.
pub struct State {
    pub diagnoser: Arc<Diagnoser>,
    pub limits: Limits,
    /// Held by a blocking inference task until it returns, even after its request timed out.
    pub inference_permits: Arc<Semaphore>,
}

impl State {
    pub fn new(diagnoser: Diagnoser, limits: Limits) -> Self {
        let permits = limits
            .max_concurrent_inferences
            .clamp(1, Semaphore::MAX_PERMITS);
        Self {
            diagnoser: Arc::new(diagnoser),
            limits,
            inference_permits: Arc::new(Semaphore::new(permits)),
        }
    }
}
