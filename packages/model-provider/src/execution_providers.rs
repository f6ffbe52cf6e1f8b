//! Execution Provider Configuration for ONNX Runtime
//!
//! Call `initialize_ort()` once at startup, before the classifier session is built.
//! Accelerators compiled in through cargo features are registered in order of
//! preference (CUDA > CoreML > DirectML > XNNPACK); CPU is always the final fallback.
//! Without the `local-ml` feature this only reports that inference is disabled.

use std::sync::OnceLock;

/// Information about the active execution providers after initialization
#[derive(Debug, Clone, Default)]
pub struct ExecutionProviderInfo {
    /// List of active execution providers (in priority order)
    pub active_providers: Vec<String>,
    /// Whether any GPU/NPU acceleration is active
    pub accelerated: bool,
    /// Warnings during initialization
    pub warnings: Vec<String>,
}

static EP_INFO: OnceLock<ExecutionProviderInfo> = OnceLock::new();

/// Initialize ONNX Runtime with the best available execution providers.
/// Subsequent calls return the cached result.
pub fn initialize_ort() -> ExecutionProviderInfo {
    EP_INFO.get_or_init(do_initialize_ort).clone()
}

pub fn is_initialized() -> bool {
    EP_INFO.get().is_some()
}

#[cfg(feature = "local-ml")]
fn do_initialize_ort() -> ExecutionProviderInfo {
    #[allow(unused_imports)]
    use tracing::{info, warn};

    #[allow(unused_mut)]
    let mut active_providers: Vec<String> = Vec::new();
    #[allow(unused_mut)]
    let mut warnings: Vec<String> = Vec::new();
    #[allow(unused_mut)]
    let mut eps: Vec<ort::execution_providers::ExecutionProviderDispatch> = Vec::new();

    #[cfg(feature = "cuda")]
    {
        use ort::execution_providers::ExecutionProvider;
        let ep = ort::execution_providers::CUDAExecutionProvider::default();
        if ep.is_available().unwrap_or(false) {
            info!("CUDA execution provider available");
            eps.push(ep.build());
            active_providers.push("CUDA".to_string());
        } else {
            let msg = "CUDA feature enabled but runtime not available";
            warn!("{}", msg);
            warnings.push(msg.to_string());
        }
    }

    #[cfg(feature = "coreml")]
    {
        use ort::execution_providers::ExecutionProvider;
        let ep = ort::execution_providers::CoreMLExecutionProvider::default();
        if ep.is_available().unwrap_or(false) {
            info!("CoreML execution provider available");
            eps.push(ep.build());
            active_providers.push("CoreML".to_string());
        } else {
            let msg = "CoreML feature enabled but not on Apple platform";
            warn!("{}", msg);
            warnings.push(msg.to_string());
        }
    }

    #[cfg(feature = "directml")]
    {
        use ort::execution_providers::ExecutionProvider;
        let ep = ort::execution_providers::DirectMLExecutionProvider::default();
        if ep.is_available().unwrap_or(false) {
            info!("DirectML execution provider available");
            eps.push(ep.build());
            active_providers.push("DirectML".to_string());
        } else {
            let msg = "DirectML feature enabled but not on Windows";
            warn!("{}", msg);
            warnings.push(msg.to_string());
        }
    }

    #[cfg(feature = "xnnpack")]
    {
        use ort::execution_providers::ExecutionProvider;
        let ep = ort::execution_providers::XNNPACKExecutionProvider::default();
        if ep.is_available().unwrap_or(false) {
            info!("XNNPACK execution provider available");
            eps.push(ep.build());
            active_providers.push("XNNPACK".to_string());
        } else {
            let msg = "XNNPACK feature enabled but not available";
            warn!("{}", msg);
            warnings.push(msg.to_string());
        }
    }

    active_providers.push("CPU".to_string());
    let accelerated = active_providers.iter().any(|p| p != "CPU");

    if eps.is_empty() {
        info!("No GPU/NPU acceleration available, using CPU");
        ort::init().with_name("mangoscan").commit();
    } else {
        info!(
            "Initializing ORT with execution providers: {:?}",
            active_providers
        );
        ort::init()
            .with_name("mangoscan")
            .with_execution_providers(eps)
            .commit();
    }

    ExecutionProviderInfo {
        active_providers,
        accelerated,
        warnings,
    }
}

#[cfg(not(feature = "local-ml"))]
fn do_initialize_ort() -> ExecutionProviderInfo {
    ExecutionProviderInfo {
        active_providers: vec!["CPU (local-ml feature disabled)".to_string()],
        accelerated: false,
        warnings: vec!["local-ml feature not enabled".to_string()],
    }
}
