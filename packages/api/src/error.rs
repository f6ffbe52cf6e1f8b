use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use mangoscan_types::DiagnosisError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportPolicy {
    Ignore,
    Report,
}

/// Attached to the response extensions of reported errors.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub id: String,
    pub status_code: u16,
    pub public_code: String,
    pub summary: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: String,
    public_message: Option<String>,
    report_policy: ReportPolicy,
    report_summary: Option<String>,
    report_details: Option<String>,
}

impl ApiError {
    fn new(
        status: StatusCode,
        public_code: impl Into<String>,
        public_message: Option<String>,
        report_policy: ReportPolicy,
    ) -> Self {
        Self {
            status,
            public_code: public_code.into(),
            public_message,
            report_policy,
            report_summary: None,
            report_details: None,
        }
    }

    fn with_report(mut self, summary: impl Into<String>, details: Option<String>) -> Self {
        self.report_summary = Some(summary.into());
        self.report_details = details;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            None,
            ReportPolicy::Report,
        )
        .with_report(msg, None)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            Some(msg),
            ReportPolicy::Ignore,
        )
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Payload too large: {}", msg);
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "PAYLOAD_TOO_LARGE",
            Some(msg),
            ReportPolicy::Ignore,
        )
    }

    pub fn gateway_timeout(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Gateway timeout: {}", msg);
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            "INFERENCE_TIMEOUT",
            Some("Inference timed out".to_string()),
            ReportPolicy::Report,
        )
        .with_report(msg, None)
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Service unavailable: {}", msg);
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            Some("Service unavailable".to_string()),
            ReportPolicy::Report,
        )
        .with_report(msg, None)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            error: ErrorBody<'a>,
        }

        #[derive(Serialize)]
        struct ErrorBody<'a> {
            code: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<&'a str>,
            message: &'a str,
        }

        let public_message = self
            .public_message
            .as_deref()
            .unwrap_or_else(|| self.status.canonical_reason().unwrap_or("Error"));

        let error_id = (self.report_policy == ReportPolicy::Report)
            .then(mangoscan_types::create_id);

        let mut response = (
            self.status,
            Json(ErrorEnvelope {
                error: ErrorBody {
                    code: &self.public_code,
                    id: error_id.as_deref(),
                    message: public_message,
                },
            }),
        )
            .into_response();

        if let Some(id) = error_id.as_deref() {
            if let Ok(v) = HeaderValue::from_str(id) {
                response.headers_mut().insert("x-error-id", v);
            }

            let report = ErrorReport {
                id: id.to_string(),
                status_code: self.status.as_u16(),
                public_code: self.public_code.clone(),
                summary: self
                    .report_summary
                    .clone()
                    .unwrap_or_else(|| public_message.to_string()),
                details: self.report_details.clone(),
            };
            response.extensions_mut().insert(report);
        }

        response
    }
}

impl From<DiagnosisError> for ApiError {
    fn from(err: DiagnosisError) -> Self {
        match err {
            DiagnosisError::InvalidInput(msg) => Self::bad_request(msg),
            DiagnosisError::InferenceTimeout(after) => {
                Self::gateway_timeout(format!("inference exceeded {:?}", after))
            }
            DiagnosisError::ModelUnavailable(msg) => Self::service_unavailable(msg),
            other @ (DiagnosisError::InvalidScores(_) | DiagnosisError::Inference(_)) => {
                tracing::error!("Diagnosis failed: {:?}", other);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DIAGNOSIS_ERROR",
                    None,
                    ReportPolicy::Report,
                )
                .with_report(format!("{:?}", other), Some(other.to_string()))
            }
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::payload_too_large(err.body_text())
        } else {
            Self::bad_request(format!("Invalid multipart body: {}", err.body_text()))
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::bad_request(format!(
            "Expected multipart/form-data: {}",
            rejection.body_text()
        ))
    }
}

impl std::error::Error for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.public_code.as_str())
    }
}

#[macro_export]
macro_rules! internal {
    ($($arg:tt)*) => { $crate::error::ApiError::internal(format!($($arg)*)) };
}

#[macro_export]
macro_rules! bad_request {
    ($($arg:tt)*) => { $crate::error::ApiError::bad_request(format!($($arg)*)) };
}
