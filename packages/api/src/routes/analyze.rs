use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{Router, routing::post};
use mangoscan::Diagnosis;
use mangoscan_types::{DiagnosisError, LeafImage};
use std::time::Instant;
use utoipa::ToSchema;

/// Multipart form field carrying the upload.
pub const IMAGE_FIELD: &str = "image";

pub fn routes() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze))
}

/// Multipart upload accepted by `POST /analyze`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AnalyzeUpload {
    /// Leaf photo, any `image/*` media type
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

pub fn is_image_media_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
}

fn reject(reason: &'static str, err: ApiError) -> ApiError {
    metrics::counter!("analyze_rejections_total", "reason" => reason).increment(1);
    err
}

fn reject_multipart(err: MultipartError) -> ApiError {
    let reason = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        "too_large"
    } else {
        "malformed"
    };
    reject(reason, err.into())
}

/// Pull the `image` field out of the form and apply the transport-level checks.
async fn read_image_field(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(reject_multipart)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        if !is_image_media_type(field.content_type()) {
            return Err(reject(
                "media_type",
                DiagnosisError::invalid_input("Uploaded file must be an image").into(),
            ));
        }

        let data = field.bytes().await.map_err(reject_multipart)?;
        if data.is_empty() {
            return Err(reject(
                "empty",
                DiagnosisError::invalid_input("Empty file").into(),
            ));
        }
        if data.len() > max_bytes {
            return Err(reject(
                "too_large",
                ApiError::payload_too_large(format!("Image exceeds {} bytes", max_bytes)),
            ));
        }
        return Ok(data.to_vec());
    }

    Err(reject(
        "missing_field",
        crate::bad_request!(
            "image file is required (multipart form-data field: {})",
            IMAGE_FIELD
        ),
    ))
}

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "diagnosis",
    request_body(content = AnalyzeUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Diagnosis for the uploaded leaf", body = Diagnosis),
        (status = 400, description = "Not multipart, or a missing, non-image, empty or undecodable upload"),
        (status = 413, description = "Upload exceeds the configured size limit"),
        (status = 500, description = "Classifier produced unusable scores"),
        (status = 504, description = "No inference slot freed up, or inference did not finish, within the timeout")
    )
)]
#[tracing::instrument(name = "POST /analyze", skip(state, multipart))]
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Diagnosis>, ApiError> {
    let mut multipart = multipart.map_err(|e| reject("not_multipart", e.into()))?;
    let data = read_image_field(&mut multipart, state.limits.max_image_size_bytes).await?;

    let image = tokio::task::spawn_blocking(move || LeafImage::decode(&data))
        .await
        .map_err(|e| crate::internal!("Image decode task join error: {}", e))?
        .map_err(|e| reject("undecodable", e.into()))?;

    let diagnoser = state.diagnoser.clone();
    let permits = state.inference_permits.clone();
    let timeout = state.limits.inference_timeout;
    let started = Instant::now();
    let inference = async move {
        let permit = permits
            .acquire_owned()
            .await
            .map_err(|e| crate::internal!("Inference permits closed: {}", e))?;
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            diagnoser.diagnose(&image)
        })
        .await
        .map_err(|e| crate::internal!("Inference task join error: {}", e))?
        .map_err(ApiError::from)
    };
    let diagnosis = tokio::time::timeout(timeout, inference)
        .await
        .map_err(|_| ApiError::from(DiagnosisError::InferenceTimeout(timeout)))??;

    metrics::histogram!("inference_duration_seconds").record(started.elapsed().as_secs_f64());
    metrics::counter!(
        "diagnoses_total",
        "model_version" => diagnosis.model_version.clone(),
        "low_confidence" => diagnosis.low_confidence.to_string()
    )
    .increment(1);
    tracing::info!(
        diagnosis = %diagnosis.diagnosis,
        confidence = diagnosis.confidence,
        low_confidence = diagnosis.low_confidence,
        model_version = %diagnosis.model_version,
        "Diagnosis complete"
    );

    Ok(Json(diagnosis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_image_media_types() {
        assert!(is_image_media_type(Some("image/png")));
        assert!(is_image_media_type(Some("IMAGE/JPEG")));
        assert!(!is_image_media_type(Some("text/plain")));
        assert!(!is_image_media_type(Some("application/octet-stream")));
        assert!(!is_image_media_type(None));
    }
}
