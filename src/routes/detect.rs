use crate::{
    detector::{report_labels, DetectorError, LabelRecord},
    image_payload::{decode_image_payload, ImagePayloadError},
    server::SharedState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Instant;
use thiserror::Error;
use tracing::instrument;

pub const DETECT_ROUTE: &str = "/api/rekognition/detect";

const MISSING_IMAGE_DETAIL: &str = "Missing image_base64 in request.";
const DETECTION_ERROR_DETAIL: &str = "Detection error.";

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    labels: Vec<LabelRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: &'static str,
}

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Missing image_base64 in request.")]
    MissingImage,
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidImage(#[from] ImagePayloadError),
    #[error("{0}")]
    Detector(#[from] DetectorError),
}

impl DetectError {
    /// Only the missing field is reported as such; every other failure shares
    /// one generic message and its cause stays in the log.
    fn detail(&self) -> &'static str {
        match self {
            DetectError::MissingImage => MISSING_IMAGE_DETAIL,
            DetectError::MalformedBody(_)
            | DetectError::InvalidImage(_)
            | DetectError::Detector(_) => DETECTION_ERROR_DETAIL,
        }
    }
}

impl IntoResponse for DetectError {
    fn into_response(self) -> Response {
        match &self {
            DetectError::MissingImage => tracing::warn!("Rejected request: {}", self),
            _ => tracing::error!("Detection error: {}", self),
        }

        let body = ErrorDetail {
            detail: self.detail(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[instrument(skip(state, body))]
pub async fn detect_labels(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<DetectResponse>, DetectError> {
    state.metrics.record_request(DETECT_ROUTE);

    let mut fields: Map<String, Value> = serde_json::from_slice(&body)?;
    let image_base64 = fields
        .remove("image_base64")
        .map(serde_json::from_value::<Option<String>>)
        .transpose()?
        .flatten()
        .filter(|encoded| !encoded.is_empty())
        .ok_or(DetectError::MissingImage)?;

    let image = decode_image_payload(&image_base64)?;
    tracing::info!("Received image for detection, size: {} bytes", image.len());

    let started = Instant::now();
    let labels = state
        .detector
        .detect_labels(image, &state.detection_params)
        .await?;
    state
        .metrics
        .record_detection_duration(started.elapsed().as_millis() as u64, DETECT_ROUTE);

    let person_detected = report_labels(&labels);
    state.metrics.record_labels(labels.len(), person_detected);

    Ok(Json(DetectResponse { labels }))
}
