//! API request handlers
//!
//! The HTML upload page plus JSON endpoints sharing the same pipeline.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ErrorKind, ProfitError, ProfitResult};
use crate::pipeline;
use crate::types::{PageState, Summary};

use super::page::render_page;
use super::server::AppState;

/// Multipart field carrying the CSV
pub const UPLOAD_FIELD: &str = "file";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
            error_kind: None,
        }
    }

    /// Failure envelope carrying the user-facing message and its kind
    pub fn from_error(error: &ProfitError) -> Self {
        Self {
            error_kind: Some(error.kind()),
            ..Self::err(error.user_message())
        }
    }
}

/// A file pulled out of the multipart body
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Find the `file` field. `None` when it is missing or has no filename.
pub async fn read_upload(multipart: &mut Multipart) -> ProfitResult<Option<UploadedFile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProfitError::Upload(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ProfitError::Upload(e.to_string()))?;

        if filename.is_empty() {
            return Ok(None);
        }

        return Ok(Some(UploadedFile {
            filename,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

/// Store the upload and run the pipeline off the async workers
async fn process_upload(state: &AppState, upload: UploadedFile) -> ProfitResult<Summary> {
    let store = state.uploads.clone();
    let chart = state.chart;

    info!(filename = %upload.filename, bytes = upload.bytes.len(), "processing upload");

    tokio::task::spawn_blocking(move || {
        let path = store.save(&upload.filename, &upload.bytes)?;
        pipeline::process_file(&path, &chart)
    })
    .await
    .map_err(|e| ProfitError::Task(e.to_string()))?
}

/// GET / - Upload form
pub async fn index() -> impl IntoResponse {
    Html(render_page(&PageState::AwaitingUpload))
}

/// POST / - Process an upload and render the result page
pub async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> impl IntoResponse {
    let page = match read_upload(&mut multipart).await {
        Ok(None) => PageState::AwaitingUpload,
        Ok(Some(file)) => PageState::from(process_upload(&state, file).await),
        Err(e) => PageState::from(Err(e)),
    };
    Html(render_page(&page))
}

/// POST /api/v1/summary - Same pipeline, JSON response
pub async fn summary(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> impl IntoResponse {
    let result = match read_upload(&mut multipart).await {
        Ok(Some(file)) => process_upload(&state, file).await,
        Ok(None) => Err(ProfitError::Upload(format!(
            "no file provided in field '{}'",
            UPLOAD_FIELD
        ))),
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => Json(ApiResponse::ok(summary)),
        Err(e) => {
            warn!(error = %e, "summary request failed");
            Json(ApiResponse::<Summary>::from_error(&e))
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub upload_dir: String,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        upload_dir: state.uploads.dir().display().to_string(),
    }))
}
