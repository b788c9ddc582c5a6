//! HTTP surface: one upload endpoint in front of the analyzer.
//!
//! The backoff waits inside the analyzer suspend only the request's own
//! task, so concurrent uploads keep being served during a retry sequence.
//! Each request retries independently; there is no shared backoff state,
//! which can amplify load on the model service under concurrent traffic.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tabscan_core::{mime_for_filename, Analyzer, TabscanError, UploadError, UploadStore, UploadedImage};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub store: Arc<UploadStore>,
}

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    max_upload_bytes: usize,
) -> anyhow::Result<()> {
    let app = router(state, max_upload_bytes);
    tracing::info!("Server listening on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutting down");
    }
}

#[derive(Serialize)]
struct ExtractionResponse {
    text: String,
}

/// JSON error reply with a status code.
///
/// Client-caused failures (missing or empty file field) get a 400 with the
/// specific reason; everything else is a generic 500 with the detail logged
/// server-side only.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<TabscanError> for ApiError {
    fn from(error: TabscanError) -> Self {
        match error {
            TabscanError::Upload(upload @ (UploadError::MissingField | UploadError::EmptyFile)) => {
                Self::bad_request(upload.to_string())
            }
            other => {
                tracing::error!("Error processing image: {other}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Failed to process image".to_string(),
                }
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(error: UploadError) -> Self {
        TabscanError::from(error).into()
    }
}

/// POST /upload - multipart form with one `image` field.
async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionResponse>, ApiError> {
    let image = store_image_field(&state, &mut multipart).await?;
    let result = state.analyzer.analyze(&image).await.map_err(ApiError::from)?;
    Ok(Json(ExtractionResponse { text: result.text }))
}

/// Pull the `image` field out of the multipart body and persist it.
async fn store_image_field(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<UploadedImage, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| mime_for_filename(&filename).to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
        let image = state.store.save(&filename, &mime_type, &bytes).await?;
        return Ok(image);
    }
    Err(UploadError::MissingField.into())
}
