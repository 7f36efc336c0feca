//! HTTP Endpoints
//!
//! - `POST /transcribe` (alias `/transliterate`): multipart image upload
//! - `GET /audio/*id`: generated audio with byte-range support
//! - `GET /`, `/health`, `/metrics`

use std::any::Any;
use std::net::IpAddr;
use std::time::Duration;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Path, Request, State,
    },
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

use lipi_config::ServerConfig;
use lipi_core::{Script, TranscriptionRequest, TranscriptionResult};

use crate::metrics::{metrics_handler, record_request};
use crate::range::serve_file;
use crate::state::AppState;
use crate::ServerError;

/// Room for multipart boundaries and the small text fields
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let body_limit = server.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/transcribe", post(transcribe))
        .route("/transliterate", post(transcribe))
        // wildcard so nested paths still get the JSON 404
        .route("/audio/*id", get(serve_audio))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// Permissive when disabled; otherwise only the configured origins.
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::warn!("CORS enabled without valid origins, cross-origin requests will fail");
    } else {
        tracing::info!("CORS configured with {} origins", parsed_origins.len());
    }

    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(cors::Any)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    ServerError::Internal(detail).into_response()
}

async fn service_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "running",
        "service": "lipi",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let writable = state.store().is_writable().await;
    let status = if writable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if writable { "healthy" } else { "degraded" },
            "audio_dir_writable": writable,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// Fields collected from the upload form
#[derive(Debug, Default)]
struct UploadForm {
    filename: Option<String>,
    image: Option<Vec<u8>>,
    target_script: Option<String>,
    ocr_lang: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ServerError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                // parts without a filename are form values, not uploads
                Some("file") if field.file_name().is_some() => {
                    form.filename = field.file_name().map(str::to_string);
                    form.image = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
                },
                Some("target_script") => {
                    form.target_script = Some(field.text().await.map_err(multipart_error)?);
                },
                Some("ocr_lang") => {
                    form.ocr_lang = Some(field.text().await.map_err(multipart_error)?);
                },
                _ => {},
            }
        }

        Ok(form)
    }

    fn into_request(self, max_bytes: usize) -> Result<TranscriptionRequest, ServerError> {
        let image = self
            .image
            .ok_or_else(|| ServerError::InvalidRequest("No file uploaded".to_string()))?;

        if self.filename.as_deref().unwrap_or_default().is_empty() {
            return Err(ServerError::InvalidRequest("Empty filename".to_string()));
        }
        if image.is_empty() {
            return Err(ServerError::InvalidRequest("Empty file".to_string()));
        }
        if image.len() > max_bytes {
            return Err(ServerError::PayloadTooLarge(format!(
                "File exceeds {} bytes",
                max_bytes
            )));
        }

        let target = self
            .target_script
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| Script::Latin.key().to_string());

        let mut request = TranscriptionRequest::new(image, target);
        if let Some(lang) = self.ocr_lang.filter(|l| !l.trim().is_empty()) {
            request = request.with_ocr_languages(lang);
        }
        Ok(request)
    }
}

fn multipart_error(err: MultipartError) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge(err.body_text())
    } else {
        ServerError::InvalidRequest(err.body_text())
    }
}

async fn transcribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptionResult>, ServerError> {
    let result = run_transcription(&state, &headers, multipart).await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => e.status(),
    };
    record_request("transcribe", status.as_u16());
    result.map(Json)
}

async fn run_transcription(
    state: &AppState,
    headers: &HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<TranscriptionResult, ServerError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Not a multipart upload");
        ServerError::InvalidRequest("No file uploaded".to_string())
    })?;

    let server = &state.config.server;
    let request = UploadForm::read(multipart)
        .await?
        .into_request(server.max_upload_bytes)?;

    tracing::info!(
        bytes = request.image.len(),
        target_script = %request.target_script,
        ocr_lang = request.ocr_languages.as_deref().unwrap_or("default"),
        "Transcription request"
    );

    let pipeline = state.pipeline.run(&request);
    let outcome = if server.timeout_seconds == 0 {
        pipeline.await?
    } else {
        // dropping the pipeline future removes its unpublished temporaries
        tokio::time::timeout(Duration::from_secs(server.timeout_seconds), pipeline)
            .await
            .map_err(|_| {
                tracing::error!(
                    timeout_seconds = server.timeout_seconds,
                    "Transcription timed out"
                );
                ServerError::Internal("Request timed out".to_string())
            })??
    };
    let audio_url = outcome
        .artifact()
        .map(|artifact| build_audio_url(headers, server, &artifact.id));

    Ok(TranscriptionResult::from_outcome(&outcome, audio_url))
}

async fn serve_audio(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Response, ServerError> {
    let id = sanitize_id(&id);
    let result = match state.store().resolve(&id).await {
        Some(path) => serve_file(&path, request).await,
        None => Err(ServerError::NotFound("Audio file not found".to_string())),
    };

    let status = match &result {
        Ok(response) => response.status(),
        Err(e) => e.status(),
    };
    record_request("audio", status.as_u16());
    result
}

/// Keep `[A-Za-z0-9._-]` and drop leading dots
pub fn sanitize_id(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    kept.trim_start_matches('.').to_string()
}

/// Public URL of an artifact as seen by the client that sent `headers`
///
/// Loopback and wildcard hosts are replaced with `fallback_host`, since
/// they do not reach this server from another device.
pub fn build_audio_url(headers: &HeaderMap, server: &ServerConfig, id: &str) -> String {
    let requested = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(host_without_port)
        .unwrap_or_default();

    let host = if is_unreachable_host(requested) {
        server.fallback_host.as_str()
    } else {
        requested
    };

    format!(
        "http://{}:{}/audio/{}",
        bracket_ipv6(host),
        server.public_port,
        sanitize_id(id)
    )
}

fn host_without_port(raw: &str) -> &str {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix('[') {
        return rest.split(']').next().unwrap_or_default();
    }
    match raw.matches(':').count() {
        1 => raw.split(':').next().unwrap_or_default(),
        // bare IPv6 literal, no port
        _ => raw,
    }
}

fn is_unreachable_host(host: &str) -> bool {
    host.is_empty()
        || host.eq_ignore_ascii_case("localhost")
        || host
            .parse::<IpAddr>()
            .map(|ip| ip.is_loopback() || ip.is_unspecified())
            .unwrap_or(false)
}

fn bracket_ipv6(host: &str) -> String {
    if host.contains(':') {
        format!("[{}]", host)
    } else {
        host.to_string()
    }
}
