//! Byte-range file serving
//!
//! Only a single `bytes=<start>-<end?>` range is honoured. Anything else,
//! including a missing header, gets the whole file through
//! [`ServeFile`], which adds `Last-Modified` and conditional handling.

use std::io::SeekFrom;
use std::path::Path;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::ServerError;

static RANGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"bytes=(\d+)-(\d*)").expect("valid range pattern"));

const PARTIAL_CONTENT_TYPE: &str = "audio/mpeg";

/// What to send for a given `Range` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDecision {
    /// No usable range, send everything
    Full,
    /// Start lies at or past the end of the file
    Unsatisfiable,
    /// Inclusive byte span
    Partial { start: u64, end: u64 },
}

/// Interpret `header` against a file of `file_size` bytes
pub fn parse_range(header: Option<&str>, file_size: u64) -> RangeDecision {
    let Some(captures) = header.and_then(|h| RANGE_PATTERN.captures(h)) else {
        return RangeDecision::Full;
    };

    let Ok(start) = captures[1].parse::<u64>() else {
        return RangeDecision::Full;
    };

    if start >= file_size {
        return RangeDecision::Unsatisfiable;
    }

    let last = file_size - 1;
    let end = match &captures[2] {
        "" => last,
        digits => match digits.parse::<u64>() {
            Ok(end) => end.min(last),
            Err(_) => return RangeDecision::Full,
        },
    };

    if end < start {
        return RangeDecision::Full;
    }

    RangeDecision::Partial { start, end }
}

/// Serve `path` for `request`, honouring its `Range` header
pub async fn serve_file(path: &Path, request: Request) -> Result<Response, ServerError> {
    let file_size = match tokio::fs::metadata(path).await {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ServerError::NotFound("Audio file not found".to_string()));
        },
        Err(e) => return Err(ServerError::Internal(e.to_string())),
    };

    let range = request
        .headers()
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());

    match parse_range(range, file_size) {
        RangeDecision::Full => Ok(serve_full(path, request).await),
        RangeDecision::Unsatisfiable => Ok(unsatisfiable(file_size)),
        RangeDecision::Partial { start, end } => serve_partial(path, start, end, file_size)
            .await
            .map_err(|e| ServerError::Internal(e.to_string())),
    }
}

async fn serve_full(path: &Path, mut request: Request) -> Response {
    // ServeFile would apply the range itself
    request.headers_mut().remove(header::RANGE);

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

fn unsatisfiable(file_size: u64) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::RANGE_NOT_SATISFIABLE;
    if let Ok(value) = HeaderValue::from_str(&format!("bytes */{}", file_size)) {
        response.headers_mut().insert(header::CONTENT_RANGE, value);
    }
    response
}

async fn serve_partial(
    path: &Path,
    start: u64,
    end: u64,
    file_size: u64,
) -> std::io::Result<Response> {
    let length = end - start + 1;

    let mut file = tokio::fs::File::open(path).await?;
    file.seek(SeekFrom::Start(start)).await?;
    let mut data = vec![0u8; length as usize];
    file.read_exact(&mut data).await?;

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, PARTIAL_CONTENT_TYPE)
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", start, end, file_size),
        )
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_LENGTH, length)
        .body(Body::from(data))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}
