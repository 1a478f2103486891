//! Public share access handlers.
//!
//! The check endpoints evaluate without consuming; the download
//! endpoints go through the accounting ledger and stream the blob only
//! after the grant has been committed. Passwords travel in a JSON body
//! on POST or a query parameter on GET (for plain browser links).

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use droplink_core::error::AppError;
use droplink_entity::share::AccessKey;
use droplink_engine::AccessOutcome;

use crate::dto::request::{AccessQuery, AccessRequest};
use crate::dto::response::ApiResponse;
use crate::error::deny_response;
use crate::extractors::RequesterInfo;
use crate::state::AppState;

/// GET /api/d/{code}
pub async fn check_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<AccessQuery>,
) -> Result<Response, AppError> {
    check(&state, AccessKey::Code(code), query.password).await
}

/// POST /api/d/{code}
pub async fn check_code_with_password(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<AccessRequest>,
) -> Result<Response, AppError> {
    check(&state, AccessKey::Code(code), req.password).await
}

/// GET /api/s/{token}
pub async fn check_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<AccessQuery>,
) -> Result<Response, AppError> {
    check(&state, AccessKey::Token(token), query.password).await
}

/// POST /api/s/{token}
pub async fn check_token_with_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<AccessRequest>,
) -> Result<Response, AppError> {
    check(&state, AccessKey::Token(token), req.password).await
}

/// GET /api/d/{code}/download
pub async fn download_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<AccessQuery>,
    requester: RequesterInfo,
) -> Result<Response, AppError> {
    download(&state, AccessKey::Code(code), query.password, requester).await
}

/// POST /api/d/{code}/download
pub async fn download_by_code_with_password(
    State(state): State<AppState>,
    Path(code): Path<String>,
    requester: RequesterInfo,
    Json(req): Json<AccessRequest>,
) -> Result<Response, AppError> {
    download(&state, AccessKey::Code(code), req.password, requester).await
}

/// GET /api/s/{token}/download
pub async fn download_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<AccessQuery>,
    requester: RequesterInfo,
) -> Result<Response, AppError> {
    download(&state, AccessKey::Token(token), query.password, requester).await
}

/// POST /api/s/{token}/download
pub async fn download_by_token_with_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    requester: RequesterInfo,
    Json(req): Json<AccessRequest>,
) -> Result<Response, AppError> {
    download(&state, AccessKey::Token(token), req.password, requester).await
}

async fn check(
    state: &AppState,
    key: AccessKey,
    password: Option<String>,
) -> Result<Response, AppError> {
    let result = state
        .access_service
        .check_access(&key, password.as_deref())
        .await?;

    match result.decision.deny_reason() {
        None => Ok(Json(ApiResponse::ok(result.summary)).into_response()),
        Some(reason) => Ok(deny_response(reason)),
    }
}

async fn download(
    state: &AppState,
    key: AccessKey,
    password: Option<String>,
    requester: RequesterInfo,
) -> Result<Response, AppError> {
    let outcome = state
        .access_service
        .consume_access(&key, password.as_deref(), requester.context())
        .await?;

    let grant = match outcome {
        AccessOutcome::Granted(grant) => grant,
        AccessOutcome::Denied(reason) => return Ok(deny_response(reason)),
    };

    let stream = state.file_service.open(&grant.file).await?;

    let content_type = grant
        .file
        .mime_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                sanitize_filename(&grant.file.name)
            ),
        )
        .header(header::CONTENT_LENGTH, grant.file.size_bytes)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

/// Strip characters that would break the Content-Disposition header.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' | '\r' | '\n' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_header_breakers() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("a\"b\\c.txt"), "a_b_c.txt");
        assert_eq!(sanitize_filename("evil\r\nheader"), "evil__header");
    }
}
