//! Owner-facing file management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header::HeaderMap};
use bytes::Bytes;
use uuid::Uuid;

use droplink_core::error::AppError;
use droplink_engine::{AccessSettingsUpdate, NewFile};

use crate::dto::request::{UpdateAccessSettingsRequest, UploadQuery};
use crate::dto::response::{ApiResponse, FileResponse, LinkResponse};
use crate::state::AppState;

/// POST /api/files?name=...
///
/// The raw request body is the file content; the MIME type is taken
/// from the Content-Type header when present.
pub async fn upload_file(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<FileResponse>>), AppError> {
    let mime_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let file = state
        .file_service
        .register(NewFile {
            name: query.name,
            mime_type,
            data: body,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(FileResponse::from(file))),
    ))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponse>>, AppError> {
    let file = state
        .file_service
        .get(id.into())
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    Ok(Json(ApiResponse::ok(FileResponse::from(file))))
}

/// PUT /api/files/{id}/access
pub async fn update_access_settings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAccessSettingsRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, AppError> {
    let file = state
        .file_service
        .update_access_settings(
            id.into(),
            AccessSettingsUpdate {
                is_public: req.is_public,
                password: req.password,
                expires_at: req.expires_at,
                download_limit: req.download_limit,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(FileResponse::from(file))))
}

/// GET /api/files/{id}/links
pub async fn list_links(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<LinkResponse>>>, AppError> {
    let links = state.share_service.list_links(id.into()).await?;
    let links = links.into_iter().map(LinkResponse::from).collect();
    Ok(Json(ApiResponse::ok(links)))
}

/// GET /api/files/{id}/audit
pub async fn download_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<droplink_entity::audit::AuditEntry>>>, AppError> {
    if state.file_service.get(id.into()).await?.is_none() {
        return Err(AppError::not_found("File not found"));
    }
    let entries = state.audit_repo.find_by_file(id.into()).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.file_service.delete(id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}
