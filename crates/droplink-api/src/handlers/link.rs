//! Share link management handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use droplink_core::error::AppError;
use droplink_engine::NewShareLink;
use droplink_entity::share::LinkType;

use crate::dto::request::CreateLinkRequest;
use crate::dto::response::{ApiResponse, LinkResponse};
use crate::state::AppState;

/// POST /api/links
pub async fn create_link(
    State(state): State<AppState>,
    Json(req): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LinkResponse>>), AppError> {
    let link_type = parse_link_type(&req.link_type)?;

    let link = state
        .share_service
        .create_link(NewShareLink {
            file_id: req.file_id.into(),
            link_type,
            recipient_email: req.recipient_email,
            password: req.password,
            expires_at: req.expires_at,
            download_limit: req.download_limit,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(LinkResponse::from(link))),
    ))
}

/// DELETE /api/links/{id} — permanent revocation
pub async fn revoke_link(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let revoked = state.access_service.revoke_link(id.into()).await?;
    if !revoked {
        return Err(AppError::not_found("Link not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn parse_link_type(raw: &str) -> Result<LinkType, AppError> {
    match raw {
        "public" => Ok(LinkType::Public),
        "email" => Ok(LinkType::Email),
        "code" => Ok(LinkType::Code),
        other => Err(AppError::validation(format!(
            "Unknown link type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link_type() {
        assert_eq!(parse_link_type("public").unwrap(), LinkType::Public);
        assert_eq!(parse_link_type("email").unwrap(), LinkType::Email);
        assert_eq!(parse_link_type("code").unwrap(), LinkType::Code);
        assert!(parse_link_type("Public").is_err());
        assert!(parse_link_type("").is_err());
    }
}
