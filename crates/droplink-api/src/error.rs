//! Maps domain errors and access denials to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

// The `IntoResponse` impl for `AppError` lives in `droplink-core`
// (the orphan rule requires it next to the type); the body type is
// re-exported here so API consumers keep the same path.
pub use droplink_core::error::ApiErrorResponse;
use droplink_engine::DenyReason;

/// HTTP status for a denial.
///
/// `NotFound`, `NotPublic`, and `PasswordInvalid` all map to 404 and
/// share one message, so probing identifiers reveals nothing about
/// whether a protected target exists. Gone-but-was-here states map to
/// 410; a missing password maps to 401 so clients know to prompt.
pub fn deny_status(reason: DenyReason) -> StatusCode {
    match reason {
        DenyReason::NotFound | DenyReason::NotPublic | DenyReason::PasswordInvalid => {
            StatusCode::NOT_FOUND
        }
        DenyReason::PasswordRequired => StatusCode::UNAUTHORIZED,
        DenyReason::Expired | DenyReason::Inactive | DenyReason::LimitReached => StatusCode::GONE,
    }
}

/// Build the denial response for a reason.
pub fn deny_response(reason: DenyReason) -> Response {
    let body = ApiErrorResponse {
        error: reason.to_string(),
        message: reason.public_message().to_string(),
    };
    (deny_status(reason), Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probing_reasons_are_indistinguishable_by_status() {
        assert_eq!(deny_status(DenyReason::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(deny_status(DenyReason::NotPublic), StatusCode::NOT_FOUND);
        assert_eq!(
            deny_status(DenyReason::PasswordInvalid),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DenyReason::NotFound.public_message(),
            DenyReason::PasswordInvalid.public_message()
        );
    }

    #[test]
    fn test_gone_states() {
        assert_eq!(deny_status(DenyReason::Expired), StatusCode::GONE);
        assert_eq!(deny_status(DenyReason::Inactive), StatusCode::GONE);
        assert_eq!(deny_status(DenyReason::LimitReached), StatusCode::GONE);
        assert_eq!(
            deny_status(DenyReason::PasswordRequired),
            StatusCode::UNAUTHORIZED
        );
    }
}
