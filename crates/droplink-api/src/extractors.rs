//! `RequesterInfo` extractor — captures the network origin and client
//! identity recorded in the download audit trail.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use droplink_engine::RequesterContext;

use crate::state::AppState;

/// Requester identity extracted from request headers.
#[derive(Debug, Clone)]
pub struct RequesterInfo(pub RequesterContext);

impl RequesterInfo {
    /// Returns the inner requester context.
    pub fn context(&self) -> &RequesterContext {
        &self.0
    }
}

impl FromRequestParts<AppState> for RequesterInfo {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Behind a reverse proxy the first X-Forwarded-For entry is the
        // original client.
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("unknown")
            .to_string();

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(Self(RequesterContext::new(ip_address, user_agent)))
    }
}
