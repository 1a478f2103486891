//! Issues and lists share links.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument};

use droplink_auth::password::PasswordHasher;
use droplink_core::error::AppError;
use droplink_core::result::AppResult;
use droplink_core::types::FileId;
use droplink_database::repositories::{FileRepository, ShareLinkRepository};
use droplink_entity::share::{CreateShareLink, LinkType, ShareLink};

use crate::access::TokenGenerator;

/// Owner-supplied parameters for a new share link.
#[derive(Debug, Clone, Deserialize)]
pub struct NewShareLink {
    /// The file to share.
    pub file_id: FileId,
    /// How the link is issued.
    pub link_type: LinkType,
    /// Recipient address, required for email links.
    pub recipient_email: Option<String>,
    /// Plaintext password to protect the link with, if any.
    pub password: Option<String>,
    /// Expiry time (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum downloads (None = unlimited).
    pub download_limit: Option<i32>,
}

/// Creates and lists share links. Restrictions are fixed at issuance;
/// the only later mutation a link sees is revocation.
#[derive(Debug, Clone)]
pub struct ShareService {
    links: ShareLinkRepository,
    files: FileRepository,
    hasher: Arc<PasswordHasher>,
    tokens: TokenGenerator,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        links: ShareLinkRepository,
        files: FileRepository,
        hasher: Arc<PasswordHasher>,
        tokens: TokenGenerator,
    ) -> Self {
        Self {
            links,
            files,
            hasher,
            tokens,
        }
    }

    /// Issue a new share link for a file.
    ///
    /// The token is generated server-side and never chosen by the owner.
    #[instrument(skip(self, request), fields(file_id = %request.file_id))]
    pub async fn create_link(&self, request: NewShareLink) -> AppResult<ShareLink> {
        validate_new_link(&request)?;

        if self.files.find_by_id(request.file_id).await?.is_none() {
            return Err(AppError::not_found("File not found"));
        }

        let password_hash = match request.password {
            Some(password) => Some(self.hash_blocking(password).await?),
            None => None,
        };

        let data = CreateShareLink {
            file_id: request.file_id,
            link_type: request.link_type,
            recipient_email: request.recipient_email,
            token: self.tokens.generate_token(),
            password_hash,
            expires_at: request.expires_at,
            download_limit: request.download_limit,
        };

        let link = self.links.create(&data).await?;
        info!(link_id = %link.id, link_type = ?link.link_type, "Share link created");
        Ok(link)
    }

    /// List the links issued for a file, newest first.
    pub async fn list_links(&self, file_id: FileId) -> AppResult<Vec<ShareLink>> {
        self.links.find_by_file(file_id).await
    }

    async fn hash_blocking(&self, password: String) -> AppResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
    }
}

fn validate_new_link(request: &NewShareLink) -> AppResult<()> {
    match request.link_type {
        LinkType::Email => {
            let Some(email) = request.recipient_email.as_deref() else {
                return Err(AppError::validation("Email links require a recipient"));
            };
            if !email.contains('@') {
                return Err(AppError::validation("Recipient email is not valid"));
            }
        }
        LinkType::Public | LinkType::Code => {
            if request.recipient_email.is_some() {
                return Err(AppError::validation(
                    "Only email links may carry a recipient",
                ));
            }
        }
    }

    if let Some(limit) = request.download_limit {
        if limit < 1 {
            return Err(AppError::validation("Download limit must be at least 1"));
        }
    }

    if let Some(password) = request.password.as_deref() {
        if password.is_empty() {
            return Err(AppError::validation("Password must not be empty"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use droplink_core::error::ErrorKind;
    use droplink_core::types::FileId;

    fn request(link_type: LinkType) -> NewShareLink {
        NewShareLink {
            file_id: FileId::new(),
            link_type,
            recipient_email: None,
            password: None,
            expires_at: None,
            download_limit: None,
        }
    }

    #[test]
    fn test_email_link_requires_recipient() {
        let err = validate_new_link(&request(LinkType::Email)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let ok = NewShareLink {
            recipient_email: Some("alice@example.com".to_string()),
            ..request(LinkType::Email)
        };
        assert!(validate_new_link(&ok).is_ok());
    }

    #[test]
    fn test_recipient_rejected_on_non_email_links() {
        let bad = NewShareLink {
            recipient_email: Some("alice@example.com".to_string()),
            ..request(LinkType::Public)
        };
        assert_eq!(
            validate_new_link(&bad).unwrap_err().kind,
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_zero_download_limit_rejected() {
        let bad = NewShareLink {
            download_limit: Some(0),
            ..request(LinkType::Public)
        };
        assert_eq!(
            validate_new_link(&bad).unwrap_err().kind,
            ErrorKind::Validation
        );

        let ok = NewShareLink {
            download_limit: Some(1),
            ..request(LinkType::Public)
        };
        assert!(validate_new_link(&ok).is_ok());
    }

    #[test]
    fn test_empty_password_rejected() {
        let bad = NewShareLink {
            password: Some(String::new()),
            ..request(LinkType::Code)
        };
        assert_eq!(
            validate_new_link(&bad).unwrap_err().kind,
            ErrorKind::Validation
        );
    }
}
