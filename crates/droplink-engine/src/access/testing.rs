//! Shared test fixtures: entity builders, a fixed clock, and an
//! in-memory access record store with the same conditional-update
//! semantics as the PostgreSQL implementation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use droplink_auth::password::PasswordHasher;
use droplink_core::config::security::SecurityConfig;
use droplink_core::error::AppError;
use droplink_core::result::AppResult;
use droplink_core::traits::clock::Clock;
use droplink_core::types::{FileId, LinkId};
use droplink_entity::audit::CreateAuditEntry;
use droplink_entity::file::StoredFile;
use droplink_entity::share::{
    AccessKey, AccessRecordStore, ConsumeOutcome, LinkType, ResolvedAccess, ShareLink, ShareTarget,
    TargetRef,
};

/// A hasher with minimal cost parameters so tests stay fast.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(&SecurityConfig {
        argon2_memory_kib: 8,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        ..SecurityConfig::default()
    })
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

pub fn hours_from_now(hours: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(hours)
}

/// Build a stored file addressed by the given share code.
pub fn make_file(
    code: &str,
    is_public: bool,
    password_hash: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    download_limit: Option<i32>,
    download_count: i32,
) -> StoredFile {
    StoredFile {
        id: FileId::new(),
        name: format!("{code}.txt"),
        storage_path: format!("blobs/{code}"),
        mime_type: Some("text/plain".to_string()),
        size_bytes: 42,
        share_code: code.to_string(),
        is_public,
        password_hash,
        expires_at,
        download_limit,
        download_count,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Build a share link for the given file.
pub fn make_link(
    file_id: FileId,
    token: &str,
    is_active: bool,
    password_hash: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    download_limit: Option<i32>,
    download_count: i32,
) -> ShareLink {
    ShareLink {
        id: LinkId::new(),
        file_id,
        link_type: LinkType::Public,
        recipient_email: None,
        token: token.to_string(),
        password_hash,
        expires_at,
        download_limit,
        download_count,
        is_active,
        created_at: Utc::now(),
        last_accessed: None,
    }
}

/// Build an indirect link target with a throwaway file id.
pub fn link_target(
    is_active: bool,
    password_hash: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    download_limit: Option<i32>,
    download_count: i32,
) -> ShareTarget {
    ShareTarget::IndirectLink(make_link(
        FileId::new(),
        "tok",
        is_active,
        password_hash,
        expires_at,
        download_limit,
        download_count,
    ))
}

/// A clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory access record store.
///
/// `consume` holds one lock across the re-check and the increment, which
/// is the in-process equivalent of the row-serialized conditional UPDATE
/// the PostgreSQL store issues.
#[derive(Debug, Default)]
pub struct MemoryAccessStore {
    pub files: Mutex<HashMap<FileId, StoredFile>>,
    pub links: Mutex<HashMap<LinkId, ShareLink>>,
    pub audits: Mutex<Vec<CreateAuditEntry>>,
    /// When set, `consume` fails with a database error.
    pub fail_consume: AtomicBool,
}

impl MemoryAccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_file(&self, file: StoredFile) {
        self.files.lock().unwrap().insert(file.id, file);
    }

    pub fn insert_link(&self, link: ShareLink) {
        self.links.lock().unwrap().insert(link.id, link);
    }

    pub fn file_count(&self, id: FileId) -> i32 {
        self.files.lock().unwrap()[&id].download_count
    }

    pub fn audit_len(&self) -> usize {
        self.audits.lock().unwrap().len()
    }

    pub fn set_fail_consume(&self, fail: bool) {
        self.fail_consume.store(fail, Ordering::SeqCst);
    }
}

fn grantable(
    expires_at: Option<DateTime<Utc>>,
    download_limit: Option<i32>,
    download_count: i32,
    now: DateTime<Utc>,
) -> bool {
    if let Some(expires) = expires_at {
        if now > expires {
            return false;
        }
    }
    if let Some(limit) = download_limit {
        if download_count >= limit {
            return false;
        }
    }
    true
}

#[async_trait]
impl AccessRecordStore for MemoryAccessStore {
    async fn resolve(&self, key: &AccessKey) -> AppResult<Option<ResolvedAccess>> {
        match key {
            AccessKey::Code(code) => {
                let files = self.files.lock().unwrap();
                Ok(files
                    .values()
                    .find(|f| f.share_code == *code)
                    .map(|file| ResolvedAccess {
                        target: ShareTarget::DirectCode(file.clone()),
                        file: file.clone(),
                    }))
            }
            AccessKey::Token(token) => {
                let links = self.links.lock().unwrap();
                let Some(link) = links.values().find(|l| l.token == *token).cloned() else {
                    return Ok(None);
                };
                drop(links);
                let files = self.files.lock().unwrap();
                Ok(files.get(&link.file_id).map(|file| ResolvedAccess {
                    target: ShareTarget::IndirectLink(link),
                    file: file.clone(),
                }))
            }
        }
    }

    async fn consume(
        &self,
        target: TargetRef,
        now: DateTime<Utc>,
        audit: &CreateAuditEntry,
    ) -> AppResult<ConsumeOutcome> {
        if self.fail_consume.load(Ordering::SeqCst) {
            return Err(AppError::database("store unreachable"));
        }

        let download_count = match target {
            TargetRef::File(id) => {
                let mut files = self.files.lock().unwrap();
                let Some(file) = files.get_mut(&id) else {
                    return Ok(ConsumeOutcome::Contended);
                };
                if !file.is_public
                    || !grantable(file.expires_at, file.download_limit, file.download_count, now)
                {
                    return Ok(ConsumeOutcome::Contended);
                }
                file.download_count += 1;
                file.download_count
            }
            TargetRef::Link(id) => {
                let mut links = self.links.lock().unwrap();
                let Some(link) = links.get_mut(&id) else {
                    return Ok(ConsumeOutcome::Contended);
                };
                if !link.is_active
                    || !grantable(link.expires_at, link.download_limit, link.download_count, now)
                {
                    return Ok(ConsumeOutcome::Contended);
                }
                link.download_count += 1;
                link.last_accessed = Some(now);
                link.download_count
            }
        };

        self.audits.lock().unwrap().push(audit.clone());
        Ok(ConsumeOutcome::Committed { download_count })
    }

    async fn deactivate_link(&self, link_id: LinkId) -> AppResult<bool> {
        let mut links = self.links.lock().unwrap();
        match links.get_mut(&link_id) {
            Some(link) => {
                link.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
