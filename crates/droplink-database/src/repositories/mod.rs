//! Concrete repository implementations.

pub mod access;
pub mod audit;
pub mod file;
pub mod link;

pub use access::PgAccessStore;
pub use audit::AuditRepository;
pub use file::FileRepository;
pub use link::ShareLinkRepository;
