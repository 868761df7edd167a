pub mod content;
pub mod identity;

pub use content::PostgresContentRepository;
pub use identity::PostgresIdentityRepository;
