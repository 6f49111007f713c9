//! Repository implementations for database operations.

pub mod business;
pub mod category;
pub mod design_version;
pub mod menu_item;
pub mod profile;

pub use business::BusinessRepository;
pub use category::CategoryRepository;
pub use design_version::DesignVersionRepository;
pub use menu_item::MenuItemRepository;
pub use profile::ProfileRepository;

use domain::error::DomainError;

/// Maps a database error raised behind a domain store trait.
pub(crate) fn store_error(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => DomainError::Conflict("Concurrent update, please retry".to_string()),
            // A referenced row was deleted concurrently
            Some("23503") => DomainError::not_found("Referenced resource"),
            _ => DomainError::upstream(&err),
        },
        _ => DomainError::upstream(&err),
    }
}
