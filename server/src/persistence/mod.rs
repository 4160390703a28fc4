mod photo_store;
pub mod sqlite;
pub mod traits;

pub use photo_store::{PhotoId, PhotoStore};
pub use traits::TicketRepository;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(String),
}
