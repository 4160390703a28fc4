//! SQLite-backed repository implementations.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode**: one writer and multiple concurrent readers.
//! - **Embedded migrations**: `sqlx::migrate!` runs `migrations/001_create_tickets.sql`
//!   when [`Database::open`] is called.
//!
//! ## Repository types
//!
//! [`SqliteTicketRepository`] holds a clone of the pool and implements
//! [`crate::persistence::TicketRepository`]. Every call is a single
//! statement; there are no transactions and no retries.
//!
//! The `game` column is stored as `TEXT` and round-tripped through the
//! helpers in [`helpers`]. White balls live in five scalar columns.

mod database;
mod ticket_repo;
pub(crate) mod helpers;

pub use database::Database;
pub use ticket_repo::SqliteTicketRepository;
