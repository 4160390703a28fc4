//! Async repository trait for tickets.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send`, which axum requires of handler futures
//! that are generic over the repository.

use super::PersistenceError;
use crate::tickets::{CreateInput, Ticket};
use std::future::Future;

/// Repository for recorded tickets.
///
/// Implementations trust their input: game membership and white-ball count
/// are enforced by the types in [`CreateInput`], not re-checked here.
/// Tickets are never updated or deleted.
pub trait TicketRepository: Send + Sync {
    /// Insert one ticket and return it with its assigned `id` and `created_at`.
    fn create(
        &self,
        input: CreateInput,
    ) -> impl Future<Output = Result<Ticket, PersistenceError>> + Send;

    /// All tickets owned by `user_id`, newest draw first, ties broken by
    /// most recently inserted. Empty when the user has none.
    fn list_for_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = Result<Vec<Ticket>, PersistenceError>> + Send;
}
