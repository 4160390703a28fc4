//! HTTP surface: router, shared state and ingestion endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/healthz` | [`endpoints::health::healthz`] |
//! | GET | `/api/tickets` | [`endpoints::tickets::list_tickets`] |
//! | POST | `/api/tickets` | [`endpoints::tickets::create_ticket_json`] |
//! | GET | `/tickets/new` | [`endpoints::forms::show_add_ticket_form`] |
//! | POST | `/tickets` | [`endpoints::forms::create_ticket_form`] |
//! | POST | `/api/tickets/photo` | [`endpoints::photos::upload_ticket_photo`] |
//!
//! Handlers are generic over [`TicketRepository`] so the router can be built
//! on any store.

pub mod endpoints;
pub mod error;
pub mod parsers;
pub mod templates;
#[cfg(test)]
mod integration_tests;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::persistence::{PhotoStore, TicketRepository};

pub use error::ApiError;

/// State shared by every handler.
pub struct AppState<R> {
    pub tickets: R,
    pub photos: PhotoStore,
    /// Owner recorded on every ticket until requests carry an identity.
    pub placeholder_user_id: i64,
    pub max_upload_bytes: usize,
}

impl<R: TicketRepository> AppState<R> {
    pub fn new(tickets: R, config: &ServerConfig) -> Self {
        Self {
            tickets,
            photos: PhotoStore::new(config.upload_dir.clone()),
            placeholder_user_id: config.placeholder_user_id,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

pub type SharedState<R> = Arc<AppState<R>>;

/// Build the application router.
pub fn build_router<R>(state: AppState<R>) -> Router
where
    R: TicketRepository + 'static,
{
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/healthz", get(endpoints::health::healthz))
        .route(
            "/api/tickets",
            get(endpoints::tickets::list_tickets::<R>)
                .post(endpoints::tickets::create_ticket_json::<R>),
        )
        .route(
            "/tickets/new",
            get(endpoints::forms::show_add_ticket_form),
        )
        .route("/tickets", post(endpoints::forms::create_ticket_form::<R>))
        .route(
            "/api/tickets/photo",
            post(endpoints::photos::upload_ticket_photo::<R>).layer(upload_limit),
        )
        .with_state(Arc::new(state))
}
