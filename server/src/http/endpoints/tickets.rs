//! JSON ticket endpoints

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::http::parsers::parse_json_ticket;
use crate::http::{ApiError, SharedState};
use crate::persistence::TicketRepository;
use crate::tickets::Ticket;

/// `POST /api/tickets`
///
/// The body is read raw so that every decode failure maps to the same
/// `"invalid JSON"` message.
pub async fn create_ticket_json<R: TicketRepository>(
    State(state): State<SharedState<R>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let input = parse_json_ticket(&body, state.placeholder_user_id)?;
    tracing::info!(game = %input.game, draw_date = %input.draw_date, "POST /api/tickets");

    let ticket = state
        .tickets
        .create(input)
        .await
        .map_err(|e| ApiError::storage("failed to create ticket", e))?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// `GET /api/tickets`
pub async fn list_tickets<R: TicketRepository>(
    State(state): State<SharedState<R>>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let user_id = state.placeholder_user_id;
    tracing::info!(user_id, "GET /api/tickets");

    let tickets = state
        .tickets
        .list_for_user(user_id)
        .await
        .map_err(|e| ApiError::storage("failed to list tickets", e))?;

    Ok(Json(tickets))
}
