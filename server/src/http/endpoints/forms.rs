//! HTML form endpoints
//!
//! Every outcome of a form submission, including failures, is a 200 page;
//! errors are shown inline rather than through status codes.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use crate::http::parsers::{parse_ticket_form, TicketForm};
use crate::http::templates::{render_add_ticket, AddTicketView};
use crate::http::SharedState;
use crate::persistence::TicketRepository;

/// `GET /tickets/new`
pub async fn show_add_ticket_form() -> Html<String> {
    tracing::info!("GET /tickets/new");
    render_add_ticket(AddTicketView::default())
}

/// `POST /tickets`
pub async fn create_ticket_form<R: TicketRepository>(
    State(state): State<SharedState<R>>,
    form: Result<Form<TicketForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        // A body that is not a form at all carries no fields.
        Err(FormRejection::InvalidFormContentType(_)) => TicketForm::default(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Undecodable ticket form");
            return (StatusCode::BAD_REQUEST, "bad form data").into_response();
        }
    };
    tracing::info!(game = %form.game, draw_date = %form.draw_date, "POST /tickets");

    let input = match parse_ticket_form(&form, state.placeholder_user_id) {
        Ok(input) => input,
        Err(e) => {
            let message = e.to_string();
            return render_add_ticket(AddTicketView::error(&message)).into_response();
        }
    };

    if let Err(e) = state.tickets.create(input).await {
        tracing::error!(error = %e, "create ticket");
        return render_add_ticket(AddTicketView::error("Could not create ticket.")).into_response();
    }

    render_add_ticket(AddTicketView::success()).into_response()
}
