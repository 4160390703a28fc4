//! Ticket photo upload
//!
//! Photos are written to disk and acknowledged as `pending_ocr`. No ticket
//! row is created for them yet, and no OCR runs.

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::http::parsers::sniff_image;
use crate::http::{ApiError, SharedState};
use crate::persistence::TicketRepository;
use crate::tickets::{Game, PhotoStatus};

const GAME_FIELD: &str = "game";
const FILE_FIELD: &str = "ticket";

/// Body of a successful upload.
#[derive(Debug, Serialize)]
pub struct PhotoUploadResponse {
    pub id: String,
    pub game: Game,
    pub status: PhotoStatus,
}

fn invalid_form(err: impl std::fmt::Display) -> ApiError {
    tracing::debug!(error = %err, "Unreadable photo upload");
    ApiError::bad_request("file too large or invalid form")
}

/// The parts of the multipart body this endpoint looks at.
#[derive(Default)]
struct UploadParts {
    game: Option<String>,
    file: Option<Bytes>,
}

async fn read_parts(multipart: &mut Multipart) -> Result<UploadParts, MultipartError> {
    let mut parts = UploadParts::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        let is_file = field.file_name().is_some();
        match name.as_deref() {
            Some(GAME_FIELD) if !is_file && parts.game.is_none() => {
                parts.game = Some(field.text().await?);
            }
            Some(FILE_FIELD) if is_file && parts.file.is_none() => {
                parts.file = Some(field.bytes().await?);
            }
            // Unread fields are skipped by the next `next_field` call.
            _ => {}
        }
    }
    Ok(parts)
}

/// `POST /api/tickets/photo`
///
/// The request body is capped by the route's body limit; exceeding it
/// surfaces here as a multipart read error.
pub async fn upload_ticket_photo<R: TicketRepository>(
    State(state): State<SharedState<R>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<PhotoUploadResponse>), ApiError> {
    let mut multipart = multipart.map_err(invalid_form)?;
    let parts = read_parts(&mut multipart).await.map_err(invalid_form)?;

    let game = match parts.game.as_deref() {
        None | Some("") => return Err(ApiError::bad_request("game is required")),
        Some(raw) => raw
            .parse::<Game>()
            .map_err(|_| ApiError::bad_request("invalid game"))?,
    };

    let file = parts
        .file
        .ok_or_else(|| ApiError::bad_request("ticket file is required"))?;

    let Some(content_type) = sniff_image(&file) else {
        return Err(ApiError::bad_request("only JPEG/PNG allowed"));
    };
    tracing::info!(%game, content_type, size = file.len(), "POST /api/tickets/photo");

    let id = state
        .photos
        .save(&file)
        .await
        .map_err(|e| ApiError::upload("storage error", e))?;

    Ok((
        StatusCode::CREATED,
        Json(PhotoUploadResponse {
            id: id.to_string(),
            game,
            status: PhotoStatus::PendingOcr,
        }),
    ))
}
