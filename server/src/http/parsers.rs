//! Parsing untrusted request bodies into [`CreateInput`].
//!
//! The JSON and form paths report different messages for the same mistakes:
//! the API answers with short lowercase strings, the form with sentences
//! that are shown inline on the page.

use serde::Deserialize;

use crate::tickets::{
    parse_draw_date, white_balls_from, CreateInput, Game, WhiteBalls, WHITE_BALL_COUNT,
};

/// Bytes inspected when sniffing an upload's content type.
pub const SNIFF_LEN: usize = 512;

const JPEG_SIGNATURE: &[u8] = b"\xFF\xD8\xFF";
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1A\n";

// ============================================================================
// JSON
// ============================================================================

/// Body of `POST /api/tickets`. Missing and `null` fields take their zero
/// value and are caught by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTicketRequest {
    pub game: Option<String>,
    pub draw_date: Option<String>,
    pub white: Option<Vec<i32>>,
    pub special: Option<i32>,
    pub multiplier: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("invalid JSON")]
    InvalidJson,
    #[error("invalid game")]
    InvalidGame,
    #[error("white must have 5 numbers")]
    WhiteCount,
    #[error("invalid draw_date")]
    InvalidDrawDate,
}

/// Decode and validate a JSON ticket.
///
/// Checks run in a fixed order: JSON syntax, game, white-ball count, draw
/// date. Ball values are not range checked.
pub fn parse_json_ticket(body: &[u8], user_id: i64) -> Result<CreateInput, InputError> {
    let req: CreateTicketRequest =
        serde_json::from_slice(body).map_err(|_| InputError::InvalidJson)?;

    let game: Game = req
        .game
        .unwrap_or_default()
        .parse()
        .map_err(|_| InputError::InvalidGame)?;
    let white = white_balls_from(req.white.unwrap_or_default()).ok_or(InputError::WhiteCount)?;
    let draw_date = parse_draw_date(req.draw_date.as_deref().unwrap_or_default())
        .ok_or(InputError::InvalidDrawDate)?;

    Ok(CreateInput {
        user_id,
        game,
        draw_date,
        white,
        special: req.special.unwrap_or_default(),
        multiplier: req.multiplier,
        image_url: req.image_url,
    })
}

// ============================================================================
// HTML form
// ============================================================================

/// Fields of the add-ticket form, all as submitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TicketForm {
    pub game: String,
    pub draw_date: String,
    pub white1: String,
    pub white2: String,
    pub white3: String,
    pub white4: String,
    pub white5: String,
    pub special: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("All fields are required.")]
    MissingFields,
    #[error("Invalid draw date.")]
    InvalidDrawDate,
    #[error("White ball numbers must be integers.")]
    WhiteNotInteger,
    #[error("Special ball must be an integer.")]
    SpecialNotInteger,
    #[error("Invalid game.")]
    InvalidGame,
}

/// Validate a submitted form.
///
/// Only `game`, `draw_date` and `special` count as required; an empty white
/// field surfaces as [`FormError::WhiteNotInteger`].
pub fn parse_ticket_form(form: &TicketForm, user_id: i64) -> Result<CreateInput, FormError> {
    if form.game.is_empty() || form.draw_date.is_empty() || form.special.is_empty() {
        return Err(FormError::MissingFields);
    }

    let draw_date = parse_draw_date(&form.draw_date).ok_or(FormError::InvalidDrawDate)?;

    let fields = [
        &form.white1,
        &form.white2,
        &form.white3,
        &form.white4,
        &form.white5,
    ];
    let mut white: WhiteBalls = [0; WHITE_BALL_COUNT];
    for (slot, value) in white.iter_mut().zip(fields) {
        *slot = value.parse().map_err(|_| FormError::WhiteNotInteger)?;
    }

    let special = form
        .special
        .parse()
        .map_err(|_| FormError::SpecialNotInteger)?;

    let game: Game = form.game.parse().map_err(|_| FormError::InvalidGame)?;

    Ok(CreateInput {
        user_id,
        game,
        draw_date,
        white,
        special,
        multiplier: None,
        image_url: None,
    })
}

// ============================================================================
// Uploads
// ============================================================================

/// Sniff the content type of an upload from its leading bytes.
///
/// Returns `Some` only for JPEG and PNG; the file name and the declared
/// content type play no part.
pub fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    if head.starts_with(JPEG_SIGNATURE) {
        Some("image/jpeg")
    } else if head.starts_with(PNG_SIGNATURE) {
        Some("image/png")
    } else {
        None
    }
}
