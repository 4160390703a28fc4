//! Ticket domain types.
//!
//! A [`Ticket`] is one recorded lottery play. Every ingestion path (JSON API,
//! HTML form, photo upload) funnels its untrusted input through the parsers
//! in this module, so the persistence layer only ever sees a [`Game`] that
//! has already been checked and exactly five white balls.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of white balls on every play.
pub const WHITE_BALL_COUNT: usize = 5;

/// The format accepted for draw dates (`YYYY-MM-DD`).
pub const DRAW_DATE_FORMAT: &str = "%Y-%m-%d";

/// The white-ball numbers of a play, in the order they were entered.
pub type WhiteBalls = [i32; WHITE_BALL_COUNT];

/// Supported lottery games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Game {
    Powerball,
    MegaMillions,
}

impl Game {
    /// The canonical wire and storage spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Game::Powerball => "POWERBALL",
            Game::MegaMillions => "MEGAMILLIONS",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`Game`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game: {0:?}")]
pub struct UnknownGame(pub String);

impl FromStr for Game {
    type Err = UnknownGame;

    /// Matching is exact: `"powerball"` is not a game.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POWERBALL" => Ok(Game::Powerball),
            "MEGAMILLIONS" => Ok(Game::MegaMillions),
            other => Err(UnknownGame(other.to_string())),
        }
    }
}

/// Parse a calendar date in [`DRAW_DATE_FORMAT`].
///
/// The shape is strict: four-digit year, two-digit month and day, no
/// surrounding whitespace and no sign.
pub fn parse_draw_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(s, DRAW_DATE_FORMAT).ok()
}

/// Convert an arbitrary-length list into exactly five white balls.
///
/// Returns `None` when the length is wrong. Values are not range checked.
pub fn white_balls_from(values: Vec<i32>) -> Option<WhiteBalls> {
    WhiteBalls::try_from(values).ok()
}

/// A persisted lottery play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub user_id: i64,
    pub game: Game,
    pub draw_date: NaiveDate,
    pub white: WhiteBalls,
    pub special: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated, caller-supplied fields for a new [`Ticket`].
///
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInput {
    pub user_id: i64,
    pub game: Game,
    pub draw_date: NaiveDate,
    pub white: WhiteBalls,
    pub special: i32,
    pub multiplier: Option<i32>,
    pub image_url: Option<String>,
}

impl CreateInput {
    /// Combine the input with the storage-assigned identity.
    pub fn into_ticket(self, id: i64, created_at: DateTime<Utc>) -> Ticket {
        Ticket {
            id,
            user_id: self.user_id,
            game: self.game,
            draw_date: self.draw_date,
            white: self.white,
            special: self.special,
            multiplier: self.multiplier,
            image_url: self.image_url,
            created_at,
        }
    }
}

/// Processing state of an uploaded ticket photo.
///
/// Only [`PhotoStatus::PendingOcr`] is produced today; nothing moves a photo
/// out of it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStatus {
    PendingOcr,
    OcrSucceeded,
    OcrFailed,
}
