//! Encode/decode helpers for SQLite ↔ domain type conversions.

use crate::tickets::{Game, WhiteBalls};

/// Decode the `game` TEXT column.
///
/// The schema CHECK keeps unknown values out, so a failure here means the
/// database was written by something other than this crate.
pub fn decode_game(s: &str) -> Result<Game, sqlx::Error> {
    s.parse::<Game>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Split the white balls into the five `white1`..`white5` column values.
pub fn encode_white(white: &WhiteBalls) -> (i32, i32, i32, i32, i32) {
    (white[0], white[1], white[2], white[3], white[4])
}
