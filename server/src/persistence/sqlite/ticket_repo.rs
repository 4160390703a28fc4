//! SQLite-backed implementation of [`TicketRepository`].

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use super::helpers::{decode_game, encode_white};
use crate::persistence::traits::TicketRepository;
use crate::persistence::PersistenceError;
use crate::tickets::{CreateInput, Ticket};

/// One row of the `tickets` table.
#[derive(sqlx::FromRow)]
struct TicketRow {
    id: i64,
    user_id: i64,
    game: String,
    draw_date: NaiveDate,
    white1: i32,
    white2: i32,
    white3: i32,
    white4: i32,
    white5: i32,
    special: i32,
    multiplier: Option<i32>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = sqlx::Error;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: row.id,
            user_id: row.user_id,
            game: decode_game(&row.game)?,
            draw_date: row.draw_date,
            white: [row.white1, row.white2, row.white3, row.white4, row.white5],
            special: row.special,
            multiplier: row.multiplier,
            image_url: row.image_url,
            created_at: row.created_at,
        })
    }
}

pub struct SqliteTicketRepository {
    pool: SqlitePool,
}

impl SqliteTicketRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TicketRepository for SqliteTicketRepository {
    async fn create(&self, input: CreateInput) -> Result<Ticket, PersistenceError> {
        let (w1, w2, w3, w4, w5) = encode_white(&input.white);

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO tickets
                (user_id, game, draw_date,
                 white1, white2, white3, white4, white5,
                 special, multiplier, image_url)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.game.as_str())
        .bind(input.draw_date)
        .bind(w1)
        .bind(w2)
        .bind(w3)
        .bind(w4)
        .bind(w5)
        .bind(input.special)
        .bind(input.multiplier)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id, user_id = input.user_id, game = %input.game, "Inserted ticket");
        Ok(input.into_ticket(id, created_at))
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Ticket>, PersistenceError> {
        let rows: Vec<TicketRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, game, draw_date,
                   white1, white2, white3, white4, white5,
                   special, multiplier, image_url, created_at
            FROM tickets
            WHERE user_id = ?
            ORDER BY draw_date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let tickets = rows
            .into_iter()
            .map(Ticket::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tickets)
    }
}
