use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::TicketRepository;
use crate::models::{Ticket, TicketSummary};
use crate::utils::error::AppResult;

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    // No capacity or duplicate-booking check: every call inserts a new row.
    async fn create(&self, user_id: Uuid, event_id: Uuid) -> AppResult<Ticket> {
        let row = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (user_id, event_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TicketSummary>> {
        let rows = sqlx::query_as::<_, TicketSummary>(
            "SELECT t.ticket_id, e.title, e.date, e.location, t.status
             FROM tickets t
             JOIN events e ON t.event_id = e.event_id
             WHERE t.user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
