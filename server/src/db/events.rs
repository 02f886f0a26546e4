use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::EventRepository;
use crate::models::{Event, EventChanges, EventUpdate, NewEvent};
use crate::utils::error::AppResult;

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn list(&self) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>("SELECT * FROM events")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find(&self, event_id: Uuid) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE event_id = $1")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list_by_creator(&self, created_by: &str) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE created_by = $1")
            .bind(created_by)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn create(&self, event: NewEvent) -> AppResult<Event> {
        let row = sqlx::query_as::<_, Event>(
            "INSERT INTO events (title, description, date, time, location, image, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(event.title)
        .bind(event.description)
        .bind(event.date)
        .bind(event.time)
        .bind(event.location)
        .bind(event.image)
        .bind(event.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, event_id: Uuid, changes: EventChanges) -> AppResult<Option<EventUpdate>> {
        let description_supplied = changes.description.is_some();
        let row = sqlx::query_as::<_, EventUpdate>(
            "UPDATE events AS e SET
                 title = COALESCE($2, e.title),
                 description = CASE WHEN $9 THEN $3 ELSE e.description END,
                 date = COALESCE($4, e.date),
                 time = COALESCE($5, e.time),
                 location = COALESCE($6, e.location),
                 image = COALESCE($7, e.image),
                 created_by = COALESCE($8, e.created_by)
             FROM (SELECT event_id, image FROM events WHERE event_id = $1 FOR UPDATE) AS previous
             WHERE e.event_id = previous.event_id
             RETURNING e.event_id, e.title, e.description, e.date, e.time, e.location, e.image,
                       e.created_by, e.created_at, previous.image AS previous_image",
        )
        .bind(event_id)
        .bind(changes.title)
        .bind(changes.description.flatten())
        .bind(changes.date)
        .bind(changes.time)
        .bind(changes.location)
        .bind(changes.image)
        .bind(changes.created_by)
        .bind(description_supplied)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, event_id: Uuid) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, Event>("DELETE FROM events WHERE event_id = $1 RETURNING *")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }
}
