use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Stored event. `image` holds the canonical `/uploads/<file>` reference,
/// never an absolute URL.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub image: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventUpdate {
    #[sqlx(flatten)]
    pub event: Event,
    pub previous_image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub image: Option<String>,
    pub created_by: String,
}

/// `None` keeps the stored column. `description` is nullable, so
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub created_by: Option<String>,
}

/// Event as returned to clients, with `image` resolved against the serving
/// origin (or empty when the event has none).
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub image: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl EventView {
    pub fn new(event: Event, origin: &str) -> Self {
        let image = match event.image {
            Some(path) if !path.is_empty() => format!("{origin}{path}"),
            _ => String::new(),
        };

        Self {
            event_id: event.event_id,
            title: event.title,
            description: event.description,
            date: event.date,
            time: event.time,
            location: event.location,
            image,
            created_by: event.created_by,
            created_at: event.created_at,
        }
    }
}
