use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub status: String,
    pub booked_at: DateTime<Utc>,
}

/// A caller's ticket joined with the display fields of its event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketSummary {
    pub ticket_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub status: String,
}
