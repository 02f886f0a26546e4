use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::extractors::{CallerId, JsonBody};
use crate::models::TicketSummary;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::created;

#[derive(Debug, Deserialize)]
pub struct BookTicketRequest {
    pub event_id: Uuid,
}

/// Books a ticket for the caller. Repeated bookings of the same event each
/// create a new ticket; there is no capacity limit.
pub async fn book_ticket(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    JsonBody(payload): JsonBody<BookTicketRequest>,
) -> AppResult<impl IntoResponse> {
    let ticket = state.tickets.create(user_id, payload.event_id).await?;

    tracing::info!(
        ticket_id = %ticket.ticket_id,
        user_id = %user_id,
        event_id = %ticket.event_id,
        "Ticket booked"
    );

    Ok(created(ticket))
}

pub async fn my_tickets(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
) -> AppResult<Json<Vec<TicketSummary>>> {
    let tickets = state.tickets.list_for_user(user_id).await?;
    Ok(Json(tickets))
}
