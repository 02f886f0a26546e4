use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use crate::extractors::PublicOrigin;
use crate::models::{Event, EventChanges, EventUpdate, EventView, NewEvent};
use crate::state::AppState;
use crate::storage::{ImageField, StoredFile, Upload, UploadForm};
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{created, message};

#[derive(Debug, Deserialize)]
pub struct ByUserQuery {
    pub email: Option<String>,
}

pub async fn list_events(
    State(state): State<AppState>,
    origin: PublicOrigin,
) -> AppResult<Json<Vec<EventView>>> {
    let events = state.events.list().await?;
    Ok(Json(views(events, &origin)))
}

pub async fn list_events_by_user(
    State(state): State<AppState>,
    origin: PublicOrigin,
    Query(query): Query<ByUserQuery>,
) -> AppResult<Json<Vec<EventView>>> {
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::ValidationError("email query parameter is required".to_string()))?;

    let events = state.events.list_by_creator(email).await?;
    Ok(Json(views(events, &origin)))
}

pub async fn get_event(
    State(state): State<AppState>,
    origin: PublicOrigin,
    Path(id): Path<String>,
) -> AppResult<Json<EventView>> {
    let event = state
        .events
        .find(parse_event_id(&id)?)
        .await?
        .ok_or_else(|| event_not_found(&id))?;

    Ok(Json(EventView::new(event, origin.as_str())))
}

pub async fn create_event(
    State(state): State<AppState>,
    origin: PublicOrigin,
    Upload { mut form, .. }: Upload<ImageField>,
) -> AppResult<impl IntoResponse> {
    match insert_event(&state, &form).await {
        Ok(event) => {
            tracing::info!(event_id = %event.event_id, created_by = %event.created_by, "Event created");
            Ok(created(EventView::new(event, origin.as_str())))
        }
        Err(e) => {
            form.discard(&state.uploads).await;
            Err(e)
        }
    }
}

/// Partial update. The image only changes through an uploaded file; the
/// replaced file is removed once the row points at the new one.
pub async fn update_event(
    State(state): State<AppState>,
    origin: PublicOrigin,
    Path(id): Path<String>,
    Upload { mut form, .. }: Upload<ImageField>,
) -> AppResult<Json<EventView>> {
    let EventUpdate {
        event,
        previous_image,
    } = match apply_update(&state, &id, &form).await {
        Ok(updated) => updated,
        Err(e) => {
            form.discard(&state.uploads).await;
            return Err(e);
        }
    };

    if form.file().is_some() {
        if let Some(previous) = previous_image.filter(|p| Some(p) != event.image.as_ref()) {
            state.uploads.remove(&previous).await;
        }
    }

    tracing::info!(event_id = %event.event_id, "Event updated");
    Ok(Json(EventView::new(event, origin.as_str())))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let event = state
        .events
        .delete(parse_event_id(&id)?)
        .await?
        .ok_or_else(|| event_not_found(&id))?;

    if let Some(image) = event.image.as_deref().filter(|i| !i.is_empty()) {
        state.uploads.remove(image).await;
    }

    tracing::info!(event_id = %event.event_id, "Event deleted");
    Ok(message("Event deleted successfully"))
}

async fn insert_event(state: &AppState, form: &UploadForm) -> AppResult<Event> {
    let event = NewEvent {
        title: form.require("title")?.to_string(),
        description: form.text("description").map(str::to_string),
        date: parse_date(form.require("date")?)?,
        time: parse_time(form.require("time")?)?,
        location: form.require("location")?.to_string(),
        image: form.file().map(StoredFile::public_path),
        created_by: form.require("created_by")?.to_string(),
    };

    state.events.create(event).await
}

async fn apply_update(state: &AppState, id: &str, form: &UploadForm) -> AppResult<EventUpdate> {
    let event_id = parse_event_id(id)?;
    let changes = EventChanges {
        title: form.text("title").map(str::to_string),
        description: form
            .has("description")
            .then(|| form.text("description").map(str::to_string)),
        date: form.text("date").map(parse_date).transpose()?,
        time: form.text("time").map(parse_time).transpose()?,
        location: form.text("location").map(str::to_string),
        image: form.file().map(StoredFile::public_path),
        created_by: form.text("created_by").map(str::to_string),
    };

    state
        .events
        .update(event_id, changes)
        .await?
        .ok_or_else(|| event_not_found(id))
}

fn views(events: Vec<Event>, origin: &PublicOrigin) -> Vec<EventView> {
    events
        .into_iter()
        .map(|event| EventView::new(event, origin.as_str()))
        .collect()
}

/// An id that is not a UUID cannot match any row.
fn parse_event_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| event_not_found(id))
}

fn event_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Event '{id}' not found"))
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::ValidationError(format!("Invalid date '{value}', expected YYYY-MM-DD"))
    })
}

fn parse_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::ValidationError(format!("Invalid time '{value}', expected HH:MM")))
}
